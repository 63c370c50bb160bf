//! One running game.
//!
//! A `Session` owns the city, the player's car and a `hecs::World` holding
//! everything scattered on the streets (pickups, launchers, missiles).  The
//! caller feeds it one `InputCmd` per fixed step and gets back the events
//! that step produced.

use glam::Vec3;
use hecs::{Entity, World};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;

use super::components::{Consumed, Kind, Traits};
use super::gauges::{Gauge, Score};
use super::missile::{self, Launcher, Missile, MissileFate};
use super::placement::{PlacementError, find_free_cell};
use super::player::{Crash, InputCmd, Player};
use super::{MobileEntity, movement, spawn};
use crate::collision::CollisionOutcome;
use crate::config::{ConfigError, GameConfig};
use crate::world::{City, Grid, LoadError, load_city};

pub const MAX_HEALTH: f32 = 100.0;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("no place for the player: {0}")]
    Spawn(#[from] PlacementError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// Health ran out.
    Wrecked,
    /// Out of fuel and rolled to a stop.
    Stranded,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    Crashed { severity: Crash, damage: u32 },
    FuelCollected { added: f32 },
    BonusCollected { points: u32 },
    MissileLaunched { from: Vec3 },
    MissileHit { damage: u32 },
    MissileDestroyed,
    PhaseChanged(Phase),
}

/// Snapshot of one street entity for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityView {
    pub kind: Kind,
    pub position: Vec3,
    pub radius: f32,
    pub consumed: bool,
}

pub struct Session {
    config: GameConfig,
    city: City,
    world: World,
    player: Player,
    health: Gauge,
    fuel: Gauge,
    score: Score,
    phase: Phase,
    rng: StdRng,
    elapsed: f32,
}

impl Session {
    /// Load the configured city and populate it.
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let mut rng = match config.city.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let city = load_city(&config.city, &mut rng)?;
        Self::with_city(config, city, rng)
    }

    /// Populate an already built city.
    pub fn with_city(config: GameConfig, city: City, mut rng: StdRng) -> Result<Self, SessionError> {
        config.validate()?;
        let (x, z) = find_free_cell(
            &city.grid,
            &city.index,
            std::iter::empty::<&MobileEntity>(),
            0.0,
            &mut rng,
            config.gameplay.placement_attempts,
        )?;
        let body = MobileEntity::new(
            Grid::cell_center(x, z),
            config.player_model(),
            config.entities.player_scale,
        );

        let mut session = Self {
            player: Player::new(body, 0.0),
            health: Gauge::full(MAX_HEALTH),
            fuel: Gauge::full(config.gameplay.fuel_capacity),
            score: Score::default(),
            phase: Phase::Running,
            world: World::new(),
            elapsed: 0.0,
            config,
            city,
            rng,
        };
        session.scatter();
        info!(
            "session ready: player at cell ({x}, {z}), {} street entities",
            session.world.len()
        );
        Ok(session)
    }

    /*──────────────────────────── accessors ────────────────────────────*/

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn city(&self) -> &City {
        &self.city
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn health(&self) -> &Gauge {
        &self.health
    }

    #[inline]
    pub fn fuel(&self) -> &Gauge {
        &self.fuel
    }

    #[inline]
    pub fn score(&self) -> Score {
        self.score
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Simulated seconds since the session started.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn entities(&self) -> Vec<EntityView> {
        self.world
            .query::<(&MobileEntity, &Kind, Option<&Consumed>)>()
            .iter()
            .map(|(_, (body, kind, consumed))| EntityView {
                kind: *kind,
                position: body.position(),
                radius: body.radius(),
                consumed: consumed.is_some(),
            })
            .collect()
    }

    /*──────────────────────────── setup ────────────────────────────────*/

    /// Move the car to `pos`, stopped, facing `heading`.
    pub fn place_player(&mut self, pos: Vec3, heading: f32) {
        let mut body = self.player.body;
        body.set_position(pos);
        self.player = Player::new(body, heading);
    }

    pub fn spawn_pickup(&mut self, kind: Kind, at: Vec3) -> Entity {
        spawn::pickup(&mut self.world, kind, at, &self.config)
    }

    pub fn spawn_launcher(&mut self, at: Vec3, first_shot_in: f32) -> Entity {
        spawn::launcher(&mut self.world, at, first_shot_in, &self.config)
    }

    /// Scatter the configured pickups and launchers over open cells.
    /// A crowded map gets fewer of them rather than an error.
    fn scatter(&mut self) {
        let g = &self.config.gameplay;
        let plan = [
            (Kind::Fuel, g.fuel_pickups),
            (Kind::Bonus, g.bonus_pickups),
            (Kind::Launcher, g.launchers),
        ];
        let (clearance, attempts, interval) =
            (g.pickup_clearance, g.placement_attempts, g.launch_interval);

        for (kind, count) in plan {
            for placed in 0..count {
                let taken = self.static_bodies();
                let cell = find_free_cell(
                    &self.city.grid,
                    &self.city.index,
                    &taken,
                    clearance,
                    &mut self.rng,
                    attempts,
                );
                let (x, z) = match cell {
                    Ok(c) => c,
                    Err(e) => {
                        warn!("placed only {placed} of {count} {kind:?}: {e}");
                        break;
                    }
                };
                let at = Grid::cell_center(x, z);
                match kind {
                    Kind::Launcher => {
                        let first = interval * self.rng.gen_range(0.25..=1.0f32);
                        self.spawn_launcher(at, first);
                    }
                    _ => {
                        self.spawn_pickup(kind, at);
                    }
                }
                debug!("{kind:?} at cell ({x}, {z})");
            }
        }
    }

    fn static_bodies(&self) -> Vec<MobileEntity> {
        let mut out = vec![self.player.body];
        for (_, (body, kind)) in self.world.query::<(&MobileEntity, &Kind)>().iter() {
            if kind.traits().contains(Traits::STATIC) {
                out.push(*body);
            }
        }
        out
    }

    /*──────────────────────────── stepping ─────────────────────────────*/

    /// Advance the game by `dt` seconds.  A finished session ignores input.
    pub fn step(&mut self, cmd: InputCmd, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != Phase::Running {
            return events;
        }
        self.elapsed += dt;

        self.drive(cmd, dt, &mut events);
        self.collect_pickups(&mut events);
        self.fire_launchers(dt, &mut events);
        self.fly_missiles(dt, &mut events);
        self.update_phase(&mut events);
        events
    }

    fn drive(&mut self, cmd: InputCmd, dt: f32, events: &mut Vec<GameEvent>) {
        let g = &self.config.gameplay;
        let displacement = self.player.drive(cmd, dt, g, !self.fuel.is_empty());
        if displacement == Vec3::ZERO {
            return;
        }

        let result = movement::resolve(&mut self.player.body, displacement, &self.city);
        if result.applied {
            self.fuel.drain(displacement.length() * g.fuel_burn);
        }
        if let Some(severity) = self.player.after_move(&result, g) {
            let damage = match severity {
                Crash::Major => g.major_damage,
                Crash::Minor => g.minor_damage,
            };
            self.health.drain(damage as f32);
            info!("{severity:?} crash, -{damage} health");
            events.push(GameEvent::Crashed { severity, damage });
        }
    }

    fn collect_pickups(&mut self, events: &mut Vec<GameEvent>) {
        let player = self.player.body;
        let touched: Vec<(Entity, Kind)> = self
            .world
            .query::<(&MobileEntity, &Kind, Option<&Consumed>)>()
            .iter()
            .filter(|(_, (body, kind, consumed))| {
                consumed.is_none()
                    && kind.traits().contains(Traits::PICKUP)
                    && body.touches(&player)
            })
            .map(|(e, (_, kind, _))| (e, *kind))
            .collect();

        let g = &self.config.gameplay;
        for (entity, kind) in touched {
            self.world.insert_one(entity, Consumed).ok();
            match kind.outcome() {
                CollisionOutcome::Fuel => {
                    let added = self.fuel.fill(g.fuel_refill);
                    info!("fuel +{added:.1}");
                    events.push(GameEvent::FuelCollected { added });
                }
                CollisionOutcome::Bonus => {
                    self.score.add(g.bonus_score);
                    info!("bonus +{}, score {}", g.bonus_score, self.score.points());
                    events.push(GameEvent::BonusCollected {
                        points: g.bonus_score,
                    });
                }
                _ => {}
            }
        }
    }

    fn fire_launchers(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        let interval = self.config.gameplay.launch_interval;
        let mut shots: Vec<Vec3> = Vec::new();
        for (_, (body, launcher)) in self.world.query_mut::<(&MobileEntity, &mut Launcher)>() {
            if launcher.tick(dt, interval) {
                shots.push(body.position());
            }
        }

        let target = self.player.body.position();
        for from in shots {
            if spawn::missile(&mut self.world, from, target, &self.config).is_some() {
                debug!("missile away from ({:.1}, {:.1})", from.x, from.z);
                events.push(GameEvent::MissileLaunched { from });
            }
        }
    }

    fn fly_missiles(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        let g = &self.config.gameplay;
        let player = self.player.body;
        let mut gone: Vec<(Entity, CollisionOutcome)> = Vec::new();

        for (e, (body, m, kind)) in
            self.world
                .query_mut::<(&mut MobileEntity, &mut Missile, &Kind)>()
        {
            let fate = missile::advance(
                body,
                m,
                dt,
                g.missile_speed,
                g.missile_lifetime,
                &self.city,
            );
            match fate {
                MissileFate::Flying
                    if kind.traits().contains(Traits::HOSTILE) && body.touches(&player) =>
                {
                    gone.push((e, kind.outcome()))
                }
                MissileFate::Flying => {}
                MissileFate::HitBuilding => gone.push((e, CollisionOutcome::Building)),
                MissileFate::Expired => gone.push((e, CollisionOutcome::None)),
            }
        }

        for (entity, outcome) in gone {
            self.world.despawn(entity).ok();
            if outcome == CollisionOutcome::Enemy {
                self.health.drain(g.missile_damage as f32);
                info!("missile hit, -{} health", g.missile_damage);
                events.push(GameEvent::MissileHit {
                    damage: g.missile_damage,
                });
            } else {
                events.push(GameEvent::MissileDestroyed);
            }
        }
    }

    fn update_phase(&mut self, events: &mut Vec<GameEvent>) {
        let next = if self.health.is_empty() {
            Phase::Wrecked
        } else if self.fuel.is_empty() && self.player.speed() == 0.0 {
            Phase::Stranded
        } else {
            Phase::Running
        };
        if next != self.phase {
            self.phase = next;
            info!("game over: {next:?} after {:.1}s", self.elapsed);
            events.push(GameEvent::PhaseChanged(next));
        }
    }
}

/*====================================================================*/
/*  Tests                                                             */
/*====================================================================*/
