use glam::Vec3;
use hecs::{Entity, World};

use super::MobileEntity;
use super::components::Kind;
use super::missile::{Launcher, Missile};
use crate::config::GameConfig;

/// Spawn a fuel can or bonus token at `at`.
pub fn pickup(world: &mut World, kind: Kind, at: Vec3, cfg: &GameConfig) -> Entity {
    debug_assert!(matches!(kind, Kind::Fuel | Kind::Bonus));
    world.spawn((
        MobileEntity::new(at, cfg.pickup_model(), cfg.entities.pickup_scale),
        kind,
    ))
}

/// Launchers share the pickup footprint.
pub fn launcher(world: &mut World, at: Vec3, first_shot_in: f32, cfg: &GameConfig) -> Entity {
    world.spawn((
        MobileEntity::new(at, cfg.pickup_model(), cfg.entities.pickup_scale),
        Kind::Launcher,
        Launcher::new(first_shot_in),
    ))
}

/// Fire from `from` toward `target`; `None` when the two coincide.
pub fn missile(world: &mut World, from: Vec3, target: Vec3, cfg: &GameConfig) -> Option<Entity> {
    let aim = Missile::aimed(from, target)?;
    Some(world.spawn((
        MobileEntity::new(from, cfg.missile_model(), cfg.entities.missile_scale),
        Kind::Missile,
        aim,
    )))
}
