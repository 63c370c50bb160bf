//! Enemy launchers and the missiles they fire.
//!
//! A missile is aimed once, at launch, at where the player is standing and
//! then flies straight.  Buildings stop it, and it burns out after a fixed lifetime.

use glam::{Vec2, Vec3};

use super::{MobileEntity, movement};
use crate::collision::Obstacles;

/// Street-level turret that fires on a fixed cadence.
#[derive(Clone, Copy, Debug)]
pub struct Launcher {
    cooldown: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Missile {
    /// Unit direction on the ground plane.
    pub direction: Vec3,
    pub age: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissileFate {
    Flying,
    HitBuilding,
    Expired,
}

impl Launcher {
    pub fn new(first_shot_in: f32) -> Self {
        Self {
            cooldown: first_shot_in,
        }
    }

    /// Count down; `true` when a missile should be fired this step.
    pub fn tick(&mut self, dt: f32, interval: f32) -> bool {
        self.cooldown -= dt;
        if self.cooldown > 0.0 {
            return false;
        }
        self.cooldown += interval;
        true
    }
}

impl Missile {
    /// Aim from `from` toward `target`; `None` if they coincide.
    pub fn aimed(from: Vec3, target: Vec3) -> Option<Self> {
        let flat = Vec2::new(target.x - from.x, target.z - from.z).try_normalize()?;
        Some(Self {
            direction: Vec3::new(flat.x, 0.0, flat.y),
            age: 0.0,
        })
    }
}

/// Fly one step through the static world.
pub fn advance<O: Obstacles + ?Sized>(
    body: &mut MobileEntity,
    missile: &mut Missile,
    dt: f32,
    speed: f32,
    lifetime: f32,
    obstacles: &O,
) -> MissileFate {
    missile.age += dt;
    if missile.age >= lifetime {
        return MissileFate::Expired;
    }
    let res = movement::resolve(body, missile.direction * speed * dt, obstacles);
    if res.applied {
        MissileFate::Flying
    } else {
        MissileFate::HitBuilding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{BoundingSphere, CollisionIndex, HeightTable};
    use crate::world::{EMPTY, Grid};
    use glam::vec3;

    #[test]
    fn launcher_fires_on_cadence() {
        let mut l = Launcher::new(1.0);
        let shots: usize = (0..100).filter(|_| l.tick(0.1, 2.0)).count();
        // first at t=1.0, then every 2s → t = 1, 3, 5, 7, 9
        assert_eq!(shots, 5);
    }

    #[test]
    fn aim_ignores_height_and_normalises() {
        let m = Missile::aimed(vec3(0.0, 0.0, 0.0), vec3(3.0, 10.0, -4.0)).unwrap();
        assert!((m.direction - vec3(0.6, 0.0, -0.8)).length() < 1e-6);
        assert!(Missile::aimed(vec3(1.0, 0.0, 1.0), vec3(1.0, 5.0, 1.0)).is_none());
    }

    #[test]
    fn missile_stops_at_a_building() {
        // building at cell (4, 0)
        let mut codes = vec![EMPTY; 8];
        codes[4] = 1;
        let grid = Grid::from_codes(8, 1, codes, 1).unwrap();
        let index = CollisionIndex::build(&grid, &HeightTable::from_heights(&[1.0])).unwrap();

        let mut body = MobileEntity::new(vec3(0.5, 0.0, -0.5), BoundingSphere::new(Vec3::ZERO, 0.02), 10.0);
        let mut m = Missile::aimed(body.position(), vec3(7.5, 0.0, -0.5)).unwrap();

        let mut fate = MissileFate::Flying;
        for _ in 0..200 {
            fate = advance(&mut body, &mut m, 0.05, 4.0, 10.0, &index);
            if fate != MissileFate::Flying {
                break;
            }
        }
        assert_eq!(fate, MissileFate::HitBuilding);
        assert!(body.position().x + body.radius() < 4.0 + 1e-4);
    }

    #[test]
    fn missile_expires_after_its_lifetime() {
        let grid = Grid::from_codes(50, 1, vec![EMPTY; 50], 1).unwrap();
        let index = CollisionIndex::build(&grid, &HeightTable::default()).unwrap();
        let mut body = MobileEntity::new(vec3(0.5, 0.0, -0.5), BoundingSphere::new(Vec3::ZERO, 0.02), 10.0);
        let mut m = Missile::aimed(body.position(), vec3(49.0, 0.0, -0.5)).unwrap();

        let mut steps = 0;
        while advance(&mut body, &mut m, 0.1, 1.0, 1.0, &index) == MissileFate::Flying {
            steps += 1;
            assert!(steps < 100);
        }
        assert_eq!(advance(&mut body, &mut m, 0.1, 1.0, 1.0, &index), MissileFate::Expired);
    }
}
