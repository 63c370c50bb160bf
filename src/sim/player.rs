use glam::{Vec3, vec3};

use super::{MobileEntity, MovementResult};
use crate::config::GameplayConfig;

/// How far the car must get from an impact before hitting something again
/// counts as a new crash.
const CONTACT_RELEASE: f32 = 0.5;

#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub throttle: f32, // –1 … +1  (reverse / forward)
    pub steer: f32,    // –1 … +1  (right / left)
    pub brake: bool,   // Space
}

/// How hard the player hit a building, judged by pre-collision speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crash {
    Minor,
    Major,
}

/// The player's car: a mobile entity plus heading and scalar speed.
#[derive(Clone, Copy, Debug)]
pub struct Player {
    pub body: MobileEntity,
    heading: f32,          // radians, 0 = facing −Z, CCW (left) positive
    speed: f32,            // world units / second along `forward()`, negative = reverse
    contact: Option<Vec3>, // where the last crash happened, until the car pulls clear
}

impl Player {
    pub fn new(body: MobileEntity, heading: f32) -> Self {
        Self {
            body,
            heading: heading.rem_euclid(std::f32::consts::TAU),
            speed: 0.0,
            contact: None,
        }
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Unit vector the car points along on the ground plane.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        let (s, c) = self.heading.sin_cos();
        vec3(-s, 0.0, -c)
    }

    /// Integrate one step of input and return the displacement to try.
    ///
    /// Without fuel the throttle is ignored; the car coasts under drag.
    pub fn drive(&mut self, cmd: InputCmd, dt: f32, tuning: &GameplayConfig, has_fuel: bool) -> Vec3 {
        /* 1. steering */
        if cmd.steer != 0.0 {
            let steer = cmd.steer.clamp(-1.0, 1.0);
            self.heading =
                (self.heading + steer * tuning.turn_rate * dt).rem_euclid(std::f32::consts::TAU);
        }

        /* 2. throttle / brake / drag */
        let throttle = if has_fuel { cmd.throttle.clamp(-1.0, 1.0) } else { 0.0 };
        if cmd.brake {
            self.speed = approach_zero(self.speed, tuning.braking * dt);
        } else if throttle != 0.0 {
            self.speed += throttle * tuning.acceleration * dt;
        } else {
            self.speed = approach_zero(self.speed, tuning.drag * dt);
        }
        self.speed = self.speed.clamp(-tuning.reverse_speed, tuning.max_speed);

        self.forward() * self.speed * dt
    }

    /// React to the resolver's verdict on the last `drive` displacement.
    ///
    /// A rejected move bounces the car back and is graded by the speed it
    /// had going in.  Only the first impact of a contact episode is
    /// reported: pushing on against the same wall is not a fresh crash until
    /// the car has moved more than `CONTACT_RELEASE` away from it.
    pub fn after_move(&mut self, result: &MovementResult, tuning: &GameplayConfig) -> Option<Crash> {
        let here = self.body.position();
        if result.applied {
            if self.contact.is_some_and(|at| at.distance(here) > CONTACT_RELEASE) {
                self.contact = None;
            }
            return None;
        }

        let impact = self.speed.abs();
        self.speed = -self.speed * tuning.bounce;
        if impact == 0.0 || self.contact.is_some() {
            return None;
        }
        self.contact = Some(here);
        Some(if impact >= tuning.major_collision_speed {
            Crash::Major
        } else {
            Crash::Minor
        })
    }
}

#[inline]
fn approach_zero(v: f32, step: f32) -> f32 {
    if v > 0.0 {
        (v - step).max(0.0)
    } else {
        (v + step).min(0.0)
    }
}
