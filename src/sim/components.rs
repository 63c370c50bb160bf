use bitflags::bitflags;

use crate::collision::CollisionOutcome;

bitflags! {
    /// How the rest of the simulation treats a street entity.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Traits: u8 {
        // Collected when the player drives through it.
        const PICKUP  = 0x01;
        // Hurts the player on contact.
        const HOSTILE = 0x02;
        // Never moves; counts toward placement clearance.
        const STATIC  = 0x04;
    }
}

/// What a spawned entity is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Fuel,
    Bonus,
    Launcher,
    Missile,
}

impl Kind {
    pub fn traits(self) -> Traits {
        match self {
            Kind::Fuel | Kind::Bonus => Traits::PICKUP | Traits::STATIC,
            Kind::Launcher => Traits::STATIC,
            Kind::Missile => Traits::HOSTILE,
        }
    }

    /// Outcome reported when the player touches this entity.
    pub fn outcome(self) -> CollisionOutcome {
        match self {
            Kind::Fuel => CollisionOutcome::Fuel,
            Kind::Bonus => CollisionOutcome::Bonus,
            Kind::Launcher | Kind::Missile => CollisionOutcome::Enemy,
        }
    }
}

/// Marker: a pickup that has already been collected.
#[derive(Clone, Copy, Debug, Default)]
pub struct Consumed;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pickups_are_static_and_missiles_are_not() {
        for k in [Kind::Fuel, Kind::Bonus] {
            assert!(k.traits().contains(Traits::PICKUP | Traits::STATIC));
        }
        assert!(!Kind::Missile.traits().intersects(Traits::STATIC | Traits::PICKUP));
        assert_eq!(Kind::Missile.outcome(), CollisionOutcome::Enemy);
        assert!(!Kind::Launcher.traits().contains(Traits::HOSTILE));
        assert_eq!(Kind::Fuel.outcome(), CollisionOutcome::Fuel);
    }
}
