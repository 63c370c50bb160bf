//! Static collision geometry derived from the city grid.
//!
//! *Nothing in here knows about health, speed or score.*  A query only
//! classifies one sphere against a set of obstacles; the consequences are
//! decided by whoever asked.

mod index;
mod volume;

pub use index::{BuildingVolume, CollisionIndex, HeightTable, IndexError};
pub use volume::{Aabb, BoundingSphere, Containment};

/// Result of one collision test.
///
/// The static index only produces `None` and `Building`; the remaining
/// variants come from sphere-vs-sphere checks against dynamic entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionOutcome {
    None,
    Building,
    Fuel,
    Bonus,
    Enemy,
}

impl CollisionOutcome {
    #[inline]
    pub fn is_hit(self) -> bool {
        self != CollisionOutcome::None
    }
}

/// Anything a moving sphere can be tested against.
pub trait Obstacles {
    fn query(&self, sphere: &BoundingSphere) -> CollisionOutcome;
}
