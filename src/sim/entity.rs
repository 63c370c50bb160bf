use glam::Vec3;

use crate::collision::BoundingSphere;

/// Radius multipliers applied once to a model's merged bounding sphere.
pub const PLAYER_SCALE: f32 = 1.0;
pub const PICKUP_SCALE: f32 = 0.5;
pub const ENEMY_SCALE: f32 = 10.0;

/// A positioned actor (player, missile, pickup) tracked by a ground-plane
/// bounding sphere.
///
/// * the sphere's X/Z always equal the entity's X/Z
/// * the sphere's Y is fixed at construction (ground plane) and never
///   follows the position – entities collide as ground-bound disks
/// * the radius never changes after construction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MobileEntity {
    position: Vec3,
    sphere: BoundingSphere,
}

impl MobileEntity {
    /// `merged` is the model's merged bounding sphere; only its radius is
    /// used, multiplied by `scale`.
    pub fn new(position: Vec3, merged: BoundingSphere, scale: f32) -> Self {
        let radius = merged.radius * scale;
        assert!(
            radius.is_finite() && radius > 0.0,
            "bounding radius must be positive, got {radius}"
        );
        Self {
            position,
            sphere: BoundingSphere::new(Vec3::new(position.x, 0.0, position.z), radius),
        }
    }

    /// Move to `pos`; the sphere is replaced by a recentered copy.
    #[inline]
    pub fn set_position(&mut self, pos: Vec3) {
        self.position = pos;
        self.sphere = self.sphere.recentered(pos);
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn sphere(&self) -> BoundingSphere {
        self.sphere
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.sphere.radius
    }

    /// Ground-plane overlap with another entity.
    #[inline]
    pub fn touches(&self, other: &MobileEntity) -> bool {
        self.sphere.touches_xz(&other.sphere)
    }

    /// Distance on the ground plane to `p`.
    #[inline]
    pub fn distance_xz(&self, p: Vec3) -> f32 {
        glam::Vec2::new(self.position.x - p.x, self.position.z - p.z).length()
    }
}
