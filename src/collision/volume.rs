use glam::Vec3;

/// How a sphere sits relative to a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Disjoint,
    Intersects,
    /// Sphere lies entirely inside the box.
    Contains,
}

/// Axis-aligned box, `min` ≤ `max` on every axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Immutable sphere value; movement replaces it instead of editing fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Aabb {
    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.cmple(max).all(), "inverted box {min} .. {max}");
        Self { min, max }
    }

    /// Classify `sphere` against this box.  Touching the surface counts as
    /// intersecting.
    pub fn contains_sphere(&self, sphere: &BoundingSphere) -> Containment {
        let closest = sphere.center.clamp(self.min, self.max);
        let r2 = sphere.radius * sphere.radius;
        if closest.distance_squared(sphere.center) > r2 {
            return Containment::Disjoint;
        }

        let r = Vec3::splat(sphere.radius);
        if (sphere.center - r).cmpge(self.min).all() && (sphere.center + r).cmple(self.max).all() {
            Containment::Contains
        } else {
            Containment::Intersects
        }
    }

    #[inline]
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

impl BoundingSphere {
    #[inline]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// New sphere under ground position `pos`: X/Z follow, Y stays put.
    #[inline]
    #[must_use]
    pub fn recentered(self, pos: Vec3) -> Self {
        Self {
            center: Vec3::new(pos.x, self.center.y, pos.z),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            radius: self.radius * factor,
            ..self
        }
    }

    /// Overlap on the ground plane (Y ignored).  Touching counts.
    #[inline]
    pub fn touches_xz(&self, other: &BoundingSphere) -> bool {
        let d = glam::Vec2::new(self.center.x - other.center.x, self.center.z - other.center.z);
        let reach = self.radius + other.radius;
        d.length_squared() <= reach * reach
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
