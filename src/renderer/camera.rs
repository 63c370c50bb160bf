use glam::{Vec2, Vec3, vec2};

/// Overhead view centred on a point of the ground plane.
///
/// * Screen up is world −Z (the way a car with heading 0 faces).
/// * The centre eases toward its target instead of snapping, so the city
///   does not jitter under the car.
#[derive(Clone, Copy, Debug)]
pub struct TopDownCamera {
    center: Vec2,         // world (x, z)
    pixels_per_unit: f32, // zoom
    stiffness: f32,       // 1/s; higher follows tighter
}

impl TopDownCamera {
    pub fn new(pixels_per_unit: f32, stiffness: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            pixels_per_unit,
            stiffness,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit
    }

    pub fn snap_to(&mut self, target: Vec3) {
        self.center = vec2(target.x, target.z);
    }

    /// Exponential ease toward `target` over `dt` seconds.
    pub fn follow(&mut self, target: Vec3, dt: f32) {
        let t = 1.0 - (-self.stiffness * dt.max(0.0)).exp();
        self.center = self.center.lerp(vec2(target.x, target.z), t);
    }

    /// World position → pixel coordinates for a `width × height` frame.
    #[inline]
    pub fn world_to_screen(&self, p: Vec3, width: usize, height: usize) -> (i32, i32) {
        let sx = width as f32 * 0.5 + (p.x - self.center.x) * self.pixels_per_unit;
        let sy = height as f32 * 0.5 + (p.z - self.center.y) * self.pixels_per_unit;
        (sx.floor() as i32, sy.floor() as i32)
    }

    /// World-space length → pixels (at least one).
    #[inline]
    pub fn scale(&self, len: f32) -> i32 {
        ((len * self.pixels_per_unit).round() as i32).max(1)
    }
}
