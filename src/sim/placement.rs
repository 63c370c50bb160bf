//! Random scattering of pickups and launchers onto open street cells.

use glam::Vec3;
use log::warn;
use rand::Rng;
use smallvec::SmallVec;
use thiserror::Error;

use super::MobileEntity;
use crate::collision::{BoundingSphere, CollisionIndex};
use crate::world::Grid;

/// Sphere dropped at a candidate cell centre to double-check the index.
const PROBE_RADIUS: f32 = 0.01;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlacementError {
    #[error("the map has no open cells")]
    NoFreeCells,

    #[error("no cell with enough clearance after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Pick a random open cell whose centre is at least `min_clearance` away
/// (on the ground plane) from every entity in `others`.
///
/// Candidates are drawn only from non-building cells, so a map with a single
/// open cell and zero clearance always yields that cell.  Gives up after
/// `max_attempts` rejected samples.
pub fn find_free_cell<'a, R, I>(
    grid: &Grid,
    index: &CollisionIndex,
    others: I,
    min_clearance: f32,
    rng: &mut R,
    max_attempts: u32,
) -> Result<(usize, usize), PlacementError>
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = &'a MobileEntity>,
{
    let free: Vec<(usize, usize)> = grid.free_cells().collect();
    if free.is_empty() {
        return Err(PlacementError::NoFreeCells);
    }
    let taken: SmallVec<[Vec3; 16]> = others.into_iter().map(MobileEntity::position).collect();

    for _ in 0..max_attempts {
        let (x, z) = free[rng.gen_range(0..free.len())];
        let center = Grid::cell_center(x, z);

        if index
            .query(&BoundingSphere::new(center, PROBE_RADIUS))
            .is_hit()
        {
            continue;
        }
        if taken.iter().any(|p| ground_distance(*p, center) < min_clearance) {
            continue;
        }
        return Ok((x, z));
    }

    warn!(
        "placement gave up after {max_attempts} attempts ({} open cells, {} neighbours)",
        free.len(),
        taken.len()
    );
    Err(PlacementError::Exhausted {
        attempts: max_attempts,
    })
}

#[inline]
fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    glam::Vec2::new(a.x - b.x, a.z - b.z).length()
}
