//! Static collision index – one box per building cell.
//!
//! * Built once from a [`Grid`] and a [`HeightTable`]; never patched.
//! * Each volume is also bucketed under the cell it was derived from, so a
//!   query only inspects the cells under the sphere's footprint instead of
//!   every building in the city.

use glam::vec3;
use smallvec::SmallVec;
use thiserror::Error;

use super::{Aabb, BoundingSphere, CollisionOutcome, Containment, Obstacles};
use crate::world::{Archetype, CellCode, EMPTY, Grid};

/// Slack added to the footprint so spheres that exactly touch a cell edge
/// still pick that cell up despite rounding.
const FOOTPRINT_EPSILON: f32 = 1.0e-4;

#[derive(Error, Debug, PartialEq)]
pub enum IndexError {
    #[error("cell ({x}, {z}) uses archetype {code}, which has no height")]
    MissingHeight { x: usize, z: usize, code: CellCode },

    #[error("archetype {code} has invalid height {height}")]
    InvalidHeight { code: CellCode, height: f32 },
}

/// Roof height per archetype code.  Code `0` never has an entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeightTable {
    by_code: Vec<Option<f32>>,
}

impl HeightTable {
    /// `heights[i]` belongs to code `i + 1`.
    pub fn from_heights(heights: &[f32]) -> Self {
        let mut by_code = Vec::with_capacity(heights.len() + 1);
        by_code.push(None);
        by_code.extend(heights.iter().copied().map(Some));
        Self { by_code }
    }

    pub fn from_archetypes(archetypes: &[Archetype]) -> Self {
        let mut table = Self::default();
        for a in archetypes {
            table.set(a.code, a.height);
        }
        table
    }

    pub fn set(&mut self, code: CellCode, height: f32) {
        let i = code as usize;
        if self.by_code.len() <= i {
            self.by_code.resize(i + 1, None);
        }
        if code != EMPTY {
            self.by_code[i] = Some(height);
        }
    }

    #[inline]
    pub fn height(&self, code: CellCode) -> Option<f32> {
        self.by_code.get(code as usize).copied().flatten()
    }
}

/// Box derived from one occupied cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildingVolume {
    pub cell: (usize, usize),
    pub code: CellCode,
    pub aabb: Aabb,
}

impl BuildingVolume {
    /// `min = (x, 0, -z-1)`, `max = (x+1, height, -z)`.
    pub fn for_cell(x: usize, z: usize, code: CellCode, height: f32) -> Self {
        let (fx, fz) = (x as f32, z as f32);
        Self {
            cell: (x, z),
            code,
            aabb: Aabb::new(vec3(fx, 0.0, -fz - 1.0), vec3(fx + 1.0, height, -fz)),
        }
    }
}

#[derive(Debug)]
pub struct CollisionIndex {
    width: usize,
    length: usize,
    volumes: Vec<BuildingVolume>,
    /// cell (row-major) → slot in `volumes`
    by_cell: Vec<Option<u32>>,
}

impl CollisionIndex {
    pub fn build(grid: &Grid, heights: &HeightTable) -> Result<Self, IndexError> {
        let (width, length) = grid.dimensions();
        let mut volumes = Vec::new();
        let mut by_cell = vec![None; width * length];

        for (x, z, code) in grid.occupied_cells() {
            let height = heights
                .height(code)
                .ok_or(IndexError::MissingHeight { x, z, code })?;
            if !height.is_finite() || height <= 0.0 {
                return Err(IndexError::InvalidHeight { code, height });
            }
            by_cell[z * width + x] = Some(volumes.len() as u32);
            volumes.push(BuildingVolume::for_cell(x, z, code, height));
        }

        Ok(Self {
            width,
            length,
            volumes,
            by_cell,
        })
    }

    #[inline]
    pub fn volumes(&self) -> &[BuildingVolume] {
        &self.volumes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// `Building` if the sphere touches, crosses or sits inside any
    /// building; the identity of the building is not reported.
    pub fn query(&self, sphere: &BoundingSphere) -> CollisionOutcome {
        let hit = self
            .candidates(sphere)
            .into_iter()
            .any(|slot| Self::blocks(&self.volumes[slot as usize], sphere));
        Self::classify(hit)
    }

    /// Reference query over every volume; always agrees with [`Self::query`].
    pub fn query_exhaustive(&self, sphere: &BoundingSphere) -> CollisionOutcome {
        Self::classify(self.volumes.iter().any(|v| Self::blocks(v, sphere)))
    }

    /// Volume slots whose cells lie under the sphere's XZ footprint.
    pub fn candidates(&self, sphere: &BoundingSphere) -> SmallVec<[u32; 9]> {
        let mut out = SmallVec::new();
        let r = sphere.radius + FOOTPRINT_EPSILON;
        let c = sphere.center;

        let Some((x0, x1)) = Self::cell_span(c.x - r, c.x + r, self.width) else {
            return out;
        };
        // world z grows toward −cell z
        let Some((z0, z1)) = Self::cell_span(-c.z - r, -c.z + r, self.length) else {
            return out;
        };

        for z in z0..=z1 {
            for x in x0..=x1 {
                if let Some(slot) = self.by_cell[z * self.width + x] {
                    out.push(slot);
                }
            }
        }
        out
    }

    /// Inclusive cell range covering `[lo, hi]`, clipped to `0..cells`.
    fn cell_span(lo: f32, hi: f32, cells: usize) -> Option<(usize, usize)> {
        let first = lo.floor().max(0.0);
        let last = hi.floor().min(cells as f32 - 1.0);
        if !(first <= last) {
            return None;
        }
        Some((first as usize, last as usize))
    }

    #[inline]
    fn blocks(volume: &BuildingVolume, sphere: &BoundingSphere) -> bool {
        volume.aabb.contains_sphere(sphere) != Containment::Disjoint
    }

    #[inline]
    fn classify(hit: bool) -> CollisionOutcome {
        if hit {
            CollisionOutcome::Building
        } else {
            CollisionOutcome::None
        }
    }
}

impl Obstacles for CollisionIndex {
    #[inline]
    fn query(&self, sphere: &BoundingSphere) -> CollisionOutcome {
        CollisionIndex::query(self, sphere)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    /// 12×12 grid with cell (5,5) = code 2 and a wall of code 1 along z = 9.
    fn sample_grid() -> Grid {
        let (w, l) = (12, 12);
        let mut codes = vec![EMPTY; w * l];
        codes[5 * w + 5] = 2;
        for x in 0..w {
            codes[9 * w + x] = 1;
        }
        Grid::from_codes(w, l, codes, 2).unwrap()
    }

    fn heights() -> HeightTable {
        HeightTable::from_heights(&[1.0, 2.0])
    }

    #[test]
    fn one_volume_per_occupied_cell_with_archetype_height() {
        let grid = sample_grid();
        let index = CollisionIndex::build(&grid, &heights()).unwrap();
        assert_eq!(index.len(), 13);

        let tower = index.volumes().iter().find(|v| v.cell == (5, 5)).unwrap();
        assert_eq!(tower.code, 2);
        assert_eq!(tower.aabb.min, vec3(5.0, 0.0, -6.0));
        assert_eq!(tower.aabb.max, vec3(6.0, 2.0, -5.0));
    }

    #[test]
    fn missing_height_is_a_build_error() {
        let grid = sample_grid();
        let err = CollisionIndex::build(&grid, &HeightTable::from_heights(&[1.0])).unwrap_err();
        assert_eq!(
            err,
            IndexError::MissingHeight {
                x: 5,
                z: 5,
                code: 2
            }
        );
    }

    #[test]
    fn non_positive_height_is_a_build_error() {
        let grid = sample_grid();
        let err =
            CollisionIndex::build(&grid, &HeightTable::from_heights(&[0.0, 2.0])).unwrap_err();
        assert_eq!(
            err,
            IndexError::InvalidHeight {
                code: 1,
                height: 0.0
            }
        );
    }

    #[test]
    fn empty_grid_builds_an_empty_index() {
        let grid = Grid::from_codes(3, 3, vec![EMPTY; 9], 1).unwrap();
        let index = CollisionIndex::build(&grid, &HeightTable::default()).unwrap();
        assert!(index.is_empty());
        let s = BoundingSphere::new(vec3(1.5, 0.0, -1.5), 5.0);
        assert_eq!(index.query(&s), CollisionOutcome::None);
    }

    #[test]
    fn sphere_inside_a_building_cell_hits() {
        let index = CollisionIndex::build(&sample_grid(), &heights()).unwrap();
        let s = BoundingSphere::new(vec3(5.5, 0.1, -5.5), 0.1);
        assert_eq!(index.query(&s), CollisionOutcome::Building);
    }

    #[test]
    fn sphere_over_open_street_is_clear() {
        let index = CollisionIndex::build(&sample_grid(), &heights()).unwrap();
        let s = BoundingSphere::new(vec3(0.5, 0.1, -1.5), 0.1);
        assert_eq!(index.query(&s), CollisionOutcome::None);
    }

    #[test]
    fn grazing_the_wall_counts_as_a_hit() {
        let index = CollisionIndex::build(&sample_grid(), &heights()).unwrap();
        // wall face is at z = -9
        let s = BoundingSphere::new(vec3(3.5, 0.0, -8.5), 0.5);
        assert_eq!(index.query(&s), CollisionOutcome::Building);
        let s = BoundingSphere::new(vec3(3.5, 0.0, -8.5), 0.45);
        assert_eq!(index.query(&s), CollisionOutcome::None);
    }

    #[test]
    fn spheres_off_the_map_never_hit() {
        let index = CollisionIndex::build(&sample_grid(), &heights()).unwrap();
        for c in [vec3(-3.0, 0.0, 1.0), vec3(20.0, 0.0, -3.0), vec3(4.0, 0.0, -30.0)] {
            assert_eq!(
                index.query(&BoundingSphere::new(c, 0.5)),
                CollisionOutcome::None
            );
        }
    }

    #[test]
    fn sphere_spilling_onto_the_map_from_outside_hits() {
        let index = CollisionIndex::build(&sample_grid(), &heights()).unwrap();
        // wall spans x ∈ [0, 12]; approach from x < 0
        let s = BoundingSphere::new(vec3(-0.3, 0.0, -9.5), 0.5);
        assert_eq!(index.query(&s), CollisionOutcome::Building);
    }

    #[test]
    fn bucketed_and_exhaustive_queries_agree() {
        let index = CollisionIndex::build(&sample_grid(), &heights()).unwrap();
        let mut rng = StdRng::seed_from_u64(0xC17);
        for _ in 0..5_000 {
            let s = BoundingSphere::new(
                vec3(
                    rng.gen_range(-2.0..14.0),
                    rng.gen_range(0.0..3.0),
                    rng.gen_range(-14.0..2.0),
                ),
                rng.gen_range(0.01..1.5),
            );
            assert_eq!(index.query(&s), index.query_exhaustive(&s), "{s:?}");
        }
    }

    #[test]
    fn far_spheres_are_clear_and_centres_inside_volumes_hit() {
        let index = CollisionIndex::build(&sample_grid(), &heights()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2_000 {
            let center = vec3(
                rng.gen_range(-2.0..14.0),
                rng.gen_range(0.0..2.0),
                rng.gen_range(-14.0..2.0),
            );
            let radius = rng.gen_range(0.01..0.8);
            let s = BoundingSphere::new(center, radius);

            let inside = index
                .volumes()
                .iter()
                .any(|v| v.aabb.contains_point(center));
            let near = index.volumes().iter().any(|v| {
                let grown = Aabb::new(v.aabb.min - Vec3::splat(radius), v.aabb.max + Vec3::splat(radius));
                grown.contains_point(center)
            });

            if inside {
                assert_eq!(index.query(&s), CollisionOutcome::Building);
            }
            if !near {
                assert_eq!(index.query(&s), CollisionOutcome::None);
            }
        }
    }

    #[test]
    fn repeated_queries_are_stable() {
        let index = CollisionIndex::build(&sample_grid(), &heights()).unwrap();
        let s = BoundingSphere::new(vec3(5.2, 0.1, -4.8), 0.3);
        let first = index.query(&s);
        for _ in 0..10 {
            assert_eq!(index.query(&s), first);
        }
    }

    #[test]
    fn index_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<CollisionIndex>();
    }
}
