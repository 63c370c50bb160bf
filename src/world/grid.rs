use glam::{Vec3, vec3};
use rand::Rng;
use thiserror::Error;

use super::Template;

/// Per-cell archetype code; `0` = open street.
pub type CellCode = u8;

pub const EMPTY: CellCode = 0;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GridError {
    #[error("at least one building archetype is required")]
    NoArchetypes,

    #[error("grid has zero width or length")]
    Empty,

    #[error("expected {expected} cell codes, got {found}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("cell ({x}, {z}) has code {code}, only 0..={max} allowed")]
    CodeOutOfRange {
        x: usize,
        z: usize,
        code: CellCode,
        max: CellCode,
    },
}

/// Static city floor plan (immutable after construction).
///
/// Cell `(x, z)` covers the world-space unit square with corners
/// `(x, 0, -z)` and `(x + 1, *, -z - 1)`; the map grows toward −Z.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    length: usize,
    archetypes: CellCode,
    cells: Vec<CellCode>,
}

impl Grid {
    /// Assign a uniformly random archetype in `1..=archetypes` to every
    /// occupied template cell.
    pub fn generate<R: Rng + ?Sized>(
        template: &Template,
        archetypes: CellCode,
        rng: &mut R,
    ) -> Result<Self, GridError> {
        if archetypes == 0 {
            return Err(GridError::NoArchetypes);
        }
        let (width, length) = template.dimensions();
        let cells = template
            .cells()
            .iter()
            .map(|&occupied| {
                if occupied {
                    rng.gen_range(1..=archetypes)
                } else {
                    EMPTY
                }
            })
            .collect();
        Self::from_codes(width, length, cells, archetypes)
    }

    /// Wrap explicit row-major codes, validating every one against `archetypes`.
    pub fn from_codes(
        width: usize,
        length: usize,
        cells: Vec<CellCode>,
        archetypes: CellCode,
    ) -> Result<Self, GridError> {
        if archetypes == 0 {
            return Err(GridError::NoArchetypes);
        }
        if width == 0 || length == 0 {
            return Err(GridError::Empty);
        }
        if cells.len() != width * length {
            return Err(GridError::SizeMismatch {
                expected: width * length,
                found: cells.len(),
            });
        }
        if let Some((i, &code)) = cells.iter().enumerate().find(|(_, c)| **c > archetypes) {
            return Err(GridError::CodeOutOfRange {
                x: i % width,
                z: i / width,
                code,
                max: archetypes,
            });
        }
        Ok(Self {
            width,
            length,
            archetypes,
            cells,
        })
    }

    /// `(width, length)` – cells along +X and along −Z.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.length)
    }

    #[inline]
    pub fn archetypes(&self) -> CellCode {
        self.archetypes
    }

    #[inline]
    pub fn contains(&self, x: usize, z: usize) -> bool {
        x < self.width && z < self.length
    }

    /// Code at `(x, z)`.
    ///
    /// Out-of-range coordinates are a caller bug and panic; clamp first.
    #[inline]
    pub fn cell_code(&self, x: usize, z: usize) -> CellCode {
        assert!(
            self.contains(x, z),
            "cell ({x}, {z}) outside {}x{} grid",
            self.width,
            self.length
        );
        self.cells[z * self.width + x]
    }

    #[inline]
    pub fn is_occupied(&self, x: usize, z: usize) -> bool {
        self.cell_code(x, z) != EMPTY
    }

    /// Every building cell as `(x, z, code)`, row-major.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, CellCode)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != EMPTY)
            .map(|(i, &c)| (i % self.width, i / self.width, c))
    }

    /// Every open-street cell as `(x, z)`, row-major.
    pub fn free_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == EMPTY)
            .map(|(i, _)| (i % self.width, i / self.width))
    }

    /// Ground-level world position of the middle of `(x, z)`.
    #[inline]
    pub fn cell_center(x: usize, z: usize) -> Vec3 {
        vec3(x as f32 + 0.5, 0.0, -(z as f32) - 0.5)
    }

    /// Cell under a world position, or `None` off the map.
    pub fn world_to_cell(&self, pos: Vec3) -> Option<(usize, usize)> {
        let cx = pos.x.floor();
        let cz = (-pos.z).floor();
        if cx < 0.0 || cz < 0.0 {
            return None;
        }
        let (x, z) = (cx as usize, cz as usize);
        self.contains(x, z).then_some((x, z))
    }
}
