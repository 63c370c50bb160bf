// ──────────────────────────────────────────────────────────────────────────
// world/level.rs
//
//  *   Template   (file or built-in)   ──╮
//  *   archetype heights (+ overrides)   │   --->  City { grid, index }
//  *   rng                               │
//                                        ╯
// ──────────────────────────────────────────────────────────────────────────

use log::debug;
use rand::Rng;
use thiserror::Error;

use crate::collision::{BoundingSphere, CollisionIndex, CollisionOutcome, HeightTable, IndexError, Obstacles};
use crate::config::CityConfig;
use crate::world::{
    archetype,
    grid::{Grid, GridError},
    template::{DOWNTOWN, Template, TemplateError},
};

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("unknown building archetype `{0}`")]
    UnknownArchetype(String),
}

/// Static part of one session: the floor plan and its collision volumes.
#[derive(Debug)]
pub struct City {
    pub grid: Grid,
    pub index: CollisionIndex,
}

impl City {
    /// Whether the sphere's ground footprint lies within the grid.
    pub fn contains(&self, sphere: &BoundingSphere) -> bool {
        let (w, l) = self.grid.dimensions();
        let (c, r) = (sphere.center, sphere.radius);
        c.x - r >= 0.0 && c.x + r <= w as f32 && c.z + r <= 0.0 && c.z - r >= -(l as f32)
    }
}

/// Buildings, with the map edge acting as one more wall.
impl Obstacles for City {
    fn query(&self, sphere: &BoundingSphere) -> CollisionOutcome {
        if !self.contains(sphere) {
            return CollisionOutcome::Building;
        }
        self.index.query(sphere)
    }
}

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

/// Build the city described by `cfg`: read the template, assign
/// archetypes, then derive the collision index.
pub fn load_city<R: Rng + ?Sized>(cfg: &CityConfig, rng: &mut R) -> Result<City, LoadError> {
    /*----- 1. Floor plan -------------------------------------------------*/
    let template = match &cfg.template {
        Some(path) => Template::from_file(path)?,
        None => Template::parse(DOWNTOWN)?,
    };

    /*----- 2. Heights, with per-name overrides ---------------------------*/
    let mut heights = HeightTable::from_archetypes(archetype::ARCHETYPES);
    for (name, &h) in &cfg.heights {
        let a = archetype::by_name(name).ok_or_else(|| LoadError::UnknownArchetype(name.clone()))?;
        heights.set(a.code, h);
    }

    build_city(&template, heights, rng)
}

/// Same as [`load_city`] for an already-parsed template.
pub fn build_city<R: Rng + ?Sized>(
    template: &Template,
    heights: HeightTable,
    rng: &mut R,
) -> Result<City, LoadError> {
    let grid = Grid::generate(template, archetype::count(), rng)?;
    let index = CollisionIndex::build(&grid, &heights)?;

    let (w, l) = grid.dimensions();
    debug!("city {w}x{l}: {} building volumes", index.len());

    Ok(City { grid, index })
}
