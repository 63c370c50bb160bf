//! Building archetypes – every occupied grid cell is one of these.
//!
//! The code stored in the grid is the archetype's 1-based position in
//! [`ARCHETYPES`]; `0` is reserved for empty ground.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::CellCode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Archetype {
    pub name: &'static str,
    pub code: CellCode,
    /// Roof height in world units (one unit = one grid cell).
    pub height: f32,
}

pub static ARCHETYPES: &[Archetype] = &[
    Archetype {
        name: "shop",
        code: 1,
        height: 1.0,
    },
    Archetype {
        name: "office",
        code: 2,
        height: 2.0,
    },
    Archetype {
        name: "tower",
        code: 3,
        height: 3.5,
    },
    Archetype {
        name: "skyscraper",
        code: 4,
        height: 5.0,
    },
];

static BY_NAME: Lazy<HashMap<&'static str, &'static Archetype>> =
    Lazy::new(|| ARCHETYPES.iter().map(|a| (a.name, a)).collect());

pub fn by_name(name: &str) -> Option<&'static Archetype> {
    BY_NAME.get(name).copied()
}

/// Number of distinct archetypes (`K`).
#[inline]
pub fn count() -> CellCode {
    ARCHETYPES.len() as CellCode
}
