//! External configuration loader.
//!
//! Reads a TOML file; every key is optional and falls back to the defaults
//! below, so an empty file (or no file at all) gives the stock game.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::collision::BoundingSphere;
use crate::world::archetype;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("`{field}` must be {expected}")]
    Invalid {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown building archetype `{0}` in [city.heights]")]
    UnknownArchetype(String),
}

// ── Public Config Structs ──

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub city: CityConfig,
    pub entities: EntityConfig,
    pub gameplay: GameplayConfig,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct CityConfig {
    /// Floor-plan template; `None` = built-in downtown.
    pub template: Option<PathBuf>,
    /// RNG seed; `None` = seeded from entropy.
    pub seed: Option<u64>,
    /// Roof height overrides keyed by archetype name.
    pub heights: HashMap<String, f32>,
}

/// Merged model radii and their per-archetype scale factors.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EntityConfig {
    pub player_radius: f32,
    pub player_scale: f32,
    pub pickup_radius: f32,
    pub pickup_scale: f32,
    pub missile_radius: f32,
    pub missile_scale: f32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GameplayConfig {
    pub max_speed: f32,
    pub reverse_speed: f32,
    pub acceleration: f32,
    pub braking: f32,
    pub drag: f32,
    pub turn_rate: f32,
    /// Pre-collision speed at or above which a crash is major.
    pub major_collision_speed: f32,
    /// Fraction of the impact speed the car rebounds with, 0 … 1.
    pub bounce: f32,
    pub major_damage: u32,
    pub minor_damage: u32,
    pub missile_damage: u32,
    pub missile_speed: f32,
    pub missile_lifetime: f32,
    pub launch_interval: f32,
    pub fuel_capacity: f32,
    /// Fuel used per world unit travelled.
    pub fuel_burn: f32,
    pub fuel_refill: f32,
    pub bonus_score: u32,
    pub fuel_pickups: u32,
    pub bonus_pickups: u32,
    pub launchers: u32,
    pub pickup_clearance: f32,
    pub placement_attempts: u32,
}

// ── Defaults ──

impl Default for EntityConfig {
    fn default() -> Self {
        EntityConfig {
            player_radius: 0.4,
            player_scale: crate::sim::PLAYER_SCALE,
            pickup_radius: 0.6,
            pickup_scale: crate::sim::PICKUP_SCALE,
            missile_radius: 0.02,
            missile_scale: crate::sim::ENEMY_SCALE,
        }
    }
}

impl Default for GameplayConfig {
    fn default() -> Self {
        GameplayConfig {
            max_speed: 6.0,
            reverse_speed: 2.0,
            acceleration: 4.0,
            braking: 8.0,
            drag: 1.5,
            turn_rate: 2.5,
            major_collision_speed: 3.0,
            bounce: 0.25,
            major_damage: 20,
            minor_damage: 5,
            missile_damage: 25,
            missile_speed: 4.0,
            missile_lifetime: 6.0,
            launch_interval: 4.0,
            fuel_capacity: 100.0,
            fuel_burn: 2.0,
            fuel_refill: 35.0,
            bonus_score: 100,
            fuel_pickups: 4,
            bonus_pickups: 6,
            launchers: 3,
            pickup_clearance: 2.0,
            placement_attempts: 256,
        }
    }
}

// ── Loading ──

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.entities;
        positive("entities.player_radius", e.player_radius)?;
        positive("entities.player_scale", e.player_scale)?;
        positive("entities.pickup_radius", e.pickup_radius)?;
        positive("entities.pickup_scale", e.pickup_scale)?;
        positive("entities.missile_radius", e.missile_radius)?;
        positive("entities.missile_scale", e.missile_scale)?;
        // the car spawns at a street cell's centre, half a unit from each wall
        if e.player_radius * e.player_scale >= 0.5 {
            return Err(ConfigError::Invalid {
                field: "entities.player_radius",
                expected: "a footprint that fits a street cell (radius × scale below 0.5)",
            });
        }

        let g = &self.gameplay;
        positive("gameplay.max_speed", g.max_speed)?;
        non_negative("gameplay.reverse_speed", g.reverse_speed)?;
        positive("gameplay.acceleration", g.acceleration)?;
        positive("gameplay.braking", g.braking)?;
        non_negative("gameplay.drag", g.drag)?;
        positive("gameplay.turn_rate", g.turn_rate)?;
        positive("gameplay.major_collision_speed", g.major_collision_speed)?;
        if !(0.0..=1.0).contains(&g.bounce) {
            return Err(ConfigError::Invalid {
                field: "gameplay.bounce",
                expected: "a fraction between 0 and 1",
            });
        }
        positive("gameplay.missile_speed", g.missile_speed)?;
        positive("gameplay.missile_lifetime", g.missile_lifetime)?;
        positive("gameplay.launch_interval", g.launch_interval)?;
        positive("gameplay.fuel_capacity", g.fuel_capacity)?;
        non_negative("gameplay.fuel_burn", g.fuel_burn)?;
        non_negative("gameplay.fuel_refill", g.fuel_refill)?;
        non_negative("gameplay.pickup_clearance", g.pickup_clearance)?;
        if g.placement_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "gameplay.placement_attempts",
                expected: "at least 1",
            });
        }

        for (name, &h) in &self.city.heights {
            if archetype::by_name(name).is_none() {
                return Err(ConfigError::UnknownArchetype(name.clone()));
            }
            positive("city.heights", h)?;
        }
        Ok(())
    }

    /// Raw model spheres handed to the entity constructors.
    pub fn player_model(&self) -> BoundingSphere {
        BoundingSphere::new(glam::Vec3::ZERO, self.entities.player_radius)
    }

    pub fn pickup_model(&self) -> BoundingSphere {
        BoundingSphere::new(glam::Vec3::ZERO, self.entities.pickup_radius)
    }

    pub fn missile_model(&self) -> BoundingSphere {
        BoundingSphere::new(glam::Vec3::ZERO, self.entities.missile_radius)
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            expected: "a positive number",
        })
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            expected: "zero or a positive number",
        })
    }
}
