mod components;
mod entity;
mod gauges;
mod missile;
mod movement;
mod placement;
mod player;
mod session;
mod spawn;
mod tic;

pub use components::{Consumed, Kind, Traits};
pub use entity::{ENEMY_SCALE, MobileEntity, PICKUP_SCALE, PLAYER_SCALE};
pub use gauges::{Gauge, Readout, Score};
pub use missile::{Launcher, Missile, MissileFate};
pub use movement::{MovementAttempt, MovementResult, resolve};
pub use placement::{PlacementError, find_free_cell};
pub use player::{Crash, InputCmd, Player};
pub use session::{EntityView, GameEvent, MAX_HEALTH, Phase, Session, SessionError};
pub use tic::{DT, SIM_FPS, TicRunner};
