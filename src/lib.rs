pub mod collision;
pub mod config;
pub mod renderer;
pub mod sim;
pub mod world;
