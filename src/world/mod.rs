pub mod archetype;
mod grid;
mod level;
mod template;

pub use archetype::{ARCHETYPES, Archetype};

pub use grid::{CellCode, EMPTY, Grid, GridError};

pub use level::{City, LoadError, build_city, load_city};

pub use template::{DOWNTOWN, Template, TemplateError};
