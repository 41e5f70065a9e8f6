pub mod app;
pub mod config;
pub mod logging;
pub mod map;
pub mod snapshot;

pub use app::{run, AppError, RunOptions};
pub use config::{Configuration, ParseError};
pub use map::{generate_coastline, BoundsError, CoastlineMap, Position, Terrain, TerrainGrid};
