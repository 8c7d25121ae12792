pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod grid;
pub mod maze;
pub mod obstacles;
mod pathing;
mod render;
pub mod rng;
pub mod stats;
pub mod types;
pub mod validate;

pub use batch::{batch_seeds, generate_batch};
pub use config::*;
pub use error::{GenerationError, Violation};
pub use export::{EXPORT_FORMAT_VERSION, MazeExport};
pub use generator::{MazeGenerator, generate};
pub use grid::Grid;
pub use maze::{Maze, ObstacleSet};
pub use obstacles::apply_obstacles;
pub use rng::{RandomStream, derive_seed, episode_seed};
pub use stats::MazeStats;
pub use types::*;
pub use validate::{validate, validate_episode};
