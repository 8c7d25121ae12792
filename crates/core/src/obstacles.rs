//! Per-episode obstacle injection over a finished base maze.
//!
//! The structure is never touched: each episode gets a fresh `ObstacleSet`
//! drawn from its own seed, and the caller receives a new `Maze` value with
//! that set swapped in.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::config::ObstacleTarget;
use crate::error::GenerationError;
use crate::maze::{Maze, ObstacleSet};
use crate::pathing::path_exists;
use crate::rng::RandomStream;
use crate::types::{Cell, EdgeKey};
use crate::validate::validate_episode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Blockable {
    Cell(Cell),
    Edge(EdgeKey),
}

/// Replaces the maze's obstacle set with one drawn from `episode_seed`.
///
/// Start, goal and every cell and edge of the reference path are never
/// blocked. A selection that still cuts the goal off costs one attempt; after
/// `1 + obstacle_retry_budget` failed attempts the call gives up with
/// `UnsatisfiableObstacleConfig`.
pub fn apply_obstacles(maze: &Maze, episode_seed: u64) -> Result<Maze, GenerationError> {
    let obstacles = select_obstacles(maze, episode_seed)?;
    let updated = maze.with_obstacles(obstacles);
    validate_episode(&updated)?;
    Ok(updated)
}

fn select_obstacles(maze: &Maze, episode_seed: u64) -> Result<ObstacleSet, GenerationError> {
    let config = maze.config();
    let requested = config.dynamic_obstacle_count;
    if requested == 0 {
        return Ok(ObstacleSet { episode_seed: Some(episode_seed), ..ObstacleSet::default() });
    }

    let candidates = candidates(maze, config.obstacle_target);
    let attempts = config.obstacle_retry_budget + 1;
    let mut stream = RandomStream::seeded(episode_seed);

    for attempt in 1..=attempts {
        if candidates.len() < requested {
            debug!(attempt, requested, available = candidates.len(), "too few obstacle candidates");
            continue;
        }

        let mut pool = candidates.clone();
        stream.shuffle(&mut pool);
        let selection = build_set(&pool[..requested], episode_seed);
        if path_exists(maze, maze.start(), maze.goal(), Some(&selection)) {
            debug!(attempt, blocked = selection.len(), "obstacles placed");
            return Ok(selection);
        }
        warn!(attempt, attempts, "obstacle placement cut off the goal, retrying");
    }

    Err(GenerationError::UnsatisfiableObstacleConfig {
        requested,
        available: candidates.len(),
        attempts,
    })
}

fn candidates(maze: &Maze, target: ObstacleTarget) -> Vec<Blockable> {
    let path = maze.reference_path();
    match target {
        ObstacleTarget::Cells => {
            let protected: BTreeSet<Cell> =
                path.iter().copied().chain([maze.start(), maze.goal()]).collect();
            maze.passable_cells()
                .filter(|cell| !protected.contains(cell))
                .map(Blockable::Cell)
                .collect()
        }
        ObstacleTarget::Edges => {
            let protected: BTreeSet<EdgeKey> =
                path.windows(2).map(|pair| EdgeKey::new(pair[0], pair[1])).collect();
            maze.edges()
                .map(|(key, _)| *key)
                .filter(|key| !protected.contains(key))
                .map(Blockable::Edge)
                .collect()
        }
    }
}

fn build_set(chosen: &[Blockable], episode_seed: u64) -> ObstacleSet {
    let mut set = ObstacleSet { episode_seed: Some(episode_seed), ..ObstacleSet::default() };
    for blockable in chosen {
        match *blockable {
            Blockable::Cell(cell) => {
                set.cells.insert(cell);
            }
            Blockable::Edge(key) => {
                set.edges.insert(key);
            }
        }
    }
    set
}
