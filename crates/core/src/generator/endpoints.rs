//! Start and goal selection.

use crate::error::GenerationError;
use crate::grid::Grid;
use crate::maze::Maze;
use crate::pathing::hop_distances;
use crate::types::Cell;

pub(super) fn resolve_start(
    configured: Option<Cell>,
    grid: &Grid,
    passable: &[bool],
) -> Result<Cell, GenerationError> {
    if let Some(cell) = configured {
        return Ok(cell);
    }
    grid.floor_cells(0)
        .find(|&cell| passable[grid.index(cell)])
        .ok_or_else(|| GenerationError::disconnected("floor 0 has no passable cells"))
}

/// Configured goal, or the passable cell the most hops away from start.
/// Ties go to the greatest cell in canonical order.
pub(super) fn resolve_goal(maze: &Maze) -> Cell {
    if let Some(cell) = maze.config().goal {
        return cell;
    }

    let distances = hop_distances(maze, maze.start(), None);
    let mut best = maze.start();
    let mut best_distance = 0_usize;
    for (index, distance) in distances.into_iter().enumerate() {
        let Some(distance) = distance else {
            continue;
        };
        let cell = maze.grid().cell(index);
        if distance > best_distance || (distance == best_distance && cell > best) {
            best = cell;
            best_distance = distance;
        }
    }
    best
}
