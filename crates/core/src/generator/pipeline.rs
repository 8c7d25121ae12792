//! Maze-construction pipeline that composes the generation stages.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::MazeConfig;
use crate::error::{GenerationError, Violation};
use crate::grid::Grid;
use crate::maze::{Maze, MazeParts};
use crate::obstacles::apply_obstacles;
use crate::pathing::cheapest_path;
use crate::rng::{RandomStream, episode_seed};
use crate::types::{Edge, EdgeKind};
use crate::validate::validate;

use super::augment::{AugmentContext, assign_costs, open_loops, place_portals};
use super::endpoints::{resolve_goal, resolve_start};
use super::spanning::{SpanContext, span_floor};

pub(super) fn generate_maze(config: &MazeConfig, seed: u64) -> Result<Maze, GenerationError> {
    let grid = Grid::for_config(config)?;
    let passable = passable_mask(&grid, config);
    let mut stream = RandomStream::seeded(seed);

    let mut edges = BTreeMap::new();
    for floor in 0..grid.floors() {
        let context = SpanContext { grid: &grid, passable: &passable, floor };
        let tree = span_floor(&context, config.algorithm, &mut stream)?;
        debug!(floor, tree_edges = tree.len(), algorithm = %config.algorithm, "floor spanned");
        edges.extend(tree.into_iter().map(|key| (key, Edge { kind: EdgeKind::Tree, cost: 1 })));
    }

    let mut augment = AugmentContext {
        config,
        grid: &grid,
        passable: &passable,
        edges: &mut edges,
        stream: &mut stream,
    };
    let loop_edges = open_loops(&mut augment);
    let portals = place_portals(&mut augment)?;
    assign_costs(&mut augment);
    debug!(loop_edges, portals = portals.len(), weighted = config.weighted, "topology augmented");

    let start = resolve_start(config.start, &grid, &passable)?;
    let mut maze = Maze::assemble(MazeParts {
        config: config.clone(),
        seed,
        grid,
        passable,
        edges,
        portals,
        start,
        goal: start,
    });
    maze.goal = resolve_goal(&maze);
    maze.reference_path = cheapest_path(&maze, maze.start, maze.goal, None)
        .ok_or(Violation::GoalUnreachable(maze.goal))?;
    validate(&maze)?;
    debug!(
        seed,
        open_edges = maze.open_edge_count(),
        path_len = maze.reference_path.len(),
        "base maze validated"
    );

    if config.dynamic_obstacle_count > 0 {
        maze = apply_obstacles(&maze, episode_seed(seed, 0))?;
    }
    Ok(maze)
}

fn passable_mask(grid: &Grid, config: &MazeConfig) -> Vec<bool> {
    let mut passable = vec![true; grid.len()];
    for &cell in &config.solid_cells {
        passable[grid.index(cell)] = false;
    }
    passable
}
