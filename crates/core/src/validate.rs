//! Post-generation invariant checks.
//!
//! `validate` covers the base structure and runs once per generated or
//! imported maze; `validate_episode` covers what an obstacle set may and may
//! not do. A failure here is always a defect, never a user error.

use std::collections::BTreeSet;

use union_find::{QuickUnionUf, UnionBySize, UnionFind};

use crate::error::Violation;
use crate::generator::passable_candidates;
use crate::maze::Maze;
use crate::pathing::{path_exists, reachable};
use crate::types::{Cell, EdgeKind};

/// Checks geometry, reachability, goal, loop budget and portals, in that order.
pub fn validate(maze: &Maze) -> Result<(), Violation> {
    check_endpoints(maze)?;
    check_edge_geometry(maze)?;
    check_reachability(maze)?;
    if !path_exists(maze, maze.start(), maze.goal(), None) {
        return Err(Violation::GoalUnreachable(maze.goal()));
    }
    check_spanning_and_loops(maze)?;
    check_portals(maze)
}

/// Checks that the current obstacle set leaves the episode playable.
pub fn validate_episode(maze: &Maze) -> Result<(), Violation> {
    let obstacles = maze.obstacles();
    if let Some(&cell) = obstacles.cells.iter().find(|&&cell| !maze.is_passable(cell)) {
        return Err(Violation::StrayObstacleCell(cell));
    }
    if let Some(&key) = obstacles.edges.iter().find(|&&key| maze.edge(key.a, key.b).is_none()) {
        return Err(Violation::StrayObstacleEdge(key));
    }
    for endpoint in [maze.start(), maze.goal()] {
        if obstacles.blocks_cell(endpoint) {
            return Err(Violation::ObstacleOnEndpoint(endpoint));
        }
    }
    if !path_exists(maze, maze.start(), maze.goal(), Some(obstacles)) {
        return Err(Violation::ObstaclesBlockGoal);
    }
    Ok(())
}

fn check_endpoints(maze: &Maze) -> Result<(), Violation> {
    for endpoint in [maze.start(), maze.goal()] {
        if !maze.is_passable(endpoint) {
            return Err(Violation::BadEndpoint(endpoint));
        }
    }
    Ok(())
}

fn check_edge_geometry(maze: &Maze) -> Result<(), Violation> {
    let grid = maze.grid();
    for (key, edge) in maze.edges() {
        if !maze.is_passable(key.a) || !maze.is_passable(key.b) {
            return Err(Violation::MalformedEdge(*key));
        }
        let well_formed = match edge.kind {
            EdgeKind::Tree | EdgeKind::Loop => grid.is_adjacent(key.a, key.b),
            EdgeKind::Portal => key.b.floor == key.a.floor + 1,
        };
        if !well_formed {
            return Err(Violation::MalformedEdge(*key));
        }
    }
    Ok(())
}

fn check_reachability(maze: &Maze) -> Result<(), Violation> {
    let seen = reachable(maze, maze.start(), None);
    let mut unreachable = maze.passable_cells().filter(|&cell| !seen[maze.grid().index(cell)]);
    if let Some(first) = unreachable.next() {
        return Err(Violation::UnreachableCells { unreachable: 1 + unreachable.count(), first });
    }
    Ok(())
}

/// Each floor carries a spanning tree of its passable cells, and the loop
/// count matches the budget computed from the edges the trees left closed.
fn check_spanning_and_loops(maze: &Maze) -> Result<(), Violation> {
    let grid = maze.grid();
    let mut components = QuickUnionUf::<UnionBySize>::new(grid.len());
    let mut tree_per_floor = vec![0_usize; grid.floors()];
    let mut loops = 0_usize;

    for (key, edge) in maze.edges() {
        match edge.kind {
            EdgeKind::Tree => {
                let (a, b) = (grid.index(key.a), grid.index(key.b));
                if components.find(a) == components.find(b) {
                    return Err(Violation::TreeCycle(*key));
                }
                components.union(a, b);
                tree_per_floor[key.a.floor] += 1;
            }
            EdgeKind::Loop => loops += 1,
            EdgeKind::Portal => {}
        }
    }

    for (floor, &actual) in tree_per_floor.iter().enumerate() {
        let passable = grid.floor_cells(floor).filter(|&cell| maze.is_passable(cell)).count();
        let expected = passable.saturating_sub(1);
        if actual != expected {
            return Err(Violation::TreeEdgeCount { floor, expected, actual });
        }
    }

    let tree_total: usize = tree_per_floor.iter().sum();
    let candidates = passable_candidates(grid, &maze.passable).len();
    let expected = maze.config().loop_edge_budget(candidates.saturating_sub(tree_total));
    if loops != expected {
        return Err(Violation::LoopBudget { expected, actual: loops });
    }
    Ok(())
}

fn check_portals(maze: &Maze) -> Result<(), Violation> {
    let expected = maze.config().portal_count;
    let portal_edges = maze.edges().filter(|(_, edge)| edge.kind == EdgeKind::Portal).count();
    if maze.portals().len() != expected || portal_edges != expected {
        return Err(Violation::PortalCount {
            expected,
            actual: maze.portals().len().max(portal_edges),
        });
    }

    let mut used: BTreeSet<Cell> = BTreeSet::new();
    for portal in maze.portals() {
        let key = portal.key();
        let listed = maze.edge(portal.lower, portal.upper);
        if portal.upper.floor != portal.lower.floor + 1
            || listed.is_none_or(|edge| edge.kind != EdgeKind::Portal || edge.cost != portal.cost)
        {
            return Err(Violation::MalformedPortal(key));
        }
        for endpoint in [portal.lower, portal.upper] {
            if !used.insert(endpoint) {
                return Err(Violation::PortalReused(endpoint));
            }
        }
    }
    Ok(())
}
