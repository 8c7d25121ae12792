//! Reachability and cheapest-path searches over a maze's open edges.
//! Shared by endpoint selection, obstacle injection and validation.

use std::collections::{BTreeSet, VecDeque};

use crate::maze::{Maze, ObstacleSet};
use crate::types::Cell;

fn steps<'a>(
    maze: &'a Maze,
    cell: Cell,
    blocked: Option<&'a ObstacleSet>,
) -> impl Iterator<Item = (Cell, u32)> + 'a {
    maze.structural_neighbors(cell)
        .iter()
        .copied()
        .filter(move |&(next, _)| blocked.is_none_or(|set| !set.blocks_step(cell, next)))
}

/// Breadth-first hop distance from `from` to every cell; `None` when unreachable.
pub(crate) fn hop_distances(
    maze: &Maze,
    from: Cell,
    blocked: Option<&ObstacleSet>,
) -> Vec<Option<usize>> {
    let grid = maze.grid();
    let mut distances = vec![None; grid.len()];
    if !maze.is_passable(from) || blocked.is_some_and(|set| set.blocks_cell(from)) {
        return distances;
    }

    let mut queue = VecDeque::from([from]);
    distances[grid.index(from)] = Some(0);
    while let Some(current) = queue.pop_front() {
        let next_distance = distances[grid.index(current)].map_or(0, |d| d + 1);
        for (next, _) in steps(maze, current, blocked) {
            let slot = &mut distances[grid.index(next)];
            if slot.is_none() {
                *slot = Some(next_distance);
                queue.push_back(next);
            }
        }
    }
    distances
}

pub(crate) fn reachable(maze: &Maze, from: Cell, blocked: Option<&ObstacleSet>) -> Vec<bool> {
    hop_distances(maze, from, blocked).into_iter().map(|distance| distance.is_some()).collect()
}

pub(crate) fn path_exists(
    maze: &Maze,
    from: Cell,
    to: Cell,
    blocked: Option<&ObstacleSet>,
) -> bool {
    if !maze.grid().contains(to) || blocked.is_some_and(|set| set.blocks_cell(to)) {
        return false;
    }
    reachable(maze, from, blocked)[maze.grid().index(to)]
}

/// Dijkstra over edge costs. Ties resolve towards the lower canonical cell,
/// so the returned path is a pure function of the maze.
pub(crate) fn cheapest_path(
    maze: &Maze,
    from: Cell,
    to: Cell,
    blocked: Option<&ObstacleSet>,
) -> Option<Vec<Cell>> {
    let grid = maze.grid();
    if !maze.is_passable(from) || !maze.is_passable(to) {
        return None;
    }
    if blocked.is_some_and(|set| set.blocks_cell(from) || set.blocks_cell(to)) {
        return None;
    }

    let mut cost = vec![u64::MAX; grid.len()];
    let mut came_from: Vec<Option<Cell>> = vec![None; grid.len()];
    let mut open = BTreeSet::from([(0_u64, from)]);
    cost[grid.index(from)] = 0;

    while let Some((current_cost, current)) = open.pop_first() {
        if current == to {
            return Some(reconstruct_path(maze, &came_from, from, to));
        }
        if current_cost > cost[grid.index(current)] {
            continue;
        }
        for (next, step_cost) in steps(maze, current, blocked) {
            let tentative = current_cost + u64::from(step_cost);
            let index = grid.index(next);
            if tentative < cost[index] {
                if cost[index] != u64::MAX {
                    open.remove(&(cost[index], next));
                }
                cost[index] = tentative;
                came_from[index] = Some(current);
                open.insert((tentative, next));
            }
        }
    }
    None
}

fn reconstruct_path(maze: &Maze, came_from: &[Option<Cell>], from: Cell, to: Cell) -> Vec<Cell> {
    let mut path = vec![to];
    let mut current = to;
    while current != from {
        match came_from[maze.grid().index(current)] {
            Some(previous) => {
                path.push(previous);
                current = previous;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

pub(crate) fn path_cost(maze: &Maze, path: &[Cell]) -> u64 {
    path.windows(2)
        .filter_map(|pair| maze.edge(pair[0], pair[1]))
        .map(|edge| u64::from(edge.cost))
        .sum()
}

impl Maze {
    /// Cheapest path between two cells honouring this episode's obstacles.
    pub fn cheapest_path(&self, from: Cell, to: Cell) -> Option<Vec<Cell>> {
        cheapest_path(self, from, to, Some(&self.obstacles))
    }

    pub fn path_cost(&self, path: &[Cell]) -> u64 {
        path_cost(self, path)
    }
}
