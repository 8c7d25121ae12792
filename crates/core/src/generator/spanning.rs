//! Per-floor spanning tree construction: DFS backtracker, Prim and Kruskal.

use union_find::{QuickUnionUf, UnionBySize, UnionFind};

use crate::config::Algorithm;
use crate::error::GenerationError;
use crate::grid::Grid;
use crate::rng::RandomStream;
use crate::types::{Cell, EdgeKey};

pub(super) struct SpanContext<'a> {
    pub(super) grid: &'a Grid,
    pub(super) passable: &'a [bool],
    pub(super) floor: usize,
}

impl SpanContext<'_> {
    fn is_open(&self, cell: Cell) -> bool {
        self.passable[self.grid.index(cell)]
    }

    fn passable_cells(&self) -> Vec<Cell> {
        self.grid.floor_cells(self.floor).filter(|&cell| self.is_open(cell)).collect()
    }

    fn local_index(&self, cell: Cell) -> usize {
        self.grid.index(cell) - self.floor * self.grid.cells_per_floor()
    }
}

/// Spanning tree over the passable cells of one floor, or `DisconnectedGrid`
/// when those cells do not form a single component.
pub(super) fn span_floor(
    context: &SpanContext<'_>,
    algorithm: Algorithm,
    stream: &mut RandomStream,
) -> Result<Vec<EdgeKey>, GenerationError> {
    let cells = context.passable_cells();
    if cells.is_empty() {
        return Err(GenerationError::disconnected(format!(
            "floor {} has no passable cells",
            context.floor
        )));
    }

    let tree = match algorithm {
        Algorithm::DfsBacktracker => dfs_backtracker(context, &cells, stream),
        Algorithm::Prim => prim(context, &cells, stream),
        Algorithm::Kruskal => kruskal(context, &cells, stream),
    };

    if tree.len() != cells.len() - 1 {
        return Err(GenerationError::disconnected(format!(
            "floor {}: {} passable cells but only {} spanning edges",
            context.floor,
            cells.len(),
            tree.len()
        )));
    }
    Ok(tree)
}

fn dfs_backtracker(
    context: &SpanContext<'_>,
    cells: &[Cell],
    stream: &mut RandomStream,
) -> Vec<EdgeKey> {
    let grid = context.grid;
    let mut visited = vec![false; grid.len()];
    let mut tree = Vec::with_capacity(cells.len() - 1);

    let root = cells[stream.next_index(cells.len())];
    visited[grid.index(root)] = true;
    let mut stack = vec![root];

    while let Some(&current) = stack.last() {
        let unvisited: Vec<Cell> = grid
            .neighbors(current)
            .into_iter()
            .filter(|&next| context.is_open(next) && !visited[grid.index(next)])
            .collect();
        if unvisited.is_empty() {
            stack.pop();
            continue;
        }

        let next = unvisited[stream.next_index(unvisited.len())];
        visited[grid.index(next)] = true;
        tree.push(EdgeKey::new(current, next));
        stack.push(next);
    }
    tree
}

fn prim(context: &SpanContext<'_>, cells: &[Cell], stream: &mut RandomStream) -> Vec<EdgeKey> {
    let grid = context.grid;
    let mut visited = vec![false; grid.len()];
    let mut tree = Vec::with_capacity(cells.len() - 1);
    let mut frontier: Vec<(Cell, Cell)> = Vec::new();

    let push_frontier = |cell: Cell, visited: &[bool], frontier: &mut Vec<(Cell, Cell)>| {
        for next in grid.neighbors(cell) {
            if context.is_open(next) && !visited[grid.index(next)] {
                frontier.push((cell, next));
            }
        }
    };

    let root = cells[stream.next_index(cells.len())];
    visited[grid.index(root)] = true;
    push_frontier(root, &visited, &mut frontier);

    while !frontier.is_empty() {
        let (from, to) = frontier.swap_remove(stream.next_index(frontier.len()));
        if visited[grid.index(to)] {
            continue;
        }
        visited[grid.index(to)] = true;
        tree.push(EdgeKey::new(from, to));
        push_frontier(to, &visited, &mut frontier);
    }
    tree
}

fn kruskal(context: &SpanContext<'_>, cells: &[Cell], stream: &mut RandomStream) -> Vec<EdgeKey> {
    let mut candidates: Vec<EdgeKey> = context
        .grid
        .candidate_edges(context.floor)
        .into_iter()
        .filter(|key| context.is_open(key.a) && context.is_open(key.b))
        .collect();
    stream.shuffle(&mut candidates);

    let mut components = QuickUnionUf::<UnionBySize>::new(context.grid.cells_per_floor());
    let mut tree = Vec::with_capacity(cells.len() - 1);
    for key in candidates {
        let (a, b) = (context.local_index(key.a), context.local_index(key.b));
        if components.find(a) == components.find(b) {
            continue;
        }
        components.union(a, b);
        tree.push(key);
        if tree.len() + 1 == cells.len() {
            break;
        }
    }
    tree
}
