//! The generated maze: cells, open edges, portals, endpoints and the current
//! episode's obstacle set.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::MazeConfig;
use crate::grid::Grid;
use crate::types::{Cell, Edge, EdgeKey, Portal};

/// Cells or edges blocked for one episode. Replaced wholesale, never patched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleSet {
    pub episode_seed: Option<u64>,
    pub cells: BTreeSet<Cell>,
    pub edges: BTreeSet<EdgeKey>,
}

impl ObstacleSet {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.edges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len() + self.edges.len()
    }

    pub fn blocks_cell(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn blocks_step(&self, from: Cell, to: Cell) -> bool {
        self.cells.contains(&to) || self.edges.contains(&EdgeKey::new(from, to))
    }
}

/// Structural pieces produced by the generation pipeline (or an import).
pub(crate) struct MazeParts {
    pub(crate) config: MazeConfig,
    pub(crate) seed: u64,
    pub(crate) grid: Grid,
    pub(crate) passable: Vec<bool>,
    pub(crate) edges: BTreeMap<EdgeKey, Edge>,
    pub(crate) portals: Vec<Portal>,
    pub(crate) start: Cell,
    pub(crate) goal: Cell,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Maze {
    pub(crate) config: MazeConfig,
    pub(crate) seed: u64,
    pub(crate) grid: Grid,
    pub(crate) passable: Vec<bool>,
    pub(crate) edges: BTreeMap<EdgeKey, Edge>,
    pub(crate) portals: Vec<Portal>,
    pub(crate) start: Cell,
    pub(crate) goal: Cell,
    pub(crate) reference_path: Vec<Cell>,
    pub(crate) obstacles: ObstacleSet,
    adjacency: Vec<Vec<(Cell, u32)>>,
}

impl Maze {
    pub(crate) fn assemble(parts: MazeParts) -> Self {
        let MazeParts { config, seed, grid, passable, edges, mut portals, start, goal } = parts;
        portals.sort_unstable();
        let mut adjacency = vec![Vec::new(); grid.len()];
        for (key, edge) in &edges {
            if grid.contains(key.a) && grid.contains(key.b) {
                adjacency[grid.index(key.a)].push((key.b, edge.cost));
                adjacency[grid.index(key.b)].push((key.a, edge.cost));
            }
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
        }

        Self {
            config,
            seed,
            grid,
            passable,
            edges,
            portals,
            start,
            goal,
            reference_path: Vec::new(),
            obstacles: ObstacleSet::default(),
            adjacency,
        }
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Cheapest start-to-goal path, both endpoints included.
    pub fn reference_path(&self) -> &[Cell] {
        &self.reference_path
    }

    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    pub fn edges(&self) -> impl Iterator<Item = (&EdgeKey, &Edge)> {
        self.edges.iter()
    }

    pub fn edge(&self, a: Cell, b: Cell) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(a, b))
    }

    pub fn open_edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    pub fn is_passable(&self, cell: Cell) -> bool {
        self.grid.contains(cell) && self.passable[self.grid.index(cell)]
    }

    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.obstacles.blocks_cell(cell)
    }

    pub fn passable_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.grid.cells().filter(|&cell| self.passable[self.grid.index(cell)])
    }

    pub fn passable_count(&self) -> usize {
        self.passable.iter().filter(|&&open| open).count()
    }

    /// Open edges out of `cell` with their costs, ignoring obstacles.
    pub fn structural_neighbors(&self, cell: Cell) -> &[(Cell, u32)] {
        if !self.grid.contains(cell) {
            return &[];
        }
        &self.adjacency[self.grid.index(cell)]
    }

    /// Open edges out of `cell` usable this episode.
    pub fn open_neighbors(&self, cell: Cell) -> Vec<(Cell, u32)> {
        if self.obstacles.blocks_cell(cell) {
            return Vec::new();
        }
        self.structural_neighbors(cell)
            .iter()
            .copied()
            .filter(|&(next, _)| !self.obstacles.blocks_step(cell, next))
            .collect()
    }

    /// The same structure with no obstacles.
    pub fn clear_obstacles(&self) -> Self {
        self.with_obstacles(ObstacleSet::default())
    }

    pub(crate) fn with_obstacles(&self, obstacles: ObstacleSet) -> Self {
        Self { obstacles, ..self.clone() }
    }
}
