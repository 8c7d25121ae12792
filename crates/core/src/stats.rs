//! Summary numbers for a generated maze.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::maze::Maze;
use crate::types::EdgeKind;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MazeStats {
    pub passable_cells: usize,
    pub open_edges: usize,
    pub tree_edges: usize,
    pub loop_edges: usize,
    pub portal_edges: usize,
    /// Passable cells with exactly one open edge.
    pub dead_ends: usize,
    /// Passable cells with three or more open edges.
    pub junctions: usize,
    /// Open-edge degree to number of passable cells with that degree.
    pub degree_histogram: BTreeMap<usize, usize>,
    pub reference_path_len: usize,
    pub reference_path_cost: u64,
    pub obstacles: usize,
}

impl Maze {
    /// Structural counts; obstacles are reported but do not change degrees.
    pub fn stats(&self) -> MazeStats {
        let mut stats = MazeStats {
            passable_cells: self.passable_count(),
            open_edges: self.open_edge_count(),
            reference_path_len: self.reference_path().len(),
            reference_path_cost: self.path_cost(self.reference_path()),
            obstacles: self.obstacles().len(),
            ..MazeStats::default()
        };

        for (_, edge) in self.edges() {
            match edge.kind {
                EdgeKind::Tree => stats.tree_edges += 1,
                EdgeKind::Loop => stats.loop_edges += 1,
                EdgeKind::Portal => stats.portal_edges += 1,
            }
        }

        for cell in self.passable_cells() {
            let degree = self.structural_neighbors(cell).len();
            *stats.degree_histogram.entry(degree).or_default() += 1;
            match degree {
                1 => stats.dead_ends += 1,
                3.. => stats.junctions += 1,
                _ => {}
            }
        }
        stats
    }
}
