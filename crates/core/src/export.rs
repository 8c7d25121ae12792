//! Lossless, deterministic maze export.
//!
//! `MazeExport` is the serde view of a maze; `canonical_bytes` is a compact
//! little-endian encoding of the same data used for fingerprints. Both are
//! pure functions of the maze, so equal mazes export byte-identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::config::{MazeConfig, ObstacleTarget};
use crate::error::{GenerationError, Violation};
use crate::grid::Grid;
use crate::maze::{Maze, MazeParts, ObstacleSet};
use crate::pathing::cheapest_path;
use crate::types::{Cell, Edge, EdgeKey, EdgeKind, Portal};
use crate::validate::{validate, validate_episode};

pub const EXPORT_FORMAT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeExport {
    pub format_version: u32,
    pub config: MazeConfig,
    pub seed: u64,
    pub start: Cell,
    pub goal: Cell,
    /// Every cell of the grid in canonical order.
    pub cells: Vec<CellRecord>,
    /// Open edges sorted by canonical key.
    pub edges: Vec<EdgeRecord>,
    pub portals: Vec<Portal>,
    pub obstacles: ObstacleSet,
    pub reference_path: Vec<Cell>,
    /// Open neighbors of each passable cell, ignoring obstacles.
    pub adjacency: Vec<AdjacencyRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    #[serde(flatten)]
    pub cell: Cell,
    pub passable: bool,
    pub blocked: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub a: Cell,
    pub b: Cell,
    pub kind: EdgeKind,
    pub cost: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyRecord {
    pub cell: Cell,
    pub neighbors: Vec<NeighborRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborRecord {
    pub cell: Cell,
    pub cost: u32,
}

impl MazeExport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Every config field and every section except the derived adjacency.
    /// Counts and coordinates are written as `u64`.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let config = &self.config;
        let mut bytes = Vec::new();
        bytes.extend(self.format_version.to_le_bytes());
        bytes.extend(self.seed.to_le_bytes());
        for dimension in [config.floors, config.height, config.width] {
            push_usize(&mut bytes, dimension);
        }
        bytes.push(u8::from(config.neighborhood));
        bytes.push(config.algorithm.code());
        bytes.extend(config.loop_density.to_bits().to_le_bytes());
        bytes.push(u8::from(config.weighted));
        bytes.extend(config.cost_min.to_le_bytes());
        bytes.extend(config.cost_max.to_le_bytes());
        push_usize(&mut bytes, config.portal_count);
        bytes.extend(config.portal_cost.to_le_bytes());
        push_usize(&mut bytes, config.dynamic_obstacle_count);
        bytes.push(match config.obstacle_target {
            ObstacleTarget::Cells => 0,
            ObstacleTarget::Edges => 1,
        });
        push_usize(&mut bytes, config.obstacle_retry_budget);
        push_usize(&mut bytes, config.solid_cells.len());
        for &cell in &config.solid_cells {
            push_cell(&mut bytes, cell);
        }
        for endpoint in [config.start, config.goal] {
            match endpoint {
                Some(cell) => {
                    bytes.push(1);
                    push_cell(&mut bytes, cell);
                }
                None => bytes.push(0),
            }
        }
        let limits = &config.limits;
        for limit in [limits.max_side, limits.max_floors, limits.max_cells] {
            push_usize(&mut bytes, limit);
        }

        push_cell(&mut bytes, self.start);
        push_cell(&mut bytes, self.goal);

        push_usize(&mut bytes, self.cells.len());
        for record in &self.cells {
            bytes.push(u8::from(record.passable) | (u8::from(record.blocked) << 1));
        }

        push_usize(&mut bytes, self.edges.len());
        for edge in &self.edges {
            push_cell(&mut bytes, edge.a);
            push_cell(&mut bytes, edge.b);
            bytes.push(edge.kind.code());
            bytes.extend(edge.cost.to_le_bytes());
        }

        push_usize(&mut bytes, self.portals.len());
        for portal in &self.portals {
            push_cell(&mut bytes, portal.lower);
            push_cell(&mut bytes, portal.upper);
            bytes.extend(portal.cost.to_le_bytes());
        }

        match self.obstacles.episode_seed {
            Some(seed) => {
                bytes.push(1);
                bytes.extend(seed.to_le_bytes());
            }
            None => bytes.push(0),
        }
        push_usize(&mut bytes, self.obstacles.edges.len());
        for key in &self.obstacles.edges {
            push_cell(&mut bytes, key.a);
            push_cell(&mut bytes, key.b);
        }

        push_usize(&mut bytes, self.reference_path.len());
        for &cell in &self.reference_path {
            push_cell(&mut bytes, cell);
        }
        bytes
    }
}

// usize is at most 64 bits on every supported target.
fn push_usize(bytes: &mut Vec<u8>, value: usize) {
    bytes.extend((value as u64).to_le_bytes());
}

fn push_cell(bytes: &mut Vec<u8>, cell: Cell) {
    for coordinate in [cell.floor, cell.row, cell.col] {
        push_usize(bytes, coordinate);
    }
}

impl Maze {
    pub fn export(&self) -> MazeExport {
        let cells = self
            .grid
            .cells()
            .map(|cell| CellRecord {
                cell,
                passable: self.is_passable(cell),
                blocked: self.is_blocked(cell),
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|(key, edge)| EdgeRecord { a: key.a, b: key.b, kind: edge.kind, cost: edge.cost })
            .collect();
        let adjacency = self
            .passable_cells()
            .map(|cell| AdjacencyRecord {
                cell,
                neighbors: self
                    .structural_neighbors(cell)
                    .iter()
                    .map(|&(cell, cost)| NeighborRecord { cell, cost })
                    .collect(),
            })
            .collect();

        MazeExport {
            format_version: EXPORT_FORMAT_VERSION,
            config: self.config.clone(),
            seed: self.seed,
            start: self.start,
            goal: self.goal,
            cells,
            edges,
            portals: self.portals.clone(),
            obstacles: self.obstacles.clone(),
            reference_path: self.reference_path.clone(),
            adjacency,
        }
    }

    /// xxh3 of the canonical export bytes.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.export().canonical_bytes())
    }

    /// Rebuilds a maze from its export and re-runs every structural and
    /// episode check. Derived sections (cells, adjacency, reference path)
    /// must agree with what the rebuilt maze computes.
    pub fn from_export(export: &MazeExport) -> Result<Self, GenerationError> {
        if export.format_version != EXPORT_FORMAT_VERSION {
            return Err(GenerationError::invalid_config(
                "format_version",
                format!(
                    "unsupported export format {}, expected {EXPORT_FORMAT_VERSION}",
                    export.format_version
                ),
            ));
        }
        export.config.validate()?;
        let grid = Grid::for_config(&export.config)?;

        let misplaced = |(index, record): (usize, &CellRecord)| record.cell != grid.cell(index);
        if export.cells.len() != grid.len() || export.cells.iter().enumerate().any(misplaced) {
            return Err(Violation::ExportMismatch("cells").into());
        }
        let passable: Vec<bool> = export.cells.iter().map(|record| record.passable).collect();
        if export.config.solid_cells.iter().any(|&cell| passable[grid.index(cell)]) {
            return Err(Violation::ExportMismatch("cells").into());
        }

        let mut edges = BTreeMap::new();
        for record in &export.edges {
            let key = EdgeKey::new(record.a, record.b);
            if !grid.contains(key.a) || !grid.contains(key.b) || key.a == key.b {
                return Err(Violation::MalformedEdge(key).into());
            }
            if edges.insert(key, Edge { kind: record.kind, cost: record.cost }).is_some() {
                return Err(Violation::MalformedEdge(key).into());
            }
        }

        let mut maze = Maze::assemble(MazeParts {
            config: export.config.clone(),
            seed: export.seed,
            grid,
            passable,
            edges,
            portals: export.portals.clone(),
            start: export.start,
            goal: export.goal,
        });
        validate(&maze)?;
        maze.reference_path = cheapest_path(&maze, maze.start, maze.goal, None)
            .ok_or(Violation::GoalUnreachable(maze.goal))?;

        let maze = maze.with_obstacles(export.obstacles.clone());
        validate_episode(&maze)?;

        let rebuilt = maze.export();
        for (section, matches) in [
            ("cells", rebuilt.cells == export.cells),
            ("portals", rebuilt.portals == export.portals),
            ("reference_path", rebuilt.reference_path == export.reference_path),
            ("adjacency", rebuilt.adjacency == export.adjacency),
        ] {
            if !matches {
                return Err(Violation::ExportMismatch(section).into());
            }
        }
        Ok(maze)
    }
}
