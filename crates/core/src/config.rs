//! Generation knobs, their defaults, presets and up-front validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::types::Cell;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Neighborhood {
    Four,
    Eight,
}

impl TryFrom<u8> for Neighborhood {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            other => Err(format!("neighborhood must be 4 or 8, got {other}")),
        }
    }
}

impl From<Neighborhood> for u8 {
    fn from(value: Neighborhood) -> Self {
        match value {
            Neighborhood::Four => 4,
            Neighborhood::Eight => 8,
        }
    }
}

impl FromStr for Neighborhood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s.trim().parse().map_err(|_| format!("not a neighborhood: {s}"))?;
        Self::try_from(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[serde(alias = "dfs")]
    DfsBacktracker,
    Prim,
    Kruskal,
}

impl Algorithm {
    pub const ALL: [Self; 3] = [Self::DfsBacktracker, Self::Prim, Self::Kruskal];

    pub fn name(self) -> &'static str {
        match self {
            Self::DfsBacktracker => "dfs_backtracker",
            Self::Prim => "prim",
            Self::Kruskal => "kruskal",
        }
    }

    pub(crate) fn code(self) -> u8 {
        match self {
            Self::DfsBacktracker => 0,
            Self::Prim => 1,
            Self::Kruskal => 2,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dfs" | "dfs_backtracker" => Ok(Self::DfsBacktracker),
            "prim" => Ok(Self::Prim),
            "kruskal" => Ok(Self::Kruskal),
            other => Err(format!("unknown algorithm `{other}` (dfs_backtracker, prim, kruskal)")),
        }
    }
}

/// What the obstacle injector blocks each episode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleTarget {
    #[default]
    Cells,
    Edges,
}

impl FromStr for ObstacleTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cells" => Ok(Self::Cells),
            "edges" => Ok(Self::Edges),
            other => Err(format!("unknown obstacle target `{other}` (cells, edges)")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "expert" => Ok(Self::Expert),
            other => Err(format!("unknown difficulty `{other}` (easy, medium, hard, expert)")),
        }
    }
}

/// Memory bounds checked before any cell is allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridLimits {
    pub max_side: usize,
    pub max_floors: usize,
    pub max_cells: usize,
}

impl Default for GridLimits {
    fn default() -> Self {
        Self { max_side: 4_096, max_floors: 64, max_cells: 1 << 24 }
    }
}

pub const DEFAULT_OBSTACLE_RETRY_BUDGET: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MazeConfig {
    pub floors: usize,
    pub width: usize,
    pub height: usize,
    pub neighborhood: Neighborhood,
    pub algorithm: Algorithm,
    /// Fraction of the edges still closed after spanning that get opened.
    pub loop_density: f64,
    pub weighted: bool,
    pub cost_min: u32,
    pub cost_max: u32,
    pub portal_count: usize,
    pub portal_cost: u32,
    pub dynamic_obstacle_count: usize,
    pub obstacle_target: ObstacleTarget,
    pub obstacle_retry_budget: usize,
    /// Permanently impassable cells.
    pub solid_cells: Vec<Cell>,
    pub start: Option<Cell>,
    pub goal: Option<Cell>,
    pub limits: GridLimits,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            floors: 1,
            width: 10,
            height: 10,
            neighborhood: Neighborhood::Four,
            algorithm: Algorithm::DfsBacktracker,
            loop_density: 0.0,
            weighted: false,
            cost_min: 1,
            cost_max: 9,
            portal_count: 0,
            portal_cost: 0,
            dynamic_obstacle_count: 0,
            obstacle_target: ObstacleTarget::Cells,
            obstacle_retry_budget: DEFAULT_OBSTACLE_RETRY_BUDGET,
            solid_cells: Vec::new(),
            start: None,
            goal: None,
            limits: GridLimits::default(),
        }
    }
}

impl MazeConfig {
    pub fn preset(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self { width: 8, height: 8, ..Self::default() },
            Difficulty::Medium => Self {
                width: 12,
                height: 12,
                algorithm: Algorithm::Prim,
                loop_density: 0.05,
                weighted: true,
                cost_max: 5,
                ..Self::default()
            },
            Difficulty::Hard => Self {
                width: 16,
                height: 16,
                floors: 2,
                portal_count: 3,
                algorithm: Algorithm::Kruskal,
                loop_density: 0.1,
                weighted: true,
                dynamic_obstacle_count: 4,
                ..Self::default()
            },
            Difficulty::Expert => Self {
                width: 24,
                height: 24,
                floors: 3,
                portal_count: 5,
                portal_cost: 3,
                neighborhood: Neighborhood::Eight,
                algorithm: Algorithm::Kruskal,
                loop_density: 0.15,
                weighted: true,
                dynamic_obstacle_count: 10,
                obstacle_target: ObstacleTarget::Edges,
                ..Self::default()
            },
        }
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height * self.floors
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.floor < self.floors && cell.row < self.height && cell.col < self.width
    }

    /// Number of closed edges the loop augmenter opens out of `closed`.
    pub fn loop_edge_budget(&self, closed: usize) -> usize {
        ((self.loop_density * closed as f64).floor() as usize).min(closed)
    }

    pub fn check_dimensions(&self) -> Result<(), GenerationError> {
        let limits = &self.limits;
        for (field, value, max) in [
            ("width", self.width, limits.max_side),
            ("height", self.height, limits.max_side),
            ("floors", self.floors, limits.max_floors),
        ] {
            if value == 0 || value > max {
                return Err(GenerationError::InvalidDimension { field, value, max });
            }
        }
        let cells = self.width.saturating_mul(self.height).saturating_mul(self.floors);
        if cells > limits.max_cells {
            return Err(GenerationError::InvalidDimension {
                field: "cells",
                value: cells,
                max: limits.max_cells,
            });
        }
        Ok(())
    }

    /// Rejects bad knobs before any generation work happens.
    pub fn validate(&self) -> Result<(), GenerationError> {
        self.check_dimensions()?;

        if !(0.0..=1.0).contains(&self.loop_density) {
            return Err(GenerationError::invalid_config(
                "loop_density",
                format!("{} is outside [0, 1]", self.loop_density),
            ));
        }
        if self.weighted && self.cost_min > self.cost_max {
            return Err(GenerationError::invalid_config(
                "cost_min",
                format!("cost_min {} exceeds cost_max {}", self.cost_min, self.cost_max),
            ));
        }
        if self.floors == 1 && self.portal_count > 0 {
            return Err(GenerationError::invalid_config(
                "portal_count",
                "portals need at least two floors",
            ));
        }
        if self.portal_count < self.floors - 1 {
            return Err(GenerationError::disconnected(format!(
                "{} floors need at least {} portals, got {}",
                self.floors,
                self.floors - 1,
                self.portal_count
            )));
        }

        for &cell in &self.solid_cells {
            if !self.contains(cell) {
                return Err(GenerationError::invalid_config(
                    "solid_cells",
                    format!("{cell:?} is outside the grid"),
                ));
            }
        }
        for (field, endpoint) in [("start", self.start), ("goal", self.goal)] {
            let Some(cell) = endpoint else {
                continue;
            };
            if !self.contains(cell) {
                return Err(GenerationError::invalid_config(
                    field,
                    format!("{cell:?} is outside the grid"),
                ));
            }
            if self.solid_cells.contains(&cell) {
                return Err(GenerationError::invalid_config(
                    field,
                    format!("{cell:?} is a solid cell"),
                ));
            }
        }

        Ok(())
    }
}
