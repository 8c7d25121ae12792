//! Error kinds surfaced by generation, obstacle injection and validation.

use thiserror::Error;

use crate::types::{Cell, EdgeKey};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Width, height or floor count is zero or above the configured limit.
    #[error("invalid dimension: {field} = {value} (allowed 1..={max})")]
    InvalidDimension { field: &'static str, value: usize, max: usize },

    /// A knob outside its documented range, rejected before generation starts.
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// The grid cannot yield one connected spanning structure.
    #[error("disconnected grid: {reason}")]
    DisconnectedGrid { reason: String },

    /// No obstacle placement preserved a start-to-goal path within the retry budget.
    #[error(
        "unsatisfiable obstacle config: {requested} obstacles requested, {available} candidates, \
         {attempts} attempts"
    )]
    UnsatisfiableObstacleConfig { requested: usize, available: usize, attempts: usize },

    /// A post-generation invariant did not hold. Always a defect.
    #[error("validation violation: {0}")]
    ValidationViolation(#[from] Violation),
}

impl GenerationError {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig { field, reason: reason.into() }
    }

    pub(crate) fn disconnected(reason: impl Into<String>) -> Self {
        Self::DisconnectedGrid { reason: reason.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("edge {0:?} does not join adjacent passable cells")]
    MalformedEdge(EdgeKey),
    #[error("{unreachable} passable cells are unreachable from start, first {first:?}")]
    UnreachableCells { unreachable: usize, first: Cell },
    #[error("goal {0:?} is not reachable from start")]
    GoalUnreachable(Cell),
    #[error("floor {floor} has {actual} tree edges, expected {expected}")]
    TreeEdgeCount { floor: usize, expected: usize, actual: usize },
    #[error("tree edge {0:?} closes a cycle")]
    TreeCycle(EdgeKey),
    #[error("{actual} loop edges opened, loop budget allows {expected}")]
    LoopBudget { expected: usize, actual: usize },
    #[error("{actual} portals present, {expected} configured")]
    PortalCount { expected: usize, actual: usize },
    #[error("portal {0:?} is malformed")]
    MalformedPortal(EdgeKey),
    #[error("cell {0:?} belongs to more than one portal")]
    PortalReused(Cell),
    #[error("endpoint {0:?} is impassable or outside the grid")]
    BadEndpoint(Cell),
    #[error("obstacle blocks endpoint {0:?}")]
    ObstacleOnEndpoint(Cell),
    #[error("obstacles cut every path from start to goal")]
    ObstaclesBlockGoal,
    #[error("obstacle cell {0:?} is not a passable cell")]
    StrayObstacleCell(Cell),
    #[error("obstacle edge {0:?} is not an open edge")]
    StrayObstacleEdge(EdgeKey),
    #[error("exported {0} does not match the rebuilt maze")]
    ExportMismatch(&'static str),
}
