//! Error types shared by every engine
//!
//! This module defines [`EngineError`], the single error type returned by engine
//! entry points. It separates three outcomes that must never be confused:
//!
//! - [`InvalidInput`]: rejected before any mutation happens
//! - [`Infeasibility`]: discovered mid-run; the search is abandoned
//! - [`EngineError::Cancelled`]: the run was superseded by a newer one
//!
//! "Not found" and "no path" are not errors; engines report them through their
//! own outcome types.

use crate::model::NodeId;
use thiserror::Error;

/// Input rejected before the working structure was touched
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("position {position} is out of range for a list of length {len}")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("search target is empty")]
    EmptyTarget,

    #[error("duplicate key {0}")]
    DuplicateKey(NodeId),

    #[error("node {0} does not belong to this structure")]
    UnknownNode(NodeId),

    #[error("operation requires an acyclic list")]
    CyclicList,

    #[error("operation requires sorted input lists")]
    UnsortedList,

    #[error("{what} must be between {min} and {max}, got {value}")]
    InvalidSize {
        what: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    #[error("malformed board: {0}")]
    MalformedBoard(String),
}

/// Which Sudoku unit contains a duplicate digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardUnit {
    Row,
    Column,
    Box,
}

impl std::fmt::Display for BoardUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardUnit::Row => write!(f, "row"),
            BoardUnit::Column => write!(f, "column"),
            BoardUnit::Box => write!(f, "box"),
        }
    }
}

/// The algorithm determined that no valid answer exists
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Infeasibility {
    #[error("graph contains a negative-weight cycle")]
    NegativeCycle,

    #[error("no solution exists")]
    Unsolvable,

    #[error("starting board repeats digit {digit} in {unit} {index}")]
    InvalidBoard {
        unit: BoardUnit,
        index: usize,
        digit: u8,
    },
}

/// Errors returned by engine entry points
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("infeasible: {0}")]
    Infeasible(#[from] Infeasibility),

    /// The run's cancellation token fired; not a user-facing failure
    #[error("run cancelled")]
    Cancelled,

    #[error("snapshot history limit exceeded: {current} + {requested} > {limit}")]
    HistoryLimitExceeded {
        current: usize,
        requested: usize,
        limit: usize,
    },

    #[error("could not start run worker: {0}")]
    WorkerUnavailable(String),

    #[error("run worker panicked")]
    WorkerPanicked,
}

impl EngineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EngineError::Cancelled)
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, EngineError::Infeasible(_))
    }
}

/// Convenience constructor used by the model layer
pub(crate) fn unknown(id: NodeId) -> EngineError {
    EngineError::InvalidInput(InvalidInput::UnknownNode(id))
}
