//! Data model for the visualizer
//!
//! This module provides the structures every engine mutates:
//! - [`arena`]: Id-indexed node storage ([`arena::Arena`]) and fresh [`arena::NodeId`]s
//! - [`marks`]: Visualization status bits ([`marks::Marks`]) carried by every node, cell and item
//! - [`sequence`]: Ordered scalar items for the sorting engines
//! - [`tree`]: Binary tree with parent links
//! - [`list`]: Singly-linked list that may contain a cycle
//! - [`graph`]: Weighted graph with per-node running distances
//! - [`grid`]: Rectangular open/blocked cell grid
//! - [`board`]: N-Queens and Sudoku boards
//! - [`snapshot`]: Deep copy of any of the above, handed to the State Sink
//!
//! # Identity
//!
//! Every node record gets an id from a process-wide counter, so ids are never
//! reused across runs. A checkpoint from a superseded run can therefore never
//! name a node that belongs to the active run.
//!
//! # Cycles
//!
//! Links between nodes are ids into an arena, never references. A list cycle is
//! just a `next` id that names an earlier slot, and every traversal that could
//! meet one carries an explicit visited set.

pub mod arena;
pub mod board;
pub mod graph;
pub mod grid;
pub mod list;
pub mod marks;
pub mod sequence;
pub mod snapshot;
pub mod tree;

pub use arena::{Arena, Keyed, NodeId};
pub use marks::Marks;

/// Horizontal canvas width used by the layout helpers
pub const CANVAS_WIDTH: f64 = 1000.0;

/// Vertical distance between tree levels
pub const LEVEL_HEIGHT: f64 = 80.0;

/// Horizontal distance between consecutive list nodes
pub const LIST_SPACING: f64 = 90.0;
