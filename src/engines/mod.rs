//! Algorithm engines
//!
//! Each engine is a plain function over a working structure and a
//! [`RunContext`](crate::runtime::RunContext). Engines depend on the model and
//! the runtime only, never on each other.

pub mod backtracking;
pub mod graph;
pub mod grid;
pub mod list;
pub mod sorting;
pub mod tree;

pub use graph::PathOutcome;
pub use sorting::SortAlgorithm;
pub use tree::{SearchOutcome, TraversalOrder};
