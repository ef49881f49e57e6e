//! # Introduction
//!
//! algoviz animates classic algorithms by running them against an in-memory
//! data structure and capturing a snapshot after every meaningful mutation.
//! The snapshots are streamed into a terminal UI built with
//! [ratatui](https://docs.rs/ratatui), where a run can be watched live or
//! stepped backward and forward after the fact.
//!
//! ## Execution pipeline
//!
//! ```text
//! Catalog → fresh input → Scheduler → Engine → Checkpoints → State Sink → TUI
//! ```
//!
//! 1. [`catalog`]: every runnable algorithm and how its input is prepared.
//! 2. [`runtime`]: the scheduler, cancellation, the per-run context and the
//!    State Sink contract. A checkpoint is the only place a run can pause or
//!    observe that it has been superseded.
//! 3. [`engines`]: sorting, tree, linked-list, graph, backtracking and grid
//!    algorithms, written as plain functions over a working structure.
//! 4. [`model`]: arena-backed node records with visualization marks, and the
//!    [`model::snapshot::Snapshot`] deep copy handed to the sink.
//! 5. [`config`]: run settings shared by the TUI and headless mode.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Supported algorithms
//!
//! Sorting: selection, bubble, quick, merge, heap.
//! Trees: balanced BST construction, BST search, pre/in/post/level-order.
//! Lists: positional insert and delete, search, reversal, merge, Floyd cycle detection.
//! Graphs: Dijkstra, Bellman-Ford, Floyd-Warshall.
//! Backtracking: N-Queens, Sudoku.
//! Grids: BFS maze path, DFS path enumeration, island count.

pub mod catalog;
pub mod config;
pub mod engines;
pub mod model;
pub mod runtime;
pub mod ui;
