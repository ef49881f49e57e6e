//! Cooperative, cancellable execution of engine runs
//!
//! This module provides everything an engine needs besides its data:
//! - [`cancel`]: [`cancel::CancellationSource`] / [`cancel::CancellationToken`] pair
//! - [`delay`]: the registry of pending suspensions and [`delay::suspend`]
//! - [`context`]: [`context::RunContext`], the engine's handle for checkpoints and counters
//! - [`sink`]: the State Sink contract and the bundled sinks
//! - [`history`]: bounded checkpoint history for replay
//! - [`scheduler`]: starts runs on a worker thread, superseding older ones
//! - [`errors`]: [`errors::EngineError`] and its taxonomy
//!
//! # Execution Model
//!
//! A run is a synchronous engine function executed on one thread. The engine
//! mutates its working copy in small self-contained steps and calls
//! `checkpoint` between them; that call is the only place it can block or
//! observe cancellation. Starting a new run cancels every pending one first.

pub mod cancel;
pub mod context;
pub mod delay;
pub mod errors;
pub mod history;
pub mod scheduler;
pub mod sink;

pub use context::RunContext;
pub use errors::EngineError;
pub use scheduler::{RunHandle, Scheduler};
pub use sink::{Checkpoint, RunId, Signal, StateSink};
