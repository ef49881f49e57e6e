//! The State Sink contract
//!
//! Engines push a [`Checkpoint`] after every meaningful mutation and a
//! [`Signal`] whenever a progress counter moves. Both carry the [`RunId`] of the
//! run that produced them so a consumer can drop events from a run it has
//! already replaced.

use super::history::History;
use crate::model::snapshot::Snapshot;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one engine run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl RunId {
    pub fn next() -> Self {
        RunId(NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// A snapshot of the working structure after one step
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub run_id: RunId,
    /// 1-based position of this checkpoint within its run
    pub step: usize,
    /// Short description of the step ("compare", "swap", "visit B", ...)
    pub label: String,
    pub snapshot: Snapshot,
}

/// Scalar progress signals; each carries the new running total
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Comparisons(usize),
    Swaps(usize),
    PathsFound(usize),
    Visited(usize),
    Note(String),
}

/// Receiver of checkpoints and signals. Must not mutate what it receives.
pub trait StateSink: Send {
    fn emit(&mut self, checkpoint: Checkpoint);

    fn signal(&mut self, _run_id: RunId, _signal: Signal) {}
}

/// Drops everything
#[derive(Debug, Default)]
pub struct NullSink;

impl StateSink for NullSink {
    fn emit(&mut self, _checkpoint: Checkpoint) {}
}

/// What a [`ChannelSink`] forwards
#[derive(Debug, Clone)]
pub enum SinkEvent {
    Checkpoint(Checkpoint),
    Signal(RunId, Signal),
}

impl SinkEvent {
    pub fn run_id(&self) -> RunId {
        match self {
            SinkEvent::Checkpoint(cp) => cp.run_id,
            SinkEvent::Signal(id, _) => *id,
        }
    }
}

/// Forwards events to another thread; a hung-up receiver silently drops them
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<SinkEvent>,
}

impl ChannelSink {
    pub fn new(tx: Sender<SinkEvent>) -> Self {
        ChannelSink { tx }
    }
}

impl StateSink for ChannelSink {
    // A closed receiver means nobody is watching any more
    fn emit(&mut self, checkpoint: Checkpoint) {
        let _ = self.tx.send(SinkEvent::Checkpoint(checkpoint));
    }

    fn signal(&mut self, run_id: RunId, signal: Signal) {
        let _ = self.tx.send(SinkEvent::Signal(run_id, signal));
    }
}

/// Keeps every checkpoint (within a memory budget) and every signal
#[derive(Debug)]
pub struct RecordingSink {
    pub history: History,
    pub signals: Vec<(RunId, Signal)>,
    /// Checkpoints that did not fit in the history budget
    pub dropped: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::with_limit(History::DEFAULT_LIMIT)
    }

    pub fn with_limit(max_memory: usize) -> Self {
        RecordingSink {
            history: History::new(max_memory),
            signals: Vec::new(),
            dropped: 0,
        }
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        self.history.checkpoints()
    }

    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.history.last().map(|cp| &cp.snapshot)
    }

    /// Latest value reported for a counter kind, if any
    pub fn last_count(&self, kind: fn(&Signal) -> Option<usize>) -> Option<usize> {
        self.signals.iter().rev().find_map(|(_, s)| kind(s))
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSink for RecordingSink {
    fn emit(&mut self, checkpoint: Checkpoint) {
        if self.history.push(checkpoint).is_err() {
            self.dropped += 1;
        }
    }

    fn signal(&mut self, run_id: RunId, signal: Signal) {
        self.signals.push((run_id, signal));
    }
}

impl Signal {
    pub fn swaps(&self) -> Option<usize> {
        match self {
            Signal::Swaps(n) => Some(*n),
            _ => None,
        }
    }

    pub fn comparisons(&self) -> Option<usize> {
        match self {
            Signal::Comparisons(n) => Some(*n),
            _ => None,
        }
    }

    pub fn paths_found(&self) -> Option<usize> {
        match self {
            Signal::PathsFound(n) => Some(*n),
            _ => None,
        }
    }

    pub fn visited(&self) -> Option<usize> {
        match self {
            Signal::Visited(n) => Some(*n),
            _ => None,
        }
    }
}
