//! Per-run execution context
//!
//! Every engine receives a [`RunContext`]. It is the engine's only way to talk
//! to the outside world: [`RunContext::checkpoint`] emits a snapshot and then
//! suspends, and the counter helpers emit progress signals.
//!
//! # Suspension discipline
//!
//! `checkpoint` is called only between complete mutation steps. It re-checks
//! the cancellation token before emitting, so a run that has been superseded
//! neither emits nor mutates again: the `Err(Cancelled)` it returns is
//! propagated with `?` straight out of the engine.

use super::cancel::CancellationToken;
use super::delay::suspend;
use super::errors::EngineError;
use super::sink::{Checkpoint, RunId, Signal, StateSink};
use crate::model::snapshot::Snapshot;
use std::time::Duration;

/// Running totals reported through [`Signal`]s
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub comparisons: usize,
    pub swaps: usize,
    pub paths_found: usize,
    pub visited: usize,
}

pub struct RunContext<'a> {
    run_id: RunId,
    token: CancellationToken,
    speed: Duration,
    sink: &'a mut dyn StateSink,
    steps: usize,
    counters: Counters,
}

impl<'a> RunContext<'a> {
    pub fn new(run_id: RunId, token: CancellationToken, speed: Duration, sink: &'a mut dyn StateSink) -> Self {
        RunContext {
            run_id,
            token,
            speed,
            sink,
            steps: 0,
            counters: Counters::default(),
        }
    }

    /// A context that is never cancelled and never sleeps
    pub fn detached(sink: &'a mut dyn StateSink) -> Self {
        Self::new(RunId::next(), CancellationToken::never(), Duration::ZERO, sink)
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn speed(&self) -> Duration {
        self.speed
    }

    /// Number of checkpoints emitted so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fail with `Cancelled` if this run has been superseded
    pub fn ensure_active(&self) -> Result<(), EngineError> {
        if self.token.is_cancelled() {
            Err(EngineError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Emit a deep copy of the working structure, then wait `speed`.
    pub fn checkpoint(&mut self, label: impl Into<String>, snapshot: impl Into<Snapshot>) -> Result<(), EngineError> {
        self.ensure_active()?;
        self.steps += 1;
        self.sink.emit(Checkpoint {
            run_id: self.run_id,
            step: self.steps,
            label: label.into(),
            snapshot: snapshot.into(),
        });
        suspend(&self.token, self.speed)
    }

    pub fn compared(&mut self) {
        self.counters.comparisons += 1;
        let n = self.counters.comparisons;
        self.sink.signal(self.run_id, Signal::Comparisons(n));
    }

    pub fn swapped(&mut self) {
        self.counters.swaps += 1;
        let n = self.counters.swaps;
        self.sink.signal(self.run_id, Signal::Swaps(n));
    }

    pub fn path_found(&mut self) {
        self.counters.paths_found += 1;
        let n = self.counters.paths_found;
        self.sink.signal(self.run_id, Signal::PathsFound(n));
    }

    pub fn visited(&mut self) {
        self.counters.visited += 1;
        let n = self.counters.visited;
        self.sink.signal(self.run_id, Signal::Visited(n));
    }

    pub fn note(&mut self, text: impl Into<String>) {
        self.sink.signal(self.run_id, Signal::Note(text.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sequence::Sequence;
    use crate::runtime::cancel::CancellationSource;
    use crate::runtime::sink::RecordingSink;

    #[test]
    fn checkpoint_numbers_steps_and_tags_run() {
        let mut sink = RecordingSink::new();
        let run_id = {
            let mut ctx = RunContext::detached(&mut sink);
            ctx.checkpoint("a", Sequence::from_values(&[1])).unwrap();
            ctx.checkpoint("b", Sequence::from_values(&[2])).unwrap();
            ctx.swapped();
            ctx.run_id()
        };
        let steps: Vec<usize> = sink.checkpoints().iter().map(|c| c.step).collect();
        assert_eq!(steps, vec![1, 2]);
        assert!(sink.checkpoints().iter().all(|c| c.run_id == run_id));
        assert_eq!(sink.last_count(Signal::swaps), Some(1));
    }

    #[test]
    fn cancelled_context_emits_nothing() {
        let mut sink = RecordingSink::new();
        let source = CancellationSource::new();
        source.cancel();
        let mut ctx = RunContext::new(RunId::next(), source.token(), Duration::ZERO, &mut sink);
        assert_eq!(
            ctx.checkpoint("late", Sequence::from_values(&[1])),
            Err(EngineError::Cancelled)
        );
        assert_eq!(ctx.steps(), 0);
        drop(ctx);
        assert!(sink.checkpoints().is_empty());
    }
}
