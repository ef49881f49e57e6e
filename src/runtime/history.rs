//! Checkpoint history for replaying a run

use super::errors::EngineError;
use super::sink::Checkpoint;

/// Keeps a run's checkpoints in order so they can be stepped through backward
/// and forward after (or while) the run executes.
#[derive(Debug)]
pub struct History {
    checkpoints: Vec<Checkpoint>,
    max_memory: usize,
    current_memory: usize,
}

impl History {
    /// 256 MB
    pub const DEFAULT_LIMIT: usize = 256 * 1024 * 1024;

    pub fn new(max_memory: usize) -> Self {
        History {
            checkpoints: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a checkpoint to history
    pub fn push(&mut self, checkpoint: Checkpoint) -> Result<(), EngineError> {
        let size = checkpoint.snapshot.estimated_size();

        if self.current_memory + size > self.max_memory {
            return Err(EngineError::HistoryLimitExceeded {
                current: self.current_memory,
                requested: size,
                limit: self.max_memory,
            });
        }

        self.current_memory += size;
        self.checkpoints.push(checkpoint);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(index)
    }

    pub fn last(&self) -> Option<&Checkpoint> {
        self.checkpoints.last()
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Drop everything, e.g. when a new run starts
    pub fn clear(&mut self) {
        self.checkpoints.clear();
        self.current_memory = 0;
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sequence::Sequence;
    use crate::runtime::sink::RunId;

    fn checkpoint(step: usize, len: usize) -> Checkpoint {
        Checkpoint {
            run_id: RunId::next(),
            step,
            label: "step".to_string(),
            snapshot: Sequence::from_values(&vec![1; len]).into(),
        }
    }

    #[test]
    fn push_respects_memory_limit() {
        let one = checkpoint(1, 4).snapshot.estimated_size();
        let mut history = History::new(one * 2);
        assert!(history.push(checkpoint(1, 4)).is_ok());
        assert!(history.push(checkpoint(2, 4)).is_ok());
        assert!(matches!(
            history.push(checkpoint(3, 4)),
            Err(EngineError::HistoryLimitExceeded { .. })
        ));
        assert_eq!(history.len(), 2);
        assert_eq!(history.memory_usage(), one * 2);

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.memory_usage(), 0);
    }
}
