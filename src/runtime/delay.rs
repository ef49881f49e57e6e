//! Cancellable delay between checkpoints
//!
//! [`DelayRegistry`] keeps the set of pending suspension scopes, one per live
//! run. [`DelayRegistry::cancel_all`] cancels every one of them at once; after it
//! returns, no registered run will resume from a suspension normally.
//! [`suspend`] is the only blocking call an engine ever makes.

use super::cancel::{CancellationSource, CancellationToken};
use super::errors::EngineError;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct DelayRegistry {
    pending: Mutex<Vec<CancellationSource>>,
}

impl DelayRegistry {
    pub fn new() -> Self {
        DelayRegistry::default()
    }

    /// Open a new suspension scope and return its source
    pub fn register(&self) -> CancellationSource {
        let source = CancellationSource::new();
        self.lock().push(source.clone());
        source
    }

    /// Cancel every pending scope and clear the set.
    ///
    /// Returns how many scopes were cancelled.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<CancellationSource> = self.lock().drain(..).collect();
        for source in &drained {
            source.cancel();
        }
        drained.len()
    }

    /// Forget the scope a finished run was waiting on
    pub fn release(&self, token: &CancellationToken) {
        self.lock().retain(|source| !source.owns(token));
    }

    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CancellationSource>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Suspend for `delay`, or fail with [`EngineError::Cancelled`] if the token
/// fires first (or had already fired).
pub fn suspend(token: &CancellationToken, delay: Duration) -> Result<(), EngineError> {
    if token.wait_timeout(delay) {
        Err(EngineError::Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_all_cancels_and_clears() {
        let registry = DelayRegistry::new();
        let first = registry.register().token();
        let second = registry.register().token();
        assert_eq!(registry.pending(), 2);

        assert_eq!(registry.cancel_all(), 2);
        assert_eq!(registry.pending(), 0);
        assert!(first.is_cancelled());
        assert!(second.is_cancelled());
        assert_eq!(suspend(&first, Duration::from_secs(10)), Err(EngineError::Cancelled));
    }

    #[test]
    fn release_removes_only_that_scope() {
        let registry = DelayRegistry::new();
        let first = registry.register().token();
        let second = registry.register().token();
        registry.release(&first);
        assert_eq!(registry.pending(), 1);
        registry.cancel_all();
        assert!(!first.is_cancelled());
        assert!(second.is_cancelled());
    }

    #[test]
    fn zero_delay_does_not_block() {
        let registry = DelayRegistry::new();
        let token = registry.register().token();
        assert_eq!(suspend(&token, Duration::ZERO), Ok(()));
    }
}
