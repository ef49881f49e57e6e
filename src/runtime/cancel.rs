//! Cooperative cancellation tokens for runs.
//!
//! A [`CancellationSource`] is held by whoever may stop a run; the run itself
//! holds a [`CancellationToken`] and waits on it between steps. Waiting wakes
//! immediately when the source is cancelled, so a superseded run never sleeps
//! through its cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

struct Shared {
    cancelled: AtomicBool,
    notify: (Mutex<()>, Condvar),
}

/// The control handle that triggers cancellation.
///
/// Dropping the source does not cancel its tokens.
#[derive(Clone)]
pub struct CancellationSource {
    inner: Arc<Shared>,
}

/// A cloneable view of a source's state, handed to the run.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<Shared>,
}

impl CancellationSource {
    pub fn new() -> Self {
        CancellationSource {
            inner: Arc::new(Shared {
                cancelled: AtomicBool::new(false),
                notify: (Mutex::new(()), Condvar::new()),
            }),
        }
    }

    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Mark cancelled and wake every waiting token
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        let (lock, cvar) = &self.inner.notify;
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Whether `token` was derived from this source
    pub fn owns(&self, token: &CancellationToken) -> bool {
        Arc::ptr_eq(&self.inner, &token.inner)
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationSource")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancellationToken {
    /// A token whose source is dropped immediately; it can never be cancelled
    pub fn never() -> Self {
        CancellationSource::new().token()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Block until cancelled or until `duration` elapses.
    ///
    /// Returns `true` if cancelled, `false` if the full duration passed.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        if duration.is_zero() {
            return false;
        }
        let (lock, cvar) = &self.inner.notify;
        let mut guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        let deadline = Instant::now() + duration;
        loop {
            if self.is_cancelled() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (next, _) = cvar
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            guard = next;
        }
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn cancel_reaches_every_clone() {
        let source = CancellationSource::new();
        let a = source.token();
        let b = a.clone();
        assert!(!a.is_cancelled());
        source.cancel();
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
    }

    #[test]
    fn dropping_source_does_not_cancel() {
        let token = CancellationToken::never();
        assert!(!token.is_cancelled());
        assert!(!token.wait_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn zero_wait_returns_immediately() {
        let source = CancellationSource::new();
        assert!(!source.token().wait_timeout(Duration::ZERO));
        source.cancel();
        assert!(source.token().wait_timeout(Duration::ZERO));
    }

    #[test]
    fn cancel_wakes_a_long_wait() {
        let source = CancellationSource::new();
        let token = source.token();
        let waiter = thread::spawn(move || {
            let start = Instant::now();
            let cancelled = token.wait_timeout(Duration::from_secs(30));
            (cancelled, start.elapsed())
        });
        thread::sleep(Duration::from_millis(20));
        source.cancel();
        let (cancelled, elapsed) = waiter.join().unwrap();
        assert!(cancelled);
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn owns_matches_only_derived_tokens() {
        let a = CancellationSource::new();
        let b = CancellationSource::new();
        assert!(a.owns(&a.token()));
        assert!(!a.owns(&b.token()));
    }
}
