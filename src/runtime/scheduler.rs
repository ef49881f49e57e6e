//! Starts and supersedes runs
//!
//! [`Scheduler::start`] is the asynchronous entry point for every engine. It
//! cancels whatever is still pending, opens a fresh suspension scope, and runs
//! the job on a worker thread. Only one run per scheduler is live at a time.

use super::cancel::CancellationSource;
use super::context::RunContext;
use super::delay::DelayRegistry;
use super::errors::EngineError;
use super::sink::{RunId, StateSink};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct Scheduler {
    registry: Arc<DelayRegistry>,
    active: Option<RunId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler::default()
    }

    /// The run most recently started, if any
    pub fn active(&self) -> Option<RunId> {
        self.active
    }

    /// Cancel every pending run
    pub fn cancel_all(&mut self) {
        let cancelled = self.registry.cancel_all();
        if cancelled > 0 {
            info!(cancelled, "cancelled pending runs");
        }
        self.active = None;
    }

    /// Cancel any pending run, then run `job` on a worker thread.
    pub fn start<T, F>(&mut self, speed_ms: u64, mut sink: Box<dyn StateSink>, job: F) -> Result<RunHandle<T>, EngineError>
    where
        T: Send + 'static,
        F: FnOnce(&mut RunContext<'_>) -> Result<T, EngineError> + Send + 'static,
    {
        self.cancel_all();

        let run_id = RunId::next();
        let source = self.registry.register();
        let token = source.token();
        let registry = Arc::clone(&self.registry);
        let speed = Duration::from_millis(speed_ms);

        let worker = thread::Builder::new()
            .name(format!("algoviz-{}", run_id))
            .spawn(move || {
                let result = {
                    let mut ctx = RunContext::new(run_id, token.clone(), speed, sink.as_mut());
                    let result = job(&mut ctx);
                    log_outcome(run_id, ctx.steps(), &result);
                    result
                };
                registry.release(&token);
                result
            })
            .map_err(|e| EngineError::WorkerUnavailable(e.to_string()))?;

        info!(%run_id, speed_ms, "run started");
        self.active = Some(run_id);
        Ok(RunHandle {
            run_id,
            source,
            worker: Some(worker),
        })
    }

    /// Cancel any pending run, then run `job` on the calling thread
    pub fn run_blocking<T, F>(&mut self, speed_ms: u64, sink: &mut dyn StateSink, job: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut RunContext<'_>) -> Result<T, EngineError>,
    {
        self.cancel_all();

        let run_id = RunId::next();
        let source = self.registry.register();
        let token = source.token();
        self.active = Some(run_id);
        info!(%run_id, speed_ms, "run started on caller thread");

        let result = {
            let mut ctx = RunContext::new(run_id, token.clone(), Duration::from_millis(speed_ms), sink);
            let result = job(&mut ctx);
            log_outcome(run_id, ctx.steps(), &result);
            result
        };
        self.registry.release(&token);
        result
    }
}

fn log_outcome<T>(run_id: RunId, steps: usize, result: &Result<T, EngineError>) {
    match result {
        Ok(_) => info!(%run_id, steps, "run finished"),
        Err(EngineError::Cancelled) => debug!(%run_id, steps, "run cancelled"),
        Err(e) if e.is_infeasible() => warn!(%run_id, steps, error = %e, "run infeasible"),
        Err(e) => warn!(%run_id, steps, error = %e, "run failed"),
    }
}

/// Handle to a run started with [`Scheduler::start`]
#[derive(Debug)]
pub struct RunHandle<T> {
    run_id: RunId,
    source: CancellationSource,
    worker: Option<JoinHandle<Result<T, EngineError>>>,
}

impl<T> RunHandle<T> {
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Cancel just this run
    pub fn cancel(&self) {
        self.source.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, |w| w.is_finished())
    }

    /// Wait for the run to end and return its result
    pub fn join(mut self) -> Result<T, EngineError> {
        match self.worker.take() {
            Some(worker) => worker.join().unwrap_or(Err(EngineError::WorkerPanicked)),
            None => Err(EngineError::WorkerPanicked),
        }
    }
}
