// Integration tests for scheduling, cancellation and the State Sink contract

use algoviz::catalog::{self, Algorithm};
use algoviz::config::RunConfig;
use algoviz::engines::grid;
use algoviz::engines::sorting::{self, SortAlgorithm};
use algoviz::model::grid::Grid;
use algoviz::model::sequence::Sequence;
use algoviz::runtime::errors::EngineError;
use algoviz::runtime::history::History;
use algoviz::runtime::sink::{ChannelSink, RecordingSink, SinkEvent};
use algoviz::runtime::{RunContext, RunId, Scheduler};
use std::sync::mpsc;
use std::time::{Duration, Instant};

fn long_sort() -> impl FnOnce(&mut RunContext<'_>) -> Result<usize, EngineError> + Send + 'static {
    move |ctx: &mut RunContext<'_>| {
        let mut seq = Sequence::from_values(&(0..40).rev().collect::<Vec<i64>>());
        sorting::bubble_sort(ctx, &mut seq)?;
        Ok(seq.len())
    }
}

#[test]
fn test_cancel_wakes_a_sleeping_run() {
    let (tx, rx) = mpsc::channel();
    let mut scheduler = Scheduler::new();
    let handle = scheduler
        .start(5_000, Box::new(ChannelSink::new(tx)), long_sort())
        .unwrap();

    // wait for the first checkpoint, after which the run sleeps for 5s
    let first = rx.recv_timeout(Duration::from_secs(5)).expect("no checkpoint");
    assert_eq!(first.run_id(), handle.run_id());

    let started = Instant::now();
    handle.cancel();
    assert_eq!(handle.join(), Err(EngineError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_new_run_supersedes_old_one() {
    let (tx, rx) = mpsc::channel();
    let mut scheduler = Scheduler::new();
    let old = scheduler
        .start(50, Box::new(ChannelSink::new(tx.clone())), long_sort())
        .unwrap();
    let old_id = old.run_id();
    rx.recv_timeout(Duration::from_secs(5)).expect("old run never emitted");

    let new = scheduler
        .start(0, Box::new(ChannelSink::new(tx)), |ctx| {
            let mut seq = Sequence::from_values(&[3, 1, 2]);
            sorting::selection_sort(ctx, &mut seq)?;
            Ok(seq.values())
        })
        .unwrap();
    let new_id = new.run_id();
    assert_ne!(old_id, new_id);
    assert_eq!(scheduler.active(), Some(new_id));

    assert_eq!(old.join(), Err(EngineError::Cancelled));
    assert_eq!(new.join(), Ok(vec![1, 2, 3]));

    // the new run's checkpoints form one gap-free sequence
    let steps: Vec<usize> = rx
        .try_iter()
        .filter_map(|event| match event {
            SinkEvent::Checkpoint(cp) if cp.run_id == new_id => Some(cp.step),
            _ => None,
        })
        .collect();
    assert!(!steps.is_empty());
    assert_eq!(steps, (1..=steps.len()).collect::<Vec<_>>());
}

#[test]
fn test_cancel_all_stops_pending_run() {
    let (tx, rx) = mpsc::channel();
    let mut scheduler = Scheduler::new();
    let handle = scheduler
        .start(1_000, Box::new(ChannelSink::new(tx)), long_sort())
        .unwrap();
    rx.recv_timeout(Duration::from_secs(5)).expect("no checkpoint");
    scheduler.cancel_all();
    assert_eq!(scheduler.active(), None);
    assert!(handle.join().unwrap_err().is_cancelled());
}

#[test]
fn test_run_blocking_records_one_run() {
    let mut scheduler = Scheduler::new();
    let mut sink = RecordingSink::new();
    let sorted = scheduler
        .run_blocking(0, &mut sink, |ctx| {
            let mut seq = Sequence::from_values(&[2, 1]);
            sorting::sort(ctx, SortAlgorithm::Bubble, &mut seq)?;
            Ok(seq.values())
        })
        .unwrap();
    assert_eq!(sorted, vec![1, 2]);

    let ids: Vec<RunId> = sink.checkpoints().iter().map(|cp| cp.run_id).collect();
    assert!(!ids.is_empty());
    assert!(ids.iter().all(|&id| id == ids[0]));
    assert!(sink.signals.iter().all(|(id, _)| *id == ids[0]));
}

#[test]
fn test_catalog_jobs_run_headless() {
    let config = RunConfig {
        speed_ms: 0,
        seed: Some(3),
        ..RunConfig::default()
    };
    for algorithm in Algorithm::ALL {
        let job = catalog::prepare(algorithm, &config).unwrap();
        let mut sink = RecordingSink::with_limit(History::DEFAULT_LIMIT);
        let mut scheduler = Scheduler::new();
        let result = scheduler.run_blocking(0, &mut sink, job);
        match result {
            Ok(summary) => assert!(!summary.is_empty(), "{}", algorithm),
            Err(e) => assert!(e.is_infeasible(), "{}: {}", algorithm, e),
        }
        assert!(!sink.checkpoints().is_empty(), "{}", algorithm);
    }
}

#[test]
fn test_catalog_runs_at_largest_size_fit_history_budget() {
    for algorithm in Algorithm::ALL {
        let size = algorithm
            .size_range()
            .map_or_else(|| algorithm.default_size(), |range| *range.end());
        for seed in 0..4 {
            let config = RunConfig {
                speed_ms: 0,
                size: Some(size),
                seed: Some(seed),
                ..RunConfig::default()
            };
            let job = catalog::prepare(algorithm, &config).unwrap();
            let mut sink = RecordingSink::with_limit(History::DEFAULT_LIMIT);
            let result = Scheduler::new().run_blocking(0, &mut sink, job);
            if let Err(e) = result {
                assert!(e.is_infeasible(), "{} seed {}: {}", algorithm, seed, e);
            }
            assert_eq!(sink.dropped, 0, "{} size {} seed {}", algorithm, size, seed);
        }
    }
}

#[test]
fn test_open_maze_at_largest_side_fits_history_budget() {
    let side = catalog::MAX_MAZE_PATHS_SIDE;
    let row = ".".repeat(side);
    let rows: Vec<&str> = (0..side).map(|_| row.as_str()).collect();
    let mut maze = Grid::parse(&rows).unwrap();
    let mut sink = RecordingSink::with_limit(History::DEFAULT_LIMIT);
    let paths = {
        let mut ctx = RunContext::detached(&mut sink);
        grid::enumerate_paths(&mut ctx, &mut maze).unwrap()
    };
    // corner to corner simple paths on a 4x4 lattice
    assert_eq!(paths, 184);
    assert_eq!(sink.dropped, 0);
}

#[test]
fn test_history_limit_is_enforced() {
    let mut history = History::new(1);
    let mut sink = RecordingSink::new();
    {
        let mut ctx = RunContext::detached(&mut sink);
        let mut seq = Sequence::from_values(&[1, 2, 3]);
        sorting::sort(&mut ctx, SortAlgorithm::Selection, &mut seq).unwrap();
    }
    let first = sink.checkpoints()[0].clone();
    let err = history.push(first).unwrap_err();
    assert!(matches!(err, EngineError::HistoryLimitExceeded { limit: 1, .. }));
    assert!(history.is_empty());
}
