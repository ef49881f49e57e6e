//! Main TUI application state and logic

use crate::catalog::{self, Algorithm};
use crate::config::RunConfig;
use crate::runtime::context::Counters;
use crate::runtime::errors::EngineError;
use crate::runtime::history::History;
use crate::runtime::sink::{ChannelSink, Signal, SinkEvent};
use crate::runtime::{RunHandle, RunId, Scheduler};
use crate::ui::panes::{self, RunInfoRenderData, StatusRenderData, StepsScrollState};
use crate::ui::theme::DEFAULT_THEME;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::Color,
    Frame, Terminal,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Where the current run stands
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Idle,
    Running,
    Finished(String),
    Infeasible(String),
    Cancelled,
    Failed(String),
}

impl RunState {
    pub fn label(&self) -> &str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Finished(_) => "finished",
            RunState::Infeasible(_) => "infeasible",
            RunState::Cancelled => "cancelled",
            RunState::Failed(_) => "failed",
        }
    }

    fn color(&self) -> Color {
        match self {
            RunState::Idle | RunState::Cancelled => DEFAULT_THEME.comment,
            RunState::Running => DEFAULT_THEME.secondary,
            RunState::Finished(_) => DEFAULT_THEME.success,
            RunState::Infeasible(_) => DEFAULT_THEME.cycle,
            RunState::Failed(_) => DEFAULT_THEME.error,
        }
    }
}

/// The main application state
pub struct App {
    /// Algorithm shown in the structure pane
    pub algorithm: Algorithm,

    pub config: RunConfig,

    scheduler: Scheduler,
    tx: Sender<SinkEvent>,
    rx: Receiver<SinkEvent>,
    handle: Option<RunHandle<String>>,

    /// Run whose events are accepted; everything else is stale
    pub active: Option<RunId>,

    /// Checkpoints of the active run
    pub history: History,

    /// Index into `history` of the checkpoint on screen
    pub position: usize,

    /// Whether `position` tracks the newest checkpoint
    pub following: bool,

    pub counters: Counters,
    pub state: RunState,

    /// Events dropped because they came from a superseded run
    pub stale_dropped: usize,
    last_stale_run: Option<RunId>,

    pub steps_scroll: StepsScrollState,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(algorithm: Algorithm, config: RunConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let history = History::new(config.history_limit);
        App {
            algorithm,
            config,
            scheduler: Scheduler::new(),
            tx,
            rx,
            handle: None,
            active: None,
            history,
            position: 0,
            following: true,
            counters: Counters::default(),
            state: RunState::Idle,
            stale_dropped: 0,
            last_stale_run: None,
            steps_scroll: StepsScrollState::default(),
            should_quit: false,
            status_message: String::from("Ready!"),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        if self.state == RunState::Idle {
            self.restart();
        }

        loop {
            self.drain_events();
            self.poll_run();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Use poll with timeout so checkpoints keep flowing in
            if event::poll(Duration::from_millis(30))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        // Tear down: nothing may keep running against a discarded structure
        self.scheduler.cancel_all();
        Ok(())
    }

    /// Discard the current run and start `self.algorithm` on fresh input
    pub fn restart(&mut self) {
        self.history = History::new(self.config.history_limit);
        self.position = 0;
        self.following = true;
        self.counters = Counters::default();
        self.steps_scroll = StepsScrollState::default();

        let job = match catalog::prepare(self.algorithm, &self.config) {
            Ok(job) => job,
            Err(e) => {
                self.scheduler.cancel_all();
                self.handle = None;
                self.active = None;
                self.status_message = format!("Cannot start: {}", e);
                self.state = RunState::Failed(e.to_string());
                return;
            }
        };

        let sink = Box::new(ChannelSink::new(self.tx.clone()));
        match self.scheduler.start(self.config.speed_ms, sink, job) {
            Ok(handle) => {
                info!(algorithm = %self.algorithm, run_id = %handle.run_id(), "started from TUI");
                self.active = Some(handle.run_id());
                self.handle = Some(handle);
                self.state = RunState::Running;
                self.status_message = format!("Running {}", self.algorithm);
            }
            Err(e) => {
                self.active = None;
                self.handle = None;
                self.status_message = format!("Cannot start: {}", e);
                self.state = RunState::Failed(e.to_string());
            }
        }
    }

    /// Apply every event waiting in the channel
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: SinkEvent) {
        let run_id = event.run_id();
        if Some(run_id) != self.active {
            self.stale_dropped += 1;
            if self.last_stale_run != Some(run_id) {
                warn!(%run_id, "dropping events from a superseded run");
                self.last_stale_run = Some(run_id);
            }
            return;
        }

        match event {
            SinkEvent::Checkpoint(checkpoint) => {
                if let Err(e) = self.history.push(checkpoint) {
                    warn!(error = %e, "history full, cancelling run");
                    if let Some(handle) = &self.handle {
                        handle.cancel();
                    }
                    self.status_message = e.to_string();
                    self.state = RunState::Failed(e.to_string());
                } else if self.following {
                    self.position = self.history.len().saturating_sub(1);
                }
            }
            SinkEvent::Signal(_, signal) => match signal {
                Signal::Comparisons(n) => self.counters.comparisons = n,
                Signal::Swaps(n) => self.counters.swaps = n,
                Signal::PathsFound(n) => self.counters.paths_found = n,
                Signal::Visited(n) => self.counters.visited = n,
                Signal::Note(text) => self.status_message = text,
            },
        }
    }

    /// Collect the result of a run whose worker has exited
    fn poll_run(&mut self) {
        if !self.handle.as_ref().is_some_and(|h| h.is_finished()) {
            return;
        }
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.drain_events();

        let outcome = handle.join();
        if matches!(self.state, RunState::Failed(_)) {
            return;
        }
        self.state = match outcome {
            Ok(summary) => RunState::Finished(summary),
            Err(EngineError::Cancelled) => RunState::Cancelled,
            Err(e) if e.is_infeasible() => RunState::Infeasible(e.to_string()),
            Err(e) => RunState::Failed(e.to_string()),
        };
        self.status_message = match &self.state {
            RunState::Finished(summary) => summary.clone(),
            RunState::Infeasible(reason) | RunState::Failed(reason) => reason.clone(),
            other => other.label().to_string(),
        };
        debug!(state = self.state.label(), "run collected");
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(main_chunks[0]);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(16), Constraint::Min(0)])
            .split(columns[1]);

        let current = self.history.get(self.position);
        let title = match current {
            Some(cp) => format!("{} · {}", self.algorithm, cp.label),
            None => self.algorithm.to_string(),
        };
        panes::render_structure_pane(frame, columns[0], &title, current.map(|cp| &cp.snapshot), true);

        panes::render_run_info_pane(
            frame,
            right_rows[0],
            RunInfoRenderData {
                algorithm: self.algorithm.title(),
                run: self.active.map_or_else(|| "-".to_string(), |id| id.to_string()),
                state: self.state.label(),
                state_color: self.state.color(),
                speed_ms: self.config.speed_ms,
                size: self.config.size_for(self.algorithm),
                seed: self.config.seed,
                counters: self.counters,
                history_bytes: self.history.memory_usage(),
                stale_dropped: self.stale_dropped,
            },
        );

        panes::render_steps_pane(
            frame,
            right_rows[1],
            self.history.checkpoints(),
            self.position,
            false,
            &mut self.steps_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                position: self.position,
                total: self.history.len(),
                following: self.following,
                running: self.state == RunState::Running,
                failed: matches!(self.state, RunState::Failed(_)),
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.following = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let last = self.history.len().saturating_sub(1);
                let target = (self.position + n).min(last);
                let stepped = target - self.position.min(target);
                self.position = target;
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Left => {
                self.following = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.following = false;
                self.step_forward();
            }
            KeyCode::Char(' ') => {
                // Toggle following (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.following = !self.following;
                    if self.following {
                        self.position = self.history.len().saturating_sub(1);
                        self.status_message = "Following".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.following = true;
                self.position = self.history.len().saturating_sub(1);
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.following = false;
                self.position = 0;
                self.status_message = "Jumped to start".to_string();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.restart(),
            KeyCode::Char('c') => {
                if let Some(handle) = &self.handle {
                    handle.cancel();
                    self.status_message = "Cancelling...".to_string();
                }
            }
            KeyCode::Tab => {
                self.algorithm = self.algorithm.next();
                self.restart();
            }
            KeyCode::BackTab => {
                self.algorithm = self.algorithm.prev();
                self.restart();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.config.faster();
                self.status_message = format!("Speed {} ms (applies on restart)", self.config.speed_ms);
            }
            KeyCode::Char('-') => {
                self.config.slower();
                self.status_message = format!("Speed {} ms (applies on restart)", self.config.speed_ms);
            }
            _ => {}
        }
    }

    fn step_forward(&mut self) {
        if self.position + 1 < self.history.len() {
            self.position += 1;
            self.status_message = "Stepped forward".to_string();
        } else {
            self.status_message = "Cannot step forward: at the newest step".to_string();
        }
    }

    fn step_backward(&mut self) {
        if self.position > 0 {
            self.position -= 1;
            self.status_message = "Stepped backward".to_string();
        } else {
            self.status_message = "Cannot step backward: at the first step".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sequence::Sequence;
    use crate::runtime::sink::Checkpoint;

    fn checkpoint(run_id: RunId, step: usize) -> SinkEvent {
        SinkEvent::Checkpoint(Checkpoint {
            run_id,
            step,
            label: format!("step {}", step),
            snapshot: Sequence::from_values(&[1, 2]).into(),
        })
    }

    #[test]
    fn events_from_other_runs_are_dropped() {
        let mut app = App::new(Algorithm::BubbleSort, RunConfig::default());
        let active = RunId::next();
        app.active = Some(active);
        app.apply(checkpoint(active, 1));
        app.apply(checkpoint(RunId::next(), 1));
        app.apply(SinkEvent::Signal(RunId::next(), Signal::Swaps(9)));
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.stale_dropped, 2);
        assert_eq!(app.counters.swaps, 0);
    }

    #[test]
    fn stepping_pauses_following() {
        let mut app = App::new(Algorithm::BubbleSort, RunConfig::default());
        let active = RunId::next();
        app.active = Some(active);
        for step in 1..=3 {
            app.apply(checkpoint(active, step));
        }
        assert_eq!(app.position, 2);
        app.handle_key_event(KeyEvent::from(KeyCode::Left));
        assert_eq!(app.position, 1);
        assert!(!app.following);
        app.apply(checkpoint(active, 4));
        assert_eq!(app.position, 1);
        app.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.position, 3);
    }
}
