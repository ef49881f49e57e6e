//! Run information pane: algorithm, run state, settings and counters

use crate::runtime::context::Counters;
use crate::ui::panes::pane_block;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Data needed to render the run information pane
pub struct RunInfoRenderData<'a> {
    pub algorithm: &'a str,
    pub run: String,
    pub state: &'a str,
    pub state_color: Color,
    pub speed_ms: u64,
    pub size: usize,
    pub seed: Option<u64>,
    pub counters: Counters,
    pub history_bytes: usize,
    pub stale_dropped: usize,
}

pub fn render_run_info_pane(frame: &mut Frame, area: Rect, data: RunInfoRenderData) {
    let key = Style::default().fg(DEFAULT_THEME.comment);
    let value = Style::default().fg(DEFAULT_THEME.fg);
    let row = |k: &str, v: String| Line::from(vec![Span::styled(format!("{:<12}", k), key), Span::styled(v, value)]);

    let lines = vec![
        Line::from(Span::styled(
            data.algorithm.to_string(),
            Style::default().fg(DEFAULT_THEME.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(format!("{:<12}", "state"), key),
            Span::styled(data.state.to_string(), Style::default().fg(data.state_color)),
        ]),
        row("run", data.run),
        row("speed", format!("{} ms", data.speed_ms)),
        row("size", data.size.to_string()),
        row("seed", data.seed.map_or_else(|| "random".to_string(), |s| s.to_string())),
        Line::default(),
        row("comparisons", data.counters.comparisons.to_string()),
        row("swaps", data.counters.swaps.to_string()),
        row("visited", data.counters.visited.to_string()),
        row("paths", data.counters.paths_found.to_string()),
        Line::default(),
        row("history", format!("{} KiB", data.history_bytes / 1024)),
        row("stale", data.stale_dropped.to_string()),
    ];

    frame.render_widget(Paragraph::new(lines).block(pane_block("Run", false)), area);
}
