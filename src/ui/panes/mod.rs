//! TUI pane rendering modules
//!
//! Every pane is a stateless render function over data borrowed from the app.
//!
//! # Pane Modules
//!
//! - [`sequence`]: Bar chart of a sequence being sorted
//! - [`tree`]: Binary tree drawn on a canvas
//! - [`list`]: Linked lists as chains of boxed values, cycles included
//! - [`graph`]: Weighted graph on a canvas, plus the all-pairs distance table
//! - [`grid`]: Maze / island grid
//! - [`board`]: N-Queens and Sudoku boards
//! - [`steps`]: Checkpoint labels of the current run
//! - [`run_info`]: Counters and run state
//! - [`status`]: Status bar with keybindings and replay position

pub mod board;
pub mod graph;
pub mod grid;
pub mod list;
pub mod run_info;
pub mod sequence;
pub mod status;
pub mod steps;
pub mod tree;

pub use run_info::{render_run_info_pane, RunInfoRenderData};
pub use status::{render_status_bar, StatusRenderData};
pub use steps::{render_steps_pane, StepsScrollState};

use crate::model::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Bordered block shared by every pane
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'static> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Render whichever structure `snapshot` holds
pub fn render_structure_pane(frame: &mut Frame, area: Rect, title: &str, snapshot: Option<&Snapshot>, is_focused: bool) {
    let block = pane_block(title, is_focused);
    match snapshot {
        None => {
            let paragraph = Paragraph::new("(waiting for the first checkpoint)")
                .block(block)
                .style(Style::default().fg(DEFAULT_THEME.comment));
            frame.render_widget(paragraph, area);
        }
        Some(Snapshot::Sequence(seq)) => sequence::render_sequence_pane(frame, area, seq, block),
        Some(Snapshot::Tree(tree)) => tree::render_tree_pane(frame, area, tree, block),
        Some(Snapshot::Lists(lists)) => list::render_list_pane(frame, area, lists, block),
        Some(Snapshot::Graph { graph, matrix }) => graph::render_graph_pane(frame, area, graph, matrix.as_ref(), block),
        Some(Snapshot::Grid(grid)) => grid::render_grid_pane(frame, area, grid, block),
        Some(Snapshot::Queens(board)) => board::render_queens_pane(frame, area, board, block),
        Some(Snapshot::Sudoku(board)) => board::render_sudoku_pane(frame, area, board, block),
    }
}
