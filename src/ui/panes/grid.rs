//! Grid pane: two columns per cell, blocked cells dimmed

use crate::model::grid::Grid;
use crate::model::Marks;
use crate::ui::theme::{mark_color, DEFAULT_THEME};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

pub fn render_grid_pane(frame: &mut Frame, area: Rect, grid: &Grid, block: Block) {
    let lines: Vec<Line> = (0..grid.rows())
        .map(|r| {
            let spans: Vec<Span> = (0..grid.cols())
                .filter_map(|c| grid.cell(r, c))
                .map(|cell| {
                    if !cell.is_open() {
                        Span::styled("░░", Style::default().fg(DEFAULT_THEME.border_normal))
                    } else if cell.marks.is_empty() {
                        Span::styled("██", Style::default().fg(DEFAULT_THEME.current_line_bg))
                    } else if cell.marks.contains(Marks::CURRENT) {
                        Span::styled("◆◆", Style::default().fg(mark_color(cell.marks)))
                    } else {
                        Span::styled("██", Style::default().fg(mark_color(cell.marks)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
