//! Board panes for N-Queens and Sudoku

use crate::model::board::{QueensBoard, SudokuBoard, EMPTY_CELL};
use crate::ui::theme::{mark_color, mark_style, DEFAULT_THEME};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

pub fn render_queens_pane(frame: &mut Frame, area: Rect, board: &QueensBoard, block: Block) {
    let n = board.size();
    let lines: Vec<Line> = (0..n)
        .map(|row| {
            let spans: Vec<Span> = (0..n)
                .map(|col| {
                    let marks = board.marks(row, col);
                    let shade = if (row + col) % 2 == 0 {
                        DEFAULT_THEME.current_line_bg
                    } else {
                        DEFAULT_THEME.border_normal
                    };
                    let mut style = Style::default().bg(shade);
                    if !marks.is_empty() {
                        style = style.bg(mark_color(marks));
                    }
                    let text = if board.has_queen(row, col) { " ♛ " } else { "   " };
                    Span::styled(text, style.fg(DEFAULT_THEME.fg).add_modifier(Modifier::BOLD))
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_sudoku_pane(frame: &mut Frame, area: Rect, board: &SudokuBoard, block: Block) {
    let rule = Style::default().fg(DEFAULT_THEME.border_normal);
    let mut lines = Vec::with_capacity(11);
    for row in 0..SudokuBoard::SIDE {
        if row > 0 && row % 3 == 0 {
            lines.push(Line::from(Span::styled("──────┼───────┼──────", rule)));
        }
        let mut spans = Vec::with_capacity(11);
        for col in 0..SudokuBoard::SIDE {
            if col > 0 && col % 3 == 0 {
                spans.push(Span::styled("│ ", rule));
            }
            let Some(cell) = board.cell(row, col) else {
                continue;
            };
            let text = match cell.value {
                Some(d) => format!("{} ", d),
                None => format!("{} ", EMPTY_CELL),
            };
            let style = if cell.given {
                Style::default().fg(DEFAULT_THEME.fg).add_modifier(Modifier::BOLD)
            } else if cell.value.is_none() && cell.marks.is_empty() {
                Style::default().fg(DEFAULT_THEME.comment)
            } else {
                mark_style(cell.marks)
            };
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
