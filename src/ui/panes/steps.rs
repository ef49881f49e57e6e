//! Checkpoint list pane: one line per checkpoint of the current run

use crate::runtime::sink::Checkpoint;
use crate::ui::panes::pane_block;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Scroll state for the steps pane
#[derive(Debug, Default)]
pub struct StepsScrollState {
    pub offset: usize,
}

/// Render the steps pane, keeping `position` in view
pub fn render_steps_pane(
    frame: &mut Frame,
    area: Rect,
    checkpoints: &[Checkpoint],
    position: usize,
    is_focused: bool,
    scroll: &mut StepsScrollState,
) {
    let block = pane_block("Steps", is_focused);

    if checkpoints.is_empty() {
        let paragraph = Paragraph::new("(no steps yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let total_items = checkpoints.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Follow the current position unless it is already visible
    if position < scroll.offset {
        scroll.offset = position;
    } else if position >= scroll.offset + visible_height {
        scroll.offset = position + 1 - visible_height;
    }
    scroll.offset = scroll.offset.min(total_items.saturating_sub(visible_height));

    let items: Vec<ListItem> = checkpoints
        .iter()
        .enumerate()
        .skip(scroll.offset)
        .take(visible_height)
        .map(|(i, cp)| {
            let number = Span::styled(format!("{:>5} ", cp.step), Style::default().fg(DEFAULT_THEME.comment));
            let label = if i == position {
                Span::styled(
                    cp.label.clone(),
                    Style::default()
                        .fg(DEFAULT_THEME.highlight)
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(cp.label.clone(), Style::default().fg(DEFAULT_THEME.fg))
            };
            ListItem::new(Line::from(vec![number, label]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
