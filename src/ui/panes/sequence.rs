//! Sequence pane: one bar per item, coloured by its marks

use crate::model::sequence::Sequence;
use crate::ui::theme::mark_color;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Bar, BarChart, BarGroup, Block},
    Frame,
};

pub fn render_sequence_pane(frame: &mut Frame, area: Rect, seq: &Sequence, block: Block) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let n = seq.len().max(1);
    let gap = usize::from(inner_width >= n * 3);
    let bar_width = (inner_width.saturating_sub(gap * (n - 1)) / n).clamp(1, 8);

    let bars: Vec<Bar> = seq
        .items
        .iter()
        .map(|item| {
            let color = mark_color(item.marks);
            Bar::default()
                .value(u64::try_from(item.data).unwrap_or(0))
                .text_value(item.data.to_string())
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width as u16)
        .bar_gap(gap as u16);
    frame.render_widget(chart, area);
}
