//! List pane: each list as a chain of boxed values in link order

use crate::model::list::LinkedList;
use crate::ui::theme::{mark_style, DEFAULT_THEME};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};

const ROW_NAMES: [&str; 3] = ["first", "second", "merged"];

pub fn render_list_pane(frame: &mut Frame, area: Rect, lists: &[LinkedList], block: Block) {
    let arrow = Style::default().fg(DEFAULT_THEME.comment);
    let mut lines = Vec::new();

    for (i, list) in lists.iter().enumerate() {
        if lists.len() > 1 {
            let name = ROW_NAMES.get(i).copied().unwrap_or("list");
            lines.push(Line::from(Span::styled(name, Style::default().fg(DEFAULT_THEME.primary))));
        }

        let walked = list.walk();
        if walked.is_empty() {
            lines.push(Line::from(Span::styled("(empty)", arrow)));
            lines.push(Line::default());
            continue;
        }

        let mut spans = vec![Span::styled("head → ", arrow)];
        for (n, &id) in walked.iter().enumerate() {
            if n > 0 {
                spans.push(Span::styled(" → ", arrow));
            }
            let Some(node) = list.node(id) else {
                continue;
            };
            let text = node.value.map_or_else(|| "[ ]".to_string(), |v| format!("[{}]", v));
            spans.push(Span::styled(text, mark_style(node.marks)));
        }

        // A tail that still has a successor closes a cycle
        match walked.last().and_then(|&tail| list.next_of(tail)) {
            Some(back) => {
                let target = list.value(back).map_or_else(|| "?".to_string(), |v| v.to_string());
                spans.push(Span::styled(format!(" ↩ {}", target), Style::default().fg(DEFAULT_THEME.cycle)));
            }
            None => spans.push(Span::styled(" → null", arrow)),
        }
        lines.push(Line::from(spans));
        lines.push(Line::default());
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
