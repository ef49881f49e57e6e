//! Tree pane: nodes at their layout coordinates, joined to their parents

use crate::model::tree::Tree;
use crate::model::{CANVAS_WIDTH, LEVEL_HEIGHT};
use crate::ui::theme::{mark_style, DEFAULT_THEME};
use ratatui::{
    layout::Rect,
    symbols::Marker,
    text::Span,
    widgets::canvas::{Canvas, Line as CanvasLine},
    widgets::Block,
    Frame,
};

pub fn render_tree_pane(frame: &mut Frame, area: Rect, tree: &Tree, block: Block) {
    // Canvas y grows upward; layout y grows downward
    let height = tree.height().max(1) as f64 * LEVEL_HEIGHT;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, CANVAS_WIDTH])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for node in tree.nodes() {
                if let Some(parent) = node.parent.and_then(|p| tree.node(p)) {
                    ctx.draw(&CanvasLine::new(
                        parent.cx,
                        height - parent.cy,
                        node.cx,
                        height - node.cy,
                        DEFAULT_THEME.comment,
                    ));
                }
            }
            ctx.layer();
            for node in tree.nodes() {
                let text = node.value.map_or_else(|| "·".to_string(), |v| v.to_string());
                ctx.print(node.cx, height - node.cy, Span::styled(text, mark_style(node.marks)));
            }
        });
    frame.render_widget(canvas, area);
}
