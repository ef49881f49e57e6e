//! Graph pane: nodes on a circle with their running distance, edges coloured
//! by marks. While the all-pairs engine runs, its distance table is shown
//! beside the graph.

use crate::model::graph::{DistanceMatrix, Graph, UNREACHED};
use crate::model::{Marks, CANVAS_WIDTH};
use crate::ui::theme::{mark_color, mark_style, DEFAULT_THEME};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::canvas::{Canvas, Line as CanvasLine},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

fn distance_text(d: f64) -> String {
    if d == UNREACHED {
        "∞".to_string()
    } else {
        format!("{}", d)
    }
}

pub fn render_graph_pane(frame: &mut Frame, area: Rect, graph: &Graph, matrix: Option<&DistanceMatrix>, block: Block) {
    let (canvas_area, table_area) = match matrix {
        Some(_) => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        }
        None => (area, None),
    };

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, CANVAS_WIDTH])
        .y_bounds([0.0, CANVAS_WIDTH])
        .paint(|ctx| {
            for edge in graph.edges() {
                let (Some(a), Some(b)) = (graph.node(edge.source), graph.node(edge.target)) else {
                    continue;
                };
                let color = if edge.marks.is_empty() {
                    DEFAULT_THEME.comment
                } else {
                    mark_color(edge.marks)
                };
                ctx.draw(&CanvasLine::new(a.x, CANVAS_WIDTH - a.y, b.x, CANVAS_WIDTH - b.y, color));
            }
            ctx.layer();
            for edge in graph.edges() {
                let (Some(a), Some(b)) = (graph.node(edge.source), graph.node(edge.target)) else {
                    continue;
                };
                // Weight near the target end so directed edges read source → target
                let (mx, my) = (a.x + (b.x - a.x) * 0.6, a.y + (b.y - a.y) * 0.6);
                let text = if graph.is_directed() {
                    format!("›{}", edge.weight)
                } else {
                    format!("{}", edge.weight)
                };
                ctx.print(mx, CANVAS_WIDTH - my, Span::styled(text, Style::default().fg(DEFAULT_THEME.comment)));
            }
            for node in graph.nodes() {
                let text = format!("{}:{}", node.label, distance_text(node.distance));
                let style = if node.marks.is_empty() {
                    Style::default().fg(DEFAULT_THEME.fg).add_modifier(Modifier::BOLD)
                } else {
                    mark_style(node.marks)
                };
                ctx.print(node.x, CANVAS_WIDTH - node.y, Span::styled(text, style));
            }
        });
    frame.render_widget(canvas, canvas_area);

    if let (Some(matrix), Some(area)) = (matrix, table_area) {
        render_matrix(frame, area, graph, matrix);
    }
}

fn render_matrix(frame: &mut Frame, area: Rect, graph: &Graph, matrix: &DistanceMatrix) {
    let header_style = Style::default().fg(DEFAULT_THEME.primary).add_modifier(Modifier::BOLD);
    let label = |i: usize| graph.node_at(i).map_or_else(String::new, |n| n.label.clone());
    let active = |i: usize| {
        graph
            .node_at(i)
            .is_some_and(|n| n.marks.intersects(Marks::CURRENT | Marks::PIVOT))
    };

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain((0..matrix.len()).map(|j| Cell::from(label(j))))
            .collect::<Vec<_>>(),
    )
    .style(header_style);

    let rows: Vec<Row> = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cells = std::iter::once(Cell::from(label(i)).style(header_style)).chain(row.iter().enumerate().map(|(j, &d)| {
                let style = if active(i) && active(j) {
                    Style::default().fg(DEFAULT_THEME.highlight).add_modifier(Modifier::BOLD)
                } else if d == UNREACHED {
                    Style::default().fg(DEFAULT_THEME.comment)
                } else {
                    Style::default().fg(DEFAULT_THEME.fg)
                };
                Cell::from(distance_text(d)).style(style)
            }));
            Row::new(cells.collect::<Vec<_>>())
        })
        .collect();

    let widths = vec![Constraint::Length(4); matrix.len() + 1];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Distances ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(DEFAULT_THEME.border_normal)),
    );
    frame.render_widget(table, area);
}
