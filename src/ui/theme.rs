use crate::model::Marks;
use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub highlight: Color, // Yellow
    pub path: Color,      // Cyan for shortest/valid paths
    pub cycle: Color,     // Pink for cycles and backtracking
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for status bar
    highlight: Color::Rgb(249, 226, 175),
    path: Color::Rgb(148, 226, 213),
    cycle: Color::Rgb(245, 194, 231),
};

/// Foreground colour for a set of marks; the most specific mark wins
pub fn mark_color(marks: Marks) -> Color {
    let t = &DEFAULT_THEME;
    if marks.intersects(Marks::SWAPPED | Marks::INSERTED) {
        t.secondary
    } else if marks.intersects(Marks::CURRENT | Marks::SLOW | Marks::FAST) {
        t.highlight
    } else if marks.intersects(Marks::PIVOT | Marks::TARGET) {
        t.secondary
    } else if marks.intersects(Marks::FOUND | Marks::SORTED) {
        t.success
    } else if marks.intersects(Marks::SHORTEST_PATH | Marks::VALID_PATH) {
        t.path
    } else if marks.intersects(Marks::CYCLE | Marks::BACKTRACK) {
        t.cycle
    } else if marks.contains(Marks::INVALID) {
        t.error
    } else if marks.contains(Marks::CANDIDATE) {
        t.primary
    } else if marks.contains(Marks::VISITED) {
        t.comment
    } else {
        t.fg
    }
}

pub fn mark_style(marks: Marks) -> Style {
    let style = Style::default().fg(mark_color(marks));
    if marks.intersects(Marks::CURRENT | Marks::FOUND | Marks::PIVOT) {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}
