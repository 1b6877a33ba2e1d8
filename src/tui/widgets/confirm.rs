//! Centered yes/no confirmation popup.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Returns a `width` x `height` rect centered in `area`, clamped to it.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// Renders a confirmation popup over whatever is already drawn in `area`.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_confirm(title: &str, message: &str, frame: &mut Frame, area: Rect) {
    let popup = centered(area, 44, 5);
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let lines = vec![
        Line::from(message),
        Line::from(""),
        Line::from("y/Enter: confirm  n/Esc: back").style(Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        popup,
    );
}
