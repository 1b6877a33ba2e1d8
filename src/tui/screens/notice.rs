//! Full-screen notices: study not found, and sign-in required.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::config::ENV_ACCESS_TOKEN;
use crate::tui::action::Action;
use crate::tui::app::Screen;

/// Handles a key on a notice screen. Any dismiss key returns to the listing.
pub fn handle_notice_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => Action::Navigate(Screen::Listing),
        _ => Action::None,
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn draw_notice(title: &str, lines: Vec<Line>, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let mut lines = lines;
    lines.push(Line::from(""));
    lines.push(Line::from("Press Enter or Esc to go back.").style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

/// Renders the not-found view for study `id`.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_not_found(id: &str, frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(format!("Study #{id} does not exist.")),
    ];
    draw_notice("Not Found", lines, frame, area);
}

/// Renders the sign-in required view.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_login(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from("You need to sign in to use this page."),
        Line::from(format!(
            "Set [session] access_token in the config file or {ENV_ACCESS_TOKEN}."
        )),
    ];
    draw_notice("Sign In", lines, frame, area);
}
