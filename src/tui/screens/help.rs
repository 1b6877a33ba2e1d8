//! Help screen: scrollable keybinding reference for the screen that opened it.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::action::Action;
use crate::tui::app::Screen;

static LISTING_KEYS: &[(&str, &str)] = &[
    ("n", "open a new study"),
    ("e", "edit a study by ID (type ID, Enter)"),
    ("q / Esc", "quit"),
    ("F1", "help"),
];

static FORM_KEYS: &[(&str, &str)] = &[
    ("Tab / Shift-Tab", "next / prev field"),
    ("Enter on image", "stage the typed file path"),
    ("Enter on tag", "add the typed tag"),
    ("Ctrl+R", "clear all tags"),
    ("↑/↓ on time", "step 30 minutes"),
    ("←/→ on choice", "cycle day / campus / level"),
    ("Enter / Ctrl+S", "validate and confirm"),
    ("y / n", "submit / back, in the dialog"),
    ("Esc", "back to listing"),
    ("F1", "help"),
];

static DETAIL_KEYS: &[(&str, &str)] = &[
    ("e", "edit this study"),
    ("q / Esc", "back to listing"),
    ("F1", "help"),
];

static NOTICE_KEYS: &[(&str, &str)] = &[("Enter / q / Esc", "back to listing"), ("F1", "help")];

static HELP_KEYS: &[(&str, &str)] = &[("↑/↓", "scroll"), ("q / Esc", "back")];

/// State for the help screen.
#[derive(Debug, Clone)]
pub struct HelpState {
    scroll: u16,
    origin: Screen,
}

impl Default for HelpState {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpState {
    /// Creates a new [`HelpState`] with scroll position at the top and origin [`Screen::Listing`].
    pub fn new() -> Self {
        Self {
            scroll: 0,
            origin: Screen::Listing,
        }
    }

    /// Returns the current scroll offset.
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Returns the origin screen that opened help.
    pub fn origin(&self) -> Screen {
        self.origin
    }

    /// Sets the origin screen to return to when help is dismissed.
    pub fn set_origin(&mut self, screen: Screen) {
        self.origin = screen;
    }

    /// Resets the scroll position to the top.
    pub fn reset(&mut self) {
        self.scroll = 0;
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                Action::None
            }
            KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                Action::None
            }
            KeyCode::Char('q') | KeyCode::Esc => Action::Navigate(self.origin),
            _ => Action::None,
        }
    }
}

fn screen_name(screen: Screen) -> &'static str {
    match screen {
        Screen::Listing => "Studies",
        Screen::Create => "Open Study",
        Screen::Edit => "Edit Study",
        Screen::Detail => "Study Detail",
        Screen::NotFound => "Not Found",
        Screen::Login => "Sign In",
        Screen::Help => "Help",
    }
}

fn build_section(title: &'static str, keys: &[(&'static str, &'static str)]) -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Yellow);
    let dim_style = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(title, header_style)),
    ];
    for (key, desc) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<20}"), key_style),
            Span::styled(*desc, dim_style),
        ]));
    }
    lines
}

fn help_content(origin: Screen) -> Vec<Line<'static>> {
    let keys = match origin {
        Screen::Listing => LISTING_KEYS,
        Screen::Create | Screen::Edit => FORM_KEYS,
        Screen::Detail => DETAIL_KEYS,
        Screen::NotFound | Screen::Login => NOTICE_KEYS,
        Screen::Help => HELP_KEYS,
    };
    build_section(screen_name(origin), keys)
}

/// Renders the help screen.
#[mutants::skip]
pub fn draw_help(state: &HelpState, frame: &mut Frame, area: Rect) {
    let title = format!(" Help – {} ", screen_name(state.origin()));
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [content_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let content_lines = help_content(state.origin());
    let total = content_lines.len() as u16;
    let height = content_area.height;
    let capped_scroll = state.scroll().min(total.saturating_sub(height));

    let paragraph = Paragraph::new(content_lines).scroll((capped_scroll, 0));
    frame.render_widget(paragraph, content_area);

    let footer = Paragraph::new("↑/↓: scroll  q/Esc: back")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
