//! Detail screen: read-only view of a saved study.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::model::Study;
use crate::tui::action::Action;
use crate::tui::app::Screen;

/// State for the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailState {
    id: String,
    study: Study,
}

impl DetailState {
    pub fn new(id: impl Into<String>, study: Study) -> Self {
        Self {
            id: id.into(),
            study,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn study(&self) -> &Study {
        &self.study
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('e') => Action::OpenEdit(self.id.clone()),
            KeyCode::Char('q') | KeyCode::Esc => Action::Navigate(Screen::Listing),
            _ => Action::None,
        }
    }
}

/// Renders the detail screen.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_detail(state: &DetailState, frame: &mut Frame, area: Rect) {
    let study = state.study();
    let block = Block::default()
        .title(format!(" Study #{} ", state.id()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [body_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let label = Style::default().fg(Color::Yellow);
    let row = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{name:<12}"), label), Span::raw(value)])
    };
    let recruiting = if study.is_recruiting {
        "recruiting"
    } else {
        "closed"
    };

    let lines = vec![
        Line::from(Span::styled(
            study.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        row("When", format!("{} {}-{}", study.day, study.start_time, study.end_time)),
        row("Campus", study.campus.to_string()),
        row("Level", study.level.to_string()),
        row("Tags", study.tags.join(", ")),
        row("Image", study.image_src.clone()),
        row(
            "Term",
            format!("{}-{} ({recruiting})", study.year, study.semester),
        ),
        Line::from(""),
        Line::from(study.description.clone()),
    ];
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        body_area,
    );

    let footer = Paragraph::new("e: edit  q/Esc: back  F1: help")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::model::{Campus, Day, Level};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn state() -> DetailState {
        DetailState::new(
            "42",
            Study {
                image_src: "https://cdn.example/x/".into(),
                title: "Compilers".into(),
                day: Day::Tue,
                start_time: "10:00".into(),
                end_time: "12:00".into(),
                campus: Campus::Myeongnyun,
                level: Level::Advanced,
                tags: vec!["llvm".into(), "parsing".into()],
                description: "Dragon book chapters".into(),
                is_recruiting: true,
                semester: 1,
                year: 2026,
            },
        )
    }

    #[test]
    fn e_reopens_edit() {
        assert_eq!(
            state().handle_key(press(KeyCode::Char('e'))),
            Action::OpenEdit("42".into())
        );
    }

    #[test]
    fn q_and_esc_go_to_listing() {
        let mut state = state();
        assert_eq!(
            state.handle_key(press(KeyCode::Char('q'))),
            Action::Navigate(Screen::Listing)
        );
        assert_eq!(
            state.handle_key(press(KeyCode::Esc)),
            Action::Navigate(Screen::Listing)
        );
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(state().handle_key(press(KeyCode::Char('x'))), Action::None);
    }

    #[test]
    fn renders_record() {
        let backend = TestBackend::new(70, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| draw_detail(&state(), frame, frame.area()))
            .unwrap();
        let buf = terminal.backend().buffer();
        let mut output = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                output.push_str(buf[(x, y)].symbol());
            }
            output.push('\n');
        }
        assert!(output.contains("Study #42"));
        assert!(output.contains("Compilers"));
        assert!(output.contains("llvm, parsing"));
        assert!(output.contains("2026-1 (recruiting)"));
    }
}
