//! Status bar widget: transient notification and submission phase.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::submit::SubmitStatus;

/// Whether a notification reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient message shown until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Data passed to the status bar widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusBarContext {
    pub notification: Option<Notification>,
    /// Phase of the submission on the active form.
    pub status: SubmitStatus,
}

/// Renders a one-line status bar.
///
/// An in-flight submission phase takes precedence over the notification.
/// Renders nothing when there is neither.
#[mutants::skip]
pub fn draw_status_bar(ctx: &StatusBarContext, frame: &mut Frame, area: Rect) {
    let line = if ctx.status.is_busy() {
        Line::from(Span::styled(
            ctx.status.label(),
            Style::default().fg(Color::Cyan),
        ))
    } else if let Some(note) = &ctx.notification {
        let style = match note.kind {
            NotificationKind::Success => Style::default().fg(Color::Green),
            NotificationKind::Error => Style::default().fg(Color::Red),
        };
        Line::from(Span::styled(note.message.as_str(), style))
    } else {
        return;
    };

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
        let mut s = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            s.push('\n');
        }
        s
    }

    fn render_status_bar(ctx: &StatusBarContext, width: u16) -> String {
        let backend = TestBackend::new(width, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                draw_status_bar(ctx, frame, frame.area());
            })
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn renders_success_notification() {
        let ctx = StatusBarContext {
            notification: Some(Notification::success("Study opened")),
            status: SubmitStatus::Succeeded,
        };
        let output = render_status_bar(&ctx, 40);
        assert!(output.contains("Study opened"));
    }

    #[test]
    fn renders_error_notification() {
        let ctx = StatusBarContext {
            notification: Some(Notification::error("backend returned HTTP 500")),
            status: SubmitStatus::Failed,
        };
        let output = render_status_bar(&ctx, 40);
        assert!(output.contains("HTTP 500"));
    }

    #[test]
    fn busy_phase_wins_over_notification() {
        let ctx = StatusBarContext {
            notification: Some(Notification::success("old")),
            status: SubmitStatus::Uploading,
        };
        let output = render_status_bar(&ctx, 40);
        assert!(output.contains("Uploading image"));
        assert!(!output.contains("old"));
    }

    #[test]
    fn renders_blank_when_idle() {
        let output = render_status_bar(&StatusBarContext::default(), 20);
        assert_eq!(output.trim(), "");
    }
}
