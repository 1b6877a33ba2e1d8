//! Reusable form widget with text and choice fields.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// How a [`FormField`] takes input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text typed character by character.
    Text,
    /// One of a fixed list of options, cycled with Left/Right.
    Choice {
        options: Vec<String>,
        selected: Option<usize>,
    },
}

/// A single field within a [`Form`].
#[derive(Debug, Clone)]
pub struct FormField {
    /// Display label shown in the field border.
    pub label: String,
    /// Current text value. For choice fields, the selected option.
    pub value: String,
    /// Validation error message, if any.
    pub error: Option<String>,
    /// Whether the field must be filled in on submit.
    pub required: bool,
    pub kind: FieldKind,
}

impl FormField {
    /// Creates a new text field.
    pub fn new(label: impl Into<String>, required: bool) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            error: None,
            required,
            kind: FieldKind::Text,
        }
    }

    /// Creates a choice field with nothing selected.
    pub fn choice<I, S>(label: impl Into<String>, required: bool, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: FieldKind::Choice {
                options: options.into_iter().map(Into::into).collect(),
                selected: None,
            },
            ..Self::new(label, required)
        }
    }

    /// Returns `true` for choice fields.
    pub fn is_choice(&self) -> bool {
        matches!(self.kind, FieldKind::Choice { .. })
    }

    /// Returns the selected option index of a choice field.
    pub fn selected(&self) -> Option<usize> {
        match self.kind {
            FieldKind::Choice { selected, .. } => selected,
            FieldKind::Text => None,
        }
    }

    fn select(&mut self, index: Option<usize>) {
        if let FieldKind::Choice { options, selected } = &mut self.kind {
            let index = index.filter(|&i| i < options.len());
            *selected = index;
            self.value = index.map(|i| options[i].clone()).unwrap_or_default();
        }
    }

    fn cycle(&mut self, forward: bool) {
        let next = match &self.kind {
            FieldKind::Choice { options, .. } if options.is_empty() => return,
            FieldKind::Choice { options, selected } => {
                let len = options.len();
                match (*selected, forward) {
                    (None, true) => 0,
                    (None, false) => len - 1,
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                }
            }
            FieldKind::Text => return,
        };
        self.select(Some(next));
    }
}

/// A multi-field form with focus management.
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<FormField>,
    focus: usize,
}

impl Form {
    /// Creates a new form with the given fields. Focus starts on the first field.
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focus: 0 }
    }

    /// Returns the index of the currently focused field.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Moves focus to the field at `index`. Out-of-range indexes are ignored.
    pub fn set_focus(&mut self, index: usize) {
        if index < self.fields.len() {
            self.focus = index;
        }
    }

    /// Moves focus to the next field, wrapping around.
    pub fn focus_next(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focus = (self.focus + 1) % self.fields.len();
    }

    /// Moves focus to the previous field, wrapping around.
    pub fn focus_prev(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Inserts a character at the end of the focused text field.
    pub fn insert_char(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.focus)
            && !field.is_choice()
        {
            field.value.push(ch);
        }
    }

    /// Deletes the last character from the focused text field.
    pub fn delete_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus)
            && !field.is_choice()
        {
            field.value.pop();
        }
    }

    /// Cycles the focused choice field forward or backward.
    pub fn cycle_choice(&mut self, forward: bool) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.cycle(forward);
        }
    }

    /// Selects option `selected` of the choice field at `index`.
    pub fn select(&mut self, index: usize, selected: Option<usize>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.select(selected);
        }
    }

    /// Returns the selected option of the choice field at `index`.
    pub fn selected(&self, index: usize) -> Option<usize> {
        self.fields.get(index).and_then(FormField::selected)
    }

    /// Replaces the value of the text field at `index`.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index)
            && !field.is_choice()
        {
            field.value = value.into();
        }
    }

    /// Empties the text field at `index`.
    pub fn clear_value(&mut self, index: usize) {
        self.set_value(index, String::new());
    }

    /// Sets an error message on a field by index.
    pub fn set_error(&mut self, index: usize, error: String) {
        if let Some(field) = self.fields.get_mut(index) {
            field.error = Some(error);
        }
    }

    /// Clears the error of the field at `index`.
    pub fn clear_error(&mut self, index: usize) {
        if let Some(field) = self.fields.get_mut(index) {
            field.error = None;
        }
    }

    /// Clears all field errors.
    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.error = None;
        }
    }

    /// Returns `true` if any field has an error set.
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| f.error.is_some())
    }

    /// Returns the value of the field at `index`, or an empty string if out of bounds.
    pub fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }


    /// Returns a reference to the fields.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }
}

/// Renders a form within the given area.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form(form: &Form, frame: &mut Frame, area: Rect) {
    let row_height = 3_u16;
    let constraints: Vec<Constraint> = form
        .fields
        .iter()
        .map(|_| Constraint::Length(row_height))
        .collect();

    let rows = Layout::vertical(constraints).split(area);

    for (i, field) in form.fields.iter().enumerate() {
        let is_focused = i == form.focus;

        let border_color = if field.error.is_some() {
            Color::Red
        } else if is_focused {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let label = if field.required {
            format!("{} *", field.label)
        } else {
            field.label.clone()
        };

        let block = Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let spans = if field.is_choice() {
            let shown = if field.value.is_empty() {
                Span::styled("-", Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(field.value.as_str())
            };
            if is_focused {
                vec![Span::raw("◂ "), shown, Span::raw(" ▸")]
            } else {
                vec![shown]
            }
        } else {
            let mut spans = vec![Span::raw(field.value.as_str())];
            if is_focused {
                spans.push(Span::styled(
                    "\u{2588}",
                    Style::default().add_modifier(Modifier::SLOW_BLINK),
                ));
            }
            spans
        };

        let paragraph = Paragraph::new(Line::from(spans)).block(block);
        frame.render_widget(paragraph, rows[i]);

        // Error overlaps the bottom border of the row
        if let Some(ref err) = field.error {
            let error_line = Paragraph::new(Span::styled(err, Style::default().fg(Color::Red)));
            let err_area = Rect {
                x: rows[i].x + 2,
                y: rows[i].y + row_height.saturating_sub(1),
                width: rows[i].width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(error_line, err_area);
        }
    }
}
