//! Study form screen, shared by the create and edit pages.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tracing::debug;

use crate::model::{
    Campus, Day, Field, FieldErrors, Level, MAX_TAGS, Recruitment, Study, StudyDraft, TagEditor,
    TimeSelector, parse_time,
};
use crate::submit::SubmitStatus;
use crate::tui::action::Action;
use crate::tui::app::Screen;
use crate::tui::widgets::{Form, FormField, draw_confirm, draw_form};
use crate::upload::{ImageUploadCoordinator, StagedImage};

/// Field index for the image path.
const IMAGE: usize = 0;
const TITLE: usize = 1;
const START: usize = 2;
const END: usize = 3;
const DAY: usize = 4;
const CAMPUS: usize = 5;
const LEVEL: usize = 6;
/// Field index for the tag being typed; Enter adds it to the list.
const TAG: usize = 7;
const DESCRIPTION: usize = 8;

/// Which page the form serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// State for the create and edit study screens.
#[derive(Debug, Clone)]
pub struct StudyFormState {
    mode: FormMode,
    form: Form,
    tags: TagEditor,
    start: TimeSelector,
    end: TimeSelector,
    image: ImageUploadCoordinator,
    /// `imageSrc` of the fetched record in edit mode.
    existing_image_src: Option<String>,
    recruitment: Recruitment,
    dialog_open: bool,
    status: SubmitStatus,
}

impl StudyFormState {
    /// Creates an empty form for opening a new study.
    pub fn create(recruitment: Recruitment) -> Self {
        Self::with_mode(FormMode::Create, recruitment)
    }

    /// Creates a form hydrated from the fetched study `id`.
    pub fn edit(id: impl Into<String>, study: &Study) -> Self {
        let mut state = Self::with_mode(FormMode::Edit { id: id.into() }, Recruitment::of(study));
        state.hydrate(study);
        state
    }

    fn with_mode(mode: FormMode, recruitment: Recruitment) -> Self {
        Self {
            mode,
            form: Form::new(vec![
                FormField::new("Cover image (path, Enter to stage)", true),
                FormField::new("Title", true),
                FormField::new("Start (HH:MM, ↑/↓ step)", true),
                FormField::new("End (HH:MM, ↑/↓ step)", true),
                FormField::choice("Day", true, Day::all().iter().map(Day::as_str)),
                FormField::choice("Campus", true, Campus::all().iter().map(Campus::as_str)),
                FormField::choice("Level", true, Level::all().iter().map(Level::as_str)),
                FormField::new("Tag (Enter to add, Ctrl+R to clear)", true),
                FormField::new("Description", true),
            ]),
            tags: TagEditor::new(),
            start: TimeSelector::new(),
            end: TimeSelector::new(),
            image: ImageUploadCoordinator::new(),
            existing_image_src: None,
            recruitment,
            dialog_open: false,
            status: SubmitStatus::Idle,
        }
    }

    /// Loads every editable field from `study`.
    fn hydrate(&mut self, study: &Study) {
        self.form.set_value(TITLE, study.title.as_str());
        self.start.hydrate(&study.start_time);
        self.end.hydrate(&study.end_time);
        self.sync_time_buffers();
        self.form.select(DAY, position(Day::all(), study.day));
        self.form.select(CAMPUS, position(Campus::all(), study.campus));
        self.form.select(LEVEL, position(Level::all(), study.level));
        self.tags = TagEditor::from_tags(&study.tags);
        self.form.set_value(DESCRIPTION, study.description.as_str());
        self.existing_image_src = Some(study.image_src.clone());
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if self.status.is_busy() {
            return Action::None;
        }
        if self.dialog_open {
            return self.handle_dialog_key(key);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => return self.request_submit(),
                KeyCode::Char('r') => {
                    self.tags.reset();
                    self.form.clear_error(TAG);
                    return Action::None;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Tab => {
                self.leave_field();
                self.form.focus_next();
                Action::None
            }
            KeyCode::BackTab => {
                self.leave_field();
                self.form.focus_prev();
                Action::None
            }
            KeyCode::Up | KeyCode::Down => {
                let forward = key.code == KeyCode::Up;
                if let Some(selector) = self.focused_time() {
                    selector.step(forward);
                    self.sync_time_buffers();
                }
                Action::None
            }
            KeyCode::Left | KeyCode::Right => {
                self.form.cycle_choice(key.code == KeyCode::Right);
                Action::None
            }
            KeyCode::Char(ch) => {
                self.form.insert_char(ch);
                self.reparse_time();
                Action::None
            }
            KeyCode::Backspace => {
                self.form.delete_char();
                self.reparse_time();
                Action::None
            }
            KeyCode::Enter => match self.form.focus() {
                IMAGE => {
                    self.stage_image();
                    Action::None
                }
                TAG => {
                    self.add_tag();
                    Action::None
                }
                _ => self.request_submit(),
            },
            KeyCode::Esc => {
                self.image.discard();
                Action::Navigate(Screen::Listing)
            }
            _ => Action::None,
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => self.confirm(),
            KeyCode::Char('n') | KeyCode::Esc => {
                self.dialog_open = false;
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Validates the form and opens the confirmation dialog if it is clean.
    fn request_submit(&mut self) -> Action {
        self.leave_field();
        if self.check() {
            self.dialog_open = true;
        }
        Action::None
    }

    /// Closes the dialog and hands the draft to the app, unless it went invalid.
    fn confirm(&mut self) -> Action {
        self.dialog_open = false;
        if !self.check() {
            return Action::None;
        }
        let draft = self.draft();
        match &self.mode {
            FormMode::Create => Action::SubmitCreate(draft),
            FormMode::Edit { id } => Action::SubmitUpdate {
                id: id.clone(),
                draft,
            },
        }
    }

    /// Runs validation and shows the result. Returns `true` when valid.
    fn check(&mut self) -> bool {
        let errors = self.draft().validate();
        self.show_errors(&errors);
        errors.is_empty()
    }

    /// Replaces the inline field errors with `errors`.
    pub fn show_errors(&mut self, errors: &FieldErrors) {
        self.form.clear_errors();
        for (field, error) in errors.iter() {
            self.form.set_error(field_index(field), error.to_string());
        }
        if !errors.is_empty() {
            debug!(count = errors.len(), "form has validation errors");
        }
    }

    /// Snapshot of the form for validation and submission.
    pub fn draft(&self) -> StudyDraft {
        let image_src = self
            .image
            .staged()
            .map(|image| image.preview_url().to_string())
            .or_else(|| self.existing_image_src.clone());
        StudyDraft {
            image_src,
            title: self.form.value(TITLE).to_string(),
            day: self.form.selected(DAY).map(|i| Day::all()[i]),
            start_time: self.start.value().map(str::to_string),
            end_time: self.end.value().map(str::to_string),
            campus: self.form.selected(CAMPUS).map(|i| Campus::all()[i]),
            level: self.form.selected(LEVEL).map(|i| Level::all()[i]),
            tags: self.tags.tags().to_vec(),
            description: self.form.value(DESCRIPTION).to_string(),
        }
    }

    fn stage_image(&mut self) {
        let path = self.form.value(IMAGE).trim().to_string();
        if path.is_empty() {
            return;
        }
        match StagedImage::stage(&path) {
            Ok(image) => {
                debug!(path = %image.path().display(), "image staged");
                self.image.stage(image);
                self.form.clear_error(IMAGE);
            }
            Err(e) => self.form.set_error(IMAGE, e.to_string()),
        }
    }

    fn add_tag(&mut self) {
        self.tags.add(self.form.value(TAG));
        match self.tags.error() {
            Some(e) => self.form.set_error(TAG, e.to_string()),
            None => {
                self.form.clear_value(TAG);
                self.form.clear_error(TAG);
            }
        }
    }

    fn focused_time(&mut self) -> Option<&mut TimeSelector> {
        match self.form.focus() {
            START => Some(&mut self.start),
            END => Some(&mut self.end),
            _ => None,
        }
    }

    /// Feeds the focused time buffer to its selector while typing.
    fn reparse_time(&mut self) {
        let time = parse_time(self.form.value(self.form.focus()));
        if let Some(selector) = self.focused_time() {
            selector.select(time);
        }
    }

    /// Buffers that did not parse revert to the selected time on blur.
    fn leave_field(&mut self) {
        if matches!(self.form.focus(), START | END) {
            self.sync_time_buffers();
        }
    }

    fn sync_time_buffers(&mut self) {
        let start = self.start.value().unwrap_or_default().to_string();
        let end = self.end.value().unwrap_or_default().to_string();
        self.form.set_value(START, start);
        self.form.set_value(END, end);
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn tags(&self) -> &TagEditor {
        &self.tags
    }

    pub fn image(&self) -> &ImageUploadCoordinator {
        &self.image
    }

    pub fn existing_image_src(&self) -> Option<&str> {
        self.existing_image_src.as_deref()
    }

    pub fn recruitment(&self) -> Recruitment {
        self.recruitment
    }

    /// Returns `true` while the confirmation dialog is showing.
    pub fn dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn set_status(&mut self, status: SubmitStatus) {
        self.status = status;
    }

    /// Borrows what a submission mutates: the upload tracker and the status.
    pub fn submission(&mut self) -> (&mut ImageUploadCoordinator, &mut SubmitStatus) {
        (&mut self.image, &mut self.status)
    }
}

fn field_index(field: Field) -> usize {
    match field {
        Field::Image => IMAGE,
        Field::Title => TITLE,
        Field::StartTime => START,
        Field::EndTime => END,
        Field::Day => DAY,
        Field::Campus => CAMPUS,
        Field::Level => LEVEL,
        Field::Tags => TAG,
        Field::Description => DESCRIPTION,
    }
}

fn position<T: PartialEq>(items: &[T], item: T) -> Option<usize> {
    items.iter().position(|x| *x == item)
}

/// Renders the study form screen.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_study_form(state: &StudyFormState, frame: &mut Frame, area: Rect) {
    let title = match state.mode() {
        FormMode::Create => " Open Study ".to_string(),
        FormMode::Edit { id } => format!(" Edit Study #{id} "),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [body_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
    let [form_area, side_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .areas(body_area);

    draw_form(state.form(), frame, form_area);
    draw_side_panel(state, frame, side_area);

    let footer = Paragraph::new(Line::from(
        "Tab: next  ←/→: choose  Ctrl+S: submit  Esc: back  F1: help",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);

    if state.dialog_open() {
        let message = match state.mode() {
            FormMode::Create => "Open this study?",
            FormMode::Edit { .. } => "Save changes to this study?",
        };
        draw_confirm("Confirm", message, frame, area);
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn draw_side_panel(state: &StudyFormState, frame: &mut Frame, area: Rect) {
    let label = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let red = Style::default().fg(Color::Red);

    let preview = state
        .image()
        .staged()
        .map(|image| image.preview_url().to_string())
        .or_else(|| state.existing_image_src().map(str::to_string));

    let mut lines = vec![
        Line::from(Span::styled("Image", label)),
        match preview {
            Some(url) => Line::from(url),
            None => Line::from(Span::styled("(none staged)", dim)),
        },
        Line::from(""),
        Line::from(Span::styled(
            format!("Tags {}/{}", state.tags().tags().len(), MAX_TAGS),
            label,
        )),
    ];
    if state.tags().tags().is_empty() {
        lines.push(Line::from(Span::styled("(none)", dim)));
    } else {
        let spans: Vec<Span> = state
            .tags()
            .tags()
            .iter()
            .map(|tag| Span::styled(format!("#{tag} "), Style::default().fg(Color::Yellow)))
            .collect();
        lines.push(Line::from(spans));
    }
    if let Some(err) = state.tags().error() {
        lines.push(Line::from(Span::styled(err.to_string(), red)));
    }

    let recruitment = state.recruitment();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Recruitment", label)));
    lines.push(Line::from(format!(
        "{} {}-{}",
        if recruitment.is_recruiting {
            "Recruiting"
        } else {
            "Closed"
        },
        recruitment.year,
        recruitment.semester
    )));
    lines.push(Line::from(format!(
        "Description {} chars",
        state.form().value(DESCRIPTION).chars().count()
    )));

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::LEFT).border_style(dim));
    frame.render_widget(panel, area);
}
