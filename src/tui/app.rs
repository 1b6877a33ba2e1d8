use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::{Constraint, Layout};
use ratatui::{Frame, Terminal};
use tracing::{info, warn};

use crate::api::{ApiError, StudyApi};
use crate::model::{Recruitment, StudyDraft};
use crate::session::{Access, AccessPolicy, Session, SessionProvider};
use crate::submit::{SubmissionPipeline, SubmitOutcome, SubmitStatus};
use crate::upload::ObjectStorage;

use super::action::Action;
use super::error::AppError;
use super::screens::{
    DetailState, HelpState, ListingState, StudyFormState, draw_detail, draw_help, draw_listing,
    draw_login, draw_not_found, draw_study_form, handle_notice_key,
};
use super::widgets::{Notification, StatusBarContext, draw_status_bar};

/// All screens the app can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Launcher for opening and editing studies.
    Listing,
    /// Open a new study.
    Create,
    /// Edit a fetched study.
    Edit,
    /// Read-only view of a saved study.
    Detail,
    /// The requested study does not exist.
    NotFound,
    /// Sign-in required.
    Login,
    /// Show keybinding help.
    Help,
}

/// Top-level application state.
///
/// Generic over the backend API, object storage and session source so that
/// tests can drive it with in-memory fakes.
pub struct App<A, S, P> {
    api: A,
    storage: S,
    sessions: P,
    session: Session,
    policy: AccessPolicy,
    screen: Screen,
    listing: ListingState,
    create: Option<StudyFormState>,
    edit: Option<StudyFormState>,
    detail: Option<DetailState>,
    not_found: Option<String>,
    help: HelpState,
    notification: Option<Notification>,
    should_quit: bool,
}

impl<A: StudyApi, S: ObjectStorage, P: SessionProvider> App<A, S, P> {
    /// Creates a new `App` on the [`Screen::Listing`] screen with the session still loading.
    pub fn new(api: A, storage: S, sessions: P, policy: AccessPolicy) -> Self {
        Self {
            api,
            storage,
            sessions,
            session: Session::Loading,
            policy,
            screen: Screen::Listing,
            listing: ListingState::new(),
            create: None,
            edit: None,
            detail: None,
            not_found: None,
            help: HelpState::new(),
            notification: None,
            should_quit: false,
        }
    }

    /// Resolves the session from the provider.
    pub async fn load_session(&mut self) {
        self.session = self.sessions.session().await;
        info!(
            signed_in = self.session.access_token().is_some(),
            "session loaded"
        );
    }

    /// Main event loop: draw, read a key, dispatch, apply.
    ///
    /// `initial` is applied once the session is loaded, e.g. to start on the
    /// edit page. Network work runs on a current-thread runtime. Keys typed
    /// while a submission is in flight are discarded.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        initial: Action,
    ) -> Result<(), AppError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(async {
            self.load_session().await;
            self.apply(initial).await;
        });

        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if let Event::Key(key) = event::read()? {
                let action = self.dispatch_key(key);
                let submitting = action.is_submit();
                if submitting {
                    self.mark_submitting();
                    terminal.draw(|frame| self.draw(frame))?;
                }
                runtime.block_on(self.apply(action));
                if submitting {
                    while event::poll(Duration::ZERO)? {
                        event::read()?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Renders the current screen and the status bar.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn draw(&self, frame: &mut Frame) {
        let [main, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        match self.screen {
            Screen::Listing => draw_listing(&self.listing, frame, main),
            Screen::Create | Screen::Edit => {
                if let Some(form) = self.active_form() {
                    draw_study_form(form, frame, main);
                }
            }
            Screen::Detail => {
                if let Some(detail) = &self.detail {
                    draw_detail(detail, frame, main);
                }
            }
            Screen::NotFound => {
                draw_not_found(self.not_found.as_deref().unwrap_or_default(), frame, main)
            }
            Screen::Login => draw_login(frame, main),
            Screen::Help => draw_help(&self.help, frame, main),
        }

        draw_status_bar(&self.status_context(), frame, status);
    }

    /// Handles a key event end to end.
    pub async fn handle_key(&mut self, key: KeyEvent) {
        let action = self.dispatch_key(key);
        self.apply(action).await;
    }

    /// Routes a key to the current screen: global keys first, then screen-specific.
    pub fn dispatch_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        self.notification = None;

        if key.code == KeyCode::F(1) && self.screen != Screen::Help {
            self.help.set_origin(self.screen);
            self.help.reset();
            self.screen = Screen::Help;
            return Action::None;
        }

        match self.screen {
            Screen::Listing => self.listing.handle_key(key),
            Screen::Create | Screen::Edit => match self.active_form_mut() {
                Some(form) => form.handle_key(key),
                None => Action::Navigate(Screen::Listing),
            },
            Screen::Detail => match self.detail.as_mut() {
                Some(detail) => detail.handle_key(key),
                None => Action::Navigate(Screen::Listing),
            },
            Screen::NotFound | Screen::Login => handle_notice_key(key),
            Screen::Help => self.help.handle_key(key),
        }
    }

    /// Applies an [`Action`] returned by a screen.
    pub async fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(screen) => self.screen = screen,
            Action::OpenCreate => self.open_create(),
            Action::OpenEdit(id) => self.open_edit(id).await,
            Action::SubmitCreate(draft) => self.submit_create(draft).await,
            Action::SubmitUpdate { id, draft } => self.submit_update(id, draft).await,
            Action::Quit => self.should_quit = true,
        }
    }

    fn open_create(&mut self) {
        let access = self.policy.open_study(&self.session);
        if self.route(access).is_none() {
            return;
        }
        let recruitment = Recruitment::opening_on(Local::now().date_naive());
        self.create = Some(StudyFormState::create(recruitment));
        self.screen = Screen::Create;
    }

    async fn open_edit(&mut self, id: String) {
        let access = self.policy.edit_study(&self.session);
        if self.route(access).is_none() {
            return;
        }
        match self.api.retrieve(&id).await {
            Ok(study) => {
                info!(%id, "study loaded for editing");
                self.edit = Some(StudyFormState::edit(id, &study));
                self.screen = Screen::Edit;
            }
            Err(ApiError::NotFound) => {
                info!(%id, "study not found");
                self.edit = None;
                self.not_found = Some(id);
                self.screen = Screen::NotFound;
            }
            Err(e) => {
                warn!(%id, error = %e, "could not load study");
                self.notification = Some(Notification::error(format!(
                    "Could not load study #{id}: {e}"
                )));
            }
        }
    }

    async fn submit_create(&mut self, draft: StudyDraft) {
        let access = self.policy.open_study(&self.session);
        let Some(token) = self.route(access) else {
            return;
        };
        let Some(form) = self.create.as_mut() else {
            return;
        };
        let recruitment = form.recruitment();
        let (image, status) = form.submission();
        let outcome = SubmissionPipeline::new(&self.api, &self.storage)
            .create(&token, draft, recruitment, image, status)
            .await;
        self.finish(outcome);
    }

    async fn submit_update(&mut self, id: String, draft: StudyDraft) {
        let access = self.policy.edit_study(&self.session);
        let Some(token) = self.route(access) else {
            return;
        };
        let Some(form) = self.edit.as_mut() else {
            return;
        };
        let recruitment = form.recruitment();
        let prior = form.existing_image_src().unwrap_or_default().to_string();
        let (image, status) = form.submission();
        let outcome = SubmissionPipeline::new(&self.api, &self.storage)
            .update(&token, &id, draft, recruitment, &prior, image, status)
            .await;
        self.finish(outcome);
    }

    /// Turns a submission outcome into a notification and a navigation.
    fn finish(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Invalid(errors) => {
                if let Some(form) = self.active_form_mut() {
                    form.show_errors(&errors);
                }
            }
            SubmitOutcome::NoImage => {}
            SubmitOutcome::Created(study) => {
                self.notification = Some(Notification::success(format!(
                    "Opened \"{}\"",
                    study.title
                )));
                self.listing.push_recent(study);
                self.create = None;
                self.screen = Screen::Listing;
            }
            SubmitOutcome::Updated { id, study } => {
                self.notification = Some(Notification::success(format!("Saved study #{id}")));
                self.detail = Some(DetailState::new(id, study));
                self.edit = None;
                self.screen = Screen::Detail;
            }
            SubmitOutcome::Failed(message) => {
                self.notification = Some(Notification::error(message));
            }
        }
    }

    /// Navigates away for a refused [`Access`]; returns the token when granted.
    fn route(&mut self, access: Access) -> Option<String> {
        match access {
            Access::Granted { access_token } => Some(access_token),
            Access::Pending => {
                self.notification = Some(Notification::error("Session is still loading"));
                None
            }
            Access::Login => {
                self.screen = Screen::Login;
                None
            }
            Access::Denied => {
                warn!("role not authorized to open studies");
                self.notification = Some(Notification::error(
                    "Your role is not allowed to open studies",
                ));
                self.screen = Screen::Listing;
                None
            }
        }
    }

    fn mark_submitting(&mut self) {
        if let Some(form) = self.active_form_mut() {
            form.set_status(SubmitStatus::Validating);
        }
    }

    fn active_form(&self) -> Option<&StudyFormState> {
        match self.screen {
            Screen::Create => self.create.as_ref(),
            Screen::Edit => self.edit.as_ref(),
            _ => None,
        }
    }

    fn active_form_mut(&mut self) -> Option<&mut StudyFormState> {
        match self.screen {
            Screen::Create => self.create.as_mut(),
            Screen::Edit => self.edit.as_mut(),
            _ => None,
        }
    }

    fn status_context(&self) -> StatusBarContext {
        StatusBarContext {
            notification: self.notification.clone(),
            status: self.active_form().map(StudyFormState::status).unwrap_or_default(),
        }
    }

    /// Returns the current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the notification shown until the next key press.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn listing(&self) -> &ListingState {
        &self.listing
    }

    /// Returns the form of the current create or edit screen.
    pub fn form(&self) -> Option<&StudyFormState> {
        self.active_form()
    }

    pub fn detail(&self) -> Option<&DetailState> {
        self.detail.as_ref()
    }

    /// Returns the ID shown on the not-found screen.
    pub fn not_found(&self) -> Option<&str> {
        self.not_found.as_deref()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
