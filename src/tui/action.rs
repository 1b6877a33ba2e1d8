//! Actions returned by screen event handlers.

use crate::model::StudyDraft;

use super::app::Screen;

/// An action that a screen handler returns to the [`App`](super::App).
///
/// The `App` interprets these to run submissions and navigate between
/// screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No state change needed.
    None,
    /// Navigate to the given screen.
    Navigate(Screen),
    /// Open a fresh create form, subject to the role check.
    OpenCreate,
    /// Fetch the study with the given ID and open it in the edit form.
    OpenEdit(String),
    /// Run the create submission with the confirmed draft.
    SubmitCreate(StudyDraft),
    /// Run the update submission for the study with the given ID.
    SubmitUpdate { id: String, draft: StudyDraft },
    /// Quit the application.
    Quit,
}

impl Action {
    /// Returns `true` for actions that start a submission.
    pub fn is_submit(&self) -> bool {
        matches!(self, Self::SubmitCreate(_) | Self::SubmitUpdate { .. })
    }
}
