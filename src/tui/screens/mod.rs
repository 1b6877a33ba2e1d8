//! TUI screen implementations.

pub mod detail;
pub mod help;
pub mod listing;
pub mod notice;
pub mod study_form;

pub use detail::{DetailState, draw_detail};
pub use help::{HelpState, draw_help};
pub use listing::{ListingState, draw_listing};
pub use notice::{draw_login, draw_not_found, handle_notice_key};
pub use study_form::{FormMode, StudyFormState, draw_study_form};
