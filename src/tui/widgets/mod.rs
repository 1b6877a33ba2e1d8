//! Reusable TUI widgets.

pub mod confirm;
pub mod form;
pub mod status_bar;

pub use confirm::{centered, draw_confirm};
pub use form::{FieldKind, Form, FormField, draw_form};
pub use status_bar::{Notification, NotificationKind, StatusBarContext, draw_status_bar};
