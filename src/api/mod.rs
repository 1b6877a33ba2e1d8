//! Backend REST API for study listings.
//!
//! [`StudyApi`] is the seam the submission pipeline talks to;
//! [`HttpStudyApi`] is the `reqwest` implementation used by the binary.

mod client;
mod error;

pub use client::{HttpStudyApi, StudyApi};
pub use error::ApiError;

#[cfg(test)]
pub(crate) use client::fake;
