//! Image upload side channel.
//!
//! A picked file is staged locally, uploaded provisionally when the form is
//! submitted, and then either committed (kept) or deleted depending on how
//! the backend call went.

mod coordinator;
mod error;
mod staged;
mod storage;

pub use coordinator::ImageUploadCoordinator;
pub use error::UploadError;
pub use staged::StagedImage;
pub use storage::{HttpObjectStorage, ObjectStorage, UploadedObject};

#[cfg(test)]
pub(crate) use coordinator::fake;
