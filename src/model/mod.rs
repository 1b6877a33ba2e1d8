mod choice;
mod study;
mod tags;
mod time;
mod validation;

pub use choice::{Campus, Day, Level};
pub use study::{Recruitment, Study, StudyDraft};
pub use tags::{MAX_TAGS, TagEditor, TagError};
pub use time::{STEP_MINUTES, TimeSelector, parse_time};
pub use validation::{
    Field, FieldErrors, MAX_DESCRIPTION_CHARS, ValidationError, require, validate_description,
    validate_image_src, validate_tags, validate_time, validate_time_range, validate_title,
};
