use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::tags::MAX_TAGS;

/// Longest description accepted, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 800;

/// Validation errors for study form fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    EmptyTitle,
    #[error("an image is required")]
    MissingImage,
    #[error("select a day")]
    MissingDay,
    #[error("select a campus")]
    MissingCampus,
    #[error("select a level")]
    MissingLevel,
    #[error("time is required")]
    MissingTime,
    #[error("invalid time, expected HH:MM: {0}")]
    InvalidTime(String),
    #[error("end time must be after start time")]
    EndNotAfterStart,
    #[error("add at least one tag")]
    NoTags,
    #[error("at most {} tags allowed", MAX_TAGS)]
    TooManyTags,
    #[error("duplicate tag: {0}")]
    DuplicateTag(String),
    #[error("description is required")]
    EmptyDescription,
    #[error("description is {0} characters, at most {max} allowed", max = MAX_DESCRIPTION_CHARS)]
    DescriptionTooLong(usize),
}

/// A field of the study form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Image,
    Title,
    StartTime,
    EndTime,
    Day,
    Campus,
    Level,
    Tags,
    Description,
}

#[mutants::skip]
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Image => "image",
            Field::Title => "title",
            Field::StartTime => "start time",
            Field::EndTime => "end time",
            Field::Day => "day",
            Field::Campus => "campus",
            Field::Level => "level",
            Field::Tags => "tags",
            Field::Description => "description",
        };
        f.write_str(name)
    }
}

/// One error per invalid field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, ValidationError>);

impl FieldErrors {
    /// Records the error of `result` against `field` and returns its value.
    ///
    /// The first error recorded for a field wins.
    pub fn check<T>(&mut self, field: Field, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.0.entry(field).or_insert(e);
                None
            }
        }
    }

    /// Returns the error recorded for `field`, if any.
    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.0.get(&field)
    }

    /// Returns `true` if no field has an error.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields with an error.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates errors in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &ValidationError)> {
        self.0.iter().map(|(field, e)| (*field, e))
    }
}

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid hardcoded regex"));

/// Validates a title: must contain something other than whitespace.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        Err(ValidationError::EmptyTitle)
    } else {
        Ok(())
    }
}

/// Validates an image URL: must be present and non-empty.
pub fn validate_image_src(image_src: Option<&str>) -> Result<(), ValidationError> {
    match image_src {
        Some(src) if !src.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::MissingImage),
    }
}

/// Validates a wire time (`HH:MM`, zero-padded, 24-hour).
pub fn validate_time(time: Option<&str>) -> Result<(), ValidationError> {
    match time {
        None => Err(ValidationError::MissingTime),
        Some(t) if TIME_RE.is_match(t) => Ok(()),
        Some(t) => Err(ValidationError::InvalidTime(t.to_string())),
    }
}

/// Validates that `end` is strictly after `start`. Both must already be valid wire times.
pub fn validate_time_range(start: &str, end: &str) -> Result<(), ValidationError> {
    // Zero-padded HH:MM compares correctly as text.
    if end > start {
        Ok(())
    } else {
        Err(ValidationError::EndNotAfterStart)
    }
}

/// Validates a tag list: 1 to [`MAX_TAGS`] entries with no repeats.
pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.is_empty() {
        return Err(ValidationError::NoTags);
    }
    if tags.len() > MAX_TAGS {
        return Err(ValidationError::TooManyTags);
    }
    for (i, tag) in tags.iter().enumerate() {
        if tags[..i].contains(tag) {
            return Err(ValidationError::DuplicateTag(tag.clone()));
        }
    }
    Ok(())
}

/// Validates a description: 1 to [`MAX_DESCRIPTION_CHARS`] characters.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    let len = description.chars().count();
    if description.trim().is_empty() {
        Err(ValidationError::EmptyDescription)
    } else if len > MAX_DESCRIPTION_CHARS {
        Err(ValidationError::DescriptionTooLong(len))
    } else {
        Ok(())
    }
}

/// Turns an unselected choice into the given error.
pub fn require<T>(value: Option<T>, missing: ValidationError) -> Result<T, ValidationError> {
    value.ok_or(missing)
}
