use thiserror::Error;

/// Maximum number of tags a study may carry.
pub const MAX_TAGS: usize = 4;

/// Why a tag was not added.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("at most {} tags allowed", MAX_TAGS)]
    Capacity,
    #[error("tag already added: {0}")]
    Duplicate(String),
}

/// Ordered, de-duplicated list of at most [`MAX_TAGS`] tags.
///
/// Tags can only be appended one at a time or cleared in bulk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagEditor {
    tags: Vec<String>,
    error: Option<TagError>,
}

impl TagEditor {
    /// Creates an empty editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an editor hydrated from a stored tag list.
    ///
    /// Entries are fed through [`add`](Self::add), so duplicates and overflow
    /// in the stored list are dropped.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut editor = Self::new();
        for tag in tags {
            editor.add(tag.as_ref());
        }
        editor.error = None;
        editor
    }

    /// Trims and appends `candidate`.
    ///
    /// Empty input is ignored. A full list sets [`TagError::Capacity`] and a
    /// repeated tag sets [`TagError::Duplicate`]; neither mutates the list.
    pub fn add(&mut self, candidate: &str) {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return;
        }
        if self.tags.len() >= MAX_TAGS {
            self.error = Some(TagError::Capacity);
            return;
        }
        if self.tags.iter().any(|t| t == candidate) {
            self.error = Some(TagError::Duplicate(candidate.to_string()));
            return;
        }
        self.tags.push(candidate.to_string());
        self.error = None;
    }

    /// Clears every tag and any tag error.
    pub fn reset(&mut self) {
        self.tags.clear();
        self.error = None;
    }

    /// Returns the tags in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the error from the last rejected [`add`](Self::add), if any.
    pub fn error(&self) -> Option<&TagError> {
        self.error.as_ref()
    }
}
