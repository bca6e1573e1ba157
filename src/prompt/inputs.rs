//! Caller-supplied task inputs and the errors raised while validating them.
//!
//! [`TaskInputs`] is a small typed bag: an optional primary text, an ordered
//! list of media parts, and named string fields (custom rules, recipient,
//! language selections ...).  Fields live in a `BTreeMap` so iterating them
//! is deterministic.

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;

use crate::media::MediaPart;

// ---------------------------------------------------------------------------
// InputError
// ---------------------------------------------------------------------------

/// Invalid or missing caller input.  Always detected before any network
/// call is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The primary text is missing or blank.
    #[error("input text is empty")]
    EmptyText,

    /// A required named field was not supplied.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A required named field was supplied but blank.
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),

    /// An enumerated field holds a value outside its closed set.
    #[error("unknown value `{value}` for `{field}`")]
    UnknownOption { field: &'static str, value: String },

    /// Fewer media parts than the task needs.
    #[error("expected at least {expected} media part(s), got {actual}")]
    MissingMedia { expected: usize, actual: usize },

    /// More media parts than the task accepts.
    #[error("expected at most {expected} media part(s), got {actual}")]
    TooManyMedia { expected: usize, actual: usize },

    /// Page selection is not `start-end` within the document.
    #[error("invalid page range `{input}`: expected start-end between 1 and {total_pages}")]
    InvalidPageRange { input: String, total_pages: usize },

    /// A request was assembled with no content parts.
    #[error("request has no content parts")]
    EmptyContent,
}

// ---------------------------------------------------------------------------
// TaskInputs
// ---------------------------------------------------------------------------

/// Inputs for one task invocation.
///
/// ```
/// use kurdish_ai_tools::prompt::TaskInputs;
///
/// let inputs = TaskInputs::new()
///     .with_text("سڵاو")
///     .with_field("level", "short");
/// assert_eq!(inputs.field("level"), Some("short"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInputs {
    text: Option<String>,
    media: Vec<MediaPart>,
    fields: BTreeMap<String, String>,
}

impl TaskInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append one media part; order is preserved.
    pub fn with_media(mut self, part: MediaPart) -> Self {
        self.media.push(part);
        self
    }

    /// Append several media parts in order.
    pub fn with_media_parts<I>(mut self, parts: I) -> Self
    where
        I: IntoIterator<Item = MediaPart>,
    {
        self.media.extend(parts);
        self
    }

    /// Set a named field, replacing any previous value.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn media(&self) -> &[MediaPart] {
        &self.media
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    // -----------------------------------------------------------------------
    // Validation helpers used by the task builders
    // -----------------------------------------------------------------------

    /// The primary text, verbatim.  Blank text is rejected.
    pub fn require_text(&self) -> Result<&str, InputError> {
        match self.text.as_deref() {
            Some(t) if !t.trim().is_empty() => Ok(t),
            _ => Err(InputError::EmptyText),
        }
    }

    /// A required named field, verbatim.
    pub fn require_field(&self, key: &'static str) -> Result<&str, InputError> {
        match self.field(key) {
            None => Err(InputError::MissingField(key)),
            Some(v) if v.trim().is_empty() => Err(InputError::EmptyField(key)),
            Some(v) => Ok(v),
        }
    }

    /// A named field that may be absent; blank counts as absent.
    pub fn optional_field(&self, key: &str) -> Option<&str> {
        self.field(key).filter(|v| !v.trim().is_empty())
    }

    /// Parse a required enumerated field.
    pub fn option<T>(&self, key: &'static str) -> Result<T, InputError>
    where
        T: FromStr<Err = InputError>,
    {
        parse_option(key, self.require_field(key)?)
    }

    /// Parse an enumerated field, using `default` when it is absent or blank.
    pub fn option_or<T>(&self, key: &'static str, default: T) -> Result<T, InputError>
    where
        T: FromStr<Err = InputError>,
    {
        match self.optional_field(key) {
            Some(v) => parse_option(key, v),
            None => Ok(default),
        }
    }

    /// Exactly one media part.
    pub fn require_single_media(&self) -> Result<&MediaPart, InputError> {
        match self.media.as_slice() {
            [part] => Ok(part),
            [] => Err(InputError::MissingMedia {
                expected: 1,
                actual: 0,
            }),
            parts => Err(InputError::TooManyMedia {
                expected: 1,
                actual: parts.len(),
            }),
        }
    }

    /// One or more media parts.
    pub fn require_media(&self) -> Result<&[MediaPart], InputError> {
        if self.media.is_empty() {
            return Err(InputError::MissingMedia {
                expected: 1,
                actual: 0,
            });
        }
        Ok(&self.media)
    }
}

/// Parse `value`, reporting failures against the field name actually used.
fn parse_option<T>(key: &'static str, value: &str) -> Result<T, InputError>
where
    T: FromStr<Err = InputError>,
{
    value.parse().map_err(|e| match e {
        InputError::UnknownOption { value, .. } => InputError::UnknownOption { field: key, value },
        other => other,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
