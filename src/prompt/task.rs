//! Task definitions and the request payloads they build.

use serde::{Deserialize, Serialize};

use super::{InputError, TaskInputs};
use crate::media::MediaPart;

// ---------------------------------------------------------------------------
// Response shape
// ---------------------------------------------------------------------------

/// What a task expects back from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Concatenated text of the reply.
    Text,
    /// The first inline binary part of the reply.
    InlineImage,
}

impl ResponseKind {
    /// Output modalities to request explicitly.  Text tasks request none and
    /// let the service default to text.
    pub fn modalities(self) -> Vec<ResponseModality> {
        match self {
            ResponseKind::Text => Vec::new(),
            ResponseKind::InlineImage => vec![ResponseModality::Image],
        }
    }
}

/// Wire name of an output modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseModality {
    Text,
    Image,
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// One ordered piece of request content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    InlineData(MediaPart),
}

/// What a builder produces: everything except the model and modalities,
/// which come from the [`TaskDefinition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_instruction: Option<String>,
    pub parts: Vec<ContentPart>,
}

impl Prompt {
    /// A prompt with a system instruction and the caller text as the only
    /// content part.
    pub fn instructed(system_instruction: String, content: &str) -> Self {
        Self {
            system_instruction: Some(system_instruction),
            parts: vec![ContentPart::Text(content.to_string())],
        }
    }

    /// A prompt with no system instruction.
    pub fn parts(parts: Vec<ContentPart>) -> Self {
        Self {
            system_instruction: None,
            parts,
        }
    }
}

/// A fully assembled request.  `content_parts` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPayload {
    model: String,
    system_instruction: Option<String>,
    content_parts: Vec<ContentPart>,
    response_modalities: Vec<ResponseModality>,
}

impl RequestPayload {
    pub fn new(
        model: impl Into<String>,
        system_instruction: Option<String>,
        content_parts: Vec<ContentPart>,
        response_modalities: Vec<ResponseModality>,
    ) -> Result<Self, InputError> {
        if content_parts.is_empty() {
            return Err(InputError::EmptyContent);
        }
        Ok(Self {
            model: model.into(),
            system_instruction,
            content_parts,
            response_modalities,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_instruction(&self) -> Option<&str> {
        self.system_instruction.as_deref()
    }

    pub fn content_parts(&self) -> &[ContentPart] {
        &self.content_parts
    }

    pub fn response_modalities(&self) -> &[ResponseModality] {
        &self.response_modalities
    }

    /// Text of every text part, in order.
    pub fn text_parts(&self) -> impl Iterator<Item = &str> {
        self.content_parts.iter().filter_map(|p| match p {
            ContentPart::Text(t) => Some(t.as_str()),
            ContentPart::InlineData(_) => None,
        })
    }

    /// Number of inline media parts.
    pub fn media_count(&self) -> usize {
        self.content_parts
            .iter()
            .filter(|p| matches!(p, ContentPart::InlineData(_)))
            .count()
    }
}

// ---------------------------------------------------------------------------
// TaskDefinition
// ---------------------------------------------------------------------------

/// Pure request builder.  Plain `fn` pointers cannot capture state.
pub type BuildFn = fn(&TaskInputs) -> Result<Prompt, InputError>;

/// One supported operation.
#[derive(Debug, Clone)]
pub struct TaskDefinition {
    id: String,
    model: String,
    response_kind: ResponseKind,
    summary: String,
    builder: BuildFn,
}

impl TaskDefinition {
    pub fn new(
        id: impl Into<String>,
        model: impl Into<String>,
        response_kind: ResponseKind,
        builder: BuildFn,
    ) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            response_kind,
            summary: String::new(),
            builder,
        }
    }

    /// Attach a one-line human description.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn response_kind(&self) -> ResponseKind {
        self.response_kind
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Build the request for `inputs`.  No I/O, no retained state.
    pub fn build_request(&self, inputs: &TaskInputs) -> Result<RequestPayload, InputError> {
        let prompt = (self.builder)(inputs)?;
        RequestPayload::new(
            self.model.clone(),
            prompt.system_instruction,
            prompt.parts,
            self.response_kind.modalities(),
        )
    }
}
