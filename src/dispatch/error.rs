//! Dispatch error taxonomy.

use thiserror::Error;

use crate::prompt::{InputError, RegistryError};

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Coarse failure class, enough for a UI to pick a message and decide
/// whether to offer a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Credentials or endpoint missing; needs operator action.
    Configuration,
    /// Invalid input; the user must correct it.  Never sent to the service.
    Caller,
    /// The service could not be reached.
    Transport,
    /// The service answered with a failure or an unusable shape.
    Service,
    /// No answer within the configured time limit.
    Timeout,
}

// ---------------------------------------------------------------------------
// ServiceFailure
// ---------------------------------------------------------------------------

/// Why a reply from the service could not be turned into a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceFailure {
    /// Non-success HTTP status, with the service's own message if any.
    #[error("service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The prompt was refused (`promptFeedback.blockReason`).
    #[error("request blocked by the service: {0}")]
    Blocked(String),

    #[error("service returned no candidates")]
    NoCandidates,

    /// A candidate came back without parts.
    #[error("service returned no content (finish reason: {0})")]
    NoContent(String),

    #[error("service returned an empty text response")]
    EmptyText,

    #[error("no image part returned")]
    NoImagePart,

    /// Body was not the expected JSON shape.
    #[error("malformed service response: {0}")]
    Malformed(String),

    /// An image part whose payload is not valid base64.
    #[error("invalid image data: {0}")]
    InvalidImageData(String),
}

impl ServiceFailure {
    /// Whether sending the same request again could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceFailure::Api { status, .. } => {
                *status == 408 || *status == 429 || (500..600).contains(status)
            }
            ServiceFailure::NoCandidates
            | ServiceFailure::NoContent(_)
            | ServiceFailure::EmptyText
            | ServiceFailure::NoImagePart => true,
            ServiceFailure::Blocked(_)
            | ServiceFailure::Malformed(_)
            | ServiceFailure::InvalidImageData(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// DispatchError
// ---------------------------------------------------------------------------

/// Every way an invocation can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid input: {0}")]
    Caller(#[from] InputError),

    /// The caller asked for a task id that is not registered.
    #[error("unknown task `{0}`")]
    UnknownTask(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Service(#[from] ServiceFailure),

    #[error("request timed out")]
    Timeout,
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::Configuration(_) => ErrorKind::Configuration,
            DispatchError::Caller(_) | DispatchError::UnknownTask(_) => ErrorKind::Caller,
            DispatchError::Transport(_) => ErrorKind::Transport,
            DispatchError::Service(_) => ErrorKind::Service,
            DispatchError::Timeout => ErrorKind::Timeout,
        }
    }

    /// Whether the caller may reasonably retry with the same input.
    pub fn is_retryable(&self) -> bool {
        match self {
            DispatchError::Transport(_) | DispatchError::Timeout => true,
            DispatchError::Service(failure) => failure.is_retryable(),
            DispatchError::Configuration(_)
            | DispatchError::Caller(_)
            | DispatchError::UnknownTask(_) => false,
        }
    }
}

impl From<RegistryError> for DispatchError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::UnknownTask(id) => DispatchError::UnknownTask(id),
            RegistryError::DuplicateTask(id) => {
                DispatchError::Configuration(format!("task `{id}` registered twice"))
            }
        }
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DispatchError::Timeout
        } else {
            DispatchError::Transport(e.to_string())
        }
    }
}
