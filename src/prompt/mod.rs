//! Prompt template registry.
//!
//! This module provides:
//! * [`TemplateRegistry`]: task catalogue with `register` / `lookup`.
//! * [`TaskDefinition`]: id, model, response kind and a pure builder.
//! * [`TaskInputs`]: caller text, media parts and named fields.
//! * [`RequestPayload`] / [`ContentPart`]: the assembled request.
//! * [`rules`]: orthography rule text and instruction fragments.
//! * [`options`]: closed option sets (summary level, tone, language ...).
//! * [`InputError`]: caller-input validation failures.
//!
//! # Quick start
//!
//! ```rust
//! use kurdish_ai_tools::config::ModelConfig;
//! use kurdish_ai_tools::prompt::{TaskInputs, TemplateRegistry};
//!
//! let registry = TemplateRegistry::builtin(&ModelConfig::default());
//! let task = registry.lookup("summarize-text").unwrap();
//!
//! let inputs = TaskInputs::new()
//!     .with_text("دەقێکی درێژ")
//!     .with_field("level", "short");
//! let payload = task.build_request(&inputs).unwrap();
//!
//! assert!(payload
//!     .system_instruction()
//!     .unwrap()
//!     .contains("one-paragraph summary"));
//! ```

pub mod catalogue;
pub mod inputs;
pub mod options;
pub mod registry;
pub mod rules;
pub mod task;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use inputs::{InputError, TaskInputs};
pub use options::{ArticleKind, ExpandDirection, Language, LetterTone, SummaryLevel};
pub use registry::{RegistryError, TemplateRegistry};
pub use task::{
    BuildFn, ContentPart, Prompt, RequestPayload, ResponseKind, ResponseModality, TaskDefinition,
};
