//! Kurdish-language AI tools: a prompt template registry and a request
//! dispatcher for a hosted generative-AI service.
//!
//! * [`config`]: settings file and credential resolution.
//! * [`media`]: base64 media parts and PDF page ranges.
//! * [`prompt`]: task catalogue and request building.
//! * [`dispatch`]: transport, error taxonomy and response normalization.

pub mod config;
pub mod dispatch;
pub mod media;
pub mod prompt;
