//! AI request dispatch.
//!
//! This module provides:
//! * [`Dispatcher`]: builds a task's request, performs one round trip and
//!   normalizes the reply.
//! * [`Transport`]: async seam to the service; [`HttpTransport`] is the
//!   REST implementation.
//! * [`DispatchOutput`] / [`ImageData`] / [`DispatchResult`]: results.
//! * [`DispatchError`] / [`ErrorKind`] / [`ServiceFailure`]: failures.
//! * [`InvocationState`]: per-invocation state machine.
//! * [`wire`]: typed `generateContent` request/response model.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use kurdish_ai_tools::config::AppConfig;
//! use kurdish_ai_tools::dispatch::Dispatcher;
//! use kurdish_ai_tools::prompt::{TaskInputs, TemplateRegistry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::load().unwrap();
//!     let registry = TemplateRegistry::builtin(&config.models);
//!     let dispatcher = Dispatcher::from_config(&config).unwrap();
//!
//!     let inputs = TaskInputs::new()
//!         .with_text("Hello")
//!         .with_field("target", "Kurdish (Sorani)");
//!     match dispatcher.invoke_id(&registry, "translate-text", &inputs).await {
//!         Ok(output) => println!("{}", output.as_text().unwrap_or_default()),
//!         Err(e) => eprintln!("{:?}: {e}", e.kind()),
//!     }
//! }
//! ```

pub mod dispatcher;
pub mod error;
pub mod state;
pub mod transport;
pub mod wire;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use dispatcher::{DispatchOutput, DispatchResult, Dispatcher, ImageData};
pub use error::{DispatchError, ErrorKind, ServiceFailure};
pub use state::InvocationState;
pub use transport::{HttpTransport, Transport};
