//! The single chokepoint for calls to the generative service.
//!
//! [`Dispatcher::invoke`] builds the request from a [`TaskDefinition`],
//! performs exactly one round trip through its [`Transport`], and
//! normalizes the reply into a [`DispatchOutput`].  Input errors are raised
//! before the transport is touched.  There are no retries and no state
//! shared between invocations beyond the immutable transport handle.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::error::{DispatchError, ServiceFailure};
use super::state::InvocationState;
use super::transport::{HttpTransport, Transport};
use super::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::config::AppConfig;
use crate::prompt::{ResponseKind, TaskDefinition, TaskInputs, TemplateRegistry};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Base64 image returned by an image task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub data: String,
    pub mime_type: String,
}

impl ImageData {
    /// Decode the payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, DispatchError> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| ServiceFailure::InvalidImageData(e.to_string()).into())
    }

    /// `data:` URL suitable for direct display.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Successful, normalized result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutput {
    Text(String),
    Image(ImageData),
}

impl DispatchOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DispatchOutput::Text(t) => Some(t),
            DispatchOutput::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageData> {
        match self {
            DispatchOutput::Image(i) => Some(i),
            DispatchOutput::Text(_) => None,
        }
    }
}

/// Outcome of one invocation, owned by the caller.
pub type DispatchResult = Result<DispatchOutput, DispatchError>;

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Issues task requests through a shared [`Transport`].
///
/// Cheap to clone; clones share the transport and nothing else.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    /// A dispatcher with no timeout.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: None,
        }
    }

    /// Fail invocations that take longer than `limit` with
    /// [`DispatchError::Timeout`].
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Build the HTTP transport and timeout from configuration.
    ///
    /// Fails with a configuration error when no API key is available.
    pub fn from_config(config: &AppConfig) -> Result<Self, DispatchError> {
        let transport = HttpTransport::from_config(&config.service)?;
        let dispatcher = Self::new(Arc::new(transport));
        Ok(match config.service.timeout() {
            Some(limit) => dispatcher.with_timeout(limit),
            None => dispatcher,
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run `task` on `inputs`: one round trip, one result.
    pub async fn invoke(&self, task: &TaskDefinition, inputs: &TaskInputs) -> DispatchResult {
        self.invoke_observed(task, inputs, |_| {}).await
    }

    /// Look `id` up in `registry` and invoke it.  An unknown id is a caller
    /// error and nothing is sent.
    pub async fn invoke_id(
        &self,
        registry: &TemplateRegistry,
        id: &str,
        inputs: &TaskInputs,
    ) -> DispatchResult {
        let task = registry.lookup(id)?;
        self.invoke(task, inputs).await
    }

    /// Like [`invoke`](Self::invoke), reporting every state transition to
    /// `observer` (e.g. to drive a loading indicator).
    pub async fn invoke_observed<F>(
        &self,
        task: &TaskDefinition,
        inputs: &TaskInputs,
        observer: F,
    ) -> DispatchResult
    where
        F: FnMut(InvocationState) + Send,
    {
        let mut tracker = Tracker::new(task.id(), observer);

        tracker.advance(InvocationState::Building);
        let payload = match task.build_request(inputs) {
            Ok(payload) => payload,
            Err(e) => return tracker.finish(Err(e.into())),
        };
        log::debug!(
            "task {}: model={} parts={} media={} system_len={}",
            task.id(),
            payload.model(),
            payload.content_parts().len(),
            payload.media_count(),
            payload.system_instruction().map_or(0, str::len),
        );
        let request = GenerateContentRequest::from(&payload);

        tracker.advance(InvocationState::InFlight);
        let call = self.transport.generate(payload.model(), &request);
        let reply = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(DispatchError::Timeout)),
            None => call.await,
        };

        let result = reply.and_then(|response| normalize(task.response_kind(), &response));
        tracker.finish(result)
    }
}

/// Pull the expected output shape out of a reply.
fn normalize(kind: ResponseKind, response: &GenerateContentResponse) -> DispatchResult {
    match kind {
        ResponseKind::Text => Ok(DispatchOutput::Text(response.text()?)),
        ResponseKind::InlineImage => {
            let blob = response.first_inline_data()?;
            Ok(DispatchOutput::Image(ImageData {
                data: blob.data.clone(),
                mime_type: blob.mime_type.clone(),
            }))
        }
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Walks one invocation through [`InvocationState`], notifying the observer.
struct Tracker<'a, F> {
    task_id: &'a str,
    state: InvocationState,
    observer: F,
}

impl<'a, F: FnMut(InvocationState)> Tracker<'a, F> {
    fn new(task_id: &'a str, observer: F) -> Self {
        Self {
            task_id,
            state: InvocationState::Idle,
            observer,
        }
    }

    fn advance(&mut self, next: InvocationState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        log::debug!("task {}: {} -> {}", self.task_id, self.state.label(), next.label());
        self.state = next;
        (self.observer)(next);
    }

    fn finish(mut self, result: DispatchResult) -> DispatchResult {
        debug_assert!(self.state.is_busy(), "finish from {:?}", self.state);
        match &result {
            Ok(_) => {
                log::info!("task {} succeeded", self.task_id);
                self.advance(InvocationState::Succeeded);
            }
            Err(e) => {
                log::warn!("task {} failed ({:?}): {e}", self.task_id, e.kind());
                self.advance(InvocationState::Failed);
            }
        }
        debug_assert!(self.state.is_terminal());
        result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::dispatch::ErrorKind;
    use crate::media::MediaPart;
    use crate::prompt::InputError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Returns a fixed reply and counts calls.
    struct StubTransport {
        reply: Result<GenerateContentResponse, DispatchError>,
        calls: AtomicUsize,
        last_request: Mutex<Option<(String, GenerateContentRequest)>>,
    }

    impl StubTransport {
        fn replying(value: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(serde_json::from_value(value).expect("response json")),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }

        fn failing(err: DispatchError) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(err),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn generate(
            &self,
            model: &str,
            request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, DispatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some((model.to_string(), request.clone()));
            self.reply.clone()
        }
    }

    /// Fails for one model, echoes the model name otherwise, after a delay.
    struct RoutedTransport {
        failing_model: &'static str,
    }

    #[async_trait]
    impl Transport for RoutedTransport {
        async fn generate(
            &self,
            model: &str,
            _request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, DispatchError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if model == self.failing_model {
                return Err(DispatchError::Transport("connection reset".into()));
            }
            Ok(serde_json::from_value(json!({
                "candidates": [{ "content": { "parts": [{ "text": model }] } }]
            }))
            .expect("response json"))
        }
    }

    /// Never answers in time.
    struct SlowTransport;

    #[async_trait]
    impl Transport for SlowTransport {
        async fn generate(
            &self,
            _model: &str,
            _request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, DispatchError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(GenerateContentResponse::default())
        }
    }

    /// Stalls forever for one model and counts the calls that complete.
    struct StallingTransport {
        stall_model: &'static str,
        completed: AtomicUsize,
    }

    #[async_trait]
    impl Transport for StallingTransport {
        async fn generate(
            &self,
            model: &str,
            _request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, DispatchError> {
            if model == self.stall_model {
                std::future::pending::<()>().await;
            }
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_value(text_reply(model)).expect("response json"))
        }
    }

    fn registry() -> TemplateRegistry {
        TemplateRegistry::builtin(&ModelConfig::default())
    }

    fn text_reply(text: &str) -> serde_json::Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    fn image_inputs() -> TaskInputs {
        TaskInputs::new().with_media(MediaPart::new("aW1n", "image/png"))
    }

    // -----------------------------------------------------------------------
    // Text tasks
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn text_task_returns_service_text() {
        let stub = StubTransport::replying(text_reply("کورتە"));
        let dispatcher = Dispatcher::new(stub.clone());

        let inputs = TaskInputs::new()
            .with_text("لاپەڕەیەکی دەق...")
            .with_field("level", "short");
        let output = dispatcher
            .invoke_id(&registry(), "summarize-text", &inputs)
            .await
            .expect("success");

        assert_eq!(output.as_text(), Some("کورتە"));
        assert_eq!(stub.calls(), 1);

        let (model, request) = stub.last_request.lock().unwrap().clone().expect("request");
        assert_eq!(model, "gemini-2.5-flash");
        let system = request.system_instruction.expect("system instruction");
        assert!(matches!(
            &system.parts[0],
            crate::dispatch::wire::Part::Text { text, .. }
                if text.contains("Provide a very brief, one-paragraph summary.")
        ));
        assert_eq!(
            request.contents[0].parts,
            vec![crate::dispatch::wire::Part::text("لاپەڕەیەکی دەق...")]
        );
    }

    #[tokio::test]
    async fn empty_text_reply_is_service_error() {
        let stub = StubTransport::replying(text_reply(""));
        let dispatcher = Dispatcher::new(stub);

        let err = dispatcher
            .invoke_id(&registry(), "answer-question", &TaskInputs::new().with_text("چی؟"))
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::Service(ServiceFailure::EmptyText));
    }

    // -----------------------------------------------------------------------
    // Image tasks
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn image_found_after_leading_text_part() {
        let stub = StubTransport::replying(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here you go" },
                { "inlineData": { "mimeType": "image/png", "data": "UE5H" } }
            ]}}]
        }));
        let dispatcher = Dispatcher::new(stub.clone());

        let output = dispatcher
            .invoke_id(&registry(), "remove-background", &image_inputs())
            .await
            .expect("success");

        let image = output.as_image().expect("image output");
        assert_eq!(image.data, "UE5H");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.decode().unwrap(), b"PNG");
        assert_eq!(image.data_url(), "data:image/png;base64,UE5H");
    }

    #[tokio::test]
    async fn missing_image_part_is_service_error() {
        let stub = StubTransport::replying(text_reply("I cannot edit this image."));
        let dispatcher = Dispatcher::new(stub);

        let inputs = image_inputs().with_field("direction", "top");
        let err = dispatcher
            .invoke_id(&registry(), "expand-image", &inputs)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(err, DispatchError::Service(ServiceFailure::NoImagePart));
    }

    #[test]
    fn invalid_image_payload_fails_to_decode() {
        let image = ImageData {
            data: "not base64!".into(),
            mime_type: "image/png".into(),
        };
        assert!(matches!(
            image.decode(),
            Err(DispatchError::Service(ServiceFailure::InvalidImageData(_)))
        ));
    }

    // -----------------------------------------------------------------------
    // Caller errors
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn blank_text_never_reaches_transport() {
        let stub = StubTransport::replying(text_reply("unused"));
        let dispatcher = Dispatcher::new(stub.clone());

        let err = dispatcher
            .invoke_id(&registry(), "correct-text", &TaskInputs::new().with_text("  "))
            .await
            .unwrap_err();

        assert_eq!(err, DispatchError::Caller(InputError::EmptyText));
        assert_eq!(err.kind(), ErrorKind::Caller);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn bad_page_range_never_reaches_transport() {
        let stub = StubTransport::replying(text_reply("unused"));
        let dispatcher = Dispatcher::new(stub.clone());

        let inputs = TaskInputs::new()
            .with_media(MediaPart::new("cDE=", "image/jpeg"))
            .with_field("pages", "1-10");
        let err = dispatcher
            .invoke_id(&registry(), "extract-pdf-text", &inputs)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Caller);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_task_is_caller_error() {
        let stub = StubTransport::replying(text_reply("unused"));
        let dispatcher = Dispatcher::new(stub.clone());

        let err = dispatcher
            .invoke_id(&registry(), "write-poem", &TaskInputs::new().with_text("x"))
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::UnknownTask("write-poem".into()));
        assert_eq!(stub.calls(), 0);
    }

    // -----------------------------------------------------------------------
    // Transport failures and timeouts
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn transport_error_is_returned_not_swallowed() {
        let stub = StubTransport::failing(DispatchError::Transport("refused".into()));
        let dispatcher = Dispatcher::new(stub.clone());

        let err = dispatcher
            .invoke_id(&registry(), "answer-question", &TaskInputs::new().with_text("؟"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.is_retryable());
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let dispatcher =
            Dispatcher::new(Arc::new(SlowTransport)).with_timeout(Duration::from_millis(20));

        let err = dispatcher
            .invoke_id(&registry(), "answer-question", &TaskInputs::new().with_text("؟"))
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::Timeout);
    }

    #[test]
    fn from_config_requires_api_key() {
        let mut config = AppConfig::default();
        config.service.api_key_env = "KURDISH_AI_TOOLS_TEST_UNSET_KEY".into();
        let err = Dispatcher::from_config(&config).err().expect("should fail");
        assert_eq!(err.kind(), ErrorKind::Configuration);

        config.service.api_key = Some("k".into());
        let dispatcher = Dispatcher::from_config(&config).expect("dispatcher");
        assert_eq!(dispatcher.timeout(), Some(Duration::from_secs(120)));
    }

    // -----------------------------------------------------------------------
    // State machine
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn observer_sees_full_happy_path() {
        let stub = StubTransport::replying(text_reply("ok"));
        let dispatcher = Dispatcher::new(stub);
        let registry = registry();
        let task = registry.lookup("answer-question").unwrap();

        let mut seen = Vec::new();
        dispatcher
            .invoke_observed(task, &TaskInputs::new().with_text("؟"), |s| seen.push(s))
            .await
            .expect("success");

        assert_eq!(
            seen,
            vec![
                InvocationState::Building,
                InvocationState::InFlight,
                InvocationState::Succeeded
            ]
        );
    }

    #[tokio::test]
    async fn observer_sees_build_failure_without_in_flight() {
        let stub = StubTransport::replying(text_reply("unused"));
        let dispatcher = Dispatcher::new(stub);
        let registry = registry();
        let task = registry.lookup("answer-question").unwrap();

        let mut seen = Vec::new();
        let _ = dispatcher
            .invoke_observed(task, &TaskInputs::new(), |s| seen.push(s))
            .await;

        assert_eq!(
            seen,
            vec![InvocationState::Building, InvocationState::Failed]
        );
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn concurrent_invocations_are_isolated() {
        let models = ModelConfig {
            flash: "flash-ok".into(),
            pro: "pro-broken".into(),
            image: "image".into(),
        };
        let registry = TemplateRegistry::builtin(&models);
        let dispatcher = Dispatcher::new(Arc::new(RoutedTransport {
            failing_model: "pro-broken",
        }));

        let summary_inputs = TaskInputs::new()
            .with_text("دەقێکی درێژ")
            .with_field("level", "medium");
        let translate_inputs = TaskInputs::new()
            .with_text("سڵاو")
            .with_field("target", "English");

        let (summary, translation) = tokio::join!(
            dispatcher.invoke_id(&registry, "summarize-text", &summary_inputs),
            dispatcher.invoke_id(&registry, "translate-text", &translate_inputs),
        );

        assert_eq!(summary.expect("summary").as_text(), Some("flash-ok"));
        assert_eq!(translation.unwrap_err().kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn spawned_invocations_share_one_dispatcher() {
        let stub = StubTransport::replying(text_reply("ok"));
        let dispatcher = Dispatcher::new(stub.clone());
        let registry = Arc::new(registry());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let dispatcher = dispatcher.clone();
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    let inputs = TaskInputs::new().with_text(format!("پرسیار {i}"));
                    dispatcher
                        .invoke_id(&registry, "answer-question", &inputs)
                        .await
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.expect("join").is_ok());
        }
        assert_eq!(stub.calls(), 4);
    }

    #[tokio::test]
    async fn dropped_invocation_leaves_dispatcher_usable() {
        let transport = Arc::new(StallingTransport {
            stall_model: "gemini-2.5-pro",
            completed: AtomicUsize::new(0),
        });
        let dispatcher = Dispatcher::new(transport.clone());
        let registry = Arc::new(registry());
        let question = TaskInputs::new().with_text("پایتەختی کوردستان کوێیە؟");

        // Abandon an in-flight call by dropping its future.
        let stalled = dispatcher.clone();
        let mut states = Vec::new();
        let task = registry.lookup("answer-question").expect("task");
        tokio::select! {
            _ = stalled.invoke_observed(task, &question, |s| states.push(s)) => {
                panic!("stalled invocation completed");
            }
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
        }
        assert_eq!(
            states,
            vec![InvocationState::Building, InvocationState::InFlight]
        );

        // Abort a spawned one as well.
        let handle = {
            let dispatcher = dispatcher.clone();
            let registry = Arc::clone(&registry);
            let question = question.clone();
            tokio::spawn(async move {
                dispatcher
                    .invoke_id(&registry, "answer-question", &question)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());

        let output = dispatcher
            .invoke_id(&registry, "summarize-text", &TaskInputs::new().with_text("دەق"))
            .await
            .expect("later invocation");
        assert_eq!(output.as_text(), Some("gemini-2.5-flash"));
        assert_eq!(transport.completed.load(Ordering::SeqCst), 1);
    }
}
