//! The single capability the pipeline needs from the network.
//!
//! [`Transport::send`] posts one request and hands back the raw body as text,
//! whatever the HTTP status. Interpreting the body is left to
//! [`crate::response`]. Retry is layered on top by
//! [`crate::retry::RetryingTransport`], so any implementation (the reqwest
//! client, or [`ScriptedTransport`] in tests) gets the same backoff.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::envelope::ResponsesRequest;
use crate::error::LlmError;

/// Sends a request envelope, returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one call. No retry at this level.
    async fn send(&self, request: &ResponsesRequest) -> Result<String, LlmError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &ResponsesRequest) -> Result<String, LlmError> {
        (**self).send(request).await
    }
}

// ---------------------------------------------------------------------------
// ScriptedTransport — deterministic test double
// ---------------------------------------------------------------------------

/// Replays a fixed script of outcomes and records every call.
///
/// Once the script is exhausted the last outcome repeats. Call instants come
/// from [`tokio::time::Instant`], so they follow a paused test clock.
#[derive(Debug, Clone)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<ScriptState>>,
}

#[derive(Debug)]
struct ScriptState {
    script: VecDeque<Result<String, LlmError>>,
    last: Option<Result<String, LlmError>>,
    calls: Vec<Instant>,
    requests: Vec<ResponsesRequest>,
}

impl ScriptedTransport {
    /// Transport that returns `outcomes` in order.
    #[must_use]
    pub fn new(outcomes: impl IntoIterator<Item = Result<String, LlmError>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScriptState {
                script: outcomes.into_iter().collect(),
                last: None,
                calls: Vec::new(),
                requests: Vec::new(),
            })),
        }
    }

    /// Always answers with `body`.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new([Ok(body.into())])
    }

    /// Fails `failures` times with `error`, then answers with `body`.
    #[must_use]
    pub fn failing_then(failures: usize, error: LlmError, body: impl Into<String>) -> Self {
        let mut outcomes: Vec<Result<String, LlmError>> =
            std::iter::repeat_n(Err(error), failures).collect();
        outcomes.push(Ok(body.into()));
        Self::new(outcomes)
    }

    /// Always fails with `error`.
    #[must_use]
    pub fn always_failing(error: LlmError) -> Self {
        Self::new([Err(error)])
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inner.lock().calls.len()
    }

    /// Instants of every call, in order.
    #[must_use]
    pub fn call_instants(&self) -> Vec<Instant> {
        self.inner.lock().calls.clone()
    }

    /// Requests received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ResponsesRequest> {
        self.inner.lock().requests.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ResponsesRequest) -> Result<String, LlmError> {
        let mut state = self.inner.lock();
        state.calls.push(Instant::now());
        state.requests.push(request.clone());

        if let Some(next) = state.script.pop_front() {
            state.last = Some(next.clone());
            return next;
        }
        state
            .last
            .clone()
            .unwrap_or_else(|| Err(LlmError::ConfigError("empty transport script".into())))
    }
}
