//! Deterministic client for tests and offline demos.

use super::{ConversionClient, ConversionRequest};
use crate::error::ConversionError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays scripted outcomes in order.
///
/// Once the script runs out, the fallback outcome is returned for every
/// further call. Every request is recorded for later inspection.
#[derive(Debug)]
pub struct StubClient {
    script: Mutex<VecDeque<Result<String, ConversionError>>>,
    fallback: Result<String, ConversionError>,
    requests: Mutex<Vec<ConversionRequest>>,
}

impl StubClient {
    /// Always answer with `markdown`.
    pub fn returning(markdown: impl Into<String>) -> Self {
        Self::with_fallback(Ok(markdown.into()))
    }

    /// Always fail with `error`.
    pub fn failing(error: ConversionError) -> Self {
        Self::with_fallback(Err(error))
    }

    /// Answer with each scripted outcome once, then with `EmptyResult`.
    pub fn scripted(outcomes: impl IntoIterator<Item = Result<String, ConversionError>>) -> Self {
        let stub = Self::with_fallback(Err(ConversionError::EmptyResult));
        stub.lock_script().extend(outcomes);
        stub
    }

    fn with_fallback(fallback: Result<String, ConversionError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, ConversionError>>> {
        self.script.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ConversionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait]
impl ConversionClient for StubClient {
    async fn convert(&self, request: &ConversionRequest) -> Result<String, ConversionError> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(request.clone());
        let next = self.lock_script().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }

    fn name(&self) -> &str {
        "stub"
    }
}
