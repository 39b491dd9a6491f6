//! Deterministic stand-in for the external service.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use plumb_prompt::PromptDocument;

use crate::client::DiagnosisClient;
use crate::error::DiagnosisError;

/// Replays queued replies in order and records every document it receives.
///
/// Once the queue is drained every call fails with
/// [`DiagnosisError::EmptyResponse`].
#[derive(Debug, Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, DiagnosisError>>>,
    received: Mutex<Vec<PromptDocument>>,
}

impl ScriptedClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    #[must_use]
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a failure.
    #[must_use]
    pub fn fail(self, error: DiagnosisError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, reply: Result<String, DiagnosisError>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Documents received so far, oldest first.
    #[must_use]
    pub fn received(&self) -> Vec<PromptDocument> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl DiagnosisClient for ScriptedClient {
    async fn complete(&self, document: &PromptDocument) -> Result<String, DiagnosisError> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(document.clone());
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Err(DiagnosisError::EmptyResponse))
    }
}
