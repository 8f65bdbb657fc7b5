//! Mock model for tests and offline demos.
//!
//! Returns one fixed reply (or one fixed error) for every prompt and records what it was asked,
//! so tests can assert how many model calls a request made and what the prompt contained.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Error;
use crate::llm::LlmClient;
use crate::prompt::Prompt;

enum Reply {
    Text(String),
    Fail(String),
}

/// Mock model: fixed reply, call counter, last prompt.
pub struct MockLlm {
    reply: Reply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockLlm {
    /// Mock that answers every prompt with `reply` (raw, before cleanup).
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Reply::Text(reply.into()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Mock whose every call fails with [`Error::LlmStatus`] (HTTP 500) carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Reply::Fail(message.into()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn generate(&self, prompt: &Prompt) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap_or_else(|e| e.into_inner()) =
            Some(prompt.as_str().to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(message) => Err(Error::LlmStatus {
                status: 500,
                body: message.clone(),
            }),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
