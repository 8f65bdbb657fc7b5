//! SQL generation client abstraction.
//!
//! The pipeline depends on an [`LlmClient`] that turns a [`Prompt`] into raw model text;
//! [`clean_sql_output`] then strips markdown and prose. Implementations: [`GeminiClient`]
//! (Gemini `generateContent` over HTTPS) and [`MockLlm`] (fixed reply, for tests and demos).
//!
//! One call per request: clients never retry and set no timeout beyond the HTTP client default.

mod clean;
mod gemini;
mod mock;

pub use clean::clean_sql_output;
pub use gemini::GeminiClient;
pub use mock::MockLlm;

use async_trait::async_trait;

use crate::error::Error;
use crate::prompt::Prompt;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends `prompt` and returns the model's raw text (not yet cleaned).
    async fn generate(&self, prompt: &Prompt) -> Result<String, Error>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
