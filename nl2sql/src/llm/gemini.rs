//! Gemini `generateContent` client implementing [`LlmClient`].
//!
//! `POST {base_url}/v1beta/models/{model}:generateContent` with the key in `x-goog-api-key`.
//! The reply text is the concatenation of `candidates[0].content.parts[*].text`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use env_config::GeminiSettings;

use crate::error::Error;
use crate::llm::LlmClient;
use crate::prompt::Prompt;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full request URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// Gemini answers a bad key with 400 `API_KEY_INVALID` rather than 401.
fn is_auth_failure(status: u16, body: &str) -> bool {
    status == 401 || status == 403 || (status == 400 && body.contains("API_KEY_INVALID"))
}

fn extract_text(body: &str) -> Result<String, Error> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| Error::LlmMalformed(e.to_string()))?;
    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::LlmMalformed("response has no candidates".to_string()))?;
    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    if texts.is_empty() {
        return Err(Error::LlmMalformed("candidate has no text parts".to_string()));
    }
    Ok(texts.concat())
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, Error> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart {
                    text: prompt.as_str(),
                }],
            }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };
        debug!(model = %self.model, prompt_len = prompt.as_str().len(), "gemini request");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let code = status.as_u16();
            warn!(status = code, model = %self.model, "gemini request failed");
            return Err(if is_auth_failure(code, &body) {
                Error::LlmAuth { status: code, body }
            } else {
                Error::LlmStatus { status: code, body }
            });
        }

        let text = extract_text(&body)?;
        debug!(model = %self.model, reply_len = text.len(), "gemini reply");
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
