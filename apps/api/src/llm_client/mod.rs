/// LLM Client: the single point of entry for all Gemini API calls.
///
/// No other module talks to the generation API directly. Callers depend on the
/// `TextGenerator` trait so the backend can be swapped (tests use a stub).
///
/// One POST per call: no retry, and no timeout unless `GEMINI_TIMEOUT_SECS`
/// is configured.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod fences;

pub const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Gemini API key not found. Please set the GEMINI_API_KEY environment variable.")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CandidatesEnvelope {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ContentsEnvelope {
    contents: Vec<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl ResponseContent {
    fn first_text(&self) -> Option<&str> {
        self.parts
            .first()
            .and_then(|p| p.text.as_deref())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Generated text, tagged with the response shape it was found in.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedText {
    /// `candidates[0].content.parts[0].text`
    Candidates(String),
    /// `contents[0].parts[0].text`
    Contents(String),
    /// Neither shape matched; holds the serialized response body.
    Unrecognized(String),
}

impl GeneratedText {
    pub fn from_response(body: &Value) -> Self {
        if let Some(text) = CandidatesEnvelope::deserialize(body).ok().and_then(|env| {
            env.candidates
                .first()
                .and_then(|c| c.content.as_ref())
                .and_then(ResponseContent::first_text)
                .map(str::to_owned)
        }) {
            return GeneratedText::Candidates(text);
        }

        if let Some(text) = ContentsEnvelope::deserialize(body).ok().and_then(|env| {
            env.contents
                .first()
                .and_then(ResponseContent::first_text)
                .map(str::to_owned)
        }) {
            return GeneratedText::Contents(text);
        }

        GeneratedText::Unrecognized(body.to_string())
    }

    pub fn text(&self) -> &str {
        match self {
            GeneratedText::Candidates(text)
            | GeneratedText::Contents(text)
            | GeneratedText::Unrecognized(text) => text,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            GeneratedText::Candidates(_) => "candidates",
            GeneratedText::Contents(_) => "contents",
            GeneratedText::Unrecognized(_) => "unrecognized",
        }
    }
}

/// A text-generation backend. Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedText, LlmError>;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        api_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_url: api_url.into(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_timeout,
        )
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedText, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header(API_KEY_HEADER, api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}: {}", status, body);
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: Value = serde_json::from_str(&response.text().await?)?;
        let generated = GeneratedText::from_response(&raw);

        debug!(
            "Gemini call succeeded: shape={}, chars={}",
            generated.shape(),
            generated.text().len()
        );

        Ok(generated)
    }
}
