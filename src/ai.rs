//! Client for the hosted generative-language API.
//!
//! One prompt in, one text answer out. There is no retry or backoff: a failed
//! call is classified into an [`AiError`] whose message is shown to the user
//! as-is.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::AiSettings;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API key not configured. Please check your environment settings.")]
    MissingApiKey,
    #[error("Invalid API key. Please check your configuration.")]
    InvalidApiKey,
    #[error("Too many requests. Please try again later.")]
    RateLimited,
    #[error("Network error. Please check your internet connection.")]
    Network(#[source] reqwest::Error),
    #[error("No response received from Gemini API")]
    EmptyResponse,
    #[error("{0}")]
    Unknown(String),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
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
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(settings: &AiSettings) -> Result<Self, AiError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AiError::MissingApiKey)?
            .to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(AiError::Network)?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

/// Map a non-success HTTP answer onto the user-facing error classes.
fn classify_status(status: StatusCode, body: &str) -> AiError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AiError::InvalidApiKey,
        StatusCode::BAD_REQUEST if message.contains("API key") => AiError::InvalidApiKey,
        _ if message.is_empty() => AiError::Unknown(format!("request failed with status {status}")),
        _ => AiError::Unknown(message),
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        tracing::debug!(model = %self.model, prompt_chars = prompt.chars().count(), "generateContent");

        let request = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Gemini API request failed");
                AiError::Network(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(AiError::Network)?;

        if !status.is_success() {
            let err = classify_status(status, &body);
            tracing::error!(%status, error = %err, "Gemini API error");
            return Err(err);
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| AiError::Unknown(format!("unexpected response: {e}")))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            tracing::warn!("Gemini API returned no text");
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }
}
