//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::request::{response_schema, GenerationRequest, SYSTEM_INSTRUCTION};
use super::{parse_generated_text, AnimationSource, ApiKey, GenerateError};
use crate::models::AnimationData;

/// Public endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default request timeout. Generating 20 frames can take a while.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Build the JSON body for a request.
pub fn request_body(request: &GenerationRequest) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [{ "text": request.user_content() }] }
        ],
        "systemInstruction": {
            "parts": [{ "text": SYSTEM_INSTRUCTION }]
        },
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
            "temperature": request.temperature
        }
    })
}

/// Pull the model's text out of a response envelope and validate it.
///
/// Text parts of the first candidate are concatenated. An envelope with no
/// text (blocked prompt, empty candidate list) is a request failure; text
/// that is not a valid animation is a malformed response.
pub fn parse_response_body(body: &str) -> Result<AnimationData, GenerateError> {
    let envelope: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GenerateError::RequestFailure(format!("unexpected response envelope: {}", e)))?;

    let text: String = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerateError::RequestFailure("response contained no text".to_string()));
    }
    parse_generated_text(&text)
}

/// Blocking client for the generation service.
#[derive(Debug)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: ApiKey,
}

impl GeminiClient {
    pub fn new(api_key: ApiKey, base_url: impl Into<String>, timeout: Duration) -> Result<Self, GenerateError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerateError::RequestFailure(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }

    fn endpoint(&self, request: &GenerationRequest) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            request.model.id()
        )
    }
}

impl AnimationSource for GeminiClient {
    fn generate(&self, request: &GenerationRequest) -> Result<AnimationData, GenerateError> {
        let url = self.endpoint(request);
        tracing::info!(model = %request.model, "requesting animation");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&request_body(request))
            .send()
            .map_err(|e| GenerateError::RequestFailure(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| GenerateError::RequestFailure(e.to_string()))?;
        if !status.is_success() {
            return Err(GenerateError::RequestFailure(format!("service returned {}: {}", status, body)));
        }

        let animation = parse_response_body(&body)?;
        tracing::info!(
            frames = animation.frame_count(),
            colors = animation.palette().len(),
            cadence_ms = animation.cadence_ms(),
            "animation received"
        );
        Ok(animation)
    }
}
