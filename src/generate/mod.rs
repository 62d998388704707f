//! Animation generation: the contract with the external generative service.
//!
//! [`AnimationSource`] is the seam. [`gemini::GeminiClient`] talks to the real
//! service; tests and other hosts plug in their own sources.

pub mod gemini;
pub mod request;

use std::fmt;

use thiserror::Error;

use crate::models::{AnimationData, ValidationError};

pub use request::{GenerationRequest, Model};

/// Environment variable holding the service credential.
pub const API_KEY_ENV: &str = "API_KEY";

/// The one message shown to users for any generation failure.
pub const USER_FACING_ERROR: &str = "Failed to generate animation. Please try a different prompt.";

/// Error type for generation failures
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No API key in the environment; generation is unavailable
    #[error("API_KEY environment variable is not set")]
    MissingCredential,
    /// Transport failure, non-success status, or an answer with no content
    #[error("generation request failed: {0}")]
    RequestFailure(String),
    /// The answer was not a valid animation
    #[error("malformed generation response: {0}")]
    MalformedResponse(#[from] ValidationError),
}

impl GenerateError {
    /// The message to surface to the user. Details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerateError::MissingCredential => "API_KEY environment variable is not set",
            GenerateError::RequestFailure(_) | GenerateError::MalformedResponse(_) => USER_FACING_ERROR,
        }
    }
}

/// Anything that can turn a request into a validated animation.
pub trait AnimationSource {
    fn generate(&self, request: &GenerationRequest) -> Result<AnimationData, GenerateError>;
}

/// The service credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, GenerateError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(GenerateError::MissingCredential);
        }
        Ok(Self(key))
    }

    /// Read the key from `API_KEY`. Absent or blank is `MissingCredential`.
    pub fn from_env() -> Result<Self, GenerateError> {
        let key = std::env::var(API_KEY_ENV).map_err(|_| GenerateError::MissingCredential)?;
        Self::new(key)
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Validate the text the model produced.
pub fn parse_generated_text(text: &str) -> Result<AnimationData, GenerateError> {
    Ok(AnimationData::from_json(text)?)
}
