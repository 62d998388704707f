//! What gets sent to the generative service.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Sampling temperature used for every request.
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Fixed instructions given to the model ahead of every prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are a creative sprite artist specializing in 16x16 pixel art animations. You only use flat colors and no gradients. Your output must be a valid JSON object matching the provided schema.";

/// Selectable generation models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Model {
    #[default]
    #[serde(rename = "gemini-2.5-flash", alias = "flash")]
    #[value(name = "flash", alias = "gemini-2.5-flash")]
    Flash,
    #[serde(rename = "gemini-2.5-pro", alias = "pro")]
    #[value(name = "pro", alias = "gemini-2.5-pro")]
    Pro,
}

impl Model {
    /// Identifier the service knows the model by.
    pub fn id(self) -> &'static str {
        match self {
            Model::Flash => "gemini-2.5-flash",
            Model::Pro => "gemini-2.5-pro",
        }
    }

    /// Label for display.
    pub fn label(self) -> &'static str {
        match self {
            Model::Flash => "GEMINI 2.5 FLASH",
            Model::Pro => "GEMINI 2.5 PRO",
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// One generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: Model,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, model: Model) -> Self {
        Self {
            prompt: prompt.into(),
            model,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// The user turn: the prompt embedded in the animation template.
    pub fn user_content(&self) -> String {
        format!(
            "Generate a looping 16x16 pixel art animation based on this description: \"{}\". The animation should be simple, with flat colors and clear character or object motion.",
            self.prompt
        )
    }
}

/// JSON schema the model's answer must follow.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "palette": {
                "type": "ARRAY",
                "description": "An array of 5 to 7 hex color strings used in the animation. The first color is usually the background.",
                "items": { "type": "STRING" }
            },
            "frames": {
                "type": "ARRAY",
                "description": "An array of 10 to 20 frames for a looping 16x16 pixel animation. Each frame is a 16x16 2D array of palette indices.",
                "items": {
                    "type": "ARRAY",
                    "items": {
                        "type": "ARRAY",
                        "items": {
                            "type": "INTEGER",
                            "description": "Index corresponding to the 'palette' array."
                        }
                    }
                }
            },
            "cadenceMs": {
                "type": "INTEGER",
                "description": "The recommended time in milliseconds between each frame, between 100 and 500."
            }
        },
        "required": ["palette", "frames", "cadenceMs"]
    })
}
