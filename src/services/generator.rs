use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when calling a text-generation service
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API credential configured. Not a runtime failure.
    #[error("text generation is not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Empty completion")]
    EmptyResponse,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Per-call generation settings
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub system_prompt: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            system_prompt: None,
        }
    }
}

/// External text-generation service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Whether a credential is present; an unconfigured generator is skipped
    fn is_configured(&self) -> bool {
        true
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError>;
}
