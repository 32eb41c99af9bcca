//! Error types for the AI explainer

use std::time::Duration;

use async_openai::error::OpenAIError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AiError>;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI service is not configured (no API key)")]
    Unavailable,

    #[error("OpenAI API error: {0}")]
    Api(#[from] OpenAIError),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Model returned an empty response")]
    EmptyResponse,
}
