//! AI module for model-backed command explanations.
//!
//! This module builds localized prompts, talks to an OpenAI-compatible chat
//! completion endpoint and parses the JSON explanation it returns.

pub mod client;
pub mod error;
pub mod parser;
pub mod prompt;

pub use client::AiExplainer;
pub use error::AiError;
pub use parser::{AiExplanation, ExplanationSource};
pub use prompt::ExplainContext;
