//! Pipeline error types

use thiserror::Error;

use crate::llm::LlmError;

/// Errors raised inside the generation pipeline
///
/// Most of these never reach the caller: skeleton failures become an error
/// payload and per-topic failures are masked with defaults.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The model call itself failed (network, throttling, quota, timeout)
    #[error("Upstream model call failed: {0}")]
    Upstream(#[from] LlmError),

    /// Model output could not be coerced into the expected JSON
    #[error("Could not parse model output: {0}")]
    Parse(String),

    /// The final structure is not a JSON object at all
    #[error("Invalid learning path: {0}")]
    Validation(String),

    /// A prompt template failed to load or render
    #[error("Prompt template error: {0}")]
    Template(String),
}
