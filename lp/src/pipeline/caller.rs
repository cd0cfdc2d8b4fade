//! Single model call with an explicit deadline

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::PipelineError;
use crate::llm::{CompletionRequest, LlmClient, LlmError, StopReason};

/// Wraps an injected client with the per-call timeout every phase shares
#[derive(Clone)]
pub struct ModelCaller {
    llm: Arc<dyn LlmClient>,
    timeout: Duration,
}

impl ModelCaller {
    pub fn new(llm: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    /// Issue one request and return its text
    ///
    /// A timeout surfaces as `LlmError::Timeout`; an empty reply is a parse failure.
    pub async fn call(&self, request: CompletionRequest) -> Result<String, PipelineError> {
        debug!(max_tokens = request.max_tokens, temperature = request.temperature, "ModelCaller::call: called");
        let response = tokio::time::timeout(self.timeout, self.llm.complete(request))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))??;

        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            cost_usd = response.usage.cost_usd(self.llm.model()),
            "ModelCaller::call: usage"
        );
        if response.stop_reason == StopReason::MaxTokens {
            debug!("ModelCaller::call: response truncated at max tokens");
        }

        response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| PipelineError::Parse("Model returned an empty response".to_string()))
    }
}
