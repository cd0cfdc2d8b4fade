//! Secondary model call that turns malformed output into JSON

use std::sync::Arc;

use tracing::{debug, info};

use super::extract::{JsonObject, parse_local};
use super::{ModelCaller, PipelineError};
use crate::llm::CompletionRequest;
use crate::prompts::{PromptContext, PromptLoader};

/// Repair calls are deterministic
pub const REPAIR_TEMPERATURE: f32 = 0.0;

/// Asks the model to fix formatting (not content) of a broken reply
pub struct Repairer {
    caller: ModelCaller,
    prompts: Arc<PromptLoader>,
    max_tokens: u32,
}

impl Repairer {
    pub fn new(caller: ModelCaller, prompts: Arc<PromptLoader>, max_tokens: u32) -> Self {
        Self {
            caller,
            prompts,
            max_tokens,
        }
    }

    /// One repair attempt; the result is parsed with local strategies only
    pub async fn repair(&self, raw: &str) -> Result<JsonObject, PipelineError> {
        debug!(len = raw.len(), "Repairer::repair: called");
        let ctx = PromptContext::repair(raw);
        let system = self
            .prompts
            .render("repair-system", &ctx)
            .map_err(|e| PipelineError::Template(e.to_string()))?;
        let user = self
            .prompts
            .render("repair-user", &ctx)
            .map_err(|e| PipelineError::Template(e.to_string()))?;

        let request = CompletionRequest::single(system, user, self.max_tokens, REPAIR_TEMPERATURE);
        let repaired = self.caller.call(request).await?;

        match parse_local(&repaired) {
            Some(obj) => {
                info!("Repairer::repair: model output repaired");
                Ok(obj)
            }
            None => {
                debug!("Repairer::repair: repaired text still not a JSON object");
                Err(PipelineError::Parse("Repaired output is not a JSON object".to_string()))
            }
        }
    }
}
