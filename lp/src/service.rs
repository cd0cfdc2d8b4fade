//! Inbound operation: goal text in, learning path payload out

use std::sync::Arc;
use std::time::Duration;

use eyre::{Context, Result};
use pathstore::{PathDetails, PathStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::GenerationConfig;
use crate::domain::LearningPath;
use crate::llm::LlmClient;
use crate::pipeline::{self, BasicPathGenerator, JsonExtractor, ModelCaller, Repairer, TopicEnricher};
use crate::prompts::PromptLoader;

pub const NO_INPUT_MESSAGE: &str = "No input prompt provided";
pub const GENERATION_FAILED_MESSAGE: &str =
    "Could not generate a valid learning path. Please try rephrasing your request.";

/// What the caller always gets back: a success or an error payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerationResponse {
    Success {
        learning_path: LearningPath,
        roadmap_flowchart: String,
    },
    Error {
        message: String,
    },
}

impl GenerationResponse {
    fn error(message: impl Into<String>) -> Self {
        GenerationResponse::Error {
            message: message.into(),
        }
    }
}

/// Runs the two-phase pipeline for one request at a time
///
/// Holds no per-request state, so one service can serve concurrent requests.
pub struct LearningPathService {
    basic: BasicPathGenerator,
    enricher: TopicEnricher,
}

impl LearningPathService {
    /// Wire the pipeline around an injected client
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, config: &GenerationConfig) -> Self {
        debug!(model = %llm.model(), max_topics = config.max_topics, "LearningPathService::new: called");
        let caller = ModelCaller::new(llm, Duration::from_millis(config.call_timeout_ms));
        let prompts = Arc::new(prompts);
        let repairer = Repairer::new(caller.clone(), prompts.clone(), config.repair_max_tokens);
        let extractor = Arc::new(JsonExtractor::new(repairer));

        Self {
            basic: BasicPathGenerator::new(caller.clone(), prompts.clone(), extractor.clone(), config),
            enricher: TopicEnricher::new(caller, prompts, extractor, config),
        }
    }

    /// Generate a learning path for `goal`
    ///
    /// Never fails: every outcome is a well-formed payload.
    pub async fn generate_learning_path(&self, goal: &str) -> GenerationResponse {
        let goal = goal.trim();
        debug!(%goal, "generate_learning_path: called");
        if goal.is_empty() {
            debug!("generate_learning_path: empty goal");
            return GenerationResponse::error(NO_INPUT_MESSAGE);
        }

        let skeleton = match self.basic.generate_basic(goal).await {
            Some(s) if !s.topics.is_empty() => s,
            Some(_) => {
                info!("generate_learning_path: skeleton has no topics");
                return GenerationResponse::error(GENERATION_FAILED_MESSAGE);
            }
            None => return GenerationResponse::error(GENERATION_FAILED_MESSAGE),
        };

        let enriched = self.enricher.enrich(skeleton).await;

        // Normalizing our own output only fails if serialization does
        let learning_path = match serde_json::to_value(&enriched)
            .map_err(|e| pipeline::PipelineError::Validation(e.to_string()))
            .and_then(|value| pipeline::normalize(&value))
        {
            Ok(path) => path,
            Err(e) => {
                error!(error = %e, "generate_learning_path: normalization failed");
                return GenerationResponse::error(GENERATION_FAILED_MESSAGE);
            }
        };

        let roadmap_flowchart = pipeline::render(&learning_path);
        info!(
            title = %learning_path.title,
            topics = learning_path.topics.len(),
            "generate_learning_path: complete"
        );

        GenerationResponse::Success {
            learning_path,
            roadmap_flowchart,
        }
    }
}

/// Persist a generated path with its flowchart
pub fn save_to_store(
    store: &PathStore,
    learning_path: &LearningPath,
    flowchart: &str,
    user_id: Option<&str>,
) -> Result<PathDetails> {
    debug!(?user_id, "save_to_store: called");
    let value = serde_json::to_value(learning_path).context("Failed to serialize learning path")?;
    store.store(&value, flowchart, user_id)
}
