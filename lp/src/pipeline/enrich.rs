//! Second-phase calls: one enrichment per skeleton topic

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::extract::JsonObject;
use super::normalize::{list_field, project_from_value, resource_from_value, study_day_from_value};
use super::{JsonExtractor, ModelCaller, PipelineError};
use crate::config::GenerationConfig;
use crate::domain::{LearningPath, Skeleton, Topic, TopicDetails, TopicOutline};
use crate::llm::CompletionRequest;
use crate::prompts::{PromptContext, PromptLoader};

/// Fills each topic with resources, projects and a study plan
pub struct TopicEnricher {
    caller: ModelCaller,
    prompts: Arc<PromptLoader>,
    extractor: Arc<JsonExtractor>,
    max_tokens: u32,
    temperature: f32,
    concurrency: usize,
}

impl TopicEnricher {
    pub fn new(
        caller: ModelCaller,
        prompts: Arc<PromptLoader>,
        extractor: Arc<JsonExtractor>,
        config: &GenerationConfig,
    ) -> Self {
        Self {
            caller,
            prompts,
            extractor,
            max_tokens: config.enrich_max_tokens,
            temperature: config.enrich_temperature,
            concurrency: config.concurrency.max(1),
        }
    }

    /// Enrich every topic; a failing topic gets the fixed fallback details
    ///
    /// Output order matches skeleton order regardless of concurrency.
    pub async fn enrich(&self, skeleton: Skeleton) -> LearningPath {
        debug!(topics = skeleton.topics.len(), concurrency = self.concurrency, "enrich: called");
        let Skeleton {
            title,
            overview,
            total_duration,
            topics,
        } = skeleton;

        let title_ref = title.as_str();
        let topics: Vec<Topic> = stream::iter(topics.into_iter().enumerate())
            .map(|(idx, outline)| async move {
                let details = match self.enrich_topic(title_ref, &outline).await {
                    Ok(details) => {
                        debug!(idx, topic = %outline.name, "enrich: topic enriched");
                        details
                    }
                    Err(e) => {
                        warn!(idx, topic = %outline.name, error = %e, "enrich: using fallback details");
                        TopicDetails::fallback()
                    }
                };
                Topic::from_outline(outline, details)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        info!(topics = topics.len(), "enrich: all topics processed");
        LearningPath {
            title,
            overview,
            total_duration,
            topics,
        }
    }

    async fn enrich_topic(&self, title: &str, outline: &TopicOutline) -> Result<TopicDetails, PipelineError> {
        debug!(topic = %outline.name, "enrich_topic: called");
        let ctx = PromptContext::enrich(title, &outline.name, &outline.duration, &outline.description);
        let system = self
            .prompts
            .render("enrich-system", &ctx)
            .map_err(|e| PipelineError::Template(e.to_string()))?;
        let user = self
            .prompts
            .render("enrich-user", &ctx)
            .map_err(|e| PipelineError::Template(e.to_string()))?;

        let raw = self
            .caller
            .call(CompletionRequest::single(system, user, self.max_tokens, self.temperature))
            .await?;

        let obj = self
            .extractor
            .extract(&raw)
            .await
            .ok_or_else(|| PipelineError::Parse("No JSON object in enrichment response".to_string()))?;

        details_from_object(&obj)
    }
}

/// All three lists must be present as arrays; video links are rewritten
fn details_from_object(obj: &JsonObject) -> Result<TopicDetails, PipelineError> {
    let missing = |key: &str| PipelineError::Parse(format!("Enrichment response lacks a '{key}' array"));
    Ok(TopicDetails {
        resources: list_field(obj, "resources", resource_from_value).ok_or_else(|| missing("resources"))?,
        projects: list_field(obj, "projects", project_from_value).ok_or_else(|| missing("projects"))?,
        study_plan: list_field(obj, "study_plan", study_day_from_value).ok_or_else(|| missing("study_plan"))?,
    })
}
