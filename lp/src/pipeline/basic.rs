//! First-phase call: the learning path skeleton

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::extract::JsonObject;
use super::normalize::{DEFAULT_DURATION, DEFAULT_OVERVIEW, DEFAULT_TITLE, outline_from_object, text_field};
use super::{JsonExtractor, ModelCaller, PipelineError};
use crate::config::GenerationConfig;
use crate::domain::Skeleton;
use crate::llm::CompletionRequest;
use crate::prompts::{PromptContext, PromptLoader};

/// Produces the short top-level skeleton for a goal
pub struct BasicPathGenerator {
    caller: ModelCaller,
    prompts: Arc<PromptLoader>,
    extractor: Arc<JsonExtractor>,
    max_topics: usize,
    max_tokens: u32,
    temperature: f32,
}

impl BasicPathGenerator {
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
            max_topics: config.max_topics,
            max_tokens: config.basic_max_tokens,
            temperature: config.basic_temperature,
        }
    }

    /// Generate a skeleton, or `None` on any failure
    ///
    /// A skeleton with zero topics is still returned; callers decide what
    /// that means.
    pub async fn generate_basic(&self, goal: &str) -> Option<Skeleton> {
        debug!(%goal, "generate_basic: called");
        match self.try_generate(goal).await {
            Ok(skeleton) => {
                info!(title = %skeleton.title, topics = skeleton.topics.len(), "generate_basic: skeleton ready");
                Some(skeleton)
            }
            Err(e) => {
                warn!(error = %e, "generate_basic: failed");
                None
            }
        }
    }

    async fn try_generate(&self, goal: &str) -> Result<Skeleton, PipelineError> {
        let ctx = PromptContext::basic(goal, self.max_topics);
        let system = self
            .prompts
            .render("basic-system", &ctx)
            .map_err(|e| PipelineError::Template(e.to_string()))?;
        let user = self
            .prompts
            .render("basic-user", &ctx)
            .map_err(|e| PipelineError::Template(e.to_string()))?;

        let raw = self
            .caller
            .call(CompletionRequest::single(system, user, self.max_tokens, self.temperature))
            .await?;

        let obj = self
            .extractor
            .extract(&raw)
            .await
            .ok_or_else(|| PipelineError::Parse("No JSON object in skeleton response".to_string()))?;

        Ok(skeleton_from_object(&obj, self.max_topics))
    }
}

/// Lenient skeleton parse, truncated to `max_topics`
fn skeleton_from_object(obj: &JsonObject, max_topics: usize) -> Skeleton {
    let mut topics: Vec<_> = obj
        .get("topics")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(idx, item)| item.as_object().map(|t| outline_from_object(t, idx)))
                .collect()
        })
        .unwrap_or_default();

    if topics.len() > max_topics {
        warn!(
            returned = topics.len(),
            max_topics, "skeleton_from_object: model exceeded topic cap, truncating"
        );
        topics.truncate(max_topics);
    }

    Skeleton {
        title: text_field(obj, "title", DEFAULT_TITLE),
        overview: text_field(obj, "overview", DEFAULT_OVERVIEW),
        total_duration: text_field(obj, "total_duration", DEFAULT_DURATION),
        topics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::{MockLlmClient, MockReply};
    use crate::pipeline::Repairer;
    use std::time::Duration;

    fn generator(mock: Arc<MockLlmClient>, max_topics: usize) -> BasicPathGenerator {
        let caller = ModelCaller::new(mock, Duration::from_secs(5));
        let prompts = Arc::new(PromptLoader::embedded_only());
        let extractor = Arc::new(JsonExtractor::new(Repairer::new(caller.clone(), prompts.clone(), 2000)));
        let config = GenerationConfig {
            max_topics,
            ..Default::default()
        };
        BasicPathGenerator::new(caller, prompts, extractor, &config)
    }

    fn skeleton_json(topic_count: usize) -> String {
        let topics: Vec<_> = (1..=topic_count)
            .map(|i| serde_json::json!({"name": format!("T{i}"), "duration": "1 week", "description": "d"}))
            .collect();
        serde_json::json!({
            "title": "Python Basics",
            "overview": "Learn Python",
            "total_duration": "3 weeks",
            "topics": topics
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_generate_basic_parses_skeleton() {
        let mock = Arc::new(MockLlmClient::new(vec![MockReply::text(skeleton_json(3))]));
        let skeleton = generator(mock.clone(), 4).generate_basic("learn Python basics").await.unwrap();

        assert_eq!(skeleton.title, "Python Basics");
        assert_eq!(skeleton.topics.len(), 3);
        assert_eq!(skeleton.topics[2].name, "T3");

        let request = &mock.requests()[0];
        assert_eq!(request.max_tokens, 1000);
        assert!(request.system_prompt.contains("between 3 and 4 topics"));
        assert_eq!(request.user_text(), Some("Learning goal: learn Python basics"));
    }

    #[tokio::test]
    async fn test_generate_basic_truncates_to_cap() {
        let mock = Arc::new(MockLlmClient::new(vec![MockReply::text(skeleton_json(6))]));
        let skeleton = generator(mock, 4).generate_basic("rust").await.unwrap();

        assert_eq!(skeleton.topics.len(), 4);
        assert_eq!(skeleton.topics[3].name, "T4");
    }

    #[tokio::test]
    async fn test_generate_basic_zero_topics_is_returned() {
        let mock = Arc::new(MockLlmClient::new(vec![MockReply::text(r#"{"title": "Empty", "topics": []}"#)]));
        let skeleton = generator(mock, 4).generate_basic("nothing").await.unwrap();
        assert!(skeleton.topics.is_empty());
    }

    #[tokio::test]
    async fn test_generate_basic_upstream_failure_is_none() {
        let mock = Arc::new(MockLlmClient::new(vec![MockReply::ApiError(401)]));
        assert!(generator(mock, 4).generate_basic("rust").await.is_none());
    }

    #[tokio::test]
    async fn test_generate_basic_unparseable_after_repair_is_none() {
        let mock = Arc::new(MockLlmClient::new(vec![
            MockReply::text("Sorry, I can't do that."),
            MockReply::text("Still no JSON."),
        ]));
        assert!(generator(mock.clone(), 4).generate_basic("rust").await.is_none());
        assert_eq!(mock.call_count(), 2);
    }
}
