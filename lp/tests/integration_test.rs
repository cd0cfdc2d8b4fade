//! Integration tests for learnpath
//!
//! These drive the full pipeline through a scripted client that answers by
//! call kind (skeleton, enrichment, repair).

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use learnpath::config::GenerationConfig;
use learnpath::domain::TopicDetails;
use learnpath::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
use learnpath::pipeline;
use learnpath::prompts::PromptLoader;
use learnpath::service::{GENERATION_FAILED_MESSAGE, GenerationResponse, LearningPathService, save_to_store};
use pathstore::PathStore;
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Scripted client
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum CallKind {
    Skeleton,
    Enrich,
    Repair,
}

fn kind_of(request: &CompletionRequest) -> CallKind {
    if request.system_prompt.contains("repair malformed JSON") {
        CallKind::Repair
    } else if request.system_prompt.contains("curriculum designer") {
        CallKind::Enrich
    } else {
        CallKind::Skeleton
    }
}

type Answer = Box<dyn Fn(CallKind, &str) -> Result<String, LlmError> + Send + Sync>;

struct ScriptedClient {
    answer: Answer,
    calls: Mutex<Vec<(CallKind, f32)>>,
}

impl ScriptedClient {
    fn new(answer: impl Fn(CallKind, &str) -> Result<String, LlmError> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            answer: Box::new(answer),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(CallKind, f32)> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, kind: CallKind) -> usize {
        self.calls().iter().filter(|(k, _)| *k == kind).count()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let kind = kind_of(&request);
        self.calls.lock().unwrap().push((kind, request.temperature));
        let user = request.user_text().unwrap_or_default().to_string();
        (self.answer)(kind, &user).map(CompletionResponse::text)
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

fn topic_of(user: &str) -> String {
    user.lines()
        .find_map(|l| l.strip_prefix("Topic: "))
        .unwrap_or("unknown")
        .to_string()
}

fn python_skeleton() -> String {
    json!({
        "title": "Python Basics",
        "overview": "From zero to writing small scripts",
        "total_duration": "3 weeks",
        "topics": [
            {"name": "Syntax and Variables", "duration": "1 week", "description": "Core syntax"},
            {"name": "Control Flow", "duration": "1 week", "description": "if, for, while"},
            {"name": "Functions", "duration": "1 week", "description": "def and scope"}
        ]
    })
    .to_string()
}

fn enrichment_for(topic: &str) -> String {
    json!({
        "resources": [
            {"type": "video", "title": format!("{topic} crash course"), "url": "https://www.youtube.com/watch?v=abc123&t=10", "estimated_time": "30 minutes"},
            {"type": "documentation", "title": "Python tutorial", "url": "https://docs.python.org/3/tutorial/", "estimated_time": "2 hours"}
        ],
        "projects": [
            {"name": format!("{topic} exercises"), "description": "Small practice programs", "complexity": "beginner"}
        ],
        "study_plan": [
            {"day": "1", "tasks": ["Watch the video", "Read the tutorial"]},
            {"day": "2", "tasks": ["Do the exercises"]}
        ]
    })
    .to_string()
}

fn service(client: Arc<ScriptedClient>) -> LearningPathService {
    LearningPathService::new(client, PromptLoader::embedded_only(), &GenerationConfig::default())
}

fn count_topic_nodes(chart: &str) -> usize {
    chart
        .lines()
        .map(str::trim)
        .filter(|l| {
            l.strip_prefix("topic")
                .and_then(|rest| rest.split_once('['))
                .is_some_and(|(idx, _)| !idx.is_empty() && idx.chars().all(|c| c.is_ascii_digit()))
        })
        .count()
}

// =============================================================================
// End-to-end
// =============================================================================

#[tokio::test]
async fn test_learn_python_basics_end_to_end() {
    let client = ScriptedClient::new(|kind, user| match kind {
        CallKind::Skeleton => Ok(python_skeleton()),
        CallKind::Enrich => Ok(format!("Here is the material:\n```json\n{}\n```", enrichment_for(&topic_of(user)))),
        CallKind::Repair => Err(LlmError::InvalidResponse("unexpected repair".to_string())),
    });

    let response = service(client.clone()).generate_learning_path("learn Python basics").await;

    let GenerationResponse::Success {
        learning_path,
        roadmap_flowchart,
    } = response
    else {
        panic!("expected success");
    };

    assert_eq!(learning_path.title, "Python Basics");
    assert_eq!(learning_path.topics.len(), 3);
    assert_eq!(learning_path.topics[1].name, "Control Flow");
    assert_eq!(learning_path.topics[1].projects[0].name, "Control Flow exercises");
    assert_eq!(
        learning_path.topics[0].resources[0].url,
        "https://www.youtube.com/embed/abc123"
    );

    // Normalization leaves an already complete path untouched
    let renormalized = pipeline::normalize(&serde_json::to_value(&learning_path).unwrap()).unwrap();
    assert_eq!(renormalized, learning_path);

    assert_eq!(count_topic_nodes(&roadmap_flowchart), 3);
    assert_eq!(roadmap_flowchart.matches("start([").count(), 1);
    assert_eq!(roadmap_flowchart.matches("finish([").count(), 1);
    assert!(roadmap_flowchart.contains("topic2_projects --> finish"));

    assert_eq!(client.count(CallKind::Skeleton), 1);
    assert_eq!(client.count(CallKind::Enrich), 3);
    assert_eq!(client.count(CallKind::Repair), 0);
}

#[tokio::test]
async fn test_zero_topics_never_reaches_enrichment() {
    let client = ScriptedClient::new(|kind, _| match kind {
        CallKind::Skeleton => Ok(r#"{"title": "Nothing", "overview": "", "topics": []}"#.to_string()),
        _ => Err(LlmError::InvalidResponse("unexpected call".to_string())),
    });

    let response = service(client.clone()).generate_learning_path("learn nothing").await;

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json, json!({"status": "error", "message": GENERATION_FAILED_MESSAGE}));
    assert_eq!(client.count(CallKind::Enrich), 0);
}

#[tokio::test]
async fn test_one_failing_topic_gets_fallback_details() {
    let client = ScriptedClient::new(|kind, user| match kind {
        CallKind::Skeleton => Ok(python_skeleton()),
        CallKind::Enrich if topic_of(user) == "Control Flow" => Ok("I'd rather not.".to_string()),
        CallKind::Enrich => Ok(enrichment_for(&topic_of(user))),
        CallKind::Repair => Ok("Still not JSON".to_string()),
    });

    let response = service(client.clone()).generate_learning_path("learn Python basics").await;
    let GenerationResponse::Success { learning_path, .. } = response else {
        panic!("expected success");
    };

    let fallback = TopicDetails::fallback();
    let failed = &learning_path.topics[1];
    assert_eq!(failed.resources, fallback.resources);
    assert_eq!(failed.projects, fallback.projects);
    assert_eq!(failed.study_plan, fallback.study_plan);

    assert_eq!(learning_path.topics[0].projects[0].name, "Syntax and Variables exercises");
    assert_eq!(learning_path.topics[2].projects[0].name, "Functions exercises");

    // The failed topic cost exactly one repair attempt, at temperature 0
    let repairs: Vec<_> = client.calls().into_iter().filter(|(k, _)| *k == CallKind::Repair).collect();
    assert_eq!(repairs, vec![(CallKind::Repair, 0.0)]);
}

#[tokio::test]
async fn test_malformed_skeleton_recovered_by_repair() {
    let client = ScriptedClient::new(|kind, user| match kind {
        CallKind::Skeleton => Ok("title: Python Basics\ntopics: Syntax, Control Flow, Functions".to_string()),
        CallKind::Repair => Ok(python_skeleton()),
        CallKind::Enrich => Ok(enrichment_for(&topic_of(user))),
    });

    let response = service(client.clone()).generate_learning_path("learn Python basics").await;
    assert!(matches!(response, GenerationResponse::Success { .. }));
    assert_eq!(client.count(CallKind::Repair), 1);
}

#[tokio::test]
async fn test_generated_path_saves_and_reloads() {
    let client = ScriptedClient::new(|kind, user| match kind {
        CallKind::Skeleton => Ok(python_skeleton()),
        _ => Ok(enrichment_for(&topic_of(user))),
    });
    let response = service(client).generate_learning_path("learn Python basics").await;
    let GenerationResponse::Success {
        learning_path,
        roadmap_flowchart,
    } = response
    else {
        panic!("expected success");
    };

    let temp = TempDir::new().expect("Failed to create temp dir");
    let store = PathStore::open(temp.path()).unwrap();
    let details = save_to_store(&store, &learning_path, &roadmap_flowchart, None).unwrap();

    assert!(details.storage_location.contains("learning-paths/anonymous/"));
    assert_eq!(store.flowchart(&details.path_id).unwrap(), roadmap_flowchart);

    let saved = store.get(&details.path_id).unwrap();
    let reloaded = pipeline::normalize(&saved.learning_path).unwrap();
    assert_eq!(reloaded, learning_path);
}
