//! Shape guarantees for the final learning path
//!
//! Everything here is lenient: missing, blank or mistyped fields are replaced
//! with defaults rather than rejected. The coercion helpers are shared with
//! the skeleton and enrichment parsers so every phase agrees on defaults.

use serde_json::Value;
use tracing::debug;

use super::PipelineError;
use super::extract::JsonObject;
use super::video::to_embed_url;
use crate::domain::{LearningPath, Project, Resource, StudyDay, Topic, TopicDetails, TopicOutline};

pub const DEFAULT_TITLE: &str = "Untitled Learning Path";
pub const DEFAULT_OVERVIEW: &str = "No overview provided.";
pub const DEFAULT_DURATION: &str = "Flexible";
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// Normalize an arbitrary JSON value into a `LearningPath`
///
/// Fails only when `value` is not an object. Idempotent on its own output.
pub fn normalize(value: &Value) -> Result<LearningPath, PipelineError> {
    debug!("normalize: called");
    let obj = value
        .as_object()
        .ok_or_else(|| PipelineError::Validation(format!("expected a JSON object, got {}", kind_of(value))))?;

    let topics = match obj.get("topics") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| item.as_object().map(|t| topic_from_object(t, idx)))
            .collect(),
        Some(other) => {
            debug!(kind = kind_of(other), "normalize: topics is not an array");
            Vec::new()
        }
        None => Vec::new(),
    };

    Ok(LearningPath {
        title: text_field(obj, "title", DEFAULT_TITLE),
        overview: text_field(obj, "overview", DEFAULT_OVERVIEW),
        total_duration: text_field(obj, "total_duration", DEFAULT_DURATION),
        topics,
    })
}

fn topic_from_object(obj: &JsonObject, idx: usize) -> Topic {
    let outline = outline_from_object(obj, idx);
    let fallback = TopicDetails::fallback();
    let details = TopicDetails {
        resources: list_field(obj, "resources", resource_from_value).unwrap_or(fallback.resources),
        projects: list_field(obj, "projects", project_from_value).unwrap_or(fallback.projects),
        study_plan: list_field(obj, "study_plan", study_day_from_value).unwrap_or(fallback.study_plan),
    };
    Topic::from_outline(outline, details)
}

/// Name, duration and description of the topic at position `idx`
pub(crate) fn outline_from_object(obj: &JsonObject, idx: usize) -> TopicOutline {
    TopicOutline {
        name: text_field(obj, "name", &format!("Topic {}", idx + 1)),
        duration: text_field(obj, "duration", DEFAULT_DURATION),
        description: text_field(obj, "description", DEFAULT_DESCRIPTION),
    }
}

/// Parse an array field item by item
///
/// `None` when the field is absent, not an array, or non-empty without a
/// single usable item. An explicitly empty array is kept as-is.
pub(crate) fn list_field<T>(obj: &JsonObject, key: &str, item: fn(usize, &Value) -> Option<T>) -> Option<Vec<T>> {
    let items = obj.get(key)?.as_array()?;
    let parsed: Vec<T> = items.iter().enumerate().filter_map(|(idx, v)| item(idx, v)).collect();
    if parsed.is_empty() && !items.is_empty() {
        debug!(%key, count = items.len(), "list_field: no usable items");
        return None;
    }
    Some(parsed)
}

/// Objects are read field by field; a bare string is a URL or a title
pub(crate) fn resource_from_value(_idx: usize, value: &Value) -> Option<Resource> {
    match value {
        Value::Object(obj) => Some(Resource {
            kind: text_field(obj, "type", "article"),
            title: text_field(obj, "title", "Untitled resource"),
            url: to_embed_url(&text_field(obj, "url", "")),
            estimated_time: text_field(obj, "estimated_time", "Not specified"),
        }),
        Value::String(s) if !s.trim().is_empty() => Some(resource_from_text(s.trim())),
        _ => None,
    }
}

fn resource_from_text(text: &str) -> Resource {
    let is_link = ["http://", "https://", "www."].iter().any(|p| text.starts_with(p));
    let url = if is_link { to_embed_url(text) } else { String::new() };
    let kind = if url.contains("youtube.com/embed/") { "video" } else { "article" };
    Resource {
        kind: kind.to_string(),
        title: text.to_string(),
        url,
        estimated_time: "Not specified".to_string(),
    }
}

/// Objects are read field by field; a bare string is the project name
pub(crate) fn project_from_value(_idx: usize, value: &Value) -> Option<Project> {
    let (name, obj) = match value {
        Value::Object(obj) => (text_field(obj, "name", "Untitled project"), Some(obj)),
        Value::String(s) if !s.trim().is_empty() => (s.trim().to_string(), None),
        _ => return None,
    };
    Some(Project {
        name,
        description: obj.map_or_else(|| DEFAULT_DESCRIPTION.to_string(), |o| text_field(o, "description", DEFAULT_DESCRIPTION)),
        complexity: obj.map_or_else(|| "beginner".to_string(), |o| text_field(o, "complexity", "beginner")),
    })
}

/// Day `idx + 1`; a bare string is a single task, a bare array a task list
pub(crate) fn study_day_from_value(idx: usize, value: &Value) -> Option<StudyDay> {
    let day = (idx + 1).to_string();
    let tasks_of = |items: &Vec<Value>| -> Vec<String> {
        items.iter().filter_map(scalar_text).filter(|t| !t.trim().is_empty()).collect()
    };
    match value {
        Value::Object(obj) => Some(StudyDay {
            day: text_field(obj, "day", &day),
            tasks: obj.get("tasks").and_then(Value::as_array).map(tasks_of).unwrap_or_default(),
        }),
        Value::String(s) if !s.trim().is_empty() => Some(StudyDay {
            day,
            tasks: vec![s.clone()],
        }),
        Value::Array(items) => {
            let tasks = tasks_of(items);
            (!tasks.is_empty()).then_some(StudyDay { day, tasks })
        }
        _ => None,
    }
}

/// A string-valued field, with numbers and booleans stringified
///
/// Blank, null and structured values fall back to `default`.
pub(crate) fn text_field(obj: &JsonObject, key: &str, default: &str) -> String {
    obj.get(key)
        .and_then(scalar_text)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
