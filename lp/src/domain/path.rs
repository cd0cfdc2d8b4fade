//! LearningPath and its parts

use serde::{Deserialize, Serialize};

/// A structured learning plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub title: String,
    pub overview: String,
    pub total_duration: String,
    pub topics: Vec<Topic>,
}

/// One stage of a learning path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub duration: String,
    pub description: String,
    pub resources: Vec<Resource>,
    pub projects: Vec<Project>,
    pub study_plan: Vec<StudyDay>,
}

impl Topic {
    /// Attach enrichment output to a skeleton topic
    pub fn from_outline(outline: TopicOutline, details: TopicDetails) -> Self {
        Self {
            name: outline.name,
            duration: outline.duration,
            description: outline.description,
            resources: details.resources,
            projects: details.projects,
            study_plan: details.study_plan,
        }
    }
}

/// A learning resource (video, article, course...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub url: String,
    pub estimated_time: String,
}

/// A hands-on project
///
/// `complexity` is nominally beginner, intermediate or advanced, but whatever
/// the model wrote is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub complexity: String,
}

/// One day of a study plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyDay {
    pub day: String,
    pub tasks: Vec<String>,
}

/// First-phase output: top-level fields and topic outlines only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub title: String,
    pub overview: String,
    pub total_duration: String,
    pub topics: Vec<TopicOutline>,
}

/// A topic as the skeleton call describes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicOutline {
    pub name: String,
    pub duration: String,
    pub description: String,
}

/// Resources, projects and study plan for one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicDetails {
    pub resources: Vec<Resource>,
    pub projects: Vec<Project>,
    pub study_plan: Vec<StudyDay>,
}

impl TopicDetails {
    /// Fixed placeholder used when a topic could not be enriched
    pub fn fallback() -> Self {
        Self {
            resources: vec![Resource::fallback()],
            projects: vec![Project::fallback()],
            study_plan: vec![StudyDay::fallback()],
        }
    }
}

impl Resource {
    pub fn fallback() -> Self {
        Self {
            kind: "article".to_string(),
            title: "Search for tutorials on this topic".to_string(),
            url: "https://www.google.com/search?q=tutorials".to_string(),
            estimated_time: "1 hour".to_string(),
        }
    }
}

impl Project {
    pub fn fallback() -> Self {
        Self {
            name: "Practice project".to_string(),
            description: "Build a small project that applies the concepts from this topic.".to_string(),
            complexity: "beginner".to_string(),
        }
    }
}

impl StudyDay {
    pub fn fallback() -> Self {
        Self {
            day: "1".to_string(),
            tasks: vec![
                "Review the topic overview".to_string(),
                "Work through the suggested resource".to_string(),
            ],
        }
    }
}
