//! Domain types for generated learning paths
//!
//! - [`LearningPath`] - the finished plan handed back to callers
//! - [`Skeleton`] - first-phase output before enrichment
//! - [`TopicDetails`] - what one enrichment call contributes to a topic

mod path;

pub use path::{LearningPath, Project, Resource, Skeleton, StudyDay, Topic, TopicDetails, TopicOutline};
