//! learnpath - LLM-backed learning path generator
//!
//! Turns a free-text learning goal into a structured, multi-stage learning
//! path (topics, resources, projects, study plan) plus a Mermaid flowchart.
//!
//! # Pipeline
//!
//! 1. **Skeleton**: one model call for title, overview and a few topic outlines
//! 2. **Enrichment**: one model call per topic for resources, projects and a study plan
//! 3. **Normalization**: defaults for anything missing, video links made embeddable
//! 4. **Flowchart**: deterministic Mermaid rendering of the result
//!
//! Model output is never trusted to be JSON. Every reply goes through a
//! layered extractor (direct parse, fenced blocks, brace salvage) and, as a
//! last resort, a temperature-0 repair call.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait with Anthropic and OpenAI implementations
//! - [`prompts`] - Handlebars prompt templates
//! - [`domain`] - LearningPath and its parts
//! - [`pipeline`] - extraction, repair, generation, normalization, rendering
//! - [`service`] - the `generate_learning_path` operation
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod service;

pub use config::{Config, GenerationConfig, LlmConfig};
pub use domain::{LearningPath, Project, Resource, Skeleton, StudyDay, Topic};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage, create_client};
pub use pipeline::PipelineError;
pub use service::{GenerationResponse, LearningPathService};
