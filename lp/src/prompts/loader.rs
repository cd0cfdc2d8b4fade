//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Context for rendering prompt templates
///
/// One struct serves every template; each call fills only the fields its
/// templates reference.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PromptContext {
    /// The user's free-text learning goal
    pub goal: String,
    /// Upper bound on skeleton topics
    pub max_topics: usize,
    /// Learning path title (enrichment context)
    pub title: String,
    /// Topic being enriched
    pub topic: String,
    pub duration: String,
    pub description: String,
    /// Malformed model output to repair
    pub raw: String,
}

impl PromptContext {
    /// Context for the skeleton call
    pub fn basic(goal: impl Into<String>, max_topics: usize) -> Self {
        Self {
            goal: goal.into(),
            max_topics,
            ..Default::default()
        }
    }

    /// Context for one topic's enrichment call
    pub fn enrich(
        title: impl Into<String>,
        topic: impl Into<String>,
        duration: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            topic: topic.into(),
            duration: duration.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Context for the repair call
    pub fn repair(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            ..Default::default()
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (from `generation.prompts-dir`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a prompt loader, optionally backed by an override directory
    pub fn new(user_dir: Option<&Path>) -> Self {
        debug!(?user_dir, "PromptLoader::new: called");
        let user_dir = user_dir.filter(|d| d.is_dir()).map(Path::to_path_buf);
        if user_dir.is_none() {
            debug!("PromptLoader::new: no user override directory");
        }

        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);

        Self { hbs, user_dir }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        Self::new(None)
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `{user_dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}
