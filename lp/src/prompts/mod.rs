//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for every model call the
//! pipeline makes.
//!
//! Template loading chain:
//! 1. `{prompts-dir}/{name}.pmt` (user override, from config)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution. HTML escaping is
//! disabled; prompts are plain text.

pub mod embedded;
mod loader;

pub use loader::{PromptContext, PromptLoader};
