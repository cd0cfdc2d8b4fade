//! JSON recovery from raw model text
//!
//! Strategies run in order and the first one yielding a JSON object wins:
//! 1. direct parse of the trimmed text
//! 2. fenced code blocks, in order of appearance
//! 3. the first balanced `{...}` fragment, as-is then with common fixes
//! 4. a repair call to the model

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::Repairer;

/// A parsed JSON object
pub type JsonObject = Map<String, Value>;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[ \t]*(?:json|JSON)?[ \t]*\r?\n?(.*?)```").expect("valid fence regex"));

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("valid trailing comma regex"));

/// Recovers JSON objects from model output, calling on the repairer last
pub struct JsonExtractor {
    repairer: Repairer,
}

impl JsonExtractor {
    pub fn new(repairer: Repairer) -> Self {
        Self { repairer }
    }

    /// Extract a JSON object from `raw`
    ///
    /// Returns `None` when every strategy fails, including the repair call.
    pub async fn extract(&self, raw: &str) -> Option<JsonObject> {
        debug!(len = raw.len(), "JsonExtractor::extract: called");
        if let Some(obj) = parse_local(raw) {
            return Some(obj);
        }

        debug!("JsonExtractor::extract: local strategies failed, requesting repair");
        match self.repairer.repair(raw).await {
            Ok(obj) => Some(obj),
            Err(e) => {
                warn!(error = %e, "JsonExtractor::extract: repair failed");
                None
            }
        }
    }
}

/// Strategies 1-3: no model call involved
pub fn parse_local(raw: &str) -> Option<JsonObject> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        debug!("parse_local: empty input");
        return None;
    }

    if let Some(obj) = parse_object(trimmed) {
        debug!("parse_local: direct parse succeeded");
        return Some(obj);
    }

    for caps in FENCED_BLOCK.captures_iter(trimmed) {
        if let Some(obj) = caps.get(1).and_then(|m| parse_object(m.as_str().trim())) {
            debug!("parse_local: fenced block parsed");
            return Some(obj);
        }
    }

    for fragment in balanced_fragments(trimmed) {
        if let Some(obj) = parse_object(fragment) {
            debug!("parse_local: balanced fragment parsed");
            return Some(obj);
        }
        if let Some(obj) = parse_object(&fix_json_issues(fragment)) {
            debug!("parse_local: balanced fragment parsed after cleanup");
            return Some(obj);
        }
    }

    debug!("parse_local: no strategy produced an object");
    None
}

/// Strict parse, objects only
fn parse_object(text: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}

/// Every top-level balanced `{...}` span, in order, ignoring braces inside string literals
fn balanced_fragments(text: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;
    let mut start = None;

    for (i, c) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape_next = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0
                    && let Some(s) = start.take()
                {
                    fragments.push(&text[s..=i]);
                }
            }
            _ => {}
        }
    }

    fragments
}

/// Fix the usual model slips: trailing commas, typographic quotes, stray control chars
fn fix_json_issues(json: &str) -> String {
    let fixed = TRAILING_COMMA.replace_all(json, "$1");
    fixed
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect()
}
