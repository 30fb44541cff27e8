//! Pull the JSON object out of a free-text LLM completion.
//!
//! Small models wrap JSON in markdown fences or chatter around it, so:
//! strip ```json / ``` markers, take the span from the first `{` to the last `}`,
//! then parse.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static RE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json)?\n?").expect("fence regex"));
static RE_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("object regex"));

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON object found in response")]
    NoObject,
    #[error("invalid JSON in response: {0}")]
    Invalid(#[from] serde_json::Error),
}

pub fn extract_json_object(text: &str) -> Result<Value, ExtractError> {
    let cleaned = RE_FENCE.replace_all(text, "");
    let span = RE_OBJECT
        .find(cleaned.trim())
        .ok_or(ExtractError::NoObject)?;
    Ok(serde_json::from_str(span.as_str())?)
}

/// First `max` chars of a completion, for error logs.
pub fn preview(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
