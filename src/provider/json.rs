//! Extraction of JSON payloads from free-form model output.
//!
//! Models wrap JSON in markdown fences or surround it with prose; everything outside
//! the outermost brackets is discarded before strict parsing.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResponseParseError {
    #[error("no JSON {expected} found in response")]
    NoJson { expected: &'static str },

    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the first newline.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn between(text: &str, open: char, close: char) -> Option<&str> {
    let text = strip_code_fence(text);
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Returns the outermost `{...}` span, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    between(text, '{', '}')
}

/// Returns the outermost `[...]` span, if any.
pub fn extract_json_array(text: &str) -> Option<&str> {
    between(text, '[', ']')
}

pub fn parse_json_object<T: DeserializeOwned>(text: &str) -> Result<T, ResponseParseError> {
    let json = extract_json_object(text).ok_or(ResponseParseError::NoJson { expected: "object" })?;
    Ok(serde_json::from_str(json)?)
}

pub fn parse_json_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, ResponseParseError> {
    let json = extract_json_array(text).ok_or(ResponseParseError::NoJson { expected: "array" })?;
    Ok(serde_json::from_str(json)?)
}
