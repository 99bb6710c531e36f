//! JSON contract layer for model output
//!
//! Model responses are instructed to be strict JSON but must never be
//! trusted to be. This module extracts a JSON object from free text
//! (including markdown-fenced blocks), parses it, and checks required
//! keys, degrading every failure into data rather than an error: parse
//! failures become an empty payload plus a warning, missing keys become
//! one warning each. Callers apply their own defaults.

use serde_json::{Map, Value};
use thiserror::Error;

/// Failure to recover a JSON value from raw model output
#[derive(Debug, Error)]
pub enum ContractError {
    /// No JSON object could be located in the text
    #[error("no JSON object found in response")]
    NoJsonFound,

    /// A candidate substring was found but did not parse
    #[error("JSON parse error: {0}")]
    Parse(String),
}

/// Payload plus advisory warnings
///
/// Warnings never prevent `data` from being used.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Parsed top-level object, empty if extraction failed
    pub data: Map<String, Value>,
    /// One entry per parse failure or missing required key
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Whether validation produced no warnings
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Extract the JSON substring from potentially markdown-wrapped output
///
/// Tries a ```json fence, then a bare ``` fence, then the first `{` to
/// the last `}`. Fence interiors get the same brace slicing, so prose
/// inside a fence does not defeat extraction. Returns the input
/// unchanged when nothing matches.
#[must_use]
pub fn extract_json(response: &str) -> &str {
    let response = response.trim();

    // Handle ```json ... ``` blocks
    if let Some(start) = response.find("```json") {
        if let Some(end) = response[start + 7..].find("```") {
            return brace_slice(response[start + 7..start + 7 + end].trim());
        }
    }

    // Handle ``` ... ``` blocks
    if let Some(start) = response.find("```") {
        if let Some(end) = response[start + 3..].find("```") {
            return brace_slice(response[start + 3..start + 3 + end].trim());
        }
    }

    brace_slice(response)
}

/// Slice from the first `{` to the last `}` when both are present
///
/// Ensures start <= end to avoid panics with malformed input like "} {".
fn brace_slice(text: &str) -> &str {
    if let Some(start) = text.find('{') {
        if let Some(end) = text.rfind('}') {
            if start <= end {
                return &text[start..=end];
            }
        }
    }
    text
}

/// Extract and parse a JSON value from raw model output
///
/// # Errors
///
/// Returns `ContractError::NoJsonFound` when the text contains no brace
/// pair at all, `ContractError::Parse` when a candidate substring fails
/// to parse. Never panics.
pub fn parse_payload(raw: &str) -> Result<Value, ContractError> {
    let candidate = extract_json(raw);
    if !candidate.contains('{') {
        return Err(ContractError::NoJsonFound);
    }
    serde_json::from_str(candidate).map_err(|e| ContractError::Parse(e.to_string()))
}

/// Check a parsed value for required top-level keys
///
/// Non-object input degrades to an empty map with every required key
/// reported missing. Total: always returns a result, never fails.
#[must_use]
pub fn validate_keys(value: Value, required: &[&str]) -> ValidationResult {
    let data = match value {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let warnings = required
        .iter()
        .filter(|key| !data.contains_key(**key))
        .map(|key| format!("missing required key: {key}"))
        .collect();

    ValidationResult { data, warnings }
}

/// Extract, parse, and validate in one step
///
/// A parse failure yields an empty payload with the parse warning plus
/// one missing-key warning per required key.
#[must_use]
pub fn load_validated(raw: &str, required: &[&str]) -> ValidationResult {
    match parse_payload(raw) {
        Ok(value) => validate_keys(value, required),
        Err(e) => {
            let mut result = validate_keys(Value::Null, required);
            result.warnings.insert(0, e.to_string());
            result
        },
    }
}
