//! Recovering a tool call from free-form model text.
//!
//! Parsing is staged and permissive. First a candidate region is located:
//! the first fenced code block (optionally tagged `json`) holding an object,
//! or else the whole reply if it starts with `{`. Then the candidate is
//! decoded. Any failure means "no tool call", never an error for the caller.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;
use thiserror::Error;

static FENCED_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?i:json)?\s*(\{.*?\})\s*```").expect("valid regex")
});

/// How much of the call shape must be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Only `tool_name` is required; a missing `parameters` means `{}`.
    #[default]
    Lenient,
    /// `parameters` must be present and must be an object.
    Strict,
}

/// A tool call requested by the model. Nothing about it is trusted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    #[serde(rename = "tool_name")]
    pub name: String,
    pub parameters: Value,
}

/// Why a reply was not taken as a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("no structured block in reply")]
    NoCandidate,
    #[error("malformed JSON: {0}")]
    Malformed(String),
    #[error("structured block is not an object")]
    NotAnObject,
    #[error("object has no string \"tool_name\"")]
    MissingToolName,
    #[error("object has no \"parameters\"")]
    MissingParameters,
    #[error("\"parameters\" is not an object")]
    ParametersNotObject,
}

/// Locate the region of `text` that may hold a tool call.
pub fn extract_candidate(text: &str) -> Option<&str> {
    if let Some(body) = FENCED_OBJECT.captures(text).and_then(|caps| caps.get(1)) {
        return Some(body.as_str());
    }
    let trimmed = text.trim();
    trimmed.starts_with('{').then_some(trimmed)
}

/// Decode a candidate region into a tool call.
pub fn decode_candidate(
    candidate: &str,
    strictness: Strictness,
) -> Result<ToolInvocation, ParseFailure> {
    let value: Value =
        serde_json::from_str(candidate.trim()).map_err(|e| ParseFailure::Malformed(e.to_string()))?;
    let Value::Object(mut object) = value else {
        return Err(ParseFailure::NotAnObject);
    };

    let name = match object.remove("tool_name") {
        Some(Value::String(name)) => name,
        _ => return Err(ParseFailure::MissingToolName),
    };

    let parameters = match (object.remove("parameters"), strictness) {
        (Some(p @ Value::Object(_)), _) => p,
        (Some(_), Strictness::Strict) => return Err(ParseFailure::ParametersNotObject),
        (None, Strictness::Strict) => return Err(ParseFailure::MissingParameters),
        (Some(p), Strictness::Lenient) => p,
        (None, Strictness::Lenient) => Value::Object(Map::new()),
    };

    Ok(ToolInvocation { name, parameters })
}

/// Find and decode a tool call in a model reply.
pub fn parse_tool_call(text: &str, strictness: Strictness) -> Result<ToolInvocation, ParseFailure> {
    let candidate = extract_candidate(text).ok_or(ParseFailure::NoCandidate)?;
    decode_candidate(candidate, strictness)
}
