//! Tool error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while defining a tool.
///
/// A failed registration never touches the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistrationError {
    /// The tool name is empty or whitespace.
    #[error("tool name must not be empty")]
    EmptyName,

    /// No handler was attached to the tool.
    #[error("tool {0} has no handler")]
    MissingHandler(String),

    /// Two parameters share a name.
    #[error("tool {tool} declares parameter {parameter} more than once")]
    DuplicateParameter { tool: String, parameter: String },
}

/// Errors a tool handler can report.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("timed out after {0}ms")]
    Timeout(u64),
    #[error("{0}")]
    Execution(String),
}

impl From<String> for ToolError {
    fn from(message: String) -> Self {
        Self::Execution(message)
    }
}

impl From<&str> for ToolError {
    fn from(message: &str) -> Self {
        Self::Execution(message.to_string())
    }
}

impl From<std::io::Error> for ToolError {
    fn from(e: std::io::Error) -> Self {
        Self::Execution(e.to_string())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

/// A failed tool invocation, expressed as data.
///
/// The failure is fed back to the model as tool-role content instead of
/// being raised to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("Error executing tool: {message}")]
pub struct ExecutionFailure {
    pub message: String,
}

impl ExecutionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<ToolError> for ExecutionFailure {
    fn from(e: ToolError) -> Self {
        Self::new(e.to_string())
    }
}
