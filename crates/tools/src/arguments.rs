//! Arguments handed to tool handlers.

use crate::ToolError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Validated arguments for one tool invocation.
///
/// By the time a handler sees these, every required parameter is present
/// and every value matches its declared kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Get a required argument, deserialized into `T`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, ToolError> {
        let value = self
            .0
            .get(name)
            .ok_or_else(|| ToolError::InvalidInput(format!("missing argument '{name}'")))?;
        serde_json::from_value(value.clone())
            .map_err(|e| ToolError::InvalidInput(format!("argument '{name}': {e}")))
    }

    /// Get an optional argument. Absent and `null` both yield `None`.
    pub fn get_opt<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ToolError> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get(name).map(Some),
        }
    }

    /// Get an optional argument, falling back to `default`.
    pub fn get_or<T: DeserializeOwned>(&self, name: &str, default: T) -> Result<T, ToolError> {
        Ok(self.get_opt(name)?.unwrap_or(default))
    }

    /// Deserialize all arguments into a struct.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ToolError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| ToolError::InvalidInput(e.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
