//! The tool registry.

use crate::descriptor::Handler;
use crate::{ExecutionFailure, Manifest, RegistrationError, ToolBuilder, ToolDescriptor, ToolError};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Named tools, looked up by name and listed in registration order.
///
/// Mutated only through [`register`](Self::register), which needs `&mut`;
/// everything else takes `&self`, so a registry shared behind `&` or `Arc`
/// is read-only by construction.
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and add a tool. A tool already registered under the same name
    /// is replaced in place; its manifest position is kept.
    pub fn register(&mut self, tool: ToolBuilder) -> Result<(), RegistrationError> {
        let tool = tool.build()?;
        debug!(tool = %tool.name, params = tool.parameters.len(), "registering tool");

        match self.index.get(&tool.name) {
            Some(&slot) => self.tools[slot] = tool,
            None => {
                self.index.insert(tool.name.clone(), self.tools.len());
                self.tools.push(tool);
            }
        }
        Ok(())
    }

    /// Add every tool, stopping at the first failure.
    pub fn register_all(
        &mut self,
        tools: impl IntoIterator<Item = ToolBuilder>,
    ) -> Result<(), RegistrationError> {
        tools.into_iter().try_for_each(|tool| self.register(tool))
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&slot| &self.tools[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn manifest(&self) -> Manifest<'_> {
        Manifest::new(&self.tools)
    }

    /// Invoke a tool by name.
    ///
    /// Every failure (unknown tool, bad parameters, handler error, handler
    /// panic) comes back as an [`ExecutionFailure`] value.
    pub async fn invoke(&self, name: &str, parameters: Value) -> Result<Value, ExecutionFailure> {
        let tool = self
            .lookup(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        let arguments = tool.check_arguments(parameters)?;

        let joined = match &tool.handler {
            Handler::Blocking(f) => {
                let f = f.clone();
                tokio::task::spawn_blocking(move || f(arguments)).await
            }
            Handler::Async(f) => tokio::spawn(f(arguments)).await,
        };

        let result = match joined {
            Ok(result) => result.map_err(ExecutionFailure::from),
            Err(e) => Err(ExecutionFailure::new(format!("tool {name} aborted: {e}"))),
        };
        if let Err(failure) = &result {
            warn!(tool = name, error = %failure.message, "tool execution failed");
        }
        result
    }
}

/// Render an invocation outcome as tool-role content.
///
/// Strings pass through verbatim; other values use their compact JSON text.
pub fn stringify_result(result: &Result<Value, ExecutionFailure>) -> String {
    match result {
        Ok(Value::String(s)) => s.clone(),
        Ok(value) => value.to_string(),
        Err(failure) => failure.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NO_TOOLS_AVAILABLE, ParamKind, ParamSpec};
    use serde_json::json;

    fn sum_two() -> ToolBuilder {
        ToolDescriptor::builder("sum_two")
            .description("Adds two numbers together.")
            .param(ParamSpec::new("a", ParamKind::Integer))
            .param(ParamSpec::new("b", ParamKind::Integer))
            .handler(|args| Ok::<_, ToolError>(args.get::<i64>("a")? + args.get::<i64>("b")?))
    }

    fn echo(name: &str, description: &str) -> ToolBuilder {
        ToolDescriptor::builder(name)
            .description(description)
            .handler(|_| Ok::<_, ToolError>("echo"))
    }

    #[test]
    fn empty_registry_renders_sentinel() {
        let registry = ToolRegistry::new();
        assert!(registry.manifest().is_empty());
        assert_eq!(registry.manifest().render(), NO_TOOLS_AVAILABLE);
    }

    #[test]
    fn manifest_keeps_registration_order() {
        let mut registry = ToolRegistry::new();
        registry
            .register_all([echo("zeta", "z"), echo("alpha", "a"), echo("mid", "m")])
            .unwrap();

        let names: Vec<&str> = registry.manifest().iter().map(|t| t.name()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);

        // Restartable: a second pass yields the same sequence.
        let again: Vec<&str> = registry.manifest().into_iter().map(|t| t.name()).collect();
        assert_eq!(names, again);
    }

    #[test]
    fn reregistration_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("first", "old")).unwrap();
        registry.register(echo("second", "2")).unwrap();
        registry.register(echo("first", "new")).unwrap();

        assert_eq!(registry.len(), 2);
        let manifest: Vec<_> = registry.manifest().iter().collect();
        assert_eq!(manifest[0].name(), "first");
        assert_eq!(manifest[0].description(), "new");
    }

    #[test]
    fn failed_registration_leaves_registry_untouched() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("kept", "k")).unwrap();
        let err = registry.register(ToolDescriptor::builder("broken")).unwrap_err();
        assert_eq!(err, RegistrationError::MissingHandler("broken".into()));
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("broken").is_none());
    }

    #[test]
    fn render_wire_shape() {
        let mut registry = ToolRegistry::new();
        registry.register(sum_two()).unwrap();
        let rendered = registry.manifest().render();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            parsed,
            json!([{
                "tool_name": "sum_two",
                "description": "Adds two numbers together.",
                "parameters": [
                    {"name": "a", "type": "integer", "description": ""},
                    {"name": "b", "type": "integer", "description": ""}
                ]
            }])
        );
        assert!(rendered.contains("\n    {\n        \"tool_name\""));
    }

    #[tokio::test]
    async fn invoke_success() {
        let mut registry = ToolRegistry::new();
        registry.register(sum_two()).unwrap();
        let result = registry.invoke("sum_two", json!({"a": 4, "b": 5})).await;
        assert_eq!(result, Ok(json!(9)));
        assert_eq!(stringify_result(&result), "9");
    }

    #[tokio::test]
    async fn invoke_failures_are_values() {
        let mut registry = ToolRegistry::new();
        registry.register(sum_two()).unwrap();
        registry
            .register(
                ToolDescriptor::builder("explode")
                    .handler(|_| Err::<(), _>("boom")),
            )
            .unwrap();

        let unknown = registry.invoke("nope", json!({})).await.unwrap_err();
        assert_eq!(unknown.message, "tool not found: nope");

        let missing = registry.invoke("sum_two", json!({"a": 1})).await.unwrap_err();
        assert!(missing.message.contains("missing required argument 'b'"));

        let extra = registry
            .invoke("sum_two", json!({"a": 1, "b": 2, "c": 3}))
            .await
            .unwrap_err();
        assert!(extra.message.contains("unexpected argument 'c'"));

        let raised = registry.invoke("explode", json!({})).await;
        assert_eq!(stringify_result(&raised), "Error executing tool: boom");
    }

    #[tokio::test]
    async fn panicking_handler_becomes_failure() {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDescriptor::builder("panics").handler(|_| -> Result<(), ToolError> {
                panic!("handler bug")
            }))
            .unwrap();
        let failure = registry.invoke("panics", json!({})).await.unwrap_err();
        assert!(failure.message.starts_with("tool panics aborted"));
    }

    #[tokio::test]
    async fn async_handler() {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDescriptor::builder("shout")
                    .param(ParamSpec::untyped("text"))
                    .async_handler(|args| async move {
                        let text: String = args.get("text")?;
                        Ok::<_, ToolError>(text.to_uppercase())
                    }),
            )
            .unwrap();
        let out = registry.invoke("shout", json!({"text": "hi"})).await;
        assert_eq!(stringify_result(&out), "HI");
    }
}
