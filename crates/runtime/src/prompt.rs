//! Prompt text exchanged with the model.

use tools::Manifest;

/// Sent after the tool result to ask for the final answer.
pub const FOLLOW_UP: &str =
    "Based on the result from the tool, please formulate a final answer to the original user question.";

/// Build the system prompt advertising `manifest`.
///
/// This text is the whole contract with the model: there is no structured
/// function-calling channel, so the call shape is spelled out here.
pub fn system_prompt(manifest: Manifest<'_>) -> String {
    format!(
        r#"You are a helpful assistant with access to the following tools.
To use a tool, you must respond with a JSON object with two keys: "tool_name" and "parameters".

Here are the available tools:
{manifest}

If you decide to use a tool, your response MUST be only the JSON object.
If you don't need a tool, answer the user's question directly."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tools::{NO_TOOLS_AVAILABLE, ToolDescriptor, ToolError, ToolRegistry};

    #[test]
    fn empty_registry_prompt_uses_sentinel() {
        let registry = ToolRegistry::new();
        let prompt = system_prompt(registry.manifest());
        assert!(prompt.contains(&format!("available tools:\n{NO_TOOLS_AVAILABLE}\n")));
    }

    #[test]
    fn prompt_embeds_manifest() {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDescriptor::builder("current_time")
                    .description("Returns the current time.")
                    .handler(|_| Ok::<_, ToolError>("12:00:00")),
            )
            .unwrap();
        let prompt = system_prompt(registry.manifest());
        assert!(prompt.contains("\"tool_name\": \"current_time\""));
        assert!(prompt.contains("MUST be only the JSON object"));
    }
}
