//! JSON-RPC dispatch over a tool registry.

use std::sync::Arc;

use serde_json::{Value, json};
use tools::{ToolRegistry, stringify_result};
use tracing::debug;

use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, PROTOCOL_VERSION, ServerCapabilities, ServerInfo, Tool,
};

/// Answers MCP requests from a shared [`ToolRegistry`].
#[derive(Debug, Clone)]
pub struct Handler {
    registry: Arc<ToolRegistry>,
    info: ServerInfo,
}

impl Handler {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            info: ServerInfo::default(),
        }
    }

    pub fn with_info(mut self, info: ServerInfo) -> Self {
        self.info = info;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle one raw line. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => return Some(JsonRpcResponse::failure(None, JsonRpcError::parse_error(e))),
        };
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    None,
                    JsonRpcError::invalid_request(e),
                ));
            }
        };
        self.handle(request).await
    }

    /// Handle a decoded request. Returns `None` for notifications.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "notification");
            return None;
        }

        let id = request.id;
        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.list_tools()),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => {
                debug!(%error, "request rejected");
                JsonRpcResponse::failure(id, error)
            }
        })
    }

    fn initialize(&self) -> Value {
        to_value(InitializeResult {
            protocol_version: PROTOCOL_VERSION,
            capabilities: ServerCapabilities::default(),
            server_info: self.info.clone(),
        })
    }

    fn list_tools(&self) -> Value {
        let tools = self
            .registry
            .manifest()
            .iter()
            .map(|tool| Tool {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect();
        to_value(ListToolsResult { tools })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| JsonRpcError::invalid_params("missing params"))
            .and_then(|p| serde_json::from_value(p).map_err(JsonRpcError::invalid_params))?;

        if !self.registry.contains(&params.name) {
            return Err(JsonRpcError::invalid_params(format!(
                "unknown tool: {}",
                params.name
            )));
        }

        let result = self
            .registry
            .invoke(&params.name, params.arguments.unwrap_or(Value::Null))
            .await;
        Ok(to_value(CallToolResult::text(
            stringify_result(&result),
            result.is_err(),
        )))
    }
}

fn to_value(result: impl serde::Serialize) -> Value {
    serde_json::to_value(result).unwrap_or(Value::Null)
}
