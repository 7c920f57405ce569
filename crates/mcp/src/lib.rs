//! MCP (Model Context Protocol) server for a tool registry.
//!
//! Serves `initialize`, `tools/list` and `tools/call` as newline-delimited
//! JSON-RPC 2.0 over stdio, so any MCP client can use the same tools the
//! conversation runtime offers its model.
//!
//! # Example
//!
//! ```no_run
//! use mcp::{Handler, Server};
//! use std::sync::Arc;
//! use tools::ToolRegistry;
//!
//! # async fn example() -> mcp::Result<()> {
//! let registry = Arc::new(ToolRegistry::new());
//! Server::new(Handler::new(registry)).run_stdio().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod handler;
mod protocol;
mod server;

pub use error::{Error, Result};
pub use handler::Handler;
pub use protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, PROTOCOL_VERSION, RequestId, ServerCapabilities, ServerInfo,
    Tool, ToolContent, ToolsCapability,
};
pub use server::{MAX_LINE_SIZE, Server};
