//! CLI error types.

use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Configuration is unreadable or invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A built-in tool failed to register.
    #[error("failed to register tools: {0}")]
    Registration(#[from] tools::RegistrationError),

    /// An error occurred in the conversation runtime.
    #[error(transparent)]
    Runtime(#[from] runtime::Error),

    /// The MCP server stopped on a transport failure.
    #[error(transparent)]
    Mcp(#[from] mcp::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
