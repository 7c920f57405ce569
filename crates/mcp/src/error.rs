//! MCP error types.

use thiserror::Error;

/// Transport failures of the stdio server. Protocol-level problems are
/// answered on the wire instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
