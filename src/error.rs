//! Error types for the meta description service.

use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the analysis core and the transports
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or empty required field in a request
    #[error("{0}")]
    InvalidInput(String),

    /// Tool arguments that could not be decoded
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Invalid JSON-RPC request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Method not found
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Tool not found
    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    /// Missing or wrong API key
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Convert error to JSON-RPC error code
    pub fn to_json_rpc_code(&self) -> i32 {
        match self {
            Error::Parse(_) => -32700,
            Error::InvalidRequest(_) => -32600,
            Error::MethodNotFound(_) | Error::ToolNotFound(_) => -32601,
            Error::InvalidParams(_) | Error::InvalidInput(_) => -32602,
            Error::Internal(_) | Error::Json(_) | Error::Io(_) => -32603,
            _ => -32000, // Server error
        }
    }

    /// Whether the caller, not the service, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_)
                | Error::InvalidParams(_)
                | Error::InvalidRequest(_)
                | Error::MethodNotFound(_)
                | Error::ToolNotFound(_)
                | Error::Unauthorized(_)
                | Error::Parse(_)
        )
    }
}
