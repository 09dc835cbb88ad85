//! Error types and JSON-RPC error codes for the server.

use repo_resources::RepoError;

use super::message::{JsonRpcResponse, RequestId};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Server-defined error codes.
pub mod server_error_codes {
    /// A repository operation was attempted before `initialize` configured one.
    pub const NOT_INITIALIZED: i32 = -32000;
}

/// All errors that can occur in the server.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    /// Input that is not a JSON-RPC request object. Carries the decoder's
    /// message unchanged.
    #[error("{0}")]
    ParseError(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Server not initialized: call initialize with owner and repo first")]
    NotInitialized,

    #[error("{0}")]
    InternalError(String),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    /// Parse failures and upstream faults all surface as internal errors.
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use server_error_codes::*;
        match self {
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::NotInitialized => NOT_INITIALIZED,
            McpError::Repository(RepoError::InvalidUri(_))
            | McpError::Repository(RepoError::InvalidConfig(_)) => INVALID_PARAMS,
            McpError::ParseError(_)
            | McpError::InternalError(_)
            | McpError::Repository(_)
            | McpError::Config(_)
            | McpError::Transport(_)
            | McpError::Io(_)
            | McpError::Json(_) => INTERNAL_ERROR,
        }
    }

    /// Failures of the upstream host or of the server itself, as opposed to
    /// something wrong with the request. These answer with a null id.
    pub fn is_fault(&self) -> bool {
        match self {
            McpError::Repository(RepoError::InvalidUri(_))
            | McpError::Repository(RepoError::InvalidConfig(_)) => false,
            McpError::ParseError(_)
            | McpError::InternalError(_)
            | McpError::Repository(_)
            | McpError::Config(_)
            | McpError::Transport(_)
            | McpError::Io(_)
            | McpError::Json(_) => true,
            McpError::MethodNotFound(_)
            | McpError::InvalidParams(_)
            | McpError::NotInitialized => false,
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcResponse {
        JsonRpcResponse::error(id, self.code(), self.to_string())
    }
}

pub type McpResult<T> = Result<T, McpError>;
