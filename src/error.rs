use serde_json::Value;
use thiserror::Error;

use crate::schema::ValidationError;

#[derive(Debug, Error)]
pub enum McpError {
    // Protocol errors (surfaced on the wire as JSON-RPC error objects)
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    UnknownMethod(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Tool arguments rejected by the tool's registered input schema.
    /// Reported as Invalid Params with the violation attached as error data.
    #[error("Invalid params: {0}")]
    SchemaViolation(ValidationError),

    // Registry errors (API results, never serialized onto the wire)
    #[error("'{0}' is already registered")]
    AlreadyExists(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("'{0}' is not registered")]
    NotFound(String),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// Convert to JSON-RPC error code
    pub fn error_code(&self) -> i32 {
        match self {
            Self::Parse(_) | Self::Json(_) => -32700,
            Self::InvalidRequest(_) => -32600,
            Self::UnknownMethod(_) => -32601,
            Self::InvalidParams(_) | Self::SchemaViolation(_) => -32602,
            _ => -32603, // Internal error
        }
    }

    /// Structured detail for the wire error's `data` field, if any
    pub fn error_data(&self) -> Option<Value> {
        match self {
            Self::SchemaViolation(violation) => Some(violation.to_data()),
            _ => None,
        }
    }

    /// Create a JSON-RPC error response string for this error
    pub fn to_json_rpc_error(&self, id: Option<&Value>) -> String {
        crate::protocol::error_response(
            id,
            self.error_code(),
            &self.to_string(),
            self.error_data().as_ref(),
        )
    }
}

// Result type alias for convenience
pub type McpResult<T> = Result<T, McpError>;

// For handler code that bubbles anyhow::Error out of user callbacks
impl From<anyhow::Error> for McpError {
    fn from(err: anyhow::Error) -> Self {
        McpError::Internal(err.to_string())
    }
}
