//! Message framing for newline-delimited JSON.

use serde::Serialize;

use crate::types::{JsonRpcRequest, McpError, McpResult};

/// Parse a single message as a JSON-RPC request.
pub fn parse_message(line: &str) -> McpResult<JsonRpcRequest> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))
}

/// Serialize a value to a JSON line (with trailing newline).
pub fn frame_message<T: Serialize>(value: &T) -> McpResult<String> {
    let mut json = serde_json::to_string(value).map_err(McpError::Json)?;
    json.push('\n');
    Ok(json)
}
