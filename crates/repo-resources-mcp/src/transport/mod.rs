//! Transport layer: newline-delimited stdio or HTTP `POST /rpc`.

pub mod framing;
#[cfg(feature = "http")]
pub mod http;
pub mod stdio;

#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use stdio::StdioTransport;

use std::any::Any;

use crate::types::{JsonRpcResponse, McpError, RequestId};

/// Internal-error envelope for a handler that panicked. The panic message
/// becomes the error message.
pub(crate) fn panic_envelope(payload: Box<dyn Any + Send + 'static>) -> JsonRpcResponse {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    tracing::error!("Request handler panicked: {detail}");
    McpError::InternalError(detail).to_json_rpc_error(RequestId::Null)
}
