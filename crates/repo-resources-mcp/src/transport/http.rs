//! HTTP transport: `POST /rpc` carrying one JSON-RPC request per body.
//!
//! RPC failures ride in the envelope with status 200; only unknown routes get
//! a (bare) 404.

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::protocol::ProtocolHandler;
use crate::types::{JsonRpcResponse, McpError, McpResult};

/// Port the server listens on unless told otherwise.
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:4000";

/// HTTP transport for networked clients.
pub struct HttpTransport {
    handler: Arc<ProtocolHandler>,
}

impl HttpTransport {
    pub fn new(handler: Arc<ProtocolHandler>) -> Self {
        Self { handler }
    }

    /// The routes, without binding a socket.
    pub fn router(&self) -> Router {
        router(self.handler.clone())
    }

    /// Run the HTTP server on the given address.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("MCP HTTP server listening on {addr}");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// `POST /rpc` and nothing else.
pub fn router(handler: Arc<ProtocolHandler>) -> Router {
    Router::new()
        .route("/rpc", post(handle_rpc).fallback(not_found))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .with_state(handler)
}

/// The body is taken as raw bytes so malformed input still gets an envelope.
async fn handle_rpc(State(handler): State<Arc<ProtocolHandler>>, body: Bytes) -> Response {
    let text = String::from_utf8_lossy(&body);
    let response = handler.handle_text(&text).await;
    json_response(&response)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn json_response(envelope: &JsonRpcResponse) -> Response {
    let body = serde_json::to_string(envelope).unwrap_or_default();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

/// A handler panic still answers 200 with an internal-error envelope.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    json_response(&super::panic_envelope(err))
}
