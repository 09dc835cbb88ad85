//! Stdio transport. Reads JSON-RPC from stdin, writes to stdout.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::{JsonRpcResponse, McpError, McpResult, RequestId};

use super::framing;

/// Stdio transport for desktop MCP clients.
pub struct StdioTransport {
    handler: Arc<ProtocolHandler>,
}

impl StdioTransport {
    pub fn new(handler: Arc<ProtocolHandler>) -> Self {
        Self { handler }
    }

    /// Run the transport loop: reads from stdin, writes to stdout.
    pub async fn run(&self) -> McpResult<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();

        tracing::info!("Stdio transport started");
        self.serve(stdin, stdout).await
    }

    /// One response line per non-blank request line, in order, until EOF.
    ///
    /// A failing line answers with an error envelope; the loop carries on.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let bytes_read = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(McpError::Io)?;

            if bytes_read == 0 {
                break;
            }

            // Invalid UTF-8 is replaced, not fatal.
            let line = String::from_utf8_lossy(&buf);
            if line.trim().is_empty() {
                continue;
            }

            let response = self.handle_line(line.into_owned()).await;
            let framed = framing::frame_message(&response)?;
            writer
                .write_all(framed.as_bytes())
                .await
                .map_err(McpError::Io)?;
            writer.flush().await.map_err(McpError::Io)?;
        }

        tracing::info!("EOF on stdin, shutting down");
        Ok(())
    }

    /// Handle one line on its own task so a panic becomes an error line
    /// instead of ending the loop.
    async fn handle_line(&self, line: String) -> JsonRpcResponse {
        let handler = self.handler.clone();
        match tokio::spawn(async move { handler.handle_text(&line).await }).await {
            Ok(response) => response,
            Err(e) if e.is_panic() => super::panic_envelope(e.into_panic()),
            Err(e) => McpError::InternalError(e.to_string()).to_json_rpc_error(RequestId::Null),
        }
    }
}
