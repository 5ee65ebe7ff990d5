//! Newline-delimited JSON-RPC over stdin/stdout
//!
//! Every `tools/call` runs in its own task so a slow upstream call never
//! blocks the next request. Responses funnel through one writer task.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::error::{AirtableError, Result};

use super::messages::{JsonRpcRequest, JsonRpcResponse, RpcError};
use super::server::McpServer;

const OUTBOUND_CAPACITY: usize = 64;

/// Serve the protocol on the process's stdin/stdout until stdin closes
pub async fn run_stdio(server: Arc<McpServer>) -> Result<()> {
    log::info!("Serving MCP on stdio");
    serve(server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// Serve the protocol over any line reader and writer.
///
/// Lines that are not valid UTF-8 or JSON get a parse error reply. A read
/// failure stops intake but lets in-flight calls finish first.
pub async fn serve<R, W>(server: Arc<McpServer>, mut reader: R, writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<JsonRpcResponse>(OUTBOUND_CAPACITY);
    let writer_task = tokio::spawn(write_responses(writer, rx));

    let mut in_flight = JoinSet::new();
    let mut buf = Vec::new();
    let mut read_error = None;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                read_error = Some(e);
                break;
            }
        }

        let request = match decode_line(&buf) {
            Some(Ok(request)) => request,
            Some(Err(response)) => {
                log::warn!("Rejected malformed message");
                if tx.send(response).await.is_err() {
                    break;
                }
                continue;
            }
            None => continue,
        };

        if request.method == "tools/call" {
            let server = Arc::clone(&server);
            let tx = tx.clone();
            in_flight.spawn(async move {
                if let Some(response) = server.handle(request).await {
                    let _ = tx.send(response).await;
                }
            });
        } else if let Some(response) = server.handle(request).await {
            if tx.send(response).await.is_err() {
                break;
            }
        }

        while let Some(joined) = in_flight.try_join_next() {
            if let Err(e) = joined {
                log::error!("Tool task failed: {}", e);
            }
        }
    }

    log::info!("Input closed, waiting for {} in-flight calls", in_flight.len());
    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            log::error!("Tool task failed: {}", e);
        }
    }

    drop(tx);
    writer_task
        .await
        .map_err(|e| AirtableError::Io(std::io::Error::other(e)))??;
    match read_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Decode one raw input line; `None` for blank lines
fn decode_line(raw: &[u8]) -> Option<std::result::Result<JsonRpcRequest, JsonRpcResponse>> {
    let line = match std::str::from_utf8(raw) {
        Ok(line) => line,
        Err(e) => {
            return Some(Err(JsonRpcResponse::error(
                Value::Null,
                RpcError::parse_error(format!("Parse error: invalid UTF-8: {}", e)),
            )));
        }
    };
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(JsonRpcRequest::parse_line(trimmed))
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::Receiver<JsonRpcResponse>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = response.to_line();
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}
