//! TCP responder: the agent's ping/echo service.
//!
//! One task per accepted connection. Matching is chunk-based on purpose:
//! whatever byte chunk the socket read returns is inspected and answered
//! as a unit, with no line buffering or message delimiting. Peers that
//! batch or split writes see the same batching in the responses. This
//! mirrors the deployed wire behavior and must not be "fixed" with
//! framing.

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Response to any chunk starting with `PING`.
const PONG: &[u8] = b"PONG\n";

/// Bind the responder socket on all interfaces.
///
/// This is the only fatal error path in the agent: the caller propagates
/// a failure here and exits.
pub async fn bind(port: u16) -> Result<TcpListener> {
    TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind tcp port {}", port))
}

/// Accept connections forever, serving each on its own task.
///
/// Individual accept failures are logged and skipped; the loop itself
/// never returns.
pub async fn serve(listener: TcpListener) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tracing::debug!("accepted connection from {}", peer);
                tokio::spawn(handle_connection(stream));
            }
            Err(e) => {
                tracing::warn!("accept error: {}", e);
            }
        }
    }
}

/// Serve one connection until EOF or the first I/O error.
///
/// `PING`-prefixed chunks get `PONG\n`; everything else is echoed back
/// verbatim. Errors end the task without propagating.
async fn handle_connection(mut stream: TcpStream) {
    let mut buf = [0u8; 4096];
    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) => return, // peer closed
            Ok(n) => n,
            Err(_) => return,
        };

        let chunk = &buf[..n];
        let reply = if chunk.starts_with(b"PING") { PONG } else { chunk };
        if stream.write_all(reply).await.is_err() {
            return;
        }
    }
}
