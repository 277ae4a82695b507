//! HTTP endpoint serving the latest snapshot.
//!
//! Every `GET` or `HEAD` request, whatever its path, is answered with the
//! current snapshot string as `application/json`. Other methods get `405`.
//! Each connection carries exactly one request and is then closed. A client
//! that does not finish its request within the request timeout, or is still
//! connected when the server is cancelled, is disconnected.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::sinks::SnapshotReader;
use crate::{Result, TelemetryError};

/// Upper bound on the request head we are willing to buffer.
const MAX_REQUEST_HEAD: usize = 8 * 1024;

/// Time a connection gets to send its request and receive the response.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Bound HTTP listener, ready to serve.
pub struct SnapshotServer {
    listener: TcpListener,
    snapshot: SnapshotReader,
    request_timeout: Duration,
}

impl SnapshotServer {
    pub async fn bind(addr: SocketAddr, snapshot: SnapshotReader) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| TelemetryError::socket_error("HTTP bind", Some(addr), err))?;
        Ok(Self { listener, snapshot, request_timeout: DEFAULT_REQUEST_TIMEOUT })
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|err| TelemetryError::socket_error("HTTP local_addr", None, err))
    }

    /// Accept connections until cancelled.
    ///
    /// Each connection is handled on its own task, which is bounded by the
    /// request timeout and stops when `cancel` fires.
    pub async fn serve(self, cancel: CancellationToken) -> Result<()> {
        info!(addr = ?self.listener.local_addr().ok(), "JSON server listening");

        loop {
            let (stream, peer) = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("JSON server cancelled");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        warn!("Failed to accept HTTP connection: {}", err);
                        continue;
                    }
                },
            };

            let snapshot = self.snapshot.clone();
            let connection_cancel = cancel.child_token();
            let request_timeout = self.request_timeout;
            tokio::spawn(async move {
                tokio::select! {
                    _ = connection_cancel.cancelled() => {
                        debug!(%peer, "HTTP connection closed by shutdown");
                    }
                    result = tokio::time::timeout(request_timeout, handle_connection(stream, &snapshot)) => {
                        match result {
                            Ok(Ok(())) => {}
                            Ok(Err(err)) => debug!(%peer, "HTTP connection failed: {}", err),
                            Err(_) => debug!(%peer, "HTTP request timed out after {:?}", request_timeout),
                        }
                    }
                }
            });
        }
    }
}

async fn handle_connection(mut stream: TcpStream, snapshot: &SnapshotReader) -> std::io::Result<()> {
    let head = read_request_head(&mut stream).await?;
    let method = head.split_whitespace().next().unwrap_or_default();

    let response = match method {
        "GET" => response("200 OK", &snapshot.current(), true),
        "HEAD" => response("200 OK", &snapshot.current(), false),
        _ => response("405 Method Not Allowed", "", true),
    };

    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// Read until the blank line that ends the request head.
async fn read_request_head(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];

    while !head.windows(4).any(|w| w == b"\r\n\r\n") && head.len() < MAX_REQUEST_HEAD {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&chunk[..n]);
    }

    Ok(String::from_utf8_lossy(&head).into_owned())
}

fn response(status: &str, body: &str, include_body: bool) -> String {
    format!(
        "HTTP/1.1 {status}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        body.len(),
        if include_body { body } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::snapshot_slot;

    async fn request(addr: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn serves_latest_snapshot() {
        let (publisher, reader) = snapshot_slot();
        let server = SnapshotServer::bind("127.0.0.1:0".parse().unwrap(), reader).await.unwrap();
        let addr = server.local_addr().unwrap();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(server.serve(cancel.clone()));

        let empty = request(addr, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
        assert!(empty.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(empty.contains("Content-Length: 0\r\n"));

        publisher.replace(r#"{}, {}, {"Speed":1.0}, {}, {}, {}"#.to_string());
        let full = request(addr, "GET /forza HTTP/1.1\r\n\r\n").await;
        assert!(full.contains("Content-Type: application/json\r\n"));
        assert!(full.ends_with(r#"{}, {}, {"Speed":1.0}, {}, {}, {}"#));

        cancel.cancel();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn head_omits_body_and_post_is_rejected() {
        let (publisher, reader) = snapshot_slot();
        publisher.replace("{}".to_string());
        let server = SnapshotServer::bind("127.0.0.1:0".parse().unwrap(), reader).await.unwrap();
        let addr = server.local_addr().unwrap();
        let cancel = CancellationToken::new();
        tokio::spawn(server.serve(cancel.clone()));

        let head = request(addr, "HEAD / HTTP/1.1\r\n\r\n").await;
        assert!(head.contains("Content-Length: 2\r\n"));
        assert!(head.ends_with("\r\n\r\n"));

        let post = request(addr, "POST / HTTP/1.1\r\nContent-Length: 0\r\n\r\n").await;
        assert!(post.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));

        cancel.cancel();
    }

    /// Wait for the server to close a connection that never sent anything.
    async fn closed_within(stream: &mut TcpStream, limit: Duration) -> bool {
        let mut buf = [0u8; 64];
        matches!(tokio::time::timeout(limit, stream.read(&mut buf)).await, Ok(Ok(0)) | Ok(Err(_)))
    }

    #[tokio::test]
    async fn silent_client_is_dropped_on_shutdown() {
        let (_publisher, reader) = snapshot_slot();
        let server = SnapshotServer::bind("127.0.0.1:0".parse().unwrap(), reader).await.unwrap();
        let addr = server.local_addr().unwrap();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(server.serve(cancel.clone()));

        let mut silent = TcpStream::connect(addr).await.unwrap();
        // Let the server accept and start waiting on the request.
        tokio::time::sleep(Duration::from_millis(50)).await;

        cancel.cancel();
        handle.await.unwrap().unwrap();

        assert!(closed_within(&mut silent, Duration::from_secs(3)).await);
    }

    #[tokio::test]
    async fn silent_client_times_out() {
        let (_publisher, reader) = snapshot_slot();
        let server = SnapshotServer::bind("127.0.0.1:0".parse().unwrap(), reader)
            .await
            .unwrap()
            .with_request_timeout(Duration::from_millis(50));
        let addr = server.local_addr().unwrap();
        let cancel = CancellationToken::new();
        tokio::spawn(server.serve(cancel.clone()));

        let mut silent = TcpStream::connect(addr).await.unwrap();
        assert!(closed_within(&mut silent, Duration::from_secs(3)).await);

        let served = request(addr, "GET / HTTP/1.1\r\n\r\n").await;
        assert!(served.starts_with("HTTP/1.1 200 OK\r\n"), "server still answers after a timeout");

        cancel.cancel();
    }
}
