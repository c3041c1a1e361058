//! HTTP transport implementation using `reqwest`.
//!
//! This module provides [`ReqwestTransport`], an [`HttpTransport`]
//! implementation backed by a pooled [`reqwest::Client`]. Both `http://` and
//! `https://` base URLs are supported.
//!
//! # Feature gate
//!
//! This module is only available when the `transport-reqwest` feature is
//! enabled (it is enabled by default).

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::error::LobbyError;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method};

/// An [`HttpTransport`] backed by `reqwest`.
///
/// For advanced use-cases (proxies, custom TLS roots, default headers) build a
/// [`reqwest::Client`] yourself and use [`ReqwestTransport::from_client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default `reqwest` client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-configured `reqwest` client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, LobbyError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending HTTP request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        }
        .header(CONTENT_TYPE, "application/json");

        if let Some(auth) = request.authorization() {
            builder = builder.header(AUTHORIZATION, auth);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| LobbyError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LobbyError::Transport(e.to_string()))?;

        tracing::debug!(status, url = %request.url, "HTTP response received");
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
#[cfg(feature = "transport-reqwest")]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn reqwest_transport_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReqwestTransport>();
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let transport = ReqwestTransport::new();
        let err = transport
            .execute(HttpRequest::get("http://127.0.0.1:1/api/games"))
            .await
            .unwrap_err();
        assert!(matches!(err, LobbyError::Transport(_)));
    }

    /// Start a one-shot HTTP server that records the request head and answers
    /// with `response`. Returns the base URL and a handle yielding the head.
    async fn one_shot_server(
        response: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).to_lowercase()
        });
        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    async fn non_success_status_is_returned_not_raised() {
        let (base, server) = one_shot_server(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 14\r\nConnection: close\r\n\r\nroom not found",
        )
        .await;

        let transport = ReqwestTransport::new();
        let response = transport
            .execute(HttpRequest::get(format!("{base}/api/games/ZZZZ")).with_bearer_token(Some("tok")))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body, "room not found");

        let head = server.await.unwrap();
        assert!(head.starts_with("get /api/games/zzzz http/1.1"));
        assert!(head.contains("authorization: bearer tok"));
        assert!(head.contains("content-type: application/json"));
    }
}
