//! HTTP transport abstraction for the Nexus lobby REST API.
//!
//! The [`HttpTransport`] trait sends one request and yields one response. It
//! knows nothing about rooms or sessions: the [`LobbyClient`](crate::LobbyClient)
//! builds every [`HttpRequest`] (URL, JSON body, bearer token) and interprets the
//! [`HttpResponse`] status and body.
//!
//! Non-2xx statuses are **not** errors at this layer. A transport only returns
//! `Err` when no response was obtained at all (connection refused, reset, TLS
//! failure, ...).
//!
//! # Implementing a Custom Transport
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use nexus_lobby_client::error::LobbyError;
//! use nexus_lobby_client::transport::{HttpRequest, HttpResponse, HttpTransport};
//!
//! struct MyTransport { /* ... */ }
//!
//! #[async_trait]
//! impl HttpTransport for MyTransport {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, LobbyError> {
//!         // Perform the request with your HTTP stack of choice
//!         # let _ = request;
//!         Ok(HttpResponse::new(200, "[]"))
//!     }
//! }
//! ```

use std::fmt;

use async_trait::async_trait;

use crate::error::LobbyError;

/// HTTP methods used by the lobby API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully prepared request.
///
/// When `body` is present it is a serialized JSON document and the transport
/// must send it with `Content-Type: application/json`. When `bearer_token` is
/// present the transport must send `Authorization: Bearer <token>`.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
    pub bearer_token: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
            bearer_token: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: None,
            bearer_token: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_bearer_token(mut self, token: Option<&str>) -> Self {
        self.bearer_token = token.map(str::to_string);
        self
    }

    /// The `Authorization` header value, if the request carries a token.
    pub fn authorization(&self) -> Option<String> {
        self.bearer_token.as_ref().map(|t| format!("Bearer {t}"))
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("has_body", &self.body.is_some())
            .field("authenticated", &self.bearer_token.is_some())
            .finish()
    }
}

/// Status and body text of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for any `2xx` status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body, or `None` if it is empty or whitespace only.
    pub fn body_text(&self) -> Option<&str> {
        let trimmed = self.body.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// A request/response HTTP transport for the Nexus lobby API.
///
/// Implementors take `&self` so that one transport can be shared by several
/// views (e.g. behind an `Arc<LobbyClient<_>>`).
///
/// # Object Safety
///
/// This trait is object-safe, so `Box<dyn HttpTransport>` works for dynamic
/// dispatch.
///
/// # Cancel Safety
///
/// Dropping the future returned by [`execute`](HttpTransport::execute) must
/// abandon the request without corrupting the transport. The lobby client
/// wraps every call in a timeout and relies on this.
#[async_trait]
pub trait HttpTransport: Send + Sync + 'static {
    /// Perform `request` and return whatever status and body the server sent.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::Transport`] if no response could be obtained.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, LobbyError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, LobbyError> {
        (**self).execute(request).await
    }
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, LobbyError> {
        (**self).execute(request).await
    }
}

#[cfg(test)]
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

    #[test]
    fn authorization_header_uses_bearer_scheme() {
        let req = HttpRequest::get("http://localhost/api/games").with_bearer_token(Some("abc"));
        assert_eq!(req.authorization().as_deref(), Some("Bearer abc"));
        assert_eq!(
            HttpRequest::get("http://x").with_bearer_token(None).authorization(),
            None
        );
    }

    #[test]
    fn debug_does_not_leak_token_or_body() {
        let req = HttpRequest::post("http://x/api/auth/login")
            .with_body(r#"{"password":"hunter22"}"#.into())
            .with_bearer_token(Some("tok"));
        let dbg = format!("{req:?}");
        assert!(!dbg.contains("hunter22"));
        assert!(!dbg.contains("tok\""));
    }

    #[test]
    fn blank_body_is_absent() {
        assert_eq!(HttpResponse::new(200, "  \n").body_text(), None);
        assert_eq!(HttpResponse::new(200, " {} ").body_text(), Some("{}"));
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }

    #[test]
    fn boxed_transport_is_object_safe() {
        fn assert_transport<T: HttpTransport>() {}
        assert_transport::<Box<dyn HttpTransport>>();
        assert_transport::<std::sync::Arc<dyn HttpTransport>>();
    }
}
