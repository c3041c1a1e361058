//! Async REST client for the Nexus lobby backend.
//!
//! [`LobbyClient`] turns typed calls into [`HttpRequest`]s, hands them to an
//! [`HttpTransport`], and maps the response onto [`Result`]. It holds no
//! per-user state: the caller's [`Session`] is passed to every call that needs
//! one, so a single client can be shared by `Arc` between views.
//!
//! # Example
//!
//! ```rust,ignore
//! let client = LobbyClient::new(ReqwestTransport::new(), LobbyConfig::from_env());
//! let session = client.login("alice@example.com", "password123").await?;
//!
//! let created = client.create_room(&session, "Friday 내전", 20).await?;
//! let snapshot = client.get_room(&session, &created.room_code).await?;
//! assert_eq!(snapshot.host_name, "alice");
//! ```

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{LobbyError, Result};
use crate::protocol::{
    RoomSnapshot, RoomSummary, TeamCompositionMethod, TeamCompositionRequest,
};
use crate::session::Session;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::validation::validate_create_room;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Environment variable read by [`LobbyConfig::from_env`].
pub const BASE_URL_ENV: &str = "NEXUS_API_BASE_URL";

/// Default per-request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ── Configuration ───────────────────────────────────────────────────

/// Configuration for a [`LobbyClient`].
///
/// # Example
///
/// ```
/// use nexus_lobby_client::client::LobbyConfig;
/// use nexus_lobby_client::protocol::TeamCompositionMethod;
/// use std::time::Duration;
///
/// let config = LobbyConfig::new("https://nexus.example.com/")
///     .with_request_timeout(Duration::from_secs(3))
///     .with_default_composition_method(TeamCompositionMethod::Auction);
/// assert_eq!(config.base_url, "https://nexus.example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyConfig {
    /// Scheme, host and optional port of the backend, without a trailing `/`.
    pub base_url: String,
    /// Upper bound on each request, including reading the body.
    ///
    /// Defaults to **10 seconds**.
    pub request_timeout: Duration,
    /// Method used when a host starts team composition without choosing one.
    ///
    /// Defaults to [`TeamCompositionMethod::Auto`].
    pub default_composition_method: TeamCompositionMethod,
}

impl LobbyConfig {
    /// Create a configuration for the given backend with default values.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            default_composition_method: TeamCompositionMethod::default(),
        }
    }

    /// Read the base URL from `NEXUS_API_BASE_URL`, falling back to
    /// [`DEFAULT_BASE_URL`] when it is unset or blank.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_default_composition_method(mut self, method: TeamCompositionMethod) -> Self {
        self.default_composition_method = method;
        self
    }
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// Typed client for the lobby REST API.
///
/// Room reads attach the session's bearer token when there is one. Room
/// mutations require an authenticated session and fail with
/// [`LobbyError::AuthRequired`] before any request is sent otherwise.
pub struct LobbyClient<T> {
    transport: T,
    config: LobbyConfig,
}

impl<T: HttpTransport> LobbyClient<T> {
    pub fn new(transport: T, config: LobbyConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Rooms ───────────────────────────────────────────────────────

    /// `GET /api/games`: every room the backend lists.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::Server`] for non-2xx responses and
    /// [`LobbyError::Serialization`] if the body is not a room list.
    pub async fn list_rooms(&self, session: &Session) -> Result<Vec<RoomSummary>> {
        let request = HttpRequest::get(self.url("/api/games")).with_bearer_token(session.token());
        let response = self.execute(request).await?;
        match response.body_text() {
            Some(body) => decode(body),
            None => Ok(Vec::new()),
        }
    }

    /// `GET /api/games/{roomCode}`: one room snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::NotFound`] on `404` or when the backend answers
    /// with an empty body.
    pub async fn get_room(&self, session: &Session, room_code: &str) -> Result<RoomSnapshot> {
        let path = format!("/api/games/{}", encode_path_segment(room_code));
        let request = HttpRequest::get(self.url(&path)).with_bearer_token(session.token());

        let response = match self.execute(request).await {
            Ok(response) => response,
            Err(LobbyError::Server { status: 404, .. }) => {
                return Err(not_found(room_code));
            }
            Err(e) => return Err(e),
        };
        match response.body_text() {
            Some(body) => decode(body),
            None => Err(not_found(room_code)),
        }
    }

    /// `POST /api/games`: open a new room hosted by the session's user.
    ///
    /// The title is trimmed and both fields are validated before any request
    /// is sent.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::Validation`] for bad input and
    /// [`LobbyError::AuthRequired`] for anonymous sessions.
    pub async fn create_room(
        &self,
        session: &Session,
        title: &str,
        max_participants: u32,
    ) -> Result<RoomSnapshot> {
        let token = require_token(session)?;
        let body = validate_create_room(title, max_participants)?;
        debug!(title = %body.title, max_participants, "creating room");

        let request = HttpRequest::post(self.url("/api/games"))
            .with_body(encode(&body)?)
            .with_bearer_token(Some(token));
        let response = self.execute(request).await?;
        decode(response.body_text().unwrap_or_default())
    }

    /// `POST /api/games/{roomCode}/join`: add the session's user to a room.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::AuthRequired`] for anonymous sessions.
    pub async fn join_room(&self, session: &Session, room_code: &str) -> Result<()> {
        let token = require_token(session)?;
        debug!(room_code, "joining room");

        let path = format!("/api/games/{}/join", encode_path_segment(room_code));
        let request = HttpRequest::post(self.url(&path)).with_bearer_token(Some(token));
        self.execute(request).await.map(drop)
    }

    /// `POST /api/games/{roomCode}/team-composition`: ask the backend to
    /// start splitting the room into teams.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::AuthRequired`] for anonymous sessions.
    pub async fn start_team_composition(
        &self,
        session: &Session,
        room_code: &str,
        method: TeamCompositionMethod,
    ) -> Result<()> {
        let token = require_token(session)?;
        debug!(room_code, ?method, "starting team composition");

        let path = format!(
            "/api/games/{}/team-composition",
            encode_path_segment(room_code)
        );
        let request = HttpRequest::post(self.url(&path))
            .with_body(encode(&TeamCompositionRequest { method })?)
            .with_bearer_token(Some(token));
        self.execute(request).await.map(drop)
    }

    // ── Internal helpers ────────────────────────────────────────────

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Run a request under the configured timeout and reject non-2xx
    /// responses.
    pub(crate) async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();

        let response = tokio::time::timeout(
            self.config.request_timeout,
            self.transport.execute(request),
        )
        .await
        .map_err(|_| {
            warn!(%method, %url, "request timed out");
            LobbyError::Timeout
        })??;

        if response.is_success() {
            debug!(%method, %url, status = response.status, "request succeeded");
            return Ok(response);
        }

        warn!(%method, %url, status = response.status, "request failed");
        if response.status == 401 {
            return Err(LobbyError::AuthRequired);
        }
        Err(LobbyError::Server {
            status: response.status,
            body: response.body_text().map(str::to_string),
        })
    }
}

impl<T> std::fmt::Debug for LobbyClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LobbyClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

pub(crate) fn require_token(session: &Session) -> Result<&str> {
    session.token().ok_or(LobbyError::AuthRequired)
}

pub(crate) fn encode<S: Serialize>(body: &S) -> Result<String> {
    Ok(serde_json::to_string(body)?)
}

pub(crate) fn decode<D: DeserializeOwned>(body: &str) -> Result<D> {
    Ok(serde_json::from_str(body)?)
}

fn not_found(room_code: &str) -> LobbyError {
    LobbyError::NotFound {
        room_code: room_code.to_string(),
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

// ── Tests ───────────────────────────────────────────────────────────

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
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    /// Answers every request with the same response and records the last one.
    struct FixedTransport {
        response: HttpResponse,
        last: StdMutex<Option<HttpRequest>>,
    }

    impl FixedTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: HttpResponse::new(status, body),
                last: StdMutex::new(None),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for FixedTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
            *self.last.lock().unwrap() = Some(request);
            Ok(self.response.clone())
        }
    }

    /// Never answers.
    struct HangingTransport;

    #[async_trait]
    impl HttpTransport for HangingTransport {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse> {
            std::future::pending().await
        }
    }

    #[test]
    fn config_defaults() {
        let config = LobbyConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(
            config.default_composition_method,
            TeamCompositionMethod::Auto
        );
    }

    #[test]
    fn config_trims_trailing_slashes() {
        assert_eq!(LobbyConfig::new("http://h:1//").base_url, "http://h:1");
    }

    #[test]
    fn path_segments_are_escaped() {
        assert_eq!(encode_path_segment("AB12-x_y.z~"), "AB12-x_y.z~");
        assert_eq!(encode_path_segment("a/b c"), "a%2Fb%20c");
        assert_eq!(encode_path_segment("방"), "%EB%B0%A9");
        assert_eq!(encode_path_segment("50%#?"), "50%25%23%3F");
    }

    #[tokio::test]
    async fn room_code_cannot_escape_its_path_segment() {
        let transport = FixedTransport::new(404, "");
        let client = LobbyClient::new(transport, LobbyConfig::new("http://lobby.test"));
        let _ = client.get_room(&Session::anonymous(), "../auth/me?x=1").await;
        let sent = client.transport().last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.url, "http://lobby.test/api/games/..%2Fauth%2Fme%3Fx%3D1");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_required() {
        let client = LobbyClient::new(FixedTransport::new(401, ""), LobbyConfig::default());
        let err = client.list_rooms(&Session::anonymous()).await.unwrap_err();
        assert!(matches!(err, LobbyError::AuthRequired));
    }

    #[tokio::test]
    async fn anonymous_reads_send_no_token() {
        let client = LobbyClient::new(FixedTransport::new(200, "[]"), LobbyConfig::default());
        let rooms = client.list_rooms(&Session::anonymous()).await.unwrap();
        assert!(rooms.is_empty());
        let last = client.transport().last.lock().unwrap().clone().unwrap();
        assert_eq!(last.bearer_token, None);
    }

    #[tokio::test]
    async fn slow_transport_times_out() {
        let client = LobbyClient::new(
            HangingTransport,
            LobbyConfig::default().with_request_timeout(Duration::from_millis(50)),
        );
        let err = client
            .get_room(&Session::authenticated("t", "alice"), "AB12")
            .await
            .unwrap_err();
        assert!(matches!(err, LobbyError::Timeout));
    }

    #[tokio::test]
    async fn mutations_need_a_session_before_any_request() {
        let client = LobbyClient::new(FixedTransport::new(200, ""), LobbyConfig::default());
        let anon = Session::anonymous();

        assert!(matches!(
            client.join_room(&anon, "AB12").await,
            Err(LobbyError::AuthRequired)
        ));
        assert!(matches!(
            client
                .start_team_composition(&anon, "AB12", TeamCompositionMethod::Auto)
                .await,
            Err(LobbyError::AuthRequired)
        ));
        assert!(matches!(
            client.create_room(&anon, "Test Room", 20).await,
            Err(LobbyError::AuthRequired)
        ));
        assert!(client.transport().last.lock().unwrap().is_none());
    }
}
