#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing,
    dead_code
)]
//! Shared test utilities for Nexus lobby client integration tests.
//!
//! Provides a scripted [`MockTransport`] and helper functions for building the
//! JSON bodies the backend sends.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use nexus_lobby_client::transport::{HttpRequest, HttpResponse};
use nexus_lobby_client::{HttpTransport, LobbyClient, LobbyConfig, LobbyError, Session};
use serde_json::json;
use tokio::sync::oneshot;

pub const BASE_URL: &str = "http://lobby.test";

// ── MockTransport ───────────────────────────────────────────────────

/// A scripted HTTP transport.
///
/// Responses are handed out in order, one per request. Every request is
/// recorded. A request arriving after the script runs out gets a `500`.
#[derive(Default)]
pub struct MockTransport {
    responses: StdMutex<VecDeque<Result<HttpResponse, LobbyError>>>,
    requests: StdMutex<Vec<HttpRequest>>,
    hold: StdMutex<Option<oneshot::Receiver<()>>>,
}

impl MockTransport {
    pub fn new(responses: Vec<Result<HttpResponse, LobbyError>>) -> Self {
        Self {
            responses: StdMutex::new(VecDeque::from(responses)),
            ..Self::default()
        }
    }

    /// Queue another response.
    pub fn push(&self, response: Result<HttpResponse, LobbyError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Hold the next request until the returned sender fires (or is dropped).
    pub fn hold_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.hold.lock().unwrap() = Some(rx);
        tx
    }

    /// Every request seen so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, LobbyError> {
        self.requests.lock().unwrap().push(request);
        let hold = self.hold.lock().unwrap().take();
        if let Some(rx) = hold {
            let _ = rx.await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(500, "unscripted request")))
    }
}

/// A client over `transport`, pointed at [`BASE_URL`].
pub fn client(transport: MockTransport) -> Arc<LobbyClient<MockTransport>> {
    init_tracing();
    Arc::new(LobbyClient::new(transport, LobbyConfig::new(BASE_URL)))
}

pub fn url(path: &str) -> String {
    format!("{BASE_URL}{path}")
}

/// Install a test subscriber once. Honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// ── Sessions ────────────────────────────────────────────────────────

pub fn user(name: &str) -> Session {
    Session::authenticated(format!("token-{name}"), name)
}

// ── Response helpers ────────────────────────────────────────────────

pub fn ok(body: impl Into<String>) -> Result<HttpResponse, LobbyError> {
    Ok(HttpResponse::new(200, body))
}

pub fn status(code: u16, body: impl Into<String>) -> Result<HttpResponse, LobbyError> {
    Ok(HttpResponse::new(code, body))
}

/// A successful `ApiResponse` envelope around `data`.
pub fn envelope(data: serde_json::Value) -> String {
    json!({ "success": true, "data": data, "message": null }).to_string()
}

/// A failed `ApiResponse` envelope.
pub fn failed_envelope(message: &str) -> String {
    json!({ "success": false, "data": null, "message": message }).to_string()
}

// ── Room fixtures ───────────────────────────────────────────────────

/// Room snapshot JSON as `GET /api/games/{code}` returns it.
pub fn room_json(
    code: &str,
    host: &str,
    status: &str,
    current: u32,
    max: u32,
    participants: &[&str],
) -> String {
    let participants: Vec<_> = participants
        .iter()
        .map(|nickname| json!({ "nickname": nickname, "summonerName": null, "teamNumber": null }))
        .collect();
    json!({
        "roomCode": code,
        "title": format!("Room {code}"),
        "maxParticipants": max,
        "currentParticipants": current,
        "hostName": host,
        "status": status,
        "createdAt": "2026-10-01T20:00:00",
        "participants": participants,
    })
    .to_string()
}

/// alice hosts a WAITING 3/10 room `AB12` listing alice and bob.
pub fn alice_room_json() -> String {
    room_json("AB12", "alice", "WAITING", 3, 10, &["alice", "bob"])
}

/// Room summary JSON as one element of `GET /api/games`.
pub fn summary_json(code: &str, host: &str, status: &str, current: u32, max: u32) -> serde_json::Value {
    json!({
        "roomCode": code,
        "title": format!("Room {code}"),
        "maxParticipants": max,
        "currentParticipants": current,
        "hostName": host,
        "status": status,
    })
}
