//! # Custom Transport Example
//!
//! Shows how to implement the [`HttpTransport`] trait with an in-process fake
//! backend. This is useful for:
//!
//! - **Testing**: exercise lobby views without a running server
//! - **Custom stacks**: adapt any HTTP client (hyper, ureq, a browser fetch
//!   bridge) by implementing one method
//!
//! ## Running
//!
//! ```sh
//! cargo run --example custom_transport
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nexus_lobby_client::protocol::{CreateRoomRequest, Participant, RoomSnapshot, RoomSummary};
use nexus_lobby_client::transport::{HttpRequest, HttpResponse, Method};
use nexus_lobby_client::{
    ActionOutcome, HttpTransport, LobbyClient, LobbyConfig, LobbyController, LobbyError,
    RoomAction, RoomController, RoomStatus, Session,
};
use serde_json::json;

const BASE_URL: &str = "http://fake.lobby";

// ─────────────────────────────────────────────────────────────────────
// Step 1: Define an in-memory backend
// ─────────────────────────────────────────────────────────────────────

/// Rooms keyed by room code. The bearer token *is* the nickname, which keeps
/// the example short.
#[derive(Default)]
struct FakeBackend {
    rooms: Mutex<BTreeMap<String, RoomSnapshot>>,
}

impl FakeBackend {
    fn handle(&self, request: &HttpRequest) -> Result<HttpResponse, LobbyError> {
        let path = request
            .url
            .strip_prefix(BASE_URL)
            .ok_or_else(|| LobbyError::Transport(format!("unknown host: {}", request.url)))?;
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let caller = request.bearer_token.clone();

        let mut rooms = self
            .rooms
            .lock()
            .map_err(|_| LobbyError::Transport("backend poisoned".into()))?;

        let response = match (request.method, segments.as_slice()) {
            (Method::Post, ["api", "auth", "login"]) => {
                let body: serde_json::Value =
                    serde_json::from_str(request.body.as_deref().unwrap_or("{}"))?;
                let email = body
                    .get("email")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default();
                let nickname = email.split('@').next().unwrap_or_default();
                let data = json!({ "token": nickname, "username": nickname, "email": email });
                HttpResponse::new(200, json!({ "success": true, "data": data }).to_string())
            }
            (Method::Get, ["api", "games"]) => {
                let list: Vec<RoomSummary> = rooms.values().map(RoomSummary::from).collect();
                HttpResponse::new(200, serde_json::to_string(&list)?)
            }
            (Method::Post, ["api", "games"]) => {
                let Some(host) = caller else {
                    return Ok(HttpResponse::new(401, ""));
                };
                let body: CreateRoomRequest =
                    serde_json::from_str(request.body.as_deref().unwrap_or_default())?;
                let room_code = format!("R{:03}", rooms.len() + 1);
                let room = RoomSnapshot {
                    room_code: room_code.clone(),
                    title: body.title,
                    max_participants: body.max_participants,
                    current_participants: 1,
                    host_name: host.clone(),
                    status: RoomStatus::Waiting,
                    created_at: None,
                    participants: vec![participant(&host)],
                };
                let json = serde_json::to_string(&room)?;
                rooms.insert(room_code, room);
                HttpResponse::new(200, json)
            }
            (Method::Get, ["api", "games", code]) => match rooms.get(*code) {
                Some(room) => HttpResponse::new(200, serde_json::to_string(room)?),
                None => HttpResponse::new(404, ""),
            },
            (Method::Post, ["api", "games", code, action]) => {
                let Some(caller) = caller else {
                    return Ok(HttpResponse::new(401, ""));
                };
                let Some(room) = rooms.get_mut(*code) else {
                    return Ok(HttpResponse::new(404, ""));
                };
                match *action {
                    "join" if room.current_participants < room.max_participants => {
                        room.participants.push(participant(&caller));
                        room.current_participants += 1;
                        HttpResponse::new(200, "")
                    }
                    "join" => HttpResponse::new(400, "방이 가득 찼습니다"),
                    "team-composition" if room.host_name == caller => {
                        room.status = RoomStatus::InProgress;
                        HttpResponse::new(200, "")
                    }
                    _ => HttpResponse::new(403, ""),
                }
            }
            _ => HttpResponse::new(404, ""),
        };
        Ok(response)
    }
}

fn participant(nickname: &str) -> Participant {
    Participant {
        nickname: nickname.to_string(),
        summoner_name: None,
        team_number: None,
    }
}

// ─────────────────────────────────────────────────────────────────────
// Step 2: Implement the HttpTransport trait
// ─────────────────────────────────────────────────────────────────────

/// Routes every request to a shared [`FakeBackend`].
#[derive(Clone, Default)]
struct InMemoryTransport {
    backend: Arc<FakeBackend>,
}

#[async_trait]
impl HttpTransport for InMemoryTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, LobbyError> {
        tracing::debug!(method = %request.method, url = %request.url, "fake backend request");
        self.backend.handle(&request)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Step 3: Drive the lobby and a room view
// ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let client = Arc::new(LobbyClient::new(
        InMemoryTransport::default(),
        LobbyConfig::new(BASE_URL),
    ));

    let alice = client.login("alice@example.com", "password123").await?;
    let carol = client.login("carol@example.com", "password123").await?;

    // Alice opens a room from the lobby.
    let lobby = LobbyController::new(Arc::clone(&client));
    let created = lobby.create_room(&alice, "Friday 내전", 10).await?;
    let rooms = lobby.view(&alice).await;
    tracing::info!(room_code = %created.room_code, "lobby: {rooms:?}");

    // Carol opens the room and joins it.
    let room = RoomController::new(Arc::clone(&client), created.room_code.clone());
    room.refresh(&carol).await?;
    let view = room.view(&carol).await;
    tracing::info!(role = %view.role(), actions = ?view.available_actions(), "carol's view");

    match room.dispatch(&carol, RoomAction::Join).await {
        ActionOutcome::Completed(view) => {
            tracing::info!(role = %view.role(), "carol joined");
        }
        other => tracing::warn!("join did not complete: {:?}", other.user_message()),
    }

    // Alice starts team composition with the configured default method.
    room.refresh(&alice).await?;
    let outcome = room.start_team_composition(&alice, None).await;
    if let ActionOutcome::Completed(view) = &outcome {
        if let Some(model) = view.as_room() {
            tracing::info!(status = %model.display_status().label(), "team composition started");
        }
    }

    // Anonymous users see a login prompt in the lobby.
    let anonymous = lobby.view(&Session::anonymous()).await;
    tracing::info!("anonymous lobby: {anonymous:?}");
    Ok(())
}
