//! # Lobby Walkthrough
//!
//! Logs in against a running Nexus backend, lists the lobby, opens a room and
//! prints what the logged-in user may do there.
//!
//! ## Running
//!
//! ```sh
//! NEXUS_API_BASE_URL=http://localhost:8080 \
//! NEXUS_EMAIL=alice@example.com NEXUS_PASSWORD=password123 \
//!     cargo run --example lobby_walkthrough [ROOM_CODE]
//! ```
//!
//! Without a room code a new room called "Test Room" is created.

use std::sync::Arc;

use nexus_lobby_client::{
    FetchOutcome, LobbyClient, LobbyConfig, LobbyController, LobbyView, ReqwestTransport,
    RoomController, RoomView,
};

/// Read a required environment variable.
fn require_env(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    std::env::var(name).map_err(|_| format!("{name} must be set").into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let email = require_env("NEXUS_EMAIL")?;
    let password = require_env("NEXUS_PASSWORD")?;

    let config = LobbyConfig::from_env();
    tracing::info!(base_url = %config.base_url, "connecting");
    let client = Arc::new(LobbyClient::new(ReqwestTransport::new(), config));

    let session = client.login(&email, &password).await?;
    if let Some(profile) = client.fetch_profile(&session).await {
        tracing::info!(nickname = ?profile.nickname, summoner = ?profile.summoner_name, "profile");
    }

    // ── Lobby ───────────────────────────────────────────────────────
    let lobby = LobbyController::new(Arc::clone(&client));
    match lobby.refresh(&session).await? {
        LobbyView::AuthRequired => tracing::warn!("login required"),
        LobbyView::Empty => tracing::info!("no rooms yet"),
        LobbyView::Rooms(rows) => {
            for row in rows {
                tracing::info!(
                    code = %row.room_code,
                    status = %row.status,
                    occupancy = %row.occupancy,
                    host = %row.host_name,
                    "{}",
                    row.title
                );
            }
        }
    }

    let room_code = match std::env::args().nth(1) {
        Some(code) => code,
        None => lobby.create_room(&session, "Test Room", 20).await?.room_code,
    };

    // ── Room detail ─────────────────────────────────────────────────
    let room = RoomController::new(Arc::clone(&client), room_code.clone());
    match room.refresh(&session).await? {
        FetchOutcome::Applied(RoomView::Room(model)) => {
            tracing::info!(
                role = %model.role(),
                status = %model.display_status().label(),
                occupancy = %model.occupancy(),
                "room {room_code}"
            );
            for kind in model.available_actions().iter() {
                tracing::info!(?kind, availability = ?model.availability(kind), "action");
            }
            for row in model.participant_rows() {
                tracing::info!(summoner = %row.summoner, team = ?row.team_number, "{}", row.nickname);
            }
        }
        FetchOutcome::Applied(RoomView::NotFoundOrForbidden) => {
            tracing::warn!("room {room_code} not found");
        }
        FetchOutcome::Stale => {}
    }

    Ok(())
}
