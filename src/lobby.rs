//! Lobby listing and room creation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::client::LobbyClient;
use crate::error::{LobbyError, Result};
use crate::protocol::{RoomSnapshot, RoomStatus, RoomSummary};
use crate::session::Session;
use crate::transport::HttpTransport;
use crate::validation::validate_create_room;

/// One line of the lobby table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyRow {
    pub room_code: String,
    pub title: String,
    pub status: RoomStatus,
    /// `"current / max"`.
    pub occupancy: String,
    pub host_name: String,
    /// Styling hint: `true` while the room is `WAITING`.
    pub is_joinable: bool,
}

impl From<&RoomSummary> for LobbyRow {
    fn from(room: &RoomSummary) -> Self {
        Self {
            room_code: room.room_code.clone(),
            title: room.title.clone(),
            status: room.status.clone(),
            occupancy: format!("{} / {}", room.current_participants, room.max_participants),
            host_name: room.host_name.clone(),
            is_joinable: room.status.is_waiting(),
        }
    }
}

/// What the lobby page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyView {
    /// Show a login prompt instead of the room list.
    AuthRequired,
    Empty,
    Rooms(Vec<LobbyRow>),
}

impl LobbyView {
    pub fn derive(rooms: &[RoomSummary], session: &Session) -> Self {
        if !session.is_authenticated() {
            return Self::AuthRequired;
        }
        if rooms.is_empty() {
            return Self::Empty;
        }
        Self::Rooms(rooms.iter().map(LobbyRow::from).collect())
    }
}

/// Holds the last fetched room list for the lobby page.
pub struct LobbyController<T> {
    client: Arc<LobbyClient<T>>,
    rooms: Mutex<Vec<RoomSummary>>,
    generation: AtomicU64,
}

impl<T: HttpTransport> LobbyController<T> {
    pub fn new(client: Arc<LobbyClient<T>>) -> Self {
        Self {
            client,
            rooms: Mutex::new(Vec::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Re-fetch the room list.
    ///
    /// Anonymous sessions get [`LobbyView::AuthRequired`] without a request.
    /// When refreshes overlap, only the one issued last replaces the list. An
    /// older response that lands afterwards is discarded and the view of the
    /// newer list is returned.
    ///
    /// # Errors
    ///
    /// A failed fetch is returned and the previous list is kept.
    pub async fn refresh(&self, session: &Session) -> Result<LobbyView> {
        if !session.is_authenticated() {
            return Ok(LobbyView::AuthRequired);
        }
        let ticket = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let result = self.client.list_rooms(session).await;

        let mut held = self.rooms.lock().await;
        if self.generation.load(Ordering::Acquire) != ticket {
            debug!(ticket, "discarding stale lobby response");
            return Ok(LobbyView::derive(&held, session));
        }
        let rooms = result.inspect_err(|e| {
            warn!("lobby refresh failed: {e}");
        })?;
        debug!(count = rooms.len(), "lobby refreshed");
        *held = rooms;
        Ok(LobbyView::derive(&held, session))
    }

    /// Validate and create a room, then reload the list.
    ///
    /// Returns the created room. If the reload fails the room still exists,
    /// so the error is logged and the old list kept.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::AuthRequired`] for anonymous sessions and
    /// [`LobbyError::Validation`] for bad input, both before any request.
    pub async fn create_room(
        &self,
        session: &Session,
        title: &str,
        max_participants: u32,
    ) -> Result<RoomSnapshot> {
        if !session.is_authenticated() {
            return Err(LobbyError::AuthRequired);
        }
        validate_create_room(title, max_participants)?;

        let created = self
            .client
            .create_room(session, title, max_participants)
            .await?;
        info!(room_code = %created.room_code, "room created");

        if let Err(e) = self.refresh(session).await {
            warn!("could not reload lobby after creating a room: {e}");
        }
        Ok(created)
    }

    /// The view for the list currently held.
    pub async fn view(&self, session: &Session) -> LobbyView {
        LobbyView::derive(&self.rooms.lock().await, session)
    }

    pub async fn rooms(&self) -> Vec<RoomSummary> {
        self.rooms.lock().await.clone()
    }
}

impl<T> std::fmt::Debug for LobbyController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LobbyController").finish_non_exhaustive()
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
    use crate::client::LobbyConfig;
    use crate::transport::{HttpRequest, HttpResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn summary(code: &str, status: RoomStatus, current: u32) -> RoomSummary {
        RoomSummary {
            room_code: code.into(),
            title: format!("Room {code}"),
            max_participants: 10,
            current_participants: current,
            host_name: "alice".into(),
            status,
        }
    }

    /// Counts requests and always fails.
    #[derive(Default)]
    struct CountingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HttpTransport for CountingTransport {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse::new(500, "boom"))
        }
    }

    fn controller() -> LobbyController<CountingTransport> {
        LobbyController::new(Arc::new(LobbyClient::new(
            CountingTransport::default(),
            LobbyConfig::default(),
        )))
    }

    #[test]
    fn anonymous_lobby_asks_for_login() {
        let rooms = vec![summary("AB12", RoomStatus::Waiting, 3)];
        assert_eq!(
            LobbyView::derive(&rooms, &Session::anonymous()),
            LobbyView::AuthRequired
        );
    }

    #[test]
    fn empty_and_populated_lobby() {
        let session = Session::authenticated("t", "alice");
        assert_eq!(LobbyView::derive(&[], &session), LobbyView::Empty);

        let rooms = vec![
            summary("AB12", RoomStatus::Waiting, 3),
            summary("CD34", RoomStatus::InProgress, 10),
        ];
        let LobbyView::Rooms(rows) = LobbyView::derive(&rooms, &session) else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].occupancy, "3 / 10");
        assert!(rows[0].is_joinable);
        assert!(!rows[1].is_joinable);
        assert_eq!(rows[1].status.as_str(), "IN_PROGRESS");
    }

    #[test]
    fn anonymous_refresh_sends_nothing() {
        let lobby = controller();
        let view = tokio_test::block_on(lobby.refresh(&Session::anonymous())).unwrap();
        assert_eq!(view, LobbyView::AuthRequired);
        assert_eq!(lobby.client.transport().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn invalid_room_is_rejected_before_the_network() {
        let lobby = controller();
        let session = Session::authenticated("t", "alice");
        for (title, max) in [("x", 20), ("Test Room", 12), ("Test Room", 55), ("  ", 20)] {
            let err = tokio_test::block_on(lobby.create_room(&session, title, max)).unwrap_err();
            assert!(matches!(err, LobbyError::Validation(_)), "{title:?}/{max}");
        }
        assert_eq!(lobby.client.transport().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_refresh_keeps_previous_list() {
        let lobby = controller();
        let session = Session::authenticated("t", "alice");
        tokio_test::block_on(async {
            *lobby.rooms.lock().await = vec![summary("AB12", RoomStatus::Waiting, 3)];
            let err = lobby.refresh(&session).await.unwrap_err();
            assert!(matches!(err, LobbyError::Server { status: 500, .. }));
            assert_eq!(lobby.rooms().await.len(), 1);
        });
    }
}
