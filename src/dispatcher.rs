//! Room detail controller: owns one room's snapshot and turns user actions
//! into REST calls.
//!
//! A [`RoomController`] belongs to a single room view. Each action issues
//! exactly one REST call and, if it succeeds, one re-fetch of the snapshot.
//! Nothing is merged optimistically: the view only changes when a fetch
//! lands.
//!
//! # Concurrency
//!
//! - **Last fetch wins.** Every fetch takes a fresh ticket from the
//!   controller's generation counter before awaiting, and its response is
//!   applied only if no later fetch or [`RoomController::navigate`] has
//!   bumped the counter since. Anything older is dropped as
//!   [`FetchOutcome::Stale`].
//! - **One action at a time.** While an action is in flight, further calls to
//!   [`RoomController::dispatch`] return [`ActionOutcome::Busy`] without
//!   touching the network.
//! - The state lock is never held across a network call.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::client::LobbyClient;
use crate::error::{LobbyError, Result};
use crate::protocol::{RoomSnapshot, TeamCompositionMethod};
use crate::session::Session;
use crate::transport::HttpTransport;
use crate::view_model::{Availability, RoomAction, RoomView};

/// Result of [`RoomController::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was applied and this is the new view.
    Applied(RoomView),
    /// A later fetch was issued, or the view navigated elsewhere, while this
    /// one was pending. Nothing changed.
    Stale,
}

/// Result of [`RoomController::dispatch`].
#[derive(Debug)]
pub enum ActionOutcome {
    /// The call succeeded and the snapshot was re-fetched.
    Completed(RoomView),
    /// The action is shown to the user but has no backing endpoint.
    NotImplemented,
    /// The current view does not offer this action.
    Unavailable,
    /// Another action is still in flight.
    Busy,
    /// The REST call failed. The previous snapshot is untouched.
    Failed(LobbyError),
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// A message suitable for showing the user, if the action did not
    /// complete.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Completed(_) => None,
            Self::NotImplemented => Some("This action is not available yet.".to_string()),
            Self::Unavailable => Some("This action is not available.".to_string()),
            Self::Busy => Some("Please wait for the current request to finish.".to_string()),
            Self::Failed(e) => Some(e.user_message()),
        }
    }
}

#[derive(Debug)]
struct RoomState {
    room_code: String,
    snapshot: Option<RoomSnapshot>,
}

/// Releases the in-flight flag when an action finishes or is cancelled.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Controller behind one room detail view.
pub struct RoomController<T> {
    client: Arc<LobbyClient<T>>,
    state: Mutex<RoomState>,
    generation: AtomicU64,
    in_flight: AtomicBool,
}

impl<T: HttpTransport> RoomController<T> {
    /// Create a controller for `room_code`. No request is sent until
    /// [`refresh`](Self::refresh).
    pub fn new(client: Arc<LobbyClient<T>>, room_code: impl Into<String>) -> Self {
        Self {
            client,
            state: Mutex::new(RoomState {
                room_code: room_code.into(),
                snapshot: None,
            }),
            generation: AtomicU64::new(0),
            in_flight: AtomicBool::new(false),
        }
    }

    pub async fn room_code(&self) -> String {
        self.state.lock().await.room_code.clone()
    }

    /// Point the view at another room. The held snapshot is dropped and any
    /// fetch still pending for the previous room will be discarded.
    pub async fn navigate(&self, room_code: impl Into<String>) {
        let room_code = room_code.into();
        let mut state = self.state.lock().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        debug!(from = %state.room_code, to = %room_code, "navigating room view");
        state.room_code = room_code;
        state.snapshot = None;
    }

    /// Fetch the current room and apply the result.
    ///
    /// A `404` clears the snapshot and yields the terminal not-found view.
    /// When fetches overlap, only the one issued last is applied.
    ///
    /// # Errors
    ///
    /// Any other failure is returned and the previous snapshot is kept.
    pub async fn refresh(&self, session: &Session) -> Result<FetchOutcome> {
        let (ticket, room_code) = {
            let state = self.state.lock().await;
            let ticket = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            (ticket, state.room_code.clone())
        };

        let result = self.client.get_room(session, &room_code).await;

        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::Acquire) != ticket || state.room_code != room_code {
            debug!(%room_code, ticket, "discarding stale room response");
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(snapshot) => {
                state.snapshot = Some(snapshot);
            }
            Err(LobbyError::NotFound { .. }) => {
                debug!(%room_code, "room not found");
                state.snapshot = None;
            }
            Err(e) => {
                warn!(%room_code, "room refresh failed: {e}");
                return Err(e);
            }
        }
        Ok(FetchOutcome::Applied(RoomView::derive(
            state.snapshot.as_ref(),
            session,
        )))
    }

    /// Perform `action` for `session`, then re-fetch once on success.
    pub async fn dispatch(&self, session: &Session, action: RoomAction) -> ActionOutcome {
        let (room_code, view) = {
            let state = self.state.lock().await;
            (
                state.room_code.clone(),
                RoomView::derive(state.snapshot.as_ref(), session),
            )
        };

        match view.availability(action.kind()) {
            Availability::Available => {}
            Availability::NotImplemented => {
                debug!(%room_code, ?action, "action has no endpoint");
                return ActionOutcome::NotImplemented;
            }
            Availability::NotOffered => {
                debug!(%room_code, ?action, "action not offered in current view");
                return ActionOutcome::Unavailable;
            }
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!(%room_code, ?action, "action rejected while another is in flight");
            return ActionOutcome::Busy;
        };

        let result = match action {
            RoomAction::Join => self.client.join_room(session, &room_code).await,
            RoomAction::StartTeamComposition(method) => {
                self.client
                    .start_team_composition(session, &room_code, method)
                    .await
            }
            RoomAction::Leave => return ActionOutcome::NotImplemented,
        };

        if let Err(e) = result {
            warn!(%room_code, ?action, "room action failed: {e}");
            return ActionOutcome::Failed(e);
        }

        match self.refresh(session).await {
            Ok(FetchOutcome::Applied(view)) => ActionOutcome::Completed(view),
            Ok(FetchOutcome::Stale) => ActionOutcome::Completed(self.view(session).await),
            Err(e) => {
                // The action itself went through; keep showing the last snapshot.
                warn!(%room_code, "re-fetch after action failed: {e}");
                ActionOutcome::Completed(self.view(session).await)
            }
        }
    }

    /// Start team composition with `method`, or the configured default.
    pub async fn start_team_composition(
        &self,
        session: &Session,
        method: Option<TeamCompositionMethod>,
    ) -> ActionOutcome {
        let method = method.unwrap_or(self.client.config().default_composition_method);
        self.dispatch(session, RoomAction::StartTeamComposition(method))
            .await
    }

    /// The view for the snapshot currently held.
    pub async fn view(&self, session: &Session) -> RoomView {
        let state = self.state.lock().await;
        RoomView::derive(state.snapshot.as_ref(), session)
    }

    pub async fn snapshot(&self) -> Option<RoomSnapshot> {
        self.state.lock().await.snapshot.clone()
    }

    /// `true` while an action is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl<T> std::fmt::Debug for RoomController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomController")
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish_non_exhaustive()
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
    fn guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        let guard = InFlightGuard::acquire(&flag).unwrap();
        assert!(InFlightGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(!flag.load(Ordering::Acquire));
        assert!(InFlightGuard::acquire(&flag).is_some());
    }

    #[test]
    fn outcome_messages() {
        assert_eq!(
            ActionOutcome::Completed(RoomView::NotFoundOrForbidden).user_message(),
            None
        );
        assert!(ActionOutcome::NotImplemented.user_message().is_some());
        assert_eq!(
            ActionOutcome::Failed(LobbyError::AuthRequired)
                .user_message()
                .as_deref(),
            Some(LobbyError::AuthRequired.user_message().as_str())
        );
    }
}
