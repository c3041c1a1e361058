//! # Nexus Lobby Client
//!
//! Transport-agnostic Rust client for the Nexus League of Legends custom-game
//! lobby.
//!
//! The backend is the authority on room state. This crate fetches it over REST,
//! works out what the current user may do with a room, and turns the user's
//! choices into REST calls followed by a re-fetch.
//!
//! ## Features
//!
//! - **Pure view derivation**: [`RoomView::derive`] maps a room snapshot and a
//!   [`Session`] to a role, an action set and display fields
//! - **Transport-agnostic**: implement [`HttpTransport`] for any HTTP stack
//! - **reqwest built-in**: the default `transport-reqwest` feature provides
//!   [`ReqwestTransport`]
//! - **Race-free views**: [`RoomController`] discards stale responses and
//!   rejects double submission
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nexus_lobby_client::{
//!     LobbyClient, LobbyConfig, ReqwestTransport, RoomAction, RoomController,
//! };
//!
//! # async fn run() -> nexus_lobby_client::Result<()> {
//! let client = Arc::new(LobbyClient::new(ReqwestTransport::new(), LobbyConfig::from_env()));
//! let session = client.login("carol@example.com", "password123").await?;
//!
//! let room = RoomController::new(Arc::clone(&client), "AB12");
//! room.refresh(&session).await?;
//! let outcome = room.dispatch(&session, RoomAction::Join).await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

mod auth;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod lobby;
pub mod protocol;
pub mod session;
pub mod transport;
pub mod transports;
pub mod validation;
pub mod view_model;

// Re-export primary types for ergonomic imports.
pub use client::{LobbyClient, LobbyConfig};
pub use dispatcher::{ActionOutcome, FetchOutcome, RoomController};
pub use error::{ErrorKind, LobbyError, Result};
pub use lobby::{LobbyController, LobbyView};
pub use protocol::{RoomSnapshot, RoomStatus, TeamCompositionMethod};
pub use session::Session;
pub use transport::HttpTransport;
pub use validation::ValidationIssue;
pub use view_model::{ActionKind, Availability, Role, RoomAction, RoomView, RoomViewModel};

#[cfg(feature = "transport-reqwest")]
pub use transports::ReqwestTransport;
