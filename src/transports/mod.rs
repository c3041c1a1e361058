//! Transport implementations for the Nexus lobby REST API.
//!
//! This module provides concrete [`HttpTransport`](crate::HttpTransport)
//! implementations behind feature gates. Enable the corresponding Cargo
//! feature to pull in a transport:
//!
//! | Feature             | Transport           |
//! |---------------------|---------------------|
//! | `transport-reqwest` | [`ReqwestTransport`] |
//!
//! # Example
//!
//! ```rust,ignore
//! # async fn example() -> Result<(), nexus_lobby_client::LobbyError> {
//! use nexus_lobby_client::{HttpTransport, ReqwestTransport};
//! use nexus_lobby_client::transport::HttpRequest;
//!
//! let http = ReqwestTransport::new();
//! let response = http.execute(HttpRequest::get("http://localhost:8080/api/games")).await?;
//! println!("{} {}", response.status, response.body);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "transport-reqwest")]
pub mod http;

#[cfg(feature = "transport-reqwest")]
pub use http::ReqwestTransport;
