//! Error types for the Nexus lobby client.

use thiserror::Error;

use crate::validation::ValidationIssue;

/// Errors that can occur when talking to the Nexus lobby backend.
///
/// Every error is terminal to the action that triggered it only. Callers that
/// hold a room snapshot keep their last-known-good copy when an error occurs.
#[derive(Debug, Error)]
pub enum LobbyError {
    /// The request never produced an HTTP response (DNS, connect, reset, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("request failed with status {status}{}", body_suffix(.body))]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body text, if the backend sent any.
        body: Option<String>,
    },

    /// The requested room does not exist (or is not visible to the caller).
    #[error("room not found: {room_code}")]
    NotFound {
        /// Room code that was requested.
        room_code: String,
    },

    /// A client-side form constraint failed; no request was sent.
    #[error("validation failed: {0}")]
    Validation(ValidationIssue),

    /// The operation needs an authenticated session.
    #[error("authentication required")]
    AuthRequired,

    /// The backend processed the request but reported `success: false`.
    #[error("request rejected: {message}")]
    Rejected {
        /// Message taken from the response envelope.
        message: String,
    },

    /// Failed to serialize a request or deserialize a response body.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request did not complete within the configured timeout.
    #[error("operation timed out")]
    Timeout,
}

/// Coarse classification of a [`LobbyError`], used to pick how a failure is
/// presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-2xx response or transport failure. Shown as an inline alert.
    NetworkOrServer,
    /// The room is missing. Rendered as an explicit "room not found" state.
    NotFound,
    /// A form constraint failed before any network call.
    Validation,
    /// The user must log in first.
    AuthRequired,
}

impl LobbyError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::AuthRequired => ErrorKind::AuthRequired,
            Self::Transport(_)
            | Self::Server { .. }
            | Self::Rejected { .. }
            | Self::Serialization(_)
            | Self::Timeout => ErrorKind::NetworkOrServer,
        }
    }

    /// Text suitable for an alert or snackbar.
    ///
    /// Server errors carry the response body when one was sent, mirroring what
    /// the backend wants the user to read.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server {
                body: Some(body), ..
            } => body.clone(),
            Self::Server { status, body: None } => format!("Request failed: {status}"),
            Self::Validation(issue) => issue.description().to_string(),
            Self::Rejected { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref().map(|b| format!(": {b}")).unwrap_or_default()
}

impl From<ValidationIssue> for LobbyError {
    fn from(issue: ValidationIssue) -> Self {
        Self::Validation(issue)
    }
}

/// A specialized [`Result`] type for lobby client operations.
pub type Result<T> = std::result::Result<T, LobbyError>;

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
    fn server_error_message_prefers_body() {
        let err = LobbyError::Server {
            status: 409,
            body: Some("이미 참가한 방입니다.".into()),
        };
        assert_eq!(err.user_message(), "이미 참가한 방입니다.");
        assert_eq!(err.kind(), ErrorKind::NetworkOrServer);
        assert!(err.to_string().contains("409"));
    }

    #[test]
    fn server_error_without_body_names_status() {
        let err = LobbyError::Server {
            status: 500,
            body: None,
        };
        assert_eq!(err.user_message(), "Request failed: 500");
        assert_eq!(err.to_string(), "request failed with status 500");
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            LobbyError::NotFound {
                room_code: "ZZZZ".into()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(LobbyError::AuthRequired.kind(), ErrorKind::AuthRequired);
        assert_eq!(
            LobbyError::from(ValidationIssue::TitleTooShort).kind(),
            ErrorKind::Validation
        );
        assert_eq!(LobbyError::Timeout.kind(), ErrorKind::NetworkOrServer);
        assert_eq!(
            LobbyError::Transport("reset".into()).kind(),
            ErrorKind::NetworkOrServer
        );
    }

    #[test]
    fn validation_message_uses_description() {
        let err = LobbyError::from(ValidationIssue::ParticipantsNotMultipleOfFive);
        assert_eq!(
            err.user_message(),
            ValidationIssue::ParticipantsNotMultipleOfFive.description()
        );
    }
}
