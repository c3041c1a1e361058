//! The caller's identity, passed explicitly into every derivation and call.

use std::fmt;

use crate::protocol::LoginResponse;

/// Who is using the client right now.
///
/// A `Session` is a plain value owned by the caller. Nothing in this crate
/// stores one globally; view derivations and REST calls take it as an
/// argument.
///
/// # Example
///
/// ```
/// use nexus_lobby_client::Session;
///
/// let anon = Session::anonymous();
/// assert!(!anon.is_authenticated());
///
/// let alice = Session::authenticated("jwt-token", "alice");
/// assert_eq!(alice.username(), Some("alice"));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    is_authenticated: bool,
    username: Option<String>,
    token: Option<String>,
}

impl Session {
    /// A session with no identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A logged-in session. An empty username is stored as absent.
    pub fn authenticated(token: impl Into<String>, username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            is_authenticated: true,
            username: (!username.is_empty()).then_some(username),
            token: Some(token.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    /// The username, only when authenticated.
    pub fn username(&self) -> Option<&str> {
        if self.is_authenticated {
            self.username.as_deref()
        } else {
            None
        }
    }

    /// Bearer token for authenticated calls.
    pub fn token(&self) -> Option<&str> {
        if self.is_authenticated {
            self.token.as_deref()
        } else {
            None
        }
    }

    /// `true` when this session belongs to the user called `name`.
    pub fn is_user(&self, name: &str) -> bool {
        self.username().is_some_and(|u| u == name)
    }

    /// Forget the identity, as on logout.
    pub fn clear(&mut self) {
        *self = Self::anonymous();
    }
}

impl From<LoginResponse> for Session {
    fn from(login: LoginResponse) -> Self {
        Self::authenticated(login.token, login.username)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("is_authenticated", &self.is_authenticated)
            .field("username", &self.username)
            .field("has_token", &self.token.is_some())
            .finish()
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
    fn empty_username_is_absent() {
        let session = Session::authenticated("t", "");
        assert!(session.is_authenticated());
        assert_eq!(session.username(), None);
        assert!(!session.is_user(""));
    }

    #[test]
    fn anonymous_has_no_identity() {
        let session = Session::anonymous();
        assert_eq!(session.username(), None);
        assert_eq!(session.token(), None);
        assert!(!session.is_user("alice"));
    }

    #[test]
    fn clear_logs_out() {
        let mut session = Session::authenticated("t", "alice");
        session.clear();
        assert_eq!(session, Session::anonymous());
    }

    #[test]
    fn debug_hides_token() {
        let session = Session::authenticated("super-secret", "alice");
        let dbg = format!("{session:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("has_token: true"));
    }

    #[test]
    fn from_login_response() {
        let session = Session::from(LoginResponse {
            token: "jwt".into(),
            username: "bob".into(),
            email: Some("bob@example.com".into()),
        });
        assert!(session.is_user("bob"));
        assert_eq!(session.token(), Some("jwt"));
    }
}
