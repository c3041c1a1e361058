//! Wire-compatible request and response types for the Nexus lobby REST API.
//!
//! Every type in this module produces and accepts the same JSON as the
//! backend's DTOs. Field names are `camelCase` on the wire. Key adaptations:
//!
//! - `LocalDateTime` → `String` (ISO 8601, passed through untouched)
//! - open-ended room status strings → [`RoomStatus`] with an `Unknown` fallback
//! - `participants: null` is read as an empty roster

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ── Enums ───────────────────────────────────────────────────────────

/// Lifecycle status of a room, as reported by the backend.
///
/// The backend owns every transition. Statuses this client does not know are
/// kept verbatim in [`Unknown`](RoomStatus::Unknown) so they can still be
/// rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoomStatus {
    /// Accepting participants; the host may start team composition.
    Waiting,
    /// Team composition or the match itself is under way.
    InProgress,
    /// The match has finished.
    Completed,
    /// Any other status string, kept as sent.
    Unknown(String),
}

impl RoomStatus {
    /// The wire representation of this status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Waiting => "WAITING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::Waiting)
    }
}

impl From<String> for RoomStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "WAITING" => Self::Waiting,
            "IN_PROGRESS" => Self::InProgress,
            "COMPLETED" => Self::Completed,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<&str> for RoomStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<RoomStatus> for String {
    fn from(status: RoomStatus) -> Self {
        match status {
            RoomStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the backend should split participants into teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamCompositionMethod {
    /// The backend balances teams on its own.
    #[default]
    Auto,
    /// Captains bid for players.
    Auction,
}

/// Third-party identity providers supported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Discord,
}

impl OAuthProvider {
    /// Registration id used in the backend's `/oauth2/authorization/{id}` path.
    pub fn registration_id(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Discord => "discord",
        }
    }
}

// ── Rooms ───────────────────────────────────────────────────────────

/// A player listed in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Platform nickname. Identifies the participant within the room.
    pub nickname: String,
    /// Linked summoner name, if the account has one.
    #[serde(default)]
    pub summoner_name: Option<String>,
    /// Team the participant was assigned to, once composition has run.
    #[serde(default)]
    pub team_number: Option<i32>,
}

/// A point-in-time copy of one room, as returned by `GET /api/games/{code}`.
///
/// Snapshots are never edited in place. Any change in the room arrives as a
/// new snapshot from a fresh fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room_code: String,
    pub title: String,
    pub max_participants: u32,
    /// Assumed to be `<= max_participants`; not checked.
    pub current_participants: u32,
    /// Nickname of the room's creator.
    pub host_name: String,
    pub status: RoomStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Roster in backend insertion order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub participants: Vec<Participant>,
}

/// One row of `GET /api/games`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_code: String,
    pub title: String,
    pub max_participants: u32,
    pub current_participants: u32,
    pub host_name: String,
    pub status: RoomStatus,
}

impl From<&RoomSnapshot> for RoomSummary {
    fn from(snapshot: &RoomSnapshot) -> Self {
        Self {
            room_code: snapshot.room_code.clone(),
            title: snapshot.title.clone(),
            max_participants: snapshot.max_participants,
            current_participants: snapshot.current_participants,
            host_name: snapshot.host_name.clone(),
            status: snapshot.status.clone(),
        }
    }
}

/// Body of `POST /api/games`.
///
/// Build one through [`validate_create_room`](crate::validation::validate_create_room)
/// so the form constraints are checked first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub title: String,
    pub max_participants: u32,
}

/// Body of `POST /api/games/{code}/team-composition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCompositionRequest {
    pub method: TeamCompositionMethod,
}

// ── Auth ────────────────────────────────────────────────────────────

/// Envelope used by every `/api/auth/*` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// The most specific failure text the envelope carries.
    pub fn failure_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `data` of a successful login.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailVerifyRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NicknameRequest {
    pub nickname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LolTagRequest {
    pub lol_tag: String,
}

/// Consent flags collected during registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreements {
    pub terms: bool,
    pub privacy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing: Option<bool>,
}

/// Body of `POST /api/auth/register`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub nickname: String,
    pub password: String,
    /// Riot ID, e.g. `Summoner#KR1`.
    pub lol_tag: String,
    pub agreements: Agreements,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("nickname", &self.nickname)
            .field("password", &"<redacted>")
            .field("lol_tag", &self.lol_tag)
            .field("agreements", &self.agreements)
            .finish()
    }
}

/// Body of `POST /api/auth/onboarding`, sent after a first OAuth login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    pub nickname: String,
    pub lol_tag: String,
}

/// Response of `GET /api/users/me`. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub summoner_name: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
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
    fn known_statuses_map_to_variants() {
        assert_eq!(RoomStatus::from("WAITING"), RoomStatus::Waiting);
        assert_eq!(RoomStatus::from("IN_PROGRESS"), RoomStatus::InProgress);
        assert_eq!(RoomStatus::from("COMPLETED"), RoomStatus::Completed);
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status: RoomStatus = serde_json::from_str("\"TEAM_COMPOSITION\"").unwrap();
        assert_eq!(status, RoomStatus::Unknown("TEAM_COMPOSITION".into()));
        assert_eq!(status.as_str(), "TEAM_COMPOSITION");
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            "\"TEAM_COMPOSITION\""
        );
    }

    #[test]
    fn status_matching_is_case_sensitive() {
        assert_eq!(
            RoomStatus::from("waiting"),
            RoomStatus::Unknown("waiting".into())
        );
    }

    #[test]
    fn composition_method_wire_names() {
        let body = TeamCompositionRequest {
            method: TeamCompositionMethod::Auction,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"method":"AUCTION"}"#
        );
        assert_eq!(TeamCompositionMethod::default(), TeamCompositionMethod::Auto);
    }

    #[test]
    fn null_participants_read_as_empty() {
        let json = r#"{
            "roomCode": "AB12",
            "title": "t",
            "maxParticipants": 10,
            "currentParticipants": 0,
            "hostName": "alice",
            "status": "WAITING",
            "participants": null
        }"#;
        let snapshot: RoomSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.participants.is_empty());
        assert!(snapshot.created_at.is_none());
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let req = LoginRequest {
            email: "a@b.c".into(),
            password: "hunter22".into(),
        };
        assert!(!format!("{req:?}").contains("hunter22"));

        let resp = LoginResponse {
            token: "jwt.secret".into(),
            username: "alice".into(),
            email: None,
        };
        assert!(!format!("{resp:?}").contains("jwt.secret"));
    }

    #[test]
    fn envelope_prefers_error_over_message() {
        let env: ApiResponse<bool> =
            serde_json::from_str(r#"{"success":false,"message":"m","error":"e"}"#).unwrap();
        assert_eq!(env.failure_message(), Some("e"));
        assert!(env.data.is_none());
    }
}
