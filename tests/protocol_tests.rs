#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
//! Wire-format tests for the Nexus lobby protocol types.
//!
//! Fixtures are shaped like the JSON the backend's controllers actually
//! produce, including the fields it leaves null or omits.

use nexus_lobby_client::protocol::{
    ApiResponse, CreateRoomRequest, LoginResponse, RegisterRequest, RoomSnapshot, RoomSummary,
    TeamCompositionMethod, TeamCompositionRequest, UserProfile,
};
use nexus_lobby_client::RoomStatus;
use serde_json::json;

// ════════════════════════════════════════════════════════════════════
// Rooms
// ════════════════════════════════════════════════════════════════════

const ROOM_FIXTURE: &str = r#"{
    "roomCode": "AB12",
    "title": "금요일 내전",
    "maxParticipants": 10,
    "currentParticipants": 3,
    "hostName": "alice",
    "status": "WAITING",
    "createdAt": "2026-10-01T20:00:00.123456",
    "participants": [
        { "nickname": "alice", "summonerName": "Hide on bush", "teamNumber": 1 },
        { "nickname": "bob", "summonerName": null, "teamNumber": null },
        { "nickname": "dave" }
    ]
}"#;

#[test]
fn room_snapshot_from_backend_fixture() {
    let room: RoomSnapshot = serde_json::from_str(ROOM_FIXTURE).unwrap();
    assert_eq!(room.room_code, "AB12");
    assert_eq!(room.title, "금요일 내전");
    assert_eq!(room.status, RoomStatus::Waiting);
    assert_eq!(room.created_at.as_deref(), Some("2026-10-01T20:00:00.123456"));
    assert_eq!(room.participants.len(), 3);
    assert_eq!(
        room.participants[0].summoner_name.as_deref(),
        Some("Hide on bush")
    );
    assert_eq!(room.participants[0].team_number, Some(1));
    assert_eq!(room.participants[1].summoner_name, None);
    assert_eq!(room.participants[2].team_number, None);
}

#[test]
fn team_numbers_outside_a_byte_still_decode() {
    let room: RoomSnapshot = serde_json::from_value(json!({
        "roomCode": "AB12",
        "title": "t",
        "maxParticipants": 10,
        "currentParticipants": 2,
        "hostName": "alice",
        "status": "IN_PROGRESS",
        "participants": [
            { "nickname": "alice", "teamNumber": -1 },
            { "nickname": "bob", "teamNumber": 300 }
        ],
    }))
    .unwrap();
    let teams: Vec<_> = room.participants.iter().map(|p| p.team_number).collect();
    assert_eq!(teams, [Some(-1), Some(300)]);
}

#[test]
fn null_or_missing_roster_is_empty() {
    for participants in [json!(null), json!([])] {
        let room: RoomSnapshot = serde_json::from_value(json!({
            "roomCode": "AB12",
            "title": "t",
            "maxParticipants": 10,
            "currentParticipants": 0,
            "hostName": "alice",
            "status": "WAITING",
            "participants": participants,
        }))
        .unwrap();
        assert!(room.participants.is_empty());
    }

    let room: RoomSnapshot = serde_json::from_value(json!({
        "roomCode": "AB12",
        "title": "t",
        "maxParticipants": 10,
        "currentParticipants": 0,
        "hostName": "alice",
        "status": "WAITING",
    }))
    .unwrap();
    assert!(room.participants.is_empty());
    assert_eq!(room.created_at, None);
}

#[test]
fn unknown_status_survives_a_round_trip() {
    let mut value: serde_json::Value = serde_json::from_str(ROOM_FIXTURE).unwrap();
    value["status"] = json!("TEAM_COMPOSITION");

    let room: RoomSnapshot = serde_json::from_value(value).unwrap();
    assert_eq!(room.status, RoomStatus::Unknown("TEAM_COMPOSITION".into()));

    let back = serde_json::to_value(&room).unwrap();
    assert_eq!(back["status"], "TEAM_COMPOSITION");
}

#[test]
fn known_statuses_use_backend_spelling() {
    for (wire, status) in [
        ("WAITING", RoomStatus::Waiting),
        ("IN_PROGRESS", RoomStatus::InProgress),
        ("COMPLETED", RoomStatus::Completed),
    ] {
        assert_eq!(serde_json::to_value(&status).unwrap(), json!(wire));
        assert_eq!(
            serde_json::from_value::<RoomStatus>(json!(wire)).unwrap(),
            status
        );
        assert_eq!(status.to_string(), wire);
    }
}

#[test]
fn room_list_ignores_extra_fields() {
    let rooms: Vec<RoomSummary> = serde_json::from_value(json!([{
        "roomCode": "AB12",
        "title": "t",
        "maxParticipants": 10,
        "currentParticipants": 3,
        "hostName": "alice",
        "status": "COMPLETED",
        "createdAt": "2026-10-01T20:00:00",
        "participants": []
    }]))
    .unwrap();
    assert_eq!(rooms[0].status, RoomStatus::Completed);
}

#[test]
fn request_bodies_are_camel_case() {
    let create = CreateRoomRequest {
        title: "Test Room".into(),
        max_participants: 20,
    };
    assert_eq!(
        serde_json::to_value(&create).unwrap(),
        json!({ "title": "Test Room", "maxParticipants": 20 })
    );

    let compose = TeamCompositionRequest {
        method: TeamCompositionMethod::Auction,
    };
    assert_eq!(
        serde_json::to_value(compose).unwrap(),
        json!({ "method": "AUCTION" })
    );
}

// ════════════════════════════════════════════════════════════════════
// Auth
// ════════════════════════════════════════════════════════════════════

#[test]
fn login_envelope_fixture() {
    let envelope: ApiResponse<LoginResponse> = serde_json::from_str(
        r#"{
            "success": true,
            "data": { "token": "eyJhbGciOi", "username": "alice", "email": "alice@example.com" },
            "message": "로그인 성공"
        }"#,
    )
    .unwrap();
    assert!(envelope.success);
    let login = envelope.data.unwrap();
    assert_eq!(login.username, "alice");
    assert!(!format!("{login:?}").contains("eyJhbGciOi"));
}

#[test]
fn failure_message_prefers_error_field() {
    let envelope: ApiResponse<serde_json::Value> = serde_json::from_value(json!({
        "success": false,
        "data": null,
        "message": "요청 실패",
        "error": "EMAIL_ALREADY_EXISTS"
    }))
    .unwrap();
    assert_eq!(envelope.failure_message(), Some("EMAIL_ALREADY_EXISTS"));

    let envelope: ApiResponse<serde_json::Value> =
        serde_json::from_value(json!({ "success": false, "message": "요청 실패" })).unwrap();
    assert_eq!(envelope.failure_message(), Some("요청 실패"));
    assert!(envelope.data.is_none());
}

#[test]
fn register_body_matches_backend_dto() {
    let request: RegisterRequest = serde_json::from_value(json!({
        "email": "dave@example.com",
        "nickname": "dave",
        "password": "password123",
        "lolTag": "Dave#KR1",
        "agreements": { "terms": true, "privacy": true, "marketing": false }
    }))
    .unwrap();
    assert_eq!(request.lol_tag, "Dave#KR1");
    assert_eq!(request.agreements.marketing, Some(false));
    assert!(!format!("{request:?}").contains("password123"));

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["lolTag"], "Dave#KR1");
}

#[test]
fn profile_fields_are_optional() {
    let profile: UserProfile = serde_json::from_str("{}").unwrap();
    assert_eq!(profile, UserProfile::default());

    let profile: UserProfile =
        serde_json::from_value(json!({ "id": 3, "nickname": "carol", "summonerName": "Carol" }))
            .unwrap();
    assert_eq!(profile.id, Some(3));
    assert_eq!(profile.summoner_name.as_deref(), Some("Carol"));
    assert_eq!(profile.email, None);
}
