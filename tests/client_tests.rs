#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
//! Integration-style tests for the REST surface of `LobbyClient`.
//!
//! Uses the scripted `MockTransport` from `tests/common` to check the exact
//! requests sent (method, path, body, bearer token) and how responses are
//! mapped onto `LobbyError`.

mod common;

use nexus_lobby_client::protocol::{
    Agreements, OAuthProvider, OnboardingRequest, RegisterRequest, TeamCompositionMethod,
};
use nexus_lobby_client::transport::Method;
use nexus_lobby_client::{ErrorKind, LobbyError, RoomStatus, Session, ValidationIssue};
use serde_json::{json, Value};

use common::{
    alice_room_json, client, envelope, failed_envelope, ok, status, summary_json, url, user,
    MockTransport,
};

fn body_json(body: Option<&String>) -> Value {
    serde_json::from_str(body.expect("request had no body")).expect("body is JSON")
}

// ════════════════════════════════════════════════════════════════════
// Rooms
// ════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn list_rooms_sends_get_with_token() {
    let rooms = json!([
        summary_json("AB12", "alice", "WAITING", 3, 10),
        summary_json("CD34", "bob", "IN_PROGRESS", 10, 10),
    ]);
    let client = client(MockTransport::new(vec![ok(rooms.to_string())]));

    let listed = client.list_rooms(&user("alice")).await.unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[1].status, RoomStatus::InProgress);
    let req = client.transport().last_request();
    assert_eq!(req.method, Method::Get);
    assert_eq!(req.url, url("/api/games"));
    assert_eq!(req.bearer_token.as_deref(), Some("token-alice"));
    assert!(req.body.is_none());
}

#[tokio::test]
async fn empty_list_body_is_empty_list() {
    let client = client(MockTransport::new(vec![ok("")]));
    assert!(client.list_rooms(&user("alice")).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_room_decodes_snapshot() {
    let client = client(MockTransport::new(vec![ok(alice_room_json())]));

    let room = client.get_room(&user("carol"), "AB12").await.unwrap();

    assert_eq!(room.room_code, "AB12");
    assert_eq!(room.host_name, "alice");
    assert_eq!(room.current_participants, 3);
    assert_eq!(room.participants.len(), 2);
    assert_eq!(client.transport().last_request().url, url("/api/games/AB12"));
}

#[tokio::test]
async fn missing_room_is_not_found() {
    let client = client(MockTransport::new(vec![status(404, ""), ok("")]));
    let session = user("alice");

    for _ in 0..2 {
        let err = client.get_room(&session, "ZZZZ").await.unwrap_err();
        assert!(
            matches!(err, LobbyError::NotFound { ref room_code } if room_code == "ZZZZ"),
            "got {err:?}"
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

#[tokio::test]
async fn server_errors_carry_body_or_status() {
    let client = client(MockTransport::new(vec![
        status(500, "방을 불러올 수 없습니다"),
        status(503, ""),
    ]));
    let session = user("alice");

    let err = client.list_rooms(&session).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkOrServer);
    assert_eq!(err.user_message(), "방을 불러올 수 없습니다");

    let err = client.list_rooms(&session).await.unwrap_err();
    assert_eq!(err.user_message(), "Request failed: 503");
}

#[tokio::test]
async fn transport_failure_is_network_error() {
    let client = client(MockTransport::new(vec![Err(LobbyError::Transport(
        "connection refused".into(),
    ))]));
    let err = client.get_room(&user("alice"), "AB12").await.unwrap_err();
    assert!(matches!(err, LobbyError::Transport(_)));
    assert_eq!(err.kind(), ErrorKind::NetworkOrServer);
}

#[tokio::test]
async fn create_room_posts_trimmed_title() {
    let created = common::room_json("EF56", "alice", "WAITING", 1, 20, &["alice"]);
    let client = client(MockTransport::new(vec![ok(created)]));

    let room = client
        .create_room(&user("alice"), "  Test Room  ", 20)
        .await
        .unwrap();

    assert_eq!(room.room_code, "EF56");
    let req = client.transport().last_request();
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.url, url("/api/games"));
    assert_eq!(
        body_json(req.body.as_ref()),
        json!({ "title": "Test Room", "maxParticipants": 20 })
    );
}

#[tokio::test]
async fn invalid_room_never_reaches_the_network() {
    let client = client(MockTransport::default());
    let session = user("alice");
    let cases = [
        ("", 20, ValidationIssue::TitleRequired),
        ("A", 20, ValidationIssue::TitleTooShort),
        ("Test Room", 5, ValidationIssue::TooFewParticipants),
        ("Test Room", 55, ValidationIssue::TooManyParticipants),
        ("Test Room", 23, ValidationIssue::ParticipantsNotMultipleOfFive),
    ];
    for (title, max, expected) in cases {
        let err = client.create_room(&session, title, max).await.unwrap_err();
        assert!(
            matches!(err, LobbyError::Validation(issue) if issue == expected),
            "{title:?}/{max}"
        );
    }
    assert_eq!(client.transport().request_count(), 0);
}

#[tokio::test]
async fn join_posts_to_room_path() {
    let client = client(MockTransport::new(vec![ok("")]));
    client.join_room(&user("carol"), "AB12").await.unwrap();

    let req = client.transport().last_request();
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.url, url("/api/games/AB12/join"));
    assert_eq!(req.authorization().as_deref(), Some("Bearer token-carol"));
}

#[tokio::test]
async fn team_composition_sends_method() {
    let client = client(MockTransport::new(vec![ok(""), ok("")]));
    let session = user("alice");

    client
        .start_team_composition(&session, "AB12", TeamCompositionMethod::Auto)
        .await
        .unwrap();
    client
        .start_team_composition(&session, "AB12", TeamCompositionMethod::Auction)
        .await
        .unwrap();

    let requests = client.transport().requests();
    assert_eq!(requests[0].url, url("/api/games/AB12/team-composition"));
    assert_eq!(body_json(requests[0].body.as_ref()), json!({ "method": "AUTO" }));
    assert_eq!(
        body_json(requests[1].body.as_ref()),
        json!({ "method": "AUCTION" })
    );
}

#[tokio::test]
async fn unauthorized_mutation_is_auth_required() {
    let client = client(MockTransport::new(vec![status(401, "")]));
    let err = client.join_room(&user("carol"), "AB12").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthRequired);
}

// ════════════════════════════════════════════════════════════════════
// Accounts
// ════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn login_returns_authenticated_session() {
    let data = json!({ "token": "jwt-abc", "username": "alice", "email": "alice@example.com" });
    let client = client(MockTransport::new(vec![ok(envelope(data))]));

    let session = client
        .login("alice@example.com", "password123")
        .await
        .unwrap();

    assert!(session.is_authenticated());
    assert!(session.is_user("alice"));
    assert_eq!(session.token(), Some("jwt-abc"));

    let req = client.transport().last_request();
    assert_eq!(req.url, url("/api/auth/login"));
    assert!(req.bearer_token.is_none());
    assert_eq!(
        body_json(req.body.as_ref()),
        json!({ "email": "alice@example.com", "password": "password123" })
    );
}

#[tokio::test]
async fn rejected_login_surfaces_backend_message() {
    let client = client(MockTransport::new(vec![
        ok(failed_envelope("이메일 또는 비밀번호가 올바르지 않습니다.")),
        status(400, failed_envelope("잠긴 계정입니다.")),
    ]));

    let err = client.login("a@b.co", "wrongpass").await.unwrap_err();
    assert_eq!(err.user_message(), "이메일 또는 비밀번호가 올바르지 않습니다.");

    let err = client.login("a@b.co", "wrongpass").await.unwrap_err();
    assert!(matches!(err, LobbyError::Rejected { ref message } if message == "잠긴 계정입니다."));
}

#[tokio::test]
async fn malformed_email_is_rejected_locally() {
    let client = client(MockTransport::default());
    let err = client.login("not-an-email", "password123").await.unwrap_err();
    assert!(matches!(
        err,
        LobbyError::Validation(ValidationIssue::InvalidEmail)
    ));
    assert_eq!(client.transport().request_count(), 0);
}

#[tokio::test]
async fn email_code_and_availability_checks() {
    let client = client(MockTransport::new(vec![
        ok(envelope(Value::Null)),
        ok(envelope(json!(true))),
        ok(envelope(json!(false))),
        ok(envelope(json!(true))),
    ]));

    client.request_email_code("new@example.com").await.unwrap();
    assert!(client
        .verify_email_code("new@example.com", "123456")
        .await
        .unwrap());
    assert!(!client.check_nickname(" alice ").await.unwrap());
    assert!(client.check_lol_tag("Faker#KR1").await.unwrap());

    let requests = client.transport().requests();
    let paths: Vec<_> = requests.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        paths,
        [
            url("/api/auth/email/code"),
            url("/api/auth/email/verify"),
            url("/api/auth/check/nickname"),
            url("/api/auth/check/loltag"),
        ]
    );
    assert_eq!(body_json(requests[2].body.as_ref()), json!({ "nickname": "alice" }));
    assert_eq!(
        body_json(requests[3].body.as_ref()),
        json!({ "lolTag": "Faker#KR1" })
    );
}

fn registration() -> RegisterRequest {
    RegisterRequest {
        email: "dave@example.com".into(),
        nickname: "dave".into(),
        password: "password123".into(),
        lol_tag: "Dave_01#KR1".into(),
        agreements: Agreements {
            terms: true,
            privacy: true,
            marketing: None,
        },
    }
}

#[tokio::test]
async fn register_returns_user_id() {
    let client = client(MockTransport::new(vec![ok(envelope(json!(42)))]));

    let id = client.register(&registration()).await.unwrap();

    assert_eq!(id, 42);
    let body = body_json(client.transport().last_request().body.as_ref());
    assert_eq!(body["lolTag"], "Dave_01#KR1");
    assert_eq!(body["agreements"], json!({ "terms": true, "privacy": true }));
}

#[tokio::test]
async fn register_checks_form_first() {
    let client = client(MockTransport::default());

    let mut short_password = registration();
    short_password.password = "short".into();
    let mut bad_tag = registration();
    bad_tag.lol_tag = "dave".into();
    let mut no_terms = registration();
    no_terms.agreements.terms = false;

    for (request, expected) in [
        (short_password, ValidationIssue::PasswordTooShort),
        (bad_tag, ValidationIssue::InvalidLolTag),
        (no_terms, ValidationIssue::TermsNotAccepted),
    ] {
        let err = client.register(&request).await.unwrap_err();
        assert!(matches!(err, LobbyError::Validation(issue) if issue == expected));
    }
    assert_eq!(client.transport().request_count(), 0);
}

#[tokio::test]
async fn envelope_without_data_is_serialization_error() {
    let client = client(MockTransport::new(vec![ok(r#"{"success":true}"#)]));
    let err = client.register(&registration()).await.unwrap_err();
    assert!(matches!(err, LobbyError::Serialization(_)));
}

#[tokio::test]
async fn onboarding_requires_session_and_sends_token() {
    let client = client(MockTransport::new(vec![ok(envelope(Value::Null))]));
    let request = OnboardingRequest {
        nickname: "carol".into(),
        lol_tag: "Carol#EUW".into(),
    };

    let err = client
        .complete_onboarding(&Session::anonymous(), &request)
        .await
        .unwrap_err();
    assert!(matches!(err, LobbyError::AuthRequired));
    assert_eq!(client.transport().request_count(), 0);

    client
        .complete_onboarding(&user("carol"), &request)
        .await
        .unwrap();
    let req = client.transport().last_request();
    assert_eq!(req.url, url("/api/auth/onboarding"));
    assert_eq!(req.bearer_token.as_deref(), Some("token-carol"));
}

#[tokio::test]
async fn profile_sync_is_best_effort() {
    let profile = json!({ "id": 7, "email": "bob@example.com", "nickname": "bob", "summonerName": null });
    let client = client(MockTransport::new(vec![
        ok(profile.to_string()),
        status(500, "down"),
    ]));

    assert_eq!(client.fetch_profile(&Session::anonymous()).await, None);
    assert_eq!(client.transport().request_count(), 0);

    let fetched = client.fetch_profile(&user("bob")).await.unwrap();
    assert_eq!(fetched.id, Some(7));
    assert_eq!(fetched.nickname.as_deref(), Some("bob"));
    assert_eq!(fetched.summoner_name, None);
    assert_eq!(client.transport().last_request().url, url("/api/users/me"));

    assert_eq!(client.fetch_profile(&user("bob")).await, None);
}

#[test]
fn oauth_urls_point_at_backend() {
    let client = client(MockTransport::default());
    assert_eq!(
        client.oauth_authorization_url(OAuthProvider::Google),
        url("/oauth2/authorization/google")
    );
    assert_eq!(
        client.oauth_authorization_url(OAuthProvider::Discord),
        url("/oauth2/authorization/discord")
    );
}
