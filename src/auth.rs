//! Account endpoints: login, registration, availability checks, onboarding.
//!
//! Every `/api/auth/*` endpoint answers with an [`ApiResponse`] envelope. A
//! `success: false` envelope, or a non-2xx response whose body is an envelope
//! with a message, becomes [`LobbyError::Rejected`] carrying that message.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::{decode, encode, require_token, LobbyClient};
use crate::error::{LobbyError, Result};
use crate::protocol::{
    ApiResponse, EmailRequest, EmailVerifyRequest, LoginRequest, LoginResponse, LolTagRequest,
    NicknameRequest, OAuthProvider, OnboardingRequest, RegisterRequest, UserProfile,
};
use crate::session::Session;
use crate::transport::{HttpRequest, HttpTransport};
use crate::validation::{
    validate_email, validate_nickname, validate_onboarding, validate_registration,
};

impl<T: HttpTransport> LobbyClient<T> {
    /// `POST /api/auth/login`: exchange credentials for a [`Session`].
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::Validation`] for a malformed email and
    /// [`LobbyError::Rejected`] when the backend refuses the credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        validate_email(email)?;
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let login: LoginResponse = self.auth_call("/api/auth/login", &body, None).await?;
        info!(username = %login.username, "logged in");
        Ok(Session::from(login))
    }

    /// `POST /api/auth/email/code`: mail a verification code.
    pub async fn request_email_code(&self, email: &str) -> Result<()> {
        validate_email(email)?;
        let body = EmailRequest {
            email: email.to_string(),
        };
        self.auth_call_unit("/api/auth/email/code", &body, None).await
    }

    /// `POST /api/auth/email/verify`: `true` if the code matches.
    pub async fn verify_email_code(&self, email: &str, code: &str) -> Result<bool> {
        validate_email(email)?;
        let body = EmailVerifyRequest {
            email: email.to_string(),
            code: code.to_string(),
        };
        self.auth_call("/api/auth/email/verify", &body, None).await
    }

    /// `POST /api/auth/check/nickname`: `true` if nobody uses `nickname` yet.
    pub async fn check_nickname(&self, nickname: &str) -> Result<bool> {
        validate_nickname(nickname)?;
        let body = NicknameRequest {
            nickname: nickname.trim().to_string(),
        };
        self.auth_call("/api/auth/check/nickname", &body, None).await
    }

    /// `POST /api/auth/check/loltag`: `true` if the backend accepts the tag.
    pub async fn check_lol_tag(&self, lol_tag: &str) -> Result<bool> {
        let body = LolTagRequest {
            lol_tag: lol_tag.trim().to_string(),
        };
        self.auth_call("/api/auth/check/loltag", &body, None).await
    }

    /// `POST /api/auth/register`: create an account and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::Validation`] before sending if any field fails
    /// the form constraints.
    pub async fn register(&self, request: &RegisterRequest) -> Result<i64> {
        validate_registration(request)?;
        debug!(email = %request.email, nickname = %request.nickname, "registering account");
        self.auth_call("/api/auth/register", request, None).await
    }

    /// `POST /api/auth/onboarding`: finish an account created through OAuth.
    pub async fn complete_onboarding(
        &self,
        session: &Session,
        request: &OnboardingRequest,
    ) -> Result<()> {
        let token = require_token(session)?;
        validate_onboarding(request)?;
        self.auth_call_unit("/api/auth/onboarding", request, Some(token))
            .await
    }

    /// `GET /api/users/me`: the profile of the session's user.
    ///
    /// Profile sync is best effort: anonymous sessions and failures both yield
    /// `None`, the latter with a warning logged.
    pub async fn fetch_profile(&self, session: &Session) -> Option<UserProfile> {
        let token = session.token()?;
        let request = HttpRequest::get(self.url("/api/users/me")).with_bearer_token(Some(token));
        let result = match self.execute(request).await {
            Ok(response) => match response.body_text() {
                Some(body) => decode::<UserProfile>(body).map(Some),
                None => Ok(None),
            },
            Err(e) => Err(e),
        };
        result.unwrap_or_else(|e| {
            warn!("profile sync failed: {e}");
            None
        })
    }

    /// Where to send a browser to start an OAuth2 login with `provider`.
    pub fn oauth_authorization_url(&self, provider: OAuthProvider) -> String {
        self.url(&format!(
            "/oauth2/authorization/{}",
            provider.registration_id()
        ))
    }

    // ── Internal helpers ────────────────────────────────────────────

    async fn auth_call<B, D>(&self, path: &str, body: &B, token: Option<&str>) -> Result<D>
    where
        B: Serialize + Sync,
        D: DeserializeOwned,
    {
        let envelope: ApiResponse<D> = self.send_envelope(path, body, token).await?;
        match envelope.data {
            Some(data) => Ok(data),
            None => Err(LobbyError::Serialization(serde::de::Error::custom(
                "response envelope carried no `data`",
            ))),
        }
    }

    async fn auth_call_unit<B>(&self, path: &str, body: &B, token: Option<&str>) -> Result<()>
    where
        B: Serialize + Sync,
    {
        self.send_envelope::<B, serde_json::Value>(path, body, token)
            .await
            .map(drop)
    }

    async fn send_envelope<B, D>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<ApiResponse<D>>
    where
        B: Serialize + Sync,
        D: DeserializeOwned,
    {
        let request = HttpRequest::post(self.url(path))
            .with_body(encode(body)?)
            .with_bearer_token(token);

        let response = match self.execute(request).await {
            Ok(response) => response,
            Err(LobbyError::Server {
                status,
                body: Some(text),
            }) => return Err(rejection_from_body(status, text)),
            Err(e) => return Err(e),
        };

        let envelope: ApiResponse<D> = decode(response.body_text().unwrap_or_default())?;
        if !envelope.success {
            let message = envelope
                .failure_message()
                .unwrap_or("request was not successful")
                .to_string();
            return Err(LobbyError::Rejected { message });
        }
        Ok(envelope)
    }
}

/// Prefer the envelope's message over the raw body for failed auth calls.
fn rejection_from_body(status: u16, text: String) -> LobbyError {
    match serde_json::from_str::<ApiResponse<serde_json::Value>>(&text) {
        Ok(envelope) => match envelope.failure_message() {
            Some(message) => LobbyError::Rejected {
                message: message.to_string(),
            },
            None => LobbyError::Server {
                status,
                body: Some(text),
            },
        },
        Err(_) => LobbyError::Server {
            status,
            body: Some(text),
        },
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
    fn rejection_uses_envelope_message() {
        let err = rejection_from_body(
            400,
            r#"{"success":false,"message":"이미 사용 중인 이메일입니다."}"#.into(),
        );
        match err {
            LobbyError::Rejected { message } => assert_eq!(message, "이미 사용 중인 이메일입니다."),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn rejection_keeps_plain_bodies() {
        let err = rejection_from_body(500, "Internal Server Error".into());
        assert!(matches!(
            err,
            LobbyError::Server { status: 500, body: Some(ref b) } if b == "Internal Server Error"
        ));
    }
}
