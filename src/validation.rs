//! Client-side form constraints.
//!
//! These mirror the backend's request validation so that an obviously invalid
//! form is rejected before any network call is made. Passing these checks does
//! not guarantee the backend will accept the request (nickname collisions, for
//! example, are only known server-side).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::protocol::{CreateRoomRequest, OnboardingRequest, RegisterRequest};

/// Minimum room title length, in characters, after trimming.
pub const TITLE_MIN_CHARS: usize = 2;
/// Maximum room title length, in characters, after trimming.
pub const TITLE_MAX_CHARS: usize = 50;
/// Smallest room a host may open.
pub const MIN_PARTICIPANTS: u32 = 10;
/// Largest room a host may open.
pub const MAX_PARTICIPANTS: u32 = 50;
/// Room sizes must be a multiple of this.
pub const PARTICIPANT_STEP: u32 = 5;
/// Minimum nickname length, in characters.
pub const NICKNAME_MIN_CHARS: usize = 2;
/// Maximum nickname length, in characters.
pub const NICKNAME_MAX_CHARS: usize = 20;
/// Minimum password length, in characters.
pub const PASSWORD_MIN_CHARS: usize = 8;

/// A single failed form constraint.
///
/// Use [`description()`](ValidationIssue::description) for text that can be
/// shown next to the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationIssue {
    // Room creation
    TitleRequired,
    TitleTooShort,
    TitleTooLong,
    TooFewParticipants,
    TooManyParticipants,
    ParticipantsNotMultipleOfFive,

    // Account
    InvalidEmail,
    NicknameRequired,
    NicknameLength,
    PasswordTooShort,
    LolTagRequired,
    InvalidLolTag,
    TermsNotAccepted,
    PrivacyNotAccepted,
}

impl ValidationIssue {
    /// Returns a human-readable description of this issue.
    pub fn description(&self) -> &'static str {
        match self {
            Self::TitleRequired => "A room title is required.",
            Self::TitleTooShort => "The room title must be at least 2 characters.",
            Self::TitleTooLong => "The room title must be at most 50 characters.",
            Self::TooFewParticipants => "A room needs at least 10 participants.",
            Self::TooManyParticipants => "A room can hold at most 50 participants.",
            Self::ParticipantsNotMultipleOfFive => {
                "The participant count must be a multiple of 5."
            }

            Self::InvalidEmail => "The email address is not valid.",
            Self::NicknameRequired => "A nickname is required.",
            Self::NicknameLength => "The nickname must be between 2 and 20 characters.",
            Self::PasswordTooShort => "The password must be at least 8 characters.",
            Self::LolTagRequired => "A League of Legends tag is required.",
            Self::InvalidLolTag => {
                "The League of Legends tag must look like Summoner#KR1."
            }
            Self::TermsNotAccepted => "You must accept the terms of service.",
            Self::PrivacyNotAccepted => "You must accept the privacy policy.",
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for ValidationIssue {}

// ── Rooms ───────────────────────────────────────────────────────────

/// Validate a room title and return it trimmed.
pub fn validate_room_title(title: &str) -> Result<String, ValidationIssue> {
    let trimmed = title.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(ValidationIssue::TitleRequired);
    }
    if len < TITLE_MIN_CHARS {
        return Err(ValidationIssue::TitleTooShort);
    }
    if len > TITLE_MAX_CHARS {
        return Err(ValidationIssue::TitleTooLong);
    }
    Ok(trimmed.to_string())
}

/// Validate a room size: within `[10, 50]` and a multiple of 5.
pub fn validate_max_participants(max_participants: u32) -> Result<(), ValidationIssue> {
    if max_participants < MIN_PARTICIPANTS {
        return Err(ValidationIssue::TooFewParticipants);
    }
    if max_participants > MAX_PARTICIPANTS {
        return Err(ValidationIssue::TooManyParticipants);
    }
    if max_participants % PARTICIPANT_STEP != 0 {
        return Err(ValidationIssue::ParticipantsNotMultipleOfFive);
    }
    Ok(())
}

/// Build a [`CreateRoomRequest`] from raw form input.
///
/// The title is checked first, so a form with both fields wrong reports the
/// title issue.
pub fn validate_create_room(
    title: &str,
    max_participants: u32,
) -> Result<CreateRoomRequest, ValidationIssue> {
    let title = validate_room_title(title)?;
    validate_max_participants(max_participants)?;
    Ok(CreateRoomRequest {
        title,
        max_participants,
    })
}

// ── Accounts ────────────────────────────────────────────────────────

/// Shallow email check: one `@`, a non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> Result<(), ValidationIssue> {
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationIssue::InvalidEmail);
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationIssue::InvalidEmail);
    };
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok {
        return Err(ValidationIssue::InvalidEmail);
    }
    Ok(())
}

pub fn validate_nickname(nickname: &str) -> Result<(), ValidationIssue> {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        return Err(ValidationIssue::NicknameRequired);
    }
    let len = trimmed.chars().count();
    if !(NICKNAME_MIN_CHARS..=NICKNAME_MAX_CHARS).contains(&len) {
        return Err(ValidationIssue::NicknameLength);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationIssue> {
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(ValidationIssue::PasswordTooShort);
    }
    Ok(())
}

/// Riot ID: a name of 3–16 ASCII word characters or Hangul syllables, then
/// `#`, 2–4 uppercase ASCII letters and optional digits.
static LOL_TAG_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_가-힣]{3,16}#[A-Z]{2,4}[0-9]*$").ok());

/// Validate a Riot ID of the form `Name#TAG` (`Faker#KR1`, `소환사#EUW12`).
pub fn validate_lol_tag(lol_tag: &str) -> Result<(), ValidationIssue> {
    let lol_tag = lol_tag.trim();
    if lol_tag.is_empty() {
        return Err(ValidationIssue::LolTagRequired);
    }
    let matches = LOL_TAG_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(lol_tag));
    if matches {
        Ok(())
    } else {
        Err(ValidationIssue::InvalidLolTag)
    }
}

/// Validate a full registration form.
pub fn validate_registration(request: &RegisterRequest) -> Result<(), ValidationIssue> {
    validate_email(&request.email)?;
    validate_nickname(&request.nickname)?;
    validate_password(&request.password)?;
    validate_lol_tag(&request.lol_tag)?;
    if !request.agreements.terms {
        return Err(ValidationIssue::TermsNotAccepted);
    }
    if !request.agreements.privacy {
        return Err(ValidationIssue::PrivacyNotAccepted);
    }
    Ok(())
}

pub fn validate_onboarding(request: &OnboardingRequest) -> Result<(), ValidationIssue> {
    validate_nickname(&request.nickname)?;
    validate_lol_tag(&request.lol_tag)
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
    use crate::protocol::Agreements;

    #[test]
    fn title_is_trimmed_and_bounded() {
        assert_eq!(validate_room_title("  Test Room  ").unwrap(), "Test Room");
        assert_eq!(validate_room_title("   "), Err(ValidationIssue::TitleRequired));
        assert_eq!(validate_room_title("a"), Err(ValidationIssue::TitleTooShort));
        assert_eq!(
            validate_room_title(&"x".repeat(51)),
            Err(ValidationIssue::TitleTooLong)
        );
        assert!(validate_room_title(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        // 25 Hangul syllables are 75 bytes but only 25 characters.
        let title = "내".repeat(25);
        assert!(validate_room_title(&title).is_ok());
        assert_eq!(validate_room_title("내"), Err(ValidationIssue::TitleTooShort));
    }

    #[test]
    fn participant_bounds_and_step() {
        assert_eq!(
            validate_max_participants(5),
            Err(ValidationIssue::TooFewParticipants)
        );
        assert_eq!(
            validate_max_participants(55),
            Err(ValidationIssue::TooManyParticipants)
        );
        assert_eq!(
            validate_max_participants(12),
            Err(ValidationIssue::ParticipantsNotMultipleOfFive)
        );
        for ok in [10, 15, 20, 25, 30, 35, 40, 45, 50] {
            assert!(validate_max_participants(ok).is_ok(), "{ok} should be valid");
        }
    }

    #[test]
    fn create_room_reports_title_first() {
        assert_eq!(
            validate_create_room("", 3),
            Err(ValidationIssue::TitleRequired)
        );
        let req = validate_create_room(" Test Room ", 20).unwrap();
        assert_eq!(req.title, "Test Room");
        assert_eq!(req.max_participants, 20);
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("user@example.com").is_ok());
        for bad in [
            "",
            "user",
            "@example.com",
            "user@",
            "user@example",
            "a b@c.d",
            "a@b@c.d",
            "u@.com",
            "u@com.",
        ] {
            assert_eq!(
                validate_email(bad),
                Err(ValidationIssue::InvalidEmail),
                "{bad}"
            );
        }
    }

    #[test]
    fn nickname_and_password() {
        assert_eq!(validate_nickname(" "), Err(ValidationIssue::NicknameRequired));
        assert_eq!(validate_nickname("a"), Err(ValidationIssue::NicknameLength));
        assert!(validate_nickname("페이커").is_ok());
        assert_eq!(
            validate_nickname(&"n".repeat(21)),
            Err(ValidationIssue::NicknameLength)
        );
        assert_eq!(
            validate_password("short"),
            Err(ValidationIssue::PasswordTooShort)
        );
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn lol_tags() {
        for ok in ["PlayerName#KR1", "Hide_on_bush#KR", "페이커짱#KR1", "abc#EUW", "abc#NA12"] {
            assert!(validate_lol_tag(ok).is_ok(), "{ok} should be valid");
        }
        assert_eq!(validate_lol_tag(""), Err(ValidationIssue::LolTagRequired));
        let long_name = format!("{}#KR", "a".repeat(17));
        for bad in [
            "PlayerName",
            "ab#KR1",
            "PlayerName#kr1",
            "PlayerName#K",
            "PlayerName#ABCDE",
            "PlayerName#KR1A",
            "Player Name#KR1",
            "Player#Name#KR1",
            long_name.as_str(),
        ] {
            assert_eq!(
                validate_lol_tag(bad),
                Err(ValidationIssue::InvalidLolTag),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn lol_tag_pattern_compiles() {
        assert!(LOL_TAG_PATTERN.is_some());
    }

    #[test]
    fn lol_tag_classes_are_ascii_and_hangul_syllables_only() {
        assert!(validate_lol_tag("  Faker#KR1  ").is_ok());
        assert!(validate_lol_tag("가나다#KR").is_ok());
        assert!(validate_lol_tag(&format!("{}#KR", "힣".repeat(16))).is_ok());
        for bad in ["Café#KR", "ㄱㄴㄷ#KR", "abc#KR１", "abc#KR٣", "ＡＢＣ#KR", "abc#ÉU"] {
            assert_eq!(
                validate_lol_tag(bad),
                Err(ValidationIssue::InvalidLolTag),
                "{bad} should be rejected"
            );
        }
    }

    fn registration() -> RegisterRequest {
        RegisterRequest {
            email: "user@example.com".into(),
            nickname: "summoner".into(),
            password: "password123".into(),
            lol_tag: "Summoner#KR1".into(),
            agreements: Agreements {
                terms: true,
                privacy: true,
                marketing: None,
            },
        }
    }

    #[test]
    fn registration_requires_agreements() {
        assert!(validate_registration(&registration()).is_ok());

        let mut req = registration();
        req.agreements.terms = false;
        assert_eq!(
            validate_registration(&req),
            Err(ValidationIssue::TermsNotAccepted)
        );

        let mut req = registration();
        req.agreements.privacy = false;
        assert_eq!(
            validate_registration(&req),
            Err(ValidationIssue::PrivacyNotAccepted)
        );
    }

    #[test]
    fn display_matches_description() {
        for issue in [
            ValidationIssue::TitleRequired,
            ValidationIssue::InvalidLolTag,
            ValidationIssue::PrivacyNotAccepted,
        ] {
            assert_eq!(issue.to_string(), issue.description());
        }
    }
}
