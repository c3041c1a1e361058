//! Pure derivation of what the current user can see and do in a room.
//!
//! [`RoomView::derive`] takes the last fetched [`RoomSnapshot`] (or its
//! absence) and the caller's [`Session`] and computes the user's [`Role`], the
//! [`ActionSet`] offered to them, and the display fields of the room. It does
//! no I/O and keeps no state, so it can be called on every render.
//!
//! # Rules
//!
//! | Session | Role | Status | Actions |
//! |---|---|---|---|
//! | anonymous | `Outsider` | any | none |
//! | host | `Host` | `WAITING` | `StartTeamComposition` |
//! | host | `Host` | other | none |
//! | listed participant | `Participant` | any | `Leave` (not implemented by the backend) |
//! | anyone else | `Outsider` | `WAITING`, not full | `Join` |
//! | anyone else | `Outsider` | otherwise | none |
//!
//! The host keeps the `Host` role even if the roster also lists them.

use std::collections::BTreeSet;
use std::fmt;

use crate::protocol::{RoomSnapshot, RoomStatus, TeamCompositionMethod};
use crate::session::Session;

/// Rendered in place of a summoner name the participant has not linked.
pub const UNLINKED_SUMMONER_PLACEHOLDER: &str = "소환사명 미등록";

/// The current user's relation to a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Created the room.
    Host,
    /// Listed in the roster.
    Participant,
    /// Neither, or not logged in.
    Outsider,
}

/// Kinds of action a room view can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionKind {
    /// Host only, while the room is `WAITING`.
    StartTeamComposition,
    /// Outsider only, while the room is `WAITING` and not full.
    Join,
    /// Participant only. No endpoint exists yet.
    Leave,
}

impl ActionKind {
    /// Whether the backend exposes an endpoint for this action.
    pub fn is_wired(self) -> bool {
        !matches!(self, Self::Leave)
    }
}

/// A concrete user request, carrying the parameters its REST call needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomAction {
    /// `POST /api/games/{code}/team-composition` with the chosen method.
    StartTeamComposition(TeamCompositionMethod),
    /// `POST /api/games/{code}/join`.
    Join,
    /// Always reported as [`Availability::NotImplemented`].
    Leave,
}

impl RoomAction {
    /// The [`ActionKind`] this request is offered as.
    pub fn kind(self) -> ActionKind {
        match self {
            Self::StartTeamComposition(_) => ActionKind::StartTeamComposition,
            Self::Join => ActionKind::Join,
            Self::Leave => ActionKind::Leave,
        }
    }
}

/// Whether a particular action can be triggered from the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Offered and backed by a REST call.
    Available,
    /// Offered to the user but not backed by any endpoint. Triggering it must
    /// be reported as unavailable, never silently ignored.
    NotImplemented,
    /// Not offered in this view.
    NotOffered,
}

/// The set of actions offered to the user, in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSet(BTreeSet<ActionKind>);

impl ActionSet {
    /// A set offering nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `kind` is offered.
    pub fn contains(&self, kind: ActionKind) -> bool {
        self.0.contains(&kind)
    }

    /// `true` when the view offers no action at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of offered actions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Offered actions in declaration order of [`ActionKind`].
    pub fn iter(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ActionKind> for ActionSet {
    fn from_iter<I: IntoIterator<Item = ActionKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Room status plus the styling hint derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayStatus {
    pub status: RoomStatus,
    /// `true` while the room is `WAITING`. Styling only: whether *this* user
    /// may join is decided by [`RoomViewModel::available_actions`].
    pub is_joinable: bool,
}

impl DisplayStatus {
    fn new(status: &RoomStatus) -> Self {
        Self {
            status: status.clone(),
            is_joinable: status.is_waiting(),
        }
    }

    /// The status text, verbatim for unknown statuses.
    pub fn label(&self) -> &str {
        self.status.as_str()
    }
}

/// One roster line, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow<'a> {
    /// List key. Duplicate nicknames from the backend produce duplicate keys.
    pub key: &'a str,
    pub nickname: &'a str,
    /// Linked summoner name or [`UNLINKED_SUMMONER_PLACEHOLDER`].
    pub summoner: &'a str,
    pub team_number: Option<i32>,
}

/// Everything a room detail view needs, derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomViewModel {
    snapshot: RoomSnapshot,
    role: Role,
    available_actions: ActionSet,
    display_status: DisplayStatus,
}

impl RoomViewModel {
    fn derive(snapshot: &RoomSnapshot, session: &Session) -> Self {
        let role = role_of(snapshot, session);
        let available_actions = if session.is_authenticated() {
            actions_for(role, snapshot)
        } else {
            ActionSet::empty()
        };
        Self {
            snapshot: snapshot.clone(),
            role,
            available_actions,
            display_status: DisplayStatus::new(&snapshot.status),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn available_actions(&self) -> &ActionSet {
        &self.available_actions
    }

    pub fn display_status(&self) -> &DisplayStatus {
        &self.display_status
    }

    pub fn snapshot(&self) -> &RoomSnapshot {
        &self.snapshot
    }

    pub fn availability(&self, kind: ActionKind) -> Availability {
        if !self.available_actions.contains(kind) {
            Availability::NotOffered
        } else if kind.is_wired() {
            Availability::Available
        } else {
            Availability::NotImplemented
        }
    }

    pub fn is_full(&self) -> bool {
        self.snapshot.current_participants >= self.snapshot.max_participants
    }

    /// `"current / max"`, e.g. `"3 / 10"`.
    pub fn occupancy(&self) -> String {
        format!(
            "{} / {}",
            self.snapshot.current_participants, self.snapshot.max_participants
        )
    }

    pub fn participant_rows(&self) -> impl Iterator<Item = ParticipantRow<'_>> + '_ {
        self.snapshot.participants.iter().map(|p| ParticipantRow {
            key: &p.nickname,
            nickname: &p.nickname,
            summoner: p
                .summoner_name
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(UNLINKED_SUMMONER_PLACEHOLDER),
            team_number: p.team_number,
        })
    }
}

/// What a room detail view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomView {
    /// The room could not be loaded. Terminal: no actions are offered.
    NotFoundOrForbidden,
    Room(RoomViewModel),
}

impl RoomView {
    /// Derive the view for `snapshot` as seen by `session`.
    pub fn derive(snapshot: Option<&RoomSnapshot>, session: &Session) -> Self {
        match snapshot {
            Some(snapshot) => Self::Room(RoomViewModel::derive(snapshot, session)),
            None => Self::NotFoundOrForbidden,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Room(model) => model.role,
            Self::NotFoundOrForbidden => Role::Outsider,
        }
    }

    pub fn available_actions(&self) -> ActionSet {
        match self {
            Self::Room(model) => model.available_actions.clone(),
            Self::NotFoundOrForbidden => ActionSet::empty(),
        }
    }

    pub fn availability(&self, kind: ActionKind) -> Availability {
        match self {
            Self::Room(model) => model.availability(kind),
            Self::NotFoundOrForbidden => Availability::NotOffered,
        }
    }

    pub fn as_room(&self) -> Option<&RoomViewModel> {
        match self {
            Self::Room(model) => Some(model),
            Self::NotFoundOrForbidden => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFoundOrForbidden)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Host => "HOST",
            Self::Participant => "PARTICIPANT",
            Self::Outsider => "OUTSIDER",
        })
    }
}

fn role_of(snapshot: &RoomSnapshot, session: &Session) -> Role {
    if session.is_user(&snapshot.host_name) {
        Role::Host
    } else if snapshot
        .participants
        .iter()
        .any(|p| session.is_user(&p.nickname))
    {
        Role::Participant
    } else {
        Role::Outsider
    }
}

fn actions_for(role: Role, snapshot: &RoomSnapshot) -> ActionSet {
    let waiting = snapshot.status.is_waiting();
    let has_room = snapshot.current_participants < snapshot.max_participants;
    let kind = match role {
        Role::Host if waiting => Some(ActionKind::StartTeamComposition),
        // No host actions once the room has left WAITING.
        Role::Host => None,
        Role::Participant => Some(ActionKind::Leave),
        Role::Outsider if waiting && has_room => Some(ActionKind::Join),
        Role::Outsider => None,
    };
    kind.into_iter().collect()
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
    use crate::protocol::Participant;

    fn participant(nickname: &str) -> Participant {
        Participant {
            nickname: nickname.into(),
            summoner_name: None,
            team_number: None,
        }
    }

    /// alice hosts a WAITING 3/10 room listing alice and bob.
    fn alice_room() -> RoomSnapshot {
        RoomSnapshot {
            room_code: "AB12".into(),
            title: "Friday 내전".into(),
            max_participants: 10,
            current_participants: 3,
            host_name: "alice".into(),
            status: RoomStatus::Waiting,
            created_at: None,
            participants: vec![participant("alice"), participant("bob")],
        }
    }

    fn user(name: &str) -> Session {
        Session::authenticated("token", name)
    }

    fn actions(view: &RoomView) -> Vec<ActionKind> {
        view.available_actions().iter().collect()
    }

    #[test]
    fn host_is_offered_team_composition() {
        let view = RoomView::derive(Some(&alice_room()), &user("alice"));
        assert_eq!(view.role(), Role::Host);
        assert_eq!(actions(&view), vec![ActionKind::StartTeamComposition]);
        assert_eq!(
            view.availability(ActionKind::StartTeamComposition),
            Availability::Available
        );
    }

    #[test]
    fn outsider_is_offered_join() {
        let view = RoomView::derive(Some(&alice_room()), &user("carol"));
        assert_eq!(view.role(), Role::Outsider);
        assert_eq!(actions(&view), vec![ActionKind::Join]);
    }

    #[test]
    fn participant_leave_is_not_implemented() {
        let view = RoomView::derive(Some(&alice_room()), &user("bob"));
        assert_eq!(view.role(), Role::Participant);
        assert_eq!(actions(&view), vec![ActionKind::Leave]);
        assert_eq!(
            view.availability(ActionKind::Leave),
            Availability::NotImplemented
        );
        assert_eq!(view.availability(ActionKind::Join), Availability::NotOffered);
    }

    #[test]
    fn anonymous_sessions_get_nothing() {
        let statuses = [
            RoomStatus::Waiting,
            RoomStatus::InProgress,
            RoomStatus::Completed,
            RoomStatus::Unknown("TEAM_COMPOSITION".into()),
        ];
        for status in statuses {
            let mut room = alice_room();
            room.status = status;
            let view = RoomView::derive(Some(&room), &Session::anonymous());
            assert_eq!(view.role(), Role::Outsider);
            assert!(view.available_actions().is_empty());
        }
    }

    #[test]
    fn host_precedes_participant_listing() {
        let room = alice_room();
        assert!(room.participants.iter().any(|p| p.nickname == "alice"));
        let view = RoomView::derive(Some(&room), &user("alice"));
        assert_eq!(view.role(), Role::Host);
        assert!(!view.available_actions().contains(ActionKind::Join));
        assert!(!view.available_actions().contains(ActionKind::Leave));
    }

    #[test]
    fn host_has_no_actions_once_started() {
        for status in [RoomStatus::InProgress, RoomStatus::Completed] {
            let mut room = alice_room();
            room.status = status;
            let view = RoomView::derive(Some(&room), &user("alice"));
            assert_eq!(view.role(), Role::Host);
            assert!(view.available_actions().is_empty());
        }
    }

    #[test]
    fn join_requires_waiting_status() {
        for status in [
            RoomStatus::InProgress,
            RoomStatus::Completed,
            RoomStatus::Unknown("PAUSED".into()),
        ] {
            let mut room = alice_room();
            room.status = status;
            let view = RoomView::derive(Some(&room), &user("carol"));
            assert!(!view.available_actions().contains(ActionKind::Join));
        }
    }

    #[test]
    fn full_waiting_room_renders_without_join() {
        let mut room = alice_room();
        room.current_participants = 10;
        let view = RoomView::derive(Some(&room), &user("carol"));
        let model = view.as_room().unwrap();
        assert!(model.is_full());
        assert!(model.available_actions().is_empty());
        assert_eq!(model.occupancy(), "10 / 10");
        assert!(model.display_status().is_joinable);
    }

    #[test]
    fn missing_snapshot_is_terminal() {
        let view = RoomView::derive(None, &user("alice"));
        assert!(view.is_not_found());
        assert!(view.available_actions().is_empty());
        for kind in [
            ActionKind::StartTeamComposition,
            ActionKind::Join,
            ActionKind::Leave,
        ] {
            assert_eq!(view.availability(kind), Availability::NotOffered);
        }
    }

    #[test]
    fn duplicate_nicknames_still_count_as_membership() {
        let mut room = alice_room();
        room.participants = vec![participant("bob"), participant("bob")];
        let view = RoomView::derive(Some(&room), &user("bob"));
        assert_eq!(view.role(), Role::Participant);
        let rows: Vec<_> = view.as_room().unwrap().participant_rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, rows[1].key);
    }

    #[test]
    fn unknown_status_is_rendered_verbatim() {
        let mut room = alice_room();
        room.status = RoomStatus::Unknown("TEAM_COMPOSITION".into());
        let view = RoomView::derive(Some(&room), &user("carol"));
        let status = view.as_room().unwrap().display_status();
        assert_eq!(status.label(), "TEAM_COMPOSITION");
        assert!(!status.is_joinable);
    }

    #[test]
    fn rows_use_placeholder_for_unlinked_summoners() {
        let mut room = alice_room();
        room.participants = vec![
            Participant {
                nickname: "alice".into(),
                summoner_name: Some("Hide on bush".into()),
                team_number: Some(1),
            },
            participant("bob"),
        ];
        let view = RoomView::derive(Some(&room), &user("carol"));
        let rows: Vec<_> = view.as_room().unwrap().participant_rows().collect();
        assert_eq!(rows[0].summoner, "Hide on bush");
        assert_eq!(rows[0].team_number, Some(1));
        assert_eq!(rows[1].summoner, UNLINKED_SUMMONER_PLACEHOLDER);
        assert_eq!(rows[1].team_number, None);
    }

    #[test]
    fn empty_username_never_matches_empty_host() {
        let mut room = alice_room();
        room.host_name = String::new();
        let view = RoomView::derive(Some(&room), &Session::authenticated("t", ""));
        assert_eq!(view.role(), Role::Outsider);
    }

    #[test]
    fn action_kind_of_room_action() {
        assert_eq!(
            RoomAction::StartTeamComposition(TeamCompositionMethod::Auction).kind(),
            ActionKind::StartTeamComposition
        );
        assert_eq!(RoomAction::Join.kind(), ActionKind::Join);
        assert!(!ActionKind::Leave.is_wired());
    }

    #[test]
    fn action_set_iterates_in_declaration_order() {
        let set: ActionSet = [ActionKind::Leave, ActionKind::StartTeamComposition, ActionKind::Leave]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(ActionKind::Leave));
        assert!(!set.contains(ActionKind::Join));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            [ActionKind::StartTeamComposition, ActionKind::Leave]
        );
        assert!(ActionSet::empty().is_empty());
    }
}
