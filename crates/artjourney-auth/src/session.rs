//! Session value type and role evaluation.

use artjourney_types::{RoleCode, RoleRequirement, User};
use serde::{Deserialize, Serialize};

/// The client's cached belief about the current user.
///
/// # Invariant
///
/// A session is authenticated **iff** it carries a user, and a session
/// without a user never carries a role. The fields are private and
/// every construction path — [`anonymous`](Self::anonymous),
/// [`authenticated`](Self::authenticated), deserialization — preserves
/// this, so readers never have to re-check it.
///
/// # Immutability
///
/// Sessions are immutable value types. State transitions (login,
/// logout, failed validation) replace the whole value; nothing mutates
/// a field in place. This keeps concurrent readers (route guard,
/// survey gate) from ever observing a half-updated session.
///
/// # Example
///
/// ```
/// use artjourney_auth::Session;
/// use artjourney_types::{RoleCode, User};
///
/// let session = Session::anonymous();
/// assert!(!session.is_authenticated());
/// assert!(session.role().is_none());
///
/// let user = User {
///     id: "u-1".into(),
///     email: "ada@example.com".into(),
///     name: "Ada".into(),
///     avatar: None,
///     status: None,
///     login_count: 1,
///     is_surveyed: false,
///     token: "tok".into(),
/// };
/// let session = Session::authenticated(user, RoleCode::Learner);
/// assert!(session.is_authenticated());
/// assert_eq!(session.role(), Some(RoleCode::Learner));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SessionSnapshot", into = "SessionSnapshot")]
pub struct Session {
    user: Option<User>,
    role: Option<RoleCode>,
}

impl Session {
    /// Creates the unauthenticated default session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            user: None,
            role: None,
        }
    }

    /// Creates an authenticated session for `user` with `role`.
    #[must_use]
    pub fn authenticated(user: User, role: RoleCode) -> Self {
        Self {
            user: Some(user),
            role: Some(role),
        }
    }

    /// Returns `true` if a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Returns the logged-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Returns the session role, if authenticated.
    #[must_use]
    pub fn role(&self) -> Option<RoleCode> {
        self.role
    }

    /// Returns `true` if the session role is [`RoleCode::Admin`].
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(RoleCode::is_admin)
    }

    /// Role Evaluator: checks the session role against a requested set.
    ///
    /// Returns `true` iff the session role resolves equal to at least
    /// one requirement. Anonymous sessions and unknown requirement
    /// names are a non-match, never an error.
    ///
    /// # Example
    ///
    /// ```
    /// use artjourney_auth::Session;
    /// use artjourney_types::{RoleCode, RoleRequirement, User};
    ///
    /// # let user = User { id: "u".into(), email: "e".into(), name: "n".into(),
    /// #     avatar: None, status: None, login_count: 2, is_surveyed: true, token: "t".into() };
    /// let session = Session::authenticated(user, RoleCode::Admin);
    ///
    /// // Name and code requirements are equivalent
    /// assert!(session.has_role(&["ADMIN".into()]));
    /// assert!(session.has_role(&[RoleCode::Admin.into()]));
    /// assert!(!session.has_role(&[RoleCode::Learner.into()]));
    /// ```
    #[must_use]
    pub fn has_role(&self, required: &[RoleRequirement]) -> bool {
        let Some(role) = self.role else {
            return false;
        };
        required.iter().any(|req| req.resolve() == Some(role))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Serializable form of a [`Session`], as written to durable storage.
///
/// Deserialization normalizes through [`Session`]'s invariant: a
/// snapshot claiming `is_authenticated` without a user rehydrates as
/// anonymous, and a role without a user is dropped. Corrupt or
/// hand-edited snapshots can therefore never produce an inconsistent
/// session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Authentication flag, redundant with `user` but kept for the
    /// historical storage format.
    pub is_authenticated: bool,
    /// The persisted user profile, if any.
    #[serde(default)]
    pub user: Option<User>,
    /// The persisted role, if any.
    #[serde(default)]
    pub role: Option<RoleCode>,
}

impl From<SessionSnapshot> for Session {
    fn from(snapshot: SessionSnapshot) -> Self {
        match snapshot.user {
            Some(user) => Self {
                user: Some(user),
                role: snapshot.role,
            },
            None => Self::anonymous(),
        }
    }
}

impl From<Session> for SessionSnapshot {
    fn from(session: Session) -> Self {
        Self {
            is_authenticated: session.user.is_some(),
            user: session.user,
            role: session.role,
        }
    }
}

/// What the guards see: the session plus whether the store is still
/// rehydrating/validating at startup.
///
/// The route guard renders a loading placeholder (not a redirect)
/// while `loading` is set, so a slow validation probe never bounces an
/// actually-authenticated user to the sign-in page.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    /// Startup rehydration/validation still in flight.
    pub loading: bool,
    /// Immutable snapshot of the session.
    pub session: Session,
}

impl SessionView {
    /// View over a settled (non-loading) session.
    #[must_use]
    pub fn ready(session: Session) -> Self {
        Self {
            loading: false,
            session,
        }
    }

    /// View for a store that is still rehydrating.
    #[must_use]
    pub fn loading(session: Session) -> Self {
        Self {
            loading: true,
            session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: "u-1".into(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            avatar: None,
            status: Some("Active".into()),
            login_count: 1,
            is_surveyed: false,
            token: "tok".into(),
        }
    }

    #[test]
    fn anonymous_is_unauthenticated() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(session.role().is_none());
        assert!(!session.is_admin());
    }

    #[test]
    fn authenticated_iff_user_present() {
        let session = Session::authenticated(test_user(), RoleCode::Learner);
        assert!(session.is_authenticated());
        assert!(session.user().is_some());

        let session = Session::anonymous();
        assert_eq!(session.is_authenticated(), session.user().is_some());
    }

    #[test]
    fn has_role_name_and_code_equivalent() {
        let session = Session::authenticated(test_user(), RoleCode::Admin);
        assert_eq!(
            session.has_role(&["ADMIN".into()]),
            session.has_role(&[RoleCode::Admin.into()])
        );
    }

    #[test]
    fn has_role_anonymous_is_false() {
        let session = Session::anonymous();
        assert!(!session.has_role(&[RoleCode::Learner.into(), "admin".into()]));
    }

    #[test]
    fn has_role_unknown_name_is_non_match() {
        let session = Session::authenticated(test_user(), RoleCode::Learner);
        assert!(!session.has_role(&["superuser".into()]));
        // ...but a matching entry elsewhere in the set still wins
        assert!(session.has_role(&["superuser".into(), "learner".into()]));
    }

    #[test]
    fn has_role_empty_set_is_false() {
        let session = Session::authenticated(test_user(), RoleCode::Admin);
        assert!(!session.has_role(&[]));
    }

    #[test]
    fn snapshot_round_trip_preserves_session() {
        let session = Session::authenticated(test_user(), RoleCode::Instructor);
        let snapshot = SessionSnapshot::from(session.clone());
        assert!(snapshot.is_authenticated);
        assert_eq!(Session::from(snapshot), session);
    }

    #[test]
    fn corrupt_snapshot_rehydrates_anonymous() {
        // Claims authenticated but carries no user
        let snapshot = SessionSnapshot {
            is_authenticated: true,
            user: None,
            role: Some(RoleCode::Admin),
        };
        let session = Session::from(snapshot);
        assert!(!session.is_authenticated());
        assert!(session.role().is_none());
    }

    #[test]
    fn serde_goes_through_normalization() {
        let json = r#"{"is_authenticated":true,"user":null,"role":2}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.is_authenticated(), session.user().is_some());
    }
}
