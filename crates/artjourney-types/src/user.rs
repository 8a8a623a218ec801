//! User profile record.

use serde::{Deserialize, Serialize};

/// Profile of an authenticated user.
///
/// Built from the decoded credential token at login time and treated
/// as immutable afterwards: the next login replaces the whole value,
/// nothing mutates individual fields.
///
/// # Example
///
/// ```
/// use artjourney_types::User;
///
/// let user = User {
///     id: "u-1".into(),
///     email: "ada@example.com".into(),
///     name: "Ada".into(),
///     avatar: None,
///     status: None,
///     login_count: 1,
///     is_surveyed: false,
///     token: "raw-credential".into(),
/// };
/// assert!(user.is_first_login());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-side user identifier (opaque string).
    pub id: String,
    /// Account email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Avatar image URL, when the account has one.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Account status as reported by the API (e.g. "Active").
    #[serde(default)]
    pub status: Option<String>,
    /// Number of logins so far, including the current one.
    pub login_count: u32,
    /// Whether the onboarding survey has been completed.
    pub is_surveyed: bool,
    /// The raw credential token this profile was decoded from.
    pub token: String,
}

impl User {
    /// Returns `true` on the very first login.
    ///
    /// The survey gate keys off this exact condition; an account on
    /// its second login is never first-login again, regardless of
    /// whether the survey was completed.
    #[must_use]
    pub fn is_first_login(&self) -> bool {
        self.login_count == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(login_count: u32) -> User {
        User {
            id: "u-1".into(),
            email: "a@b.c".into(),
            name: "A".into(),
            avatar: None,
            status: None,
            login_count,
            is_surveyed: false,
            token: "t".into(),
        }
    }

    #[test]
    fn first_login_is_exactly_one() {
        assert!(!user(0).is_first_login());
        assert!(user(1).is_first_login());
        assert!(!user(2).is_first_login());
    }

    #[test]
    fn optional_fields_default_on_deserialize() {
        let json = r#"{
            "id": "u-9",
            "email": "x@y.z",
            "name": "X",
            "login_count": 3,
            "is_surveyed": true,
            "token": "raw"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.avatar, None);
        assert_eq!(user.status, None);
    }
}
