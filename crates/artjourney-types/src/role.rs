//! Role codes and requested-role constraints.
//!
//! # Design Rationale
//!
//! The original route tables mixed numeric codes and free-form names
//! (`allowedRoles: [2, "admin"]`). Comparing mixed representations
//! deep inside guard logic is fragile, so resolution happens exactly
//! once at the boundary: [`RoleRequirement::resolve`] maps every entry
//! to an `Option<RoleCode>` and everything downstream compares the
//! closed enum.

use crate::RoleCodeError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Closed enumeration of account roles.
///
/// The numeric values are the API wire format and must not change.
///
/// # Example
///
/// ```
/// use artjourney_types::RoleCode;
///
/// let role = RoleCode::try_from(2).unwrap();
/// assert_eq!(role, RoleCode::Admin);
/// assert!(role.is_admin());
/// assert_eq!(role.to_string(), "Admin");
///
/// // Names parse case-insensitively
/// assert_eq!("instructor".parse::<RoleCode>().unwrap(), RoleCode::Instructor);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum RoleCode {
    /// Regular learner account.
    Learner = 0,
    /// Course author / instructor account.
    Instructor = 1,
    /// Platform administrator.
    Admin = 2,
}

impl RoleCode {
    /// Returns the numeric wire code.
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` for [`RoleCode::Admin`].
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns the canonical human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Learner => "Learner",
            Self::Instructor => "Instructor",
            Self::Admin => "Admin",
        }
    }
}

impl From<RoleCode> for u8 {
    fn from(role: RoleCode) -> Self {
        role.as_u8()
    }
}

impl TryFrom<u8> for RoleCode {
    type Error = RoleCodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Learner),
            1 => Ok(Self::Instructor),
            2 => Ok(Self::Admin),
            other => Err(RoleCodeError(other)),
        }
    }
}

impl FromStr for RoleCode {
    type Err = ();

    /// Case-insensitive name lookup. Unknown names are `Err(())`;
    /// callers decide whether that is a non-match or a config error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "learner" => Ok(Self::Learner),
            "instructor" => Ok(Self::Instructor),
            "admin" => Ok(Self::Admin),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a requested-role constraint.
///
/// Route tables may mix numeric codes and names; this type preserves
/// the source representation (useful for diagnostics) and resolves to
/// [`RoleCode`] on demand.
///
/// # Example
///
/// ```
/// use artjourney_types::{RoleCode, RoleRequirement};
///
/// let reqs: Vec<RoleRequirement> =
///     vec![RoleCode::Admin.into(), "Instructor".into(), "nobody".into()];
///
/// let resolved: Vec<_> = reqs.iter().map(RoleRequirement::resolve).collect();
/// assert_eq!(resolved, vec![Some(RoleCode::Admin), Some(RoleCode::Instructor), None]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleRequirement {
    /// Numeric role code.
    Code(RoleCode),
    /// Human-readable role name, matched case-insensitively.
    Name(String),
}

impl RoleRequirement {
    /// Resolves the requirement to a [`RoleCode`].
    ///
    /// Unknown names resolve to `None` — a non-match, never an error.
    #[must_use]
    pub fn resolve(&self) -> Option<RoleCode> {
        match self {
            Self::Code(code) => Some(*code),
            Self::Name(name) => name.parse().ok(),
        }
    }
}

impl From<RoleCode> for RoleRequirement {
    fn from(code: RoleCode) -> Self {
        Self::Code(code)
    }
}

impl From<&str> for RoleRequirement {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for RoleRequirement {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_from_valid_codes() {
        assert_eq!(RoleCode::try_from(0), Ok(RoleCode::Learner));
        assert_eq!(RoleCode::try_from(1), Ok(RoleCode::Instructor));
        assert_eq!(RoleCode::try_from(2), Ok(RoleCode::Admin));
    }

    #[test]
    fn try_from_unknown_code_is_error() {
        assert_eq!(RoleCode::try_from(3), Err(RoleCodeError(3)));
    }

    #[test]
    fn parse_is_case_insensitive() {
        for name in ["admin", "ADMIN", "Admin", "aDmIn"] {
            assert_eq!(name.parse::<RoleCode>(), Ok(RoleCode::Admin), "name: {name}");
        }
    }

    #[test]
    fn parse_unknown_name_fails() {
        assert!("moderator".parse::<RoleCode>().is_err());
        assert!("".parse::<RoleCode>().is_err());
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(RoleCode::Learner.to_string(), "Learner");
        assert_eq!(RoleCode::Instructor.to_string(), "Instructor");
        assert_eq!(RoleCode::Admin.to_string(), "Admin");
    }

    #[test]
    fn requirement_resolution() {
        assert_eq!(
            RoleRequirement::from(RoleCode::Learner).resolve(),
            Some(RoleCode::Learner)
        );
        assert_eq!(
            RoleRequirement::from("INSTRUCTOR").resolve(),
            Some(RoleCode::Instructor)
        );
        assert_eq!(RoleRequirement::from("root").resolve(), None);
    }

    #[test]
    fn name_and_code_resolve_equal() {
        let by_name = RoleRequirement::from("admin").resolve();
        let by_code = RoleRequirement::from(RoleCode::Admin).resolve();
        assert_eq!(by_name, by_code);
    }

    #[test]
    fn is_admin_only_for_admin() {
        assert!(!RoleCode::Learner.is_admin());
        assert!(!RoleCode::Instructor.is_admin());
        assert!(RoleCode::Admin.is_admin());
    }
}
