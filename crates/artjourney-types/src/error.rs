//! Typed errors for identity parsing.

use thiserror::Error;

/// Error for a numeric role code outside the closed enumeration.
///
/// Only produced at the API boundary when converting wire integers via
/// `RoleCode::try_from`. Role *names* never produce this error: an
/// unknown name is treated as a non-match during requirement
/// resolution instead (see `RoleRequirement::resolve`).
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role code: {0} (expected 0=Learner, 1=Instructor, 2=Admin)")]
pub struct RoleCodeError(pub u8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_valid_range() {
        let err = RoleCodeError(7);
        let msg = err.to_string();
        assert!(msg.contains('7'), "got: {msg}");
        assert!(msg.contains("Admin"), "got: {msg}");
    }
}
