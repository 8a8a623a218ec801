//! Credential token decoding.
//!
//! The API issues a JWT-shaped credential at sign-in. The client never
//! verifies the signature — the token is opaque data handed back by
//! the server over an authenticated channel, and the server re-checks
//! it on every call. All the client does is read the claim set to
//! populate the session, which is why this module uses a plain base64
//! decode instead of a verifying JWT crate.
//!
//! Claim keys are tolerated in both the short form (`nameid`, `email`)
//! and the long .NET `ClaimTypes` URI form the backend historically
//! emitted, and numeric/boolean claims may arrive as strings.

use artjourney_types::{RoleCode, User};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;

/// Identity extracted from a decoded credential token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenIdentity {
    /// The user profile, carrying the raw token.
    pub user: User,
    /// The session role claimed by the token.
    pub role: RoleCode,
}

/// Errors from [`decode_credential_token`].
///
/// These are logged and swallowed at the session-store boundary; a
/// malformed token leaves the session unauthenticated rather than
/// failing the caller.
#[derive(Debug, Error)]
pub enum TokenDecodeError {
    /// Not a three-segment `header.payload.signature` string.
    #[error("credential token is not a three-part JWT")]
    Malformed,

    /// Payload segment is not valid base64url.
    #[error("credential token payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Payload decoded but the claim set did not deserialize.
    #[error("credential token claims did not deserialize: {0}")]
    Claims(#[from] serde_json::Error),

    /// The role claim is missing or resolves to no known role.
    #[error("credential token carries an unusable role claim: {0}")]
    Role(String),
}

/// A claim value that may arrive as a number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumericClaim {
    Num(u32),
    Str(String),
}

impl NumericClaim {
    fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Str(s) => s.parse().ok(),
        }
    }
}

/// A claim value that may arrive as a bool or a "True"/"false" string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BoolClaim {
    Bool(bool),
    Str(String),
}

impl BoolClaim {
    fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Str(s) => s.eq_ignore_ascii_case("true"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(
        alias = "nameid",
        alias = "sub",
        alias = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier"
    )]
    id: String,

    #[serde(alias = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress")]
    email: String,

    #[serde(
        alias = "unique_name",
        alias = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name"
    )]
    name: String,

    #[serde(default, alias = "picture")]
    avatar: Option<String>,

    #[serde(default)]
    status: Option<String>,

    #[serde(alias = "loginCount", alias = "login_count")]
    login_count: NumericClaim,

    #[serde(alias = "isSurveyed", alias = "is_surveyed")]
    is_surveyed: BoolClaim,

    #[serde(
        alias = "role",
        alias = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role"
    )]
    role: NumericClaim,
}

impl Claims {
    /// Resolves the role claim: numeric code, numeric string, or name.
    fn role_code(&self) -> Result<RoleCode, TokenDecodeError> {
        let raw = match &self.role {
            NumericClaim::Num(n) => return role_from_u32(*n),
            NumericClaim::Str(s) => s,
        };
        if let Ok(code) = raw.parse::<u32>() {
            return role_from_u32(code);
        }
        raw.parse::<RoleCode>()
            .map_err(|()| TokenDecodeError::Role(raw.clone()))
    }
}

fn role_from_u32(code: u32) -> Result<RoleCode, TokenDecodeError> {
    u8::try_from(code)
        .ok()
        .and_then(|c| RoleCode::try_from(c).ok())
        .ok_or_else(|| TokenDecodeError::Role(code.to_string()))
}

/// Decodes a credential token into a [`TokenIdentity`].
///
/// # Errors
///
/// Returns [`TokenDecodeError`] on malformed input. Callers at the
/// session-store boundary log and swallow this, leaving the session
/// unauthenticated.
///
/// # Example
///
/// ```
/// use artjourney_client::decode_credential_token;
///
/// assert!(decode_credential_token("not-a-token").is_err());
/// ```
pub fn decode_credential_token(token: &str) -> Result<TokenIdentity, TokenDecodeError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenDecodeError::Malformed);
    };

    // Some encoders pad the payload; base64url in JWTs is unpadded.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let claims: Claims = serde_json::from_slice(&bytes)?;
    let role = claims.role_code()?;

    let user = User {
        id: claims.id,
        email: claims.email,
        name: claims.name,
        avatar: claims.avatar,
        status: claims.status,
        login_count: claims.login_count.as_u32().unwrap_or(0),
        is_surveyed: claims.is_surveyed.as_bool(),
        token: token.to_string(),
    };

    Ok(TokenIdentity { user, role })
}

/// Builds an unsigned test token from a claims JSON value.
#[cfg(test)]
pub(crate) fn encode_test_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{header}.{payload}.sig")
}
