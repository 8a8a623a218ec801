//! Identity primitives for the ArtJourney client.
//!
//! This crate is the bottom layer of the client workspace and carries
//! no IO: just the types every other crate agrees on.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  artjourney-types : RoleCode, RoleRequirement, User ◄── HERE │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  artjourney-auth  : Session, RouteGuard, SurveyGate          │
//! │  (pure decision logic, no IO)                                │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  artjourney-client : SessionStore, AuthGateway, snapshots    │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  artjourney-cli    : command-line frontend                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Role Design
//!
//! The remote API identifies roles by numeric code while route tables
//! historically named them as strings. [`RoleCode`] is the single closed
//! enumeration; [`RoleRequirement`] is the boundary type that accepts
//! either representation and resolves it exactly once. Internal code
//! only ever compares [`RoleCode`] values.
//!
//! # Example
//!
//! ```
//! use artjourney_types::{RoleCode, RoleRequirement};
//!
//! // Numeric wire form and case-insensitive names resolve identically
//! let by_code = RoleRequirement::from(RoleCode::Admin);
//! let by_name = RoleRequirement::from("ADMIN");
//! assert_eq!(by_code.resolve(), by_name.resolve());
//!
//! // Unknown names are a non-match, not an error
//! assert_eq!(RoleRequirement::from("superuser").resolve(), None);
//! ```

mod error;
mod role;
mod user;

pub use error::RoleCodeError;
pub use role::{RoleCode, RoleRequirement};
pub use user::User;
