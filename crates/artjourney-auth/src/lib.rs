//! Pure access-control logic for the ArtJourney client.
//!
//! This crate decides *who may see what* without performing any IO.
//! The IO layer (`artjourney-client`) owns the mutable session state
//! and hands immutable snapshots down here; every navigation re-runs
//! the full decision from scratch.
//!
//! # Decision Model
//!
//! ```text
//! Rendered outcome = RouteGuard(Session × RouteMeta × path)
//!                  ∘ SurveyGate(Session × path)
//! ```
//!
//! | Piece | Type | Decides |
//! |-------|------|---------|
//! | [`Session`] | Value type | Who is logged in, with which role |
//! | [`RouteMeta`] | Config | What a route demands (auth, roles, admin flags) |
//! | [`RouteGuard`] | Pure fn | Render / redirect, first matching rule wins |
//! | [`SurveyGate`] | Pure fn | First-login onboarding redirect |
//!
//! Authorization denial is an *outcome* ([`GuardDecision`]), never an
//! error: nothing in this crate returns `Result`.
//!
//! # Example
//!
//! ```
//! use artjourney_auth::{GuardDecision, RouteGuard, RouteMeta, SessionView};
//!
//! // Unauthenticated user hitting a protected route
//! let view = SessionView::ready(artjourney_auth::Session::anonymous());
//! let decision = RouteGuard::evaluate(&view, &RouteMeta::default(), "/dashboard");
//!
//! assert_eq!(
//!     decision,
//!     GuardDecision::RedirectToSignIn { from: "/dashboard".into() }
//! );
//! ```

mod guard;
mod route;
mod session;
mod survey;

pub use guard::{GuardDecision, RouteGuard, ADMIN_HOME_PATH, SIGN_IN_PATH, UNAUTHORIZED_PATH};
pub use route::RouteMeta;
pub use session::{Session, SessionSnapshot, SessionView};
pub use survey::{SurveyDecision, SurveyGate, SURVEY_PATH};
