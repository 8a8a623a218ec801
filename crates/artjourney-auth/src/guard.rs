//! Per-navigation route guarding.
//!
//! The guard is a pure function re-run on every navigation; nothing
//! persists between evaluations. Rules apply in a strict order and the
//! first match wins, so `restrict_admin` beats `require_auth`: an
//! admin hitting a learner-only landing page is sent to the admin home
//! even before authentication is considered.

use crate::{RouteMeta, SessionView};

/// Sign-in page, target of unauthenticated redirects.
pub const SIGN_IN_PATH: &str = "/signin";

/// Admin landing page, target of `restrict_admin` redirects.
pub const ADMIN_HOME_PATH: &str = "/admin";

/// Unauthorized page, target of role-denial redirects.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Terminal outcome of one guard evaluation.
///
/// Exactly one of these is produced per navigation. Denial is an
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session state still rehydrating: render a placeholder, do not
    /// redirect.
    Loading,
    /// Render the route's content.
    Render,
    /// Redirect to [`SIGN_IN_PATH`], carrying the originally requested
    /// path for post-login return.
    RedirectToSignIn {
        /// The path the user asked for.
        from: String,
    },
    /// Redirect to [`ADMIN_HOME_PATH`].
    RedirectToAdminHome,
    /// Redirect to [`UNAUTHORIZED_PATH`].
    RedirectToUnauthorized,
}

/// Decision function gating a protected view.
///
/// # Rule Order
///
/// 1. loading → [`GuardDecision::Loading`]
/// 2. `restrict_admin` and the user is admin → redirect to admin home
/// 3. `!require_auth` → render (public route)
/// 4. unauthenticated → redirect to sign-in with the requested path
/// 5. `admin_only` and not admin → redirect to unauthorized
/// 6. non-empty `allowed_roles` with no match → redirect to unauthorized
/// 7. render
///
/// # Example
///
/// ```
/// use artjourney_auth::{GuardDecision, RouteGuard, RouteMeta, Session, SessionView};
///
/// let view = SessionView::ready(Session::anonymous());
/// let meta = RouteMeta::public();
/// assert_eq!(RouteGuard::evaluate(&view, &meta, "/courses"), GuardDecision::Render);
/// ```
pub struct RouteGuard;

impl RouteGuard {
    /// Evaluates the ordered rules for one navigation.
    #[must_use]
    pub fn evaluate(view: &SessionView, meta: &RouteMeta, path: &str) -> GuardDecision {
        if view.loading {
            return GuardDecision::Loading;
        }

        let session = &view.session;

        if meta.restrict_admin && session.is_admin() {
            return GuardDecision::RedirectToAdminHome;
        }

        if !meta.require_auth {
            return GuardDecision::Render;
        }

        if !session.is_authenticated() {
            return GuardDecision::RedirectToSignIn {
                from: path.to_string(),
            };
        }

        if meta.admin_only && !session.is_admin() {
            return GuardDecision::RedirectToUnauthorized;
        }

        if !meta.allowed_roles.is_empty() && !session.has_role(&meta.allowed_roles) {
            return GuardDecision::RedirectToUnauthorized;
        }

        GuardDecision::Render
    }
}
