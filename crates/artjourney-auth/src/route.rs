//! Route-level access configuration.

use artjourney_types::RoleRequirement;
use serde::{Deserialize, Serialize};

/// What a route demands before its content may render.
///
/// Routes are protected by default (`require_auth = true`); the other
/// flags opt routes into stricter or looser policies.
///
/// # Example
///
/// ```
/// use artjourney_auth::RouteMeta;
/// use artjourney_types::RoleCode;
///
/// // A learner-facing route instructors may also see
/// let meta = RouteMeta::default()
///     .with_allowed_roles([RoleCode::Learner.into(), "instructor".into()]);
///
/// // Admin dashboard
/// let admin = RouteMeta::default().with_admin_only();
///
/// // Public landing page, but admins get bounced to their own home
/// let landing = RouteMeta::public().with_restrict_admin();
/// assert!(!landing.require_auth);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMeta {
    /// Whether an authenticated session is required. Defaults to `true`.
    #[serde(default = "default_true")]
    pub require_auth: bool,

    /// Only [`RoleCode::Admin`](artjourney_types::RoleCode::Admin) may
    /// enter.
    #[serde(default)]
    pub admin_only: bool,

    /// Admins are redirected to the admin home instead of this route.
    /// Checked before everything else except the loading state.
    #[serde(default)]
    pub restrict_admin: bool,

    /// When non-empty, the session role must match at least one entry.
    #[serde(default)]
    pub allowed_roles: Vec<RoleRequirement>,
}

fn default_true() -> bool {
    true
}

impl Default for RouteMeta {
    /// A plain protected route: auth required, no role constraints.
    fn default() -> Self {
        Self {
            require_auth: true,
            admin_only: false,
            restrict_admin: false,
            allowed_roles: Vec::new(),
        }
    }
}

impl RouteMeta {
    /// A public route: renders without authentication.
    #[must_use]
    pub fn public() -> Self {
        Self {
            require_auth: false,
            ..Self::default()
        }
    }

    /// Restricts the route to admins.
    #[must_use]
    pub fn with_admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    /// Redirects admins away to their own home.
    #[must_use]
    pub fn with_restrict_admin(mut self) -> Self {
        self.restrict_admin = true;
        self
    }

    /// Sets the allowed-role set.
    #[must_use]
    pub fn with_allowed_roles(
        mut self,
        roles: impl IntoIterator<Item = RoleRequirement>,
    ) -> Self {
        self.allowed_roles = roles.into_iter().collect();
        self
    }
}
