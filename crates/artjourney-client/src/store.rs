//! The session store: single source of truth for "who is logged in".
//!
//! # Ownership
//!
//! The store exclusively owns and mutates the session; every other
//! component reads an immutable snapshot ([`SessionView`],
//! [`CurrentUser`]) and never mutates directly. State transitions
//! replace the session wholesale under a short-lived lock, so readers
//! never observe a half-updated session.
//!
//! # Generations
//!
//! Login, logout and validation are async and nothing prevents them
//! from overlapping. Each operation takes a monotonically increasing
//! generation number when issued; a completion whose generation is no
//! longer current is discarded instead of overwriting newer state.
//! Without this, a slow `validate()` probe could resolve after a
//! fresh login and wrongly clear it.
//!
//! # Failure Semantics
//!
//! Every network failure inside this type is caught, logged and
//! translated into a cleared (unauthenticated) session. No operation
//! here returns a `Result`; authorization and connectivity problems
//! surface as state, not exceptions.

use crate::gateway::AuthApi;
use crate::snapshot::{SnapshotError, SnapshotStore};
use crate::token::{decode_credential_token, TokenIdentity};
use artjourney_auth::{Session, SessionView};
use artjourney_types::{RoleCode, User};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Snapshot returned by [`SessionStore::current_user`].
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    /// Whether a user is logged in.
    pub is_authenticated: bool,
    /// The logged-in user, if any.
    pub user: Option<User>,
    /// The session role, if authenticated.
    pub role: Option<RoleCode>,
}

struct StoreState {
    /// Startup rehydration/validation still in flight.
    loading: bool,
    session: Session,
}

/// Dependency-injected session state container.
///
/// Construct one per process (or per test) and share it behind an
/// `Arc`; there is deliberately no global instance.
///
/// # Example
///
/// ```no_run
/// use artjourney_client::{AuthGateway, ClientConfig, SessionStore, SnapshotStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = ClientConfig::load()?;
/// let store = SessionStore::new(
///     AuthGateway::new(&config)?,
///     SnapshotStore::new(config.snapshot_path.clone()),
/// );
///
/// // Startup: rehydrate the persisted session, then confirm it
/// store.rehydrate().await;
///
/// if !store.current_user().is_authenticated {
///     println!("please sign in");
/// }
/// # Ok(())
/// # }
/// ```
pub struct SessionStore<A: AuthApi> {
    api: A,
    snapshots: SnapshotStore,
    state: RwLock<StoreState>,
    generation: AtomicU64,
}

impl<A: AuthApi> SessionStore<A> {
    /// Creates a store in the loading state with an anonymous session.
    ///
    /// Call [`rehydrate`](Self::rehydrate) once at startup; until it
    /// settles, [`view`](Self::view) reports `loading` and the route
    /// guard renders a placeholder instead of redirecting.
    #[must_use]
    pub fn new(api: A, snapshots: SnapshotStore) -> Self {
        Self {
            api,
            snapshots,
            state: RwLock::new(StoreState {
                loading: true,
                session: Session::anonymous(),
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the injected API, for flows that talk to the gateway
    /// directly (sign-in form, registration).
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Pure read: `{is_authenticated, user, role}` snapshot.
    #[must_use]
    pub fn current_user(&self) -> CurrentUser {
        let state = self.state.read();
        CurrentUser {
            is_authenticated: state.session.is_authenticated(),
            user: state.session.user().cloned(),
            role: state.session.role(),
        }
    }

    /// Snapshot for the guards: session plus loading flag.
    #[must_use]
    pub fn view(&self) -> SessionView {
        let state = self.state.read();
        SessionView {
            loading: state.loading,
            session: state.session.clone(),
        }
    }

    /// Startup path: restore the persisted snapshot, then confirm it
    /// with the server. The store stays `loading` until the
    /// confirmation settles.
    pub async fn rehydrate(&self) {
        let issued = self.issue();
        match self.snapshots.load().await {
            Ok(snapshot) => {
                // Session::from re-enforces the authentication invariant,
                // so a corrupt snapshot rehydrates as anonymous.
                let session = Session::from(snapshot);
                // The persisted token must be on the wire before the
                // confirmation probe, or the probe is sent bare and
                // rejects its own session.
                if let Some(user) = session.user() {
                    self.api.set_credential(Some(user.token.clone()));
                }
                let mut state = self.state.write();
                if self.is_current(issued) {
                    state.session = session;
                }
            }
            Err(SnapshotError::NotFound(_)) => {
                debug!("no persisted session snapshot");
            }
            Err(e) => {
                warn!(error = %e, "failed to load session snapshot; starting unauthenticated");
            }
        }
        self.validate().await;
    }

    /// Logs in with a credential token.
    ///
    /// Decodes the token and replaces the session wholesale. A
    /// malformed token is logged and swallowed: the session is left
    /// unauthenticated rather than surfacing an error to the caller.
    pub async fn login(&self, credential_token: &str) {
        let issued = self.issue();
        match decode_credential_token(credential_token) {
            Ok(TokenIdentity { user, role }) => {
                let session = Session::authenticated(user, role);
                if self.commit(issued, session.clone()) {
                    self.api.set_credential(Some(credential_token.to_string()));
                    self.persist(session).await;
                }
            }
            Err(e) => {
                warn!(error = %e, "credential token decode failed; session stays unauthenticated");
                let mut state = self.state.write();
                if self.is_current(issued) {
                    state.loading = false;
                }
            }
        }
    }

    /// Logs out.
    ///
    /// Guarantee: local state ends unauthenticated whether or not the
    /// server call succeeds; a network failure is logged, not
    /// surfaced. (A login racing past this call supersedes it via the
    /// generation check.)
    pub async fn logout(&self) {
        let issued = self.issue();
        if let Err(e) = self.api.logout().await {
            warn!(
                kind = e.kind(),
                error = %e,
                "logout request failed; clearing local session anyway"
            );
        }
        if self.commit(issued, Session::anonymous()) {
            self.api.set_credential(None);
            self.persist(Session::anonymous()).await;
        }
    }

    /// Confirmation probe against the server-side session.
    ///
    /// On success the existing state is kept as-is — the probe is not
    /// a data source, so a server-side role change is not reflected
    /// until the next login. On rejection or transport failure the
    /// session is cleared: a failed validation means "not
    /// authenticated", never "unknown".
    pub async fn validate(&self) {
        let issued = self.issue();
        let valid = match self.api.session_check().await {
            Ok(valid) => valid,
            Err(e) => {
                warn!(
                    kind = e.kind(),
                    error = %e,
                    "session validation failed; treating as unauthenticated"
                );
                false
            }
        };

        if valid {
            let mut state = self.state.write();
            if self.is_current(issued) {
                state.loading = false;
            }
        } else if self.commit(issued, Session::anonymous()) {
            self.api.set_credential(None);
            self.persist(Session::anonymous()).await;
        }
    }

    /// Takes the next generation number for a newly issued operation.
    fn issue(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, issued: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == issued
    }

    /// Applies a transition unless a newer operation was issued in the
    /// meantime. Returns whether the transition was applied.
    fn commit(&self, issued: u64, session: Session) -> bool {
        let mut state = self.state.write();
        if !self.is_current(issued) {
            debug!(issued, "discarding stale session transition");
            return false;
        }
        state.session = session;
        state.loading = false;
        true
    }

    /// Writes the snapshot for the just-committed session. Persistence
    /// failures are logged; the in-memory state stays authoritative.
    async fn persist(&self, session: Session) {
        if let Err(e) = self.snapshots.save(&session.into()).await {
            warn!(error = %e, "failed to persist session snapshot");
        }
    }
}
