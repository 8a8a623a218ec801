//! IO layer of the ArtJourney client.
//!
//! Everything that talks to the network or the filesystem lives here;
//! the decision logic it feeds (`artjourney-auth`) stays pure.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SessionStore                             │
//! │  single writer of session state, generation-counted          │
//! └─────────────────────────────────────────────────────────────┘
//!        │                    │                      │
//!        ▼                    ▼                      ▼
//! ┌────────────┐      ┌───────────────┐      ┌──────────────┐
//! │  AuthApi   │      │ SnapshotStore │      │ token decode │
//! │ (reqwest)  │      │ (atomic JSON) │      │  (base64)    │
//! └────────────┘      └───────────────┘      └──────────────┘
//! ```
//!
//! # Failure Semantics
//!
//! Network and persistence failures are caught at this boundary,
//! logged via `tracing`, and translated into a cleared
//! (unauthenticated) session. None of the [`SessionStore`] operations
//! propagate them to callers; the worst case is being sent back to
//! the sign-in page.
//!
//! # Example
//!
//! ```no_run
//! use artjourney_client::{AuthGateway, ClientConfig, SessionStore, SnapshotStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::load()?;
//! let gateway = AuthGateway::new(&config)?;
//! let snapshots = SnapshotStore::new(config.snapshot_path.clone());
//!
//! let store = SessionStore::new(gateway, snapshots);
//! store.rehydrate().await;
//!
//! let current = store.current_user();
//! println!("authenticated: {}", current.is_authenticated);
//! # Ok(())
//! # }
//! ```

mod config;
mod gateway;
mod snapshot;
mod store;
mod token;

pub use config::{ClientConfig, ConfigError, ConfigLoader, DEFAULT_TIMEOUT_SECS};
pub use gateway::{
    AuthApi, AuthGateway, GatewayError, RegisterRequest, SignInRequest, SignInResponse,
    UserProfile,
};
pub use snapshot::{default_snapshot_path, SnapshotError, SnapshotStore};
pub use store::{CurrentUser, SessionStore};
pub use token::{decode_credential_token, TokenDecodeError, TokenIdentity};
