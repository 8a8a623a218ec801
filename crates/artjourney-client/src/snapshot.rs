//! Durable session snapshot storage.
//!
//! The session's serializable subset is written as JSON on every state
//! change and rehydrated at process start:
//!
//! ```text
//! ~/.artjourney/
//! └── session.json
//! ```
//!
//! Writes go to a temp file first and are renamed into place, so a
//! crash mid-write leaves the previous snapshot intact rather than a
//! truncated file.

use artjourney_auth::SessionSnapshot;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::fs;

/// Errors from snapshot storage operations.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// No snapshot has been persisted yet.
    #[error("no session snapshot at {0}")]
    NotFound(PathBuf),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// File-backed store for the persisted session snapshot.
///
/// Only the session store writes here, synchronously with every
/// in-memory state change; there is no separate transaction boundary.
///
/// # Example
///
/// ```no_run
/// use artjourney_client::{default_snapshot_path, SnapshotStore};
///
/// # async fn example() -> Result<(), artjourney_client::SnapshotError> {
/// let store = SnapshotStore::new(default_snapshot_path());
/// let snapshot = store.load().await?;
/// println!("was authenticated: {}", snapshot.is_authenticated);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Creates a store persisting at `path`. Parent directories are
    /// created lazily on first save.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the snapshot path.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Temp path unique per save, so overlapping saves never
    /// interleave their writes on a shared file.
    fn temp_path(&self) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        self.path
            .with_extension(format!("{}.{n}.tmp", std::process::id()))
    }

    /// Persists a snapshot, replacing any previous one atomically.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] on serialization or I/O failure.
    pub async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(snapshot)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to temp file first, then rename into place
        let temp = self.temp_path();
        fs::write(&temp, &json).await?;
        fs::rename(&temp, &self.path).await?;

        Ok(())
    }

    /// Loads the persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::NotFound`] when nothing was persisted
    /// yet, other variants on corrupt or unreadable files.
    pub async fn load(&self) -> Result<SessionSnapshot, SnapshotError> {
        if !self.path.exists() {
            return Err(SnapshotError::NotFound(self.path.clone()));
        }
        let json = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Removes the persisted snapshot. Removing a snapshot that does
    /// not exist is not an error — logout must be idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] on filesystem failure.
    pub async fn clear(&self) -> Result<(), SnapshotError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Returns the default snapshot path (`~/.artjourney/session.json`).
#[must_use]
pub fn default_snapshot_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".artjourney")
        .join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use artjourney_auth::Session;
    use artjourney_types::{RoleCode, User};
    use tempfile::TempDir;

    fn test_store() -> (SnapshotStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path().join("session.json"));
        (store, temp)
    }

    fn authenticated_snapshot() -> SessionSnapshot {
        let user = User {
            id: "u-1".into(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            avatar: None,
            status: Some("Active".into()),
            login_count: 2,
            is_surveyed: true,
            token: "tok".into(),
        };
        Session::authenticated(user, RoleCode::Instructor).into()
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let (store, _temp) = test_store();
        let snapshot = authenticated_snapshot();

        store.save(&snapshot).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn rehydrated_session_satisfies_invariant() {
        let (store, _temp) = test_store();
        store.save(&authenticated_snapshot()).await.unwrap();

        let session = Session::from(store.load().await.unwrap());
        assert_eq!(session.is_authenticated(), session.user().is_some());
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn load_without_snapshot_is_not_found() {
        let (store, _temp) = test_store();
        assert!(matches!(
            store.load().await,
            Err(SnapshotError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn save_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path().join("deep").join("down").join("s.json"));

        store.save(&authenticated_snapshot()).await.unwrap();
        assert!(store.load().await.is_ok());
    }

    #[tokio::test]
    async fn save_overwrites_previous() {
        let (store, _temp) = test_store();
        store.save(&authenticated_snapshot()).await.unwrap();
        store
            .save(&Session::anonymous().into())
            .await
            .unwrap();

        let loaded = store.load().await.unwrap();
        assert!(!loaded.is_authenticated);
        assert!(loaded.user.is_none());
    }

    #[test]
    fn temp_paths_are_unique_per_save() {
        let store = SnapshotStore::new(PathBuf::from("/tmp/session.json"));
        let first = store.temp_path();
        let second = store.temp_path();
        assert_ne!(first, second);
        assert_ne!(first, *store.path());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let (store, _temp) = test_store();
        store.clear().await.unwrap();

        store.save(&authenticated_snapshot()).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert!(matches!(
            store.load().await,
            Err(SnapshotError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn corrupt_file_is_serialization_error() {
        let (store, _temp) = test_store();
        tokio::fs::create_dir_all(store.path().parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(store.path(), "{ not json").await.unwrap();

        assert!(matches!(
            store.load().await,
            Err(SnapshotError::Serialization(_))
        ));
    }
}
