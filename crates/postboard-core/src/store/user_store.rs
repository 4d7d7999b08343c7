//! Thread-safe user store used by every consumer in the process.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use super::UserFeed;
use crate::db::{Database, SqliteUserRepository, UserRepository};
use crate::error::{Error, Result};
use crate::models::{User, UserId};

/// Async handle to the user table.
///
/// Cloning is cheap and every clone shares the same connection and change
/// channel. SQLite work runs on the blocking pool, never on an async worker.
#[derive(Clone)]
pub struct UserStore {
    pub(super) db: Arc<Mutex<Database>>,
    changes: Arc<watch::Sender<u64>>,
    /// Last `data_version` seen by [`UserStore::poll_external_changes`]
    external_version: Arc<AtomicI64>,
    db_path: Option<PathBuf>,
}

impl UserStore {
    /// Open the store backed by the file at `db_path`
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        let path = db_path.clone();
        let store = tokio::task::spawn_blocking(move || {
            let db = Database::open(&path)?;
            Self::from_database(db, Some(path))
        })
        .await
        .map_err(|error| Error::Database(format!("open task failed: {error}")))??;
        tracing::info!("User store opened at {}", db_path.display());
        Ok(store)
    }

    /// Open an in-memory store (primarily for tests).
    pub fn open_in_memory() -> Result<Self> {
        Self::from_database(Database::open_in_memory()?, None)
    }

    fn from_database(db: Database, db_path: Option<PathBuf>) -> Result<Self> {
        let external_version = db.data_version()?;
        let (changes, _) = watch::channel(0);
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            changes: Arc::new(changes),
            external_version: Arc::new(AtomicI64::new(external_version)),
            db_path,
        })
    }

    /// Backing file, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Whether two handles share one underlying connection
    pub fn same_store(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.db, &other.db)
    }

    async fn with_database<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&*db.blocking_lock()))
            .await
            .map_err(|error| Error::Database(format!("store task failed: {error}")))?
    }

    async fn with_repo<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteUserRepository<'_>) -> Result<T> + Send + 'static,
    {
        self.with_database(move |db| op(&SqliteUserRepository::new(db.connection())))
            .await
    }

    /// Bump the change version so live feeds re-query
    pub(super) fn notify_changed(&self) {
        self.changes.send_modify(|version| *version = version.wrapping_add(1));
    }

    /// All users, oldest id first
    pub async fn list(&self) -> Result<Vec<User>> {
        self.with_repo(|repo| repo.list()).await
    }

    /// Fetch a user by id
    pub async fn get(&self, id: UserId) -> Result<Option<User>> {
        self.with_repo(move |repo| repo.get(id)).await
    }

    /// Insert a user, replacing any row that shares its id or email.
    pub async fn insert(&self, user: &User) -> Result<UserId> {
        let user = user.clone();
        let id = self.with_repo(move |repo| repo.insert(&user)).await?;
        tracing::debug!("Inserted user {id}");
        self.notify_changed();
        Ok(id)
    }

    /// Full-row replace keyed by id. Unknown or unsaved users are a no-op
    /// reporting zero rows.
    pub async fn update(&self, user: &User) -> Result<usize> {
        if !user.is_saved() {
            tracing::debug!("Ignoring update of unsaved user");
            return Ok(0);
        }
        let user = user.clone();
        let rows = self.with_repo(move |repo| repo.update(&user)).await?;
        if rows > 0 {
            self.notify_changed();
        }
        Ok(rows)
    }

    /// Delete one user by id
    pub async fn delete(&self, user: &User) -> Result<usize> {
        if !user.is_saved() {
            tracing::debug!("Ignoring delete of unsaved user");
            return Ok(0);
        }
        let user = user.clone();
        let rows = self.with_repo(move |repo| repo.delete(&user)).await?;
        if rows > 0 {
            self.notify_changed();
        }
        Ok(rows)
    }

    /// Clear the table
    pub async fn delete_all(&self) -> Result<usize> {
        let rows = self.with_repo(|repo| repo.delete_all()).await?;
        if rows > 0 {
            tracing::debug!("Deleted {rows} users");
            self.notify_changed();
        }
        Ok(rows)
    }

    /// Pick up commits made through other connections to the same file,
    /// such as another process.
    ///
    /// Returns whether anything changed; live feeds are woken when it did.
    /// Writes made through this store notify feeds on their own and never
    /// show up here.
    pub async fn poll_external_changes(&self) -> Result<bool> {
        let version = self.with_database(Database::data_version).await?;
        let previous = self.external_version.swap(version, Ordering::SeqCst);
        if previous == version {
            return Ok(false);
        }
        tracing::debug!("User table changed by another connection");
        self.notify_changed();
        Ok(true)
    }

    /// Live feed of the whole table
    pub fn observe_all(&self) -> UserFeed {
        UserFeed::new(self.clone(), self.changes.subscribe())
    }
}
