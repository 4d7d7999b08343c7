//! Live query over the user table.

use tokio::sync::watch;

use super::UserStore;
use crate::error::{Error, Result};
use crate::models::User;

/// Continuously updated view of all users.
///
/// The first [`next`](Self::next) yields the table as it is; every later call
/// waits for a committed write that changed rows and yields the table again.
/// Writes that land between two calls are folded into one snapshot. The feed
/// never ends on its own; call [`UserStore::observe_all`] again to restart.
///
/// `next` is cancel-safe: a call dropped after a change was observed leaves
/// that change pending for the following call.
pub struct UserFeed {
    store: UserStore,
    changes: watch::Receiver<u64>,
    /// A change was observed that no snapshot has reflected yet
    stale: bool,
}

impl UserFeed {
    pub(super) fn new(store: UserStore, changes: watch::Receiver<u64>) -> Self {
        Self {
            store,
            changes,
            stale: true,
        }
    }

    /// Next snapshot of the table
    pub async fn next(&mut self) -> Result<Vec<User>> {
        if !self.stale {
            self.changes
                .changed()
                .await
                .map_err(|_| Error::Database("user store change channel closed".into()))?;
            self.stale = true;
        }

        // Mark seen before querying so a write racing the query triggers
        // another snapshot instead of being lost.
        let version = *self.changes.borrow_and_update();
        tracing::trace!("User feed re-query at version {version}");
        let users = self.store.list().await?;
        self.stale = false;
        Ok(users)
    }

    /// Whether a write has landed since the last snapshot
    pub fn has_pending_change(&self) -> bool {
        self.changes.has_changed().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::UserId;

    async fn next_within(feed: &mut UserFeed) -> Vec<User> {
        tokio::time::timeout(Duration::from_secs(5), feed.next())
            .await
            .expect("feed did not produce a snapshot")
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn first_snapshot_is_current_table() {
        let store = UserStore::open_in_memory().unwrap();
        let id = store.insert(&User::new("Ada", "ada@example.com")).await.unwrap();

        let mut feed = store.observe_all();
        let users = next_within(&mut feed).await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, Some(id));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reflects_writes_from_any_handle() {
        let store = UserStore::open_in_memory().unwrap();
        let writer = store.clone();
        let mut feed = store.observe_all();
        assert!(next_within(&mut feed).await.is_empty());

        let id = writer.insert(&User::new("Ada", "ada@example.com")).await.unwrap();
        assert!(feed.has_pending_change());
        let users = next_within(&mut feed).await;
        assert_eq!(users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![Some(id)]);

        let user = users[0].clone();
        writer.delete(&user).await.unwrap();
        assert!(next_within(&mut feed).await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn writes_between_polls_coalesce() {
        let store = UserStore::open_in_memory().unwrap();
        let mut feed = store.observe_all();
        next_within(&mut feed).await;

        store.insert(&User::new("A", "a@example.com")).await.unwrap();
        store.insert(&User::new("B", "b@example.com")).await.unwrap();

        assert_eq!(next_within(&mut feed).await.len(), 2);
        assert!(!feed.has_pending_change());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn noop_writes_leave_feed_unchanged() {
        let store = UserStore::open_in_memory().unwrap();
        let mut feed = store.observe_all();
        assert!(next_within(&mut feed).await.is_empty());

        assert_eq!(store.delete_all().await.unwrap(), 0);
        let ghost = User::new("Ghost", "ghost@example.com").with_id(UserId::new(7));
        assert_eq!(store.delete(&ghost).await.unwrap(), 0);
        assert_eq!(store.update(&ghost).await.unwrap(), 0);

        assert!(!feed.has_pending_change());
        let waited = tokio::time::timeout(Duration::from_millis(100), feed.next()).await;
        assert!(waited.is_err(), "feed should not emit without a change");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn dropped_next_keeps_observed_change() {
        let store = UserStore::open_in_memory().unwrap();
        let mut feed = store.observe_all();
        next_within(&mut feed).await;

        // Hold the connection so the re-query cannot finish.
        let guard = store.db.lock().await;
        store.notify_changed();
        let cut_short = tokio::time::timeout(Duration::from_millis(50), feed.next()).await;
        assert!(cut_short.is_err());
        drop(guard);

        assert!(!feed.has_pending_change());
        assert!(next_within(&mut feed).await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn resubscribing_restarts_from_current_table() {
        let store = UserStore::open_in_memory().unwrap();
        let mut feed = store.observe_all();
        next_within(&mut feed).await;
        drop(feed);

        store.insert(&User::new("Ada", "ada@example.com")).await.unwrap();

        let mut restarted = store.observe_all();
        assert!(!restarted.has_pending_change());
        assert_eq!(next_within(&mut restarted).await.len(), 1);
    }
}
