//! Single-writer container for [`PostListState`].
//!
//! The view model owns the current snapshot and is the only code that writes
//! it. Presentation code subscribes through a `watch` receiver and issues
//! `load()` intents.
//!
//! Overlapping loads are raced. Each `load()` takes a generation ticket and
//! only the completion holding the newest ticket is applied, so a slow
//! earlier request can never overwrite a newer result. A fetch dropped
//! before completing gives its ticket back, so the view never stays Loading
//! with nothing left to settle it. Once the view model is closed (or dropped)
//! no transition is applied at all.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinSet;

use super::PostListState;
use crate::api::RemoteClient;
use crate::models::Post;
use crate::repository::{Fetched, PostRepository};

/// Ticket bookkeeping. Only touched while the watch lock is held.
#[derive(Default)]
struct Tickets {
    issued: u64,
    /// Ticket whose completion will be applied
    current: u64,
    /// Tickets whose fetch has neither completed nor been dropped
    running: BTreeSet<u64>,
    /// Last snapshot that was not Loading
    settled: PostListState,
}

struct Inner<C> {
    repository: Arc<PostRepository<C>>,
    state: watch::Sender<PostListState>,
    tickets: Mutex<Tickets>,
    closed: AtomicBool,
}

impl<C> Inner<C> {
    fn tickets(&self) -> MutexGuard<'_, Tickets> {
        self.tickets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enter Loading and hand out a ticket, or `None` once closed.
    fn begin(&self) -> Option<u64> {
        let mut ticket = None;
        self.state.send_if_modified(|state| {
            if self.closed.load(Ordering::SeqCst) {
                return false;
            }
            let mut tickets = self.tickets();
            tickets.issued += 1;
            let issued = tickets.issued;
            tickets.current = issued;
            tickets.running.insert(issued);
            ticket = Some(issued);
            *state = state.loading();
            true
        });
        ticket
    }

    fn finish(&self, ticket: u64, outcome: Fetched<Vec<Post>>) {
        self.state.send_if_modified(|state| {
            let mut tickets = self.tickets();
            tickets.running.remove(&ticket);
            if self.closed.load(Ordering::SeqCst) {
                tracing::debug!("Dropping load #{ticket}: view model closed");
                return false;
            }
            if tickets.current != ticket {
                tracing::debug!("Dropping stale load #{ticket}");
                return false;
            }
            *state = match outcome {
                Fetched::Fresh(posts) => state.loaded(posts),
                Fetched::Fallback { reason, .. } => state.failed(reason),
            };
            tickets.settled = state.clone();
            true
        });
    }

    /// A fetch was dropped before completing.
    ///
    /// When it held the current ticket, the newest load still running takes
    /// over; with none left the last settled snapshot is restored.
    fn abandon(&self, ticket: u64) {
        self.state.send_if_modified(|state| {
            let mut tickets = self.tickets();
            tickets.running.remove(&ticket);
            if self.closed.load(Ordering::SeqCst) || tickets.current != ticket {
                return false;
            }
            if let Some(&older) = tickets.running.last() {
                tracing::debug!("Load #{ticket} abandoned, waiting on load #{older}");
                tickets.current = older;
                return false;
            }
            tracing::debug!("Load #{ticket} abandoned, restoring last settled state");
            *state = tickets.settled.clone();
            true
        });
    }
}

impl<C: RemoteClient> Inner<C> {
    async fn run(self: Arc<Self>, ticket: u64) {
        let pending = PendingLoad {
            inner: &self,
            ticket,
            done: false,
        };
        tracing::debug!("Loading posts (load #{ticket})");
        let outcome = self.repository.fetch_posts().await;
        match outcome.failure() {
            None => tracing::info!("Successfully loaded {} posts", outcome.value().len()),
            Some(reason) => tracing::error!(error = %reason, "Error loading posts"),
        }
        pending.complete(outcome);
    }
}

/// Settles a ticket on every exit path of a fetch, including cancellation.
struct PendingLoad<'a, C> {
    inner: &'a Inner<C>,
    ticket: u64,
    done: bool,
}

impl<C> PendingLoad<'_, C> {
    fn complete(mut self, outcome: Fetched<Vec<Post>>) {
        self.done = true;
        self.inner.finish(self.ticket, outcome);
    }
}

impl<C> Drop for PendingLoad<'_, C> {
    fn drop(&mut self) {
        if !self.done {
            self.inner.abandon(self.ticket);
        }
    }
}

pub struct PostListViewModel<C> {
    inner: Arc<Inner<C>>,
    tasks: Mutex<JoinSet<()>>,
}

impl<C> PostListViewModel<C> {
    /// Subscribe to snapshots; the receiver starts at the current one
    pub fn subscribe(&self) -> watch::Receiver<PostListState> {
        self.inner.state.subscribe()
    }

    /// Clone of the current snapshot
    pub fn current(&self) -> PostListState {
        self.inner.state.borrow().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Tear down the scope: abort in-flight loads and refuse new ones.
    ///
    /// No transition is applied after this returns.
    pub fn close(&self) {
        // Flip the flag under the watch lock so a concurrent `finish` either
        // completed before us or observes the flag.
        self.inner.state.send_if_modified(|_| {
            self.inner.closed.store(true, Ordering::SeqCst);
            false
        });
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .abort_all();
    }
}

impl<C: RemoteClient> PostListViewModel<C> {
    /// Create an idle view model over a shared repository
    pub fn new(repository: Arc<PostRepository<C>>) -> Self {
        let (state, _) = watch::channel(PostListState::default());
        Self {
            inner: Arc::new(Inner {
                repository,
                state,
                tickets: Mutex::new(Tickets::default()),
                closed: AtomicBool::new(false),
            }),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Start a load in the background.
    ///
    /// The Loading snapshot is published before this returns; the result
    /// follows when the fetch completes. Must be called from within a Tokio
    /// runtime.
    pub fn load(&self) {
        let Some(ticket) = self.inner.begin() else {
            tracing::debug!("Ignoring load: view model closed");
            return;
        };

        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        while tasks.try_join_next().is_some() {}
        tasks.spawn(Arc::clone(&self.inner).run(ticket));
    }

    /// Run a load to completion on the caller's task.
    ///
    /// Follows the same ticket rules as [`load`](Self::load). Dropping the
    /// returned future cancels the fetch; if it was the newest load, the
    /// state falls back to an older load still running, or else to the last
    /// settled snapshot.
    pub async fn refresh(&self) {
        if let Some(ticket) = self.inner.begin() {
            Arc::clone(&self.inner).run(ticket).await;
        }
    }
}

impl<C> Drop for PostListViewModel<C> {
    fn drop(&mut self) {
        self.close();
    }
}
