//! Immutable post list snapshot and its transitions.

use crate::models::Post;

/// Configuration of the load state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// One snapshot of the post list as the presentation layer sees it.
///
/// Snapshots are never mutated in place: every transition builds a new value
/// from the previous one, overriding only the fields it owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListState {
    pub is_loading: bool,
    /// Posts in server order
    pub posts: Vec<Post>,
    /// Human-readable failure of the last load
    pub error: Option<String>,
}

impl PostListState {
    /// A load has started
    #[must_use]
    pub fn loading(&self) -> Self {
        Self {
            is_loading: true,
            error: None,
            ..self.clone()
        }
    }

    /// A load finished with posts
    #[must_use]
    pub fn loaded(&self, posts: Vec<Post>) -> Self {
        Self {
            is_loading: false,
            posts,
            ..self.clone()
        }
    }

    /// A load failed; the list is emptied so stale posts are not shown next
    /// to the error
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn failed(&self, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            is_loading: false,
            posts: Vec::new(),
            error: Some(if message.trim().is_empty() {
                "Unknown error occurred".to_string()
            } else {
                message
            }),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.posts.is_empty() {
            Phase::Idle
        } else {
            Phase::Loaded
        }
    }

    /// The first `limit` posts, for compact renderings
    pub fn head(&self, limit: usize) -> &[Post] {
        &self.posts[..self.posts.len().min(limit)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn posts() -> Vec<Post> {
        vec![Post::new(1, 1, "t1", "b1"), Post::new(2, 1, "t2", "b2")]
    }

    #[test]
    fn default_is_idle() {
        let state = PostListState::default();
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.is_loading);
        assert!(state.posts.is_empty());
        assert_eq!(state.error, None);
    }

    #[test]
    fn loading_clears_error_and_keeps_posts() {
        let previous = PostListState::default().loaded(posts());
        let loading = previous.loading();
        assert!(loading.is_loading);
        assert_eq!(loading.posts, posts());
        assert_eq!(loading.phase(), Phase::Loading);

        let retry = PostListState::default().failed("offline").loading();
        assert_eq!(retry.error, None);
    }

    #[test]
    fn loaded_and_failed_end_loading() {
        let loaded = PostListState::default().loading().loaded(posts());
        assert_eq!(
            loaded,
            PostListState {
                is_loading: false,
                posts: posts(),
                error: None,
            }
        );
        assert_eq!(loaded.phase(), Phase::Loaded);

        let failed = loaded.loading().failed("decode error");
        assert!(!failed.is_loading);
        assert!(failed.posts.is_empty());
        assert_eq!(failed.error.as_deref(), Some("decode error"));
        assert_eq!(failed.phase(), Phase::Failed);
    }

    #[test]
    fn failed_never_carries_blank_message() {
        let failed = PostListState::default().failed("  ");
        assert_eq!(failed.error.as_deref(), Some("Unknown error occurred"));
    }

    #[test]
    fn head_limits_posts() {
        let state = PostListState::default().loaded(posts());
        assert_eq!(state.head(1), &posts()[..1]);
        assert_eq!(state.head(10).len(), 2);
    }
}
