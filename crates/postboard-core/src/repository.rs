//! Remote-backed post repository.
//!
//! The repository is the single source of truth for the remote post
//! collection. It never returns an error: failures are logged and turned into
//! an empty (or absent) result.

use crate::api::RemoteClient;
use crate::models::{Post, PostId};

/// Outcome of a fetch that cannot fail from the caller's point of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    /// The remote answered and the body decoded
    Fresh(T),
    /// The remote call failed; `value` is the substitute result
    Fallback { value: T, reason: String },
}

impl<T> Fetched<T> {
    /// The result, whether fresh or substituted
    pub fn into_value(self) -> T {
        match self {
            Self::Fresh(value) | Self::Fallback { value, .. } => value,
        }
    }

    pub const fn value(&self) -> &T {
        match self {
            Self::Fresh(value) | Self::Fallback { value, .. } => value,
        }
    }

    /// Why the fallback was used, if it was
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Fresh(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }

    pub const fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }
}

pub struct PostRepository<C> {
    client: C,
}

impl<C: RemoteClient> PostRepository<C> {
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Fetch every post in server order.
    ///
    /// On failure the value is an empty list and the reason is kept so a view
    /// can tell "nothing there" from "could not ask".
    pub async fn fetch_posts(&self) -> Fetched<Vec<Post>> {
        tracing::debug!("Fetching posts from API");
        match self.client.fetch_posts().await {
            Ok(posts) => {
                tracing::info!("Successfully fetched {} posts", posts.len());
                Fetched::Fresh(posts)
            }
            Err(error) => {
                tracing::error!(error = %error, "Error fetching posts from API");
                Fetched::Fallback {
                    value: Vec::new(),
                    reason: error.to_string(),
                }
            }
        }
    }

    /// Fetch every post, empty on failure
    pub async fn get_posts(&self) -> Vec<Post> {
        self.fetch_posts().await.into_value()
    }

    /// Fetch one post; `None` when missing or when the call failed
    pub async fn fetch_post(&self, id: PostId) -> Option<Post> {
        tracing::debug!("Fetching post with ID: {id}");
        match self.client.fetch_post(id).await {
            Ok(post) => {
                tracing::info!("Successfully fetched post: {}", post.title);
                Some(post)
            }
            Err(error) if error.is_not_found() => {
                tracing::warn!("Post {id} not found");
                None
            }
            Err(error) => {
                tracing::error!(error = %error, "Error fetching post with ID: {id}");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted [`RemoteClient`] double shared by repository and view tests.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::api::{ApiError, ApiResult, RemoteClient};
    use crate::models::{Post, PostId};

    /// One scripted answer to `fetch_posts`
    pub enum Reply {
        Posts(Vec<Post>),
        Decode,
        Status(u16),
    }

    impl Reply {
        fn into_result(self) -> ApiResult<Vec<Post>> {
            match self {
                Self::Posts(posts) => Ok(posts),
                Self::Decode => Err(decode_error()),
                Self::Status(status) => Err(ApiError::Status {
                    status,
                    body: "upstream unavailable".to_string(),
                }),
            }
        }
    }

    pub fn decode_error() -> ApiError {
        let source = serde_json::from_str::<Vec<Post>>("{not json").unwrap_err();
        ApiError::Decode(source)
    }

    /// Answers `fetch_posts` from a queue, repeating `fallback` once drained.
    /// Each answer may be delayed to exercise overlapping loads.
    pub struct ScriptedClient {
        script: Mutex<VecDeque<(Duration, Reply)>>,
        fallback: Vec<Post>,
        posts_by_id: Vec<Post>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        pub fn returning(posts: Vec<Post>) -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                fallback: posts.clone(),
                posts_by_id: posts,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn then(self, delay: Duration, reply: Reply) -> Self {
            self.script.lock().unwrap().push_back((delay, reply));
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RemoteClient for ScriptedClient {
        async fn fetch_posts(&self) -> ApiResult<Vec<Post>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some((delay, reply)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    reply.into_result()
                }
                None => Ok(self.fallback.clone()),
            }
        }

        async fn fetch_post(&self, id: PostId) -> ApiResult<Post> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if id == 500 {
                return Err(ApiError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            self.posts_by_id
                .iter()
                .find(|post| post.id == id)
                .cloned()
                .ok_or(ApiError::Status {
                    status: 404,
                    body: "{}".to_string(),
                })
        }
    }
}
