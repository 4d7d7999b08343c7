//! Remote posts API: the client contract and its HTTP implementation.

mod http;

use std::future::Future;

use thiserror::Error;

use crate::models::{Post, PostId};

pub use http::HttpPostClient;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API configuration: {0}")]
    InvalidConfiguration(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Whether the server reported the resource as missing
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Read access to the remote `/posts` resource.
///
/// Implementations perform exactly one request per call and report every
/// transport, status, or decoding problem as an [`ApiError`].
pub trait RemoteClient: Send + Sync + 'static {
    /// `GET /posts`
    fn fetch_posts(&self) -> impl Future<Output = ApiResult<Vec<Post>>> + Send;

    /// `GET /posts/{id}`
    fn fetch_post(&self, id: PostId) -> impl Future<Output = ApiResult<Post>> + Send;
}
