//! `reqwest`-backed [`RemoteClient`].

use std::time::Duration;

use reqwest::{header, Client};
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult, RemoteClient};
use crate::config::{normalize_base_url, AppConfig};
use crate::models::{Post, PostId};
use crate::util::compact_text;

#[derive(Clone)]
pub struct HttpPostClient {
    base_url: String,
    client: Client,
}

impl HttpPostClient {
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> ApiResult<Self> {
        let base_url =
            normalize_base_url(base_url.as_ref()).map_err(ApiError::InvalidConfiguration)?;
        Ok(Self {
            base_url,
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    pub fn from_config(config: &AppConfig) -> ApiResult<Self> {
        Self::new(&config.api_base_url, config.http_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: compact_text(&body),
            });
        }

        serde_json::from_str(&body).map_err(ApiError::Decode)
    }
}

impl RemoteClient for HttpPostClient {
    async fn fetch_posts(&self) -> ApiResult<Vec<Post>> {
        self.get_json("posts").await
    }

    async fn fetch_post(&self, id: PostId) -> ApiResult<Post> {
        self.get_json(&format!("posts/{id}")).await
    }
}
