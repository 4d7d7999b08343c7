//! Composition root.
//!
//! `AppContainer` builds every collaborator once from an [`AppConfig`] and
//! hands out references; nothing else in the crate constructs a client or
//! opens the database on its own.

use std::sync::Arc;

use crate::api::{ApiError, HttpPostClient, RemoteClient};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::repository::PostRepository;
use crate::state::PostListViewModel;
use crate::store::{SharedStore, UserStore};

pub struct AppContainer<C = HttpPostClient> {
    config: AppConfig,
    posts: Arc<PostRepository<C>>,
    store: SharedStore,
}

impl AppContainer<HttpPostClient> {
    /// Wire the production collaborators for `config`
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = HttpPostClient::from_config(&config).map_err(|error| match error {
            ApiError::InvalidConfiguration(message) => Error::Config(message),
            other => Error::Config(format!("failed to build HTTP client: {other}")),
        })?;
        let store = SharedStore::new(config.database_path.clone());
        Ok(Self::with_parts(config, client, store))
    }
}

impl<C: RemoteClient> AppContainer<C> {
    /// Wire explicit collaborators (used by tests and alternate front ends)
    pub fn with_parts(config: AppConfig, client: C, store: SharedStore) -> Self {
        Self {
            config,
            posts: Arc::new(PostRepository::new(client)),
            store,
        }
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn post_repository(&self) -> Arc<PostRepository<C>> {
        Arc::clone(&self.posts)
    }

    /// The process's user store, opened on first use
    pub async fn user_store(&self) -> Result<UserStore> {
        self.store.get().await.cloned()
    }

    /// A fresh, idle view model sharing the post repository
    pub fn post_list_view_model(&self) -> PostListViewModel<C> {
        PostListViewModel::new(self.post_repository())
    }
}
