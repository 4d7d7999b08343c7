//! postboard-core - Core library for Postboard
//!
//! This crate contains the shared models, the remote post repository, the
//! observable post list state, and the local user store used by every
//! Postboard front end.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod state;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use models::{Post, PostId, User, UserId};
