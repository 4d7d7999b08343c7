//! Data models for Postboard

mod post;
mod user;

pub use post::{Post, PostId};
pub use user::{User, UserId};
