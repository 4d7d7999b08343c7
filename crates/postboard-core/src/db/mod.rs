//! Database layer for Postboard

mod connection;
mod migrations;
mod user_repository;

pub use connection::Database;
pub use user_repository::{SqliteUserRepository, UserRepository};
