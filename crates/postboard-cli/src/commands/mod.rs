pub mod common;
pub mod info;
pub mod posts;
pub mod users;
