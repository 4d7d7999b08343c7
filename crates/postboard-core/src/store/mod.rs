//! Process-wide user store: async CRUD over the SQLite database plus a live
//! query feed.

mod feed;
mod shared;
mod user_store;

pub use feed::UserFeed;
pub use shared::SharedStore;
pub use user_store::UserStore;
