//! Observable view state for the post list screen.

mod post_list;
mod view_model;

pub use post_list::{Phase, PostListState};
pub use view_model::PostListViewModel;
