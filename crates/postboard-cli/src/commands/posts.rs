use postboard_core::api::RemoteClient;
use postboard_core::app::AppContainer;
use postboard_core::state::PostListState;
use postboard_core::PostId;

use crate::commands::common::{format_post_detail, format_post_lines, PostListOutput};
use crate::error::CliError;

pub async fn run_posts<C: RemoteClient>(
    container: &AppContainer<C>,
    limit: usize,
    as_json: bool,
) -> Result<(), CliError> {
    let state = load_post_list(container).await;

    if as_json {
        let output = PostListOutput {
            posts: state.head(limit),
            error: state.error.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for line in render_post_list(&state, limit) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn run_post<C: RemoteClient>(
    container: &AppContainer<C>,
    id: PostId,
    as_json: bool,
) -> Result<(), CliError> {
    match container.post_repository().fetch_post(id).await {
        Some(post) if as_json => println!("{}", serde_json::to_string_pretty(&post)?),
        Some(post) => println!("{}", format_post_detail(&post)),
        None if as_json => println!("null"),
        None => println!("Post {id} not found"),
    }
    Ok(())
}

/// Drive a fresh view model through one load and return the settled snapshot
pub async fn load_post_list<C: RemoteClient>(container: &AppContainer<C>) -> PostListState {
    let view_model = container.post_list_view_model();
    let mut updates = view_model.subscribe();

    view_model.load();
    if updates.wait_for(|state| !state.is_loading).await.is_err() {
        tracing::warn!("Post list closed before the load settled");
    }
    view_model.current()
}

pub fn render_post_list(state: &PostListState, limit: usize) -> Vec<String> {
    if let Some(error) = &state.error {
        return vec![format!("Error: {error}")];
    }
    if state.posts.is_empty() {
        return vec!["No posts".to_string()];
    }

    let mut lines = format_post_lines(state.head(limit));
    let hidden = state.posts.len().saturating_sub(limit);
    if hidden > 0 {
        lines.push(format!("... and {hidden} more"));
    }
    lines
}
