use postboard_core::util::normalize_text_option;
use postboard_core::{Post, User, UserId};
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct UserListItem {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub created_at: i64,
    pub created_at_iso: String,
}

#[derive(Debug, Serialize)]
pub struct PostListOutput<'a> {
    pub posts: &'a [Post],
    pub error: Option<&'a str>,
}

pub fn user_to_list_item(user: &User) -> UserListItem {
    UserListItem {
        id: user.id.map(UserId::get),
        name: user.name.clone(),
        email: user.email.clone(),
        created_at: user.created_at,
        created_at_iso: format_timestamp(user.created_at),
    }
}

pub fn format_user_lines(users: &[User]) -> Vec<String> {
    users
        .iter()
        .map(|user| {
            let id = user.id.map_or_else(|| "-".to_string(), |id| id.to_string());
            format!(
                "{id:>6}  {:<24}  {:<32}  {}",
                truncate_chars(&user.name, 24),
                truncate_chars(&user.email, 32),
                format_timestamp(user.created_at)
            )
        })
        .collect()
}

/// Lines of the body shown under each title in the post list
pub const POST_PREVIEW_LINES: usize = 3;

pub fn format_post_lines(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .map(|post| {
            let mut entry = format!(
                "#{:<4}  user {:<3}  {}",
                post.id,
                post.owner_id,
                truncate_chars(&post.title, 60)
            );
            for line in post.body_preview(POST_PREVIEW_LINES).lines() {
                entry.push_str("\n        ");
                entry.push_str(&truncate_chars(line, 72));
            }
            entry
        })
        .collect()
}

pub fn format_post_detail(post: &Post) -> String {
    format!(
        "#{} by user {}\n{}\n\n{}",
        post.id, post.owner_id, post.title, post.body
    )
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let keep = max_chars.saturating_sub(3);
    let mut truncated = single_line.chars().take(keep).collect::<String>();
    truncated.push_str("...");
    truncated
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn parse_user_id(raw: &str) -> Result<UserId, CliError> {
    raw.parse()
        .map_err(|_| CliError::InvalidUserId(raw.trim().to_string()))
}

pub fn normalize_field(value: &str, field: &'static str) -> Result<String, CliError> {
    normalize_text_option(Some(value.to_string())).ok_or(CliError::EmptyField(field))
}
