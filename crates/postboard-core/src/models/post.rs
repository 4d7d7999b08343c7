//! Post model

use serde::{Deserialize, Serialize};

/// Remote identifier of a post
pub type PostId = i64;

/// A post as served by the remote `/posts` resource
///
/// Posts are read-only: they are only ever produced by decoding a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Remote identifier
    pub id: PostId,
    /// Author of the post (`userId` on the wire)
    #[serde(rename = "userId")]
    pub owner_id: i64,
    /// Title line
    pub title: String,
    /// Body text
    pub body: String,
}

impl Post {
    /// Build a post from its parts
    #[must_use]
    pub fn new(id: PostId, owner_id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            title: title.into(),
            body: body.into(),
        }
    }

    /// First `max_lines` lines of the body, for list previews
    #[must_use]
    pub fn body_preview(&self, max_lines: usize) -> String {
        self.body
            .lines()
            .take(max_lines)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_wire_field_names() {
        let json = r#"{"id": 7, "userId": 3, "title": "hello", "body": "world"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post, Post::new(7, 3, "hello", "world"));
    }

    #[test]
    fn encodes_owner_as_user_id() {
        let value = serde_json::to_value(Post::new(1, 2, "t", "b")).unwrap();
        assert_eq!(value["userId"], 2);
        assert!(value.get("owner_id").is_none());
    }

    #[test]
    fn rejects_missing_fields() {
        let json = r#"{"id": 7, "title": "hello", "body": "world"}"#;
        assert!(serde_json::from_str::<Post>(json).is_err());
    }

    #[test]
    fn body_preview_keeps_leading_lines() {
        let post = Post::new(1, 1, "t", "one\ntwo\nthree\nfour");
        assert_eq!(post.body_preview(3), "one\ntwo\nthree");
        assert_eq!(post.body_preview(10), "one\ntwo\nthree\nfour");
    }
}
