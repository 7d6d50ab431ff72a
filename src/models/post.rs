//! Forum post model matching the forum service `posts` list.

use serde::{Deserialize, Serialize};

/// Category used when the caller does not pick one.
pub const DEFAULT_CATEGORY: &str = "общее";

/// A forum post as listed by the forum service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Author username
    #[serde(rename = "username")]
    pub author_username: String,
    /// Author admin role, if the author is staff
    #[serde(rename = "admin_role", default, skip_serializing_if = "Option::is_none")]
    pub author_admin_role: Option<String>,
    #[serde(rename = "avatar_url", default, skip_serializing_if = "Option::is_none")]
    pub author_avatar_url: Option<String>,
    #[serde(rename = "likes", default)]
    pub like_count: i64,
    pub category: String,
}

/// Request body for creating a post.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
}

/// Request body for liking a post.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikePostRequest {
    pub post_id: i64,
}
