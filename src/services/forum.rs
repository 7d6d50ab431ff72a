//! Forum service client.

use reqwest::Client;
use serde::Deserialize;

use super::{with_bearer, ServiceClient};
use crate::errors::ClientError;
use crate::models::{AuthToken, CreatePostRequest, ForumPost, LikePostRequest};

#[derive(Debug, Deserialize)]
struct PostsResponse {
    posts: Vec<ForumPost>,
}

/// Client for the forum endpoint.
#[derive(Clone)]
pub struct ForumService {
    client: ServiceClient,
}

impl ForumService {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            client: ServiceClient::new(http, base_url, "forum"),
        }
    }

    pub async fn list_posts(&self, token: Option<&AuthToken>) -> Result<Vec<ForumPost>, ClientError> {
        let request = with_bearer(self.client.get("posts"), token);
        let body: PostsResponse = self.client.fetch(request, "posts").await?;
        Ok(body.posts)
    }

    pub async fn create_post(
        &self,
        token: &AuthToken,
        post: &CreatePostRequest,
    ) -> Result<(), ClientError> {
        let request = with_bearer(self.client.post("create-post"), Some(token)).json(post);
        self.client.execute(request, "create-post").await
    }

    pub async fn like_post(&self, token: &AuthToken, post_id: i64) -> Result<(), ClientError> {
        let request =
            with_bearer(self.client.post("like-post"), Some(token)).json(&LikePostRequest { post_id });
        self.client.execute(request, "like-post").await
    }
}
