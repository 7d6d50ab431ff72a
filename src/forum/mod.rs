//! Forum mutations under the current session identity.
//!
//! Mutations never patch the cached post list; a successful submit is
//! followed by a full reload so the list is always what the server returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::access;
use crate::directory::DirectoryCache;
use crate::errors::ClientError;
use crate::models::{Authenticated, CreatePostRequest, DEFAULT_CATEGORY};
use crate::services::ForumService;
use crate::session::SessionStore;

/// Submits posts and likes, then refreshes the directory.
pub struct ForumMutator {
    forum: ForumService,
    session: Arc<SessionStore>,
    directory: Arc<DirectoryCache>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the mutation finishes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ForumMutator {
    pub fn new(
        forum: ForumService,
        session: Arc<SessionStore>,
        directory: Arc<DirectoryCache>,
    ) -> Self {
        Self {
            forum,
            session,
            directory,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Create a post as the current user. `category` defaults to "общее".
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        category: Option<&str>,
    ) -> Result<(), ClientError> {
        let auth = self.author()?;
        let _guard = self.begin("create post")?;

        let request = CreatePostRequest {
            user_id: auth.session.id,
            title: title.to_string(),
            content: content.to_string(),
            category: category.unwrap_or(DEFAULT_CATEGORY).to_string(),
        };

        if let Err(e) = self.forum.create_post(&auth.token, &request).await {
            tracing::warn!(user_id = auth.session.id, "Failed to create post: {}", e);
            return Err(e);
        }
        tracing::info!(user_id = auth.session.id, "Post created");

        self.reload().await;
        Ok(())
    }

    /// Like a post as the current user.
    pub async fn like_post(&self, post_id: i64) -> Result<(), ClientError> {
        let auth = self.author()?;
        let _guard = self.begin("like post")?;

        if let Err(e) = self.forum.like_post(&auth.token, post_id).await {
            tracing::warn!(post_id, "Failed to like post: {}", e);
            return Err(e);
        }

        self.reload().await;
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// The current session, if it may post.
    fn author(&self) -> Result<Arc<Authenticated>, ClientError> {
        match self.session.current() {
            Some(auth) if access::can_post(Some(&auth.session)) => Ok(auth),
            _ => Err(ClientError::NoSession),
        }
    }

    fn begin(&self, operation: &'static str) -> Result<InFlight<'_>, ClientError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ClientError::Busy(operation));
        }
        Ok(InFlight(&self.in_flight))
    }

    // The mutation already succeeded; a failed reload only leaves the old list.
    async fn reload(&self) {
        if let Err(e) = self.directory.load_forum_posts().await {
            tracing::warn!("Post list not refreshed after mutation: {}", e);
        }
    }
}
