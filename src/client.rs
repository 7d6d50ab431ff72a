//! Client facade wiring the session store, services and controllers.

use std::sync::Arc;

use crate::access::Capability;
use crate::config::Config;
use crate::console::AdminConsole;
use crate::directory::DirectoryCache;
use crate::errors::ClientError;
use crate::forum::ForumMutator;
use crate::models::{Credentials, Profile, Session, UpdateProfileRequest};
use crate::services::{AdminService, AuthResponse, AuthService, ForumService};
use crate::session::SessionStore;
use crate::storage::KeyValueStore;

/// Application state shared by every component.
pub struct TownClient {
    pub config: Arc<Config>,
    pub session: Arc<SessionStore>,
    pub directory: Arc<DirectoryCache>,
    pub forum: ForumMutator,
    pub console: AdminConsole,
    auth: AuthService,
}

impl TownClient {
    /// Open storage, restore the persisted session and build the services.
    pub async fn connect(config: Config) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("russian-town-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let storage = KeyValueStore::open(&config.storage_path).await?;
        let session = Arc::new(SessionStore::restore(storage).await);

        let auth = AuthService::new(http.clone(), &config.auth_url);
        let admin = AdminService::new(http.clone(), &config.admin_url);
        let forum = ForumService::new(http, &config.forum_url);

        let directory = Arc::new(DirectoryCache::new(
            admin.clone(),
            forum.clone(),
            session.clone(),
            config.directory_admin_id.clone(),
        ));
        let forum = ForumMutator::new(forum, session.clone(), directory.clone());
        let console = AdminConsole::new(admin, session.clone());

        Ok(Self {
            config: Arc::new(config),
            session,
            directory,
            forum,
            console,
            auth,
        })
    }

    /// Log in and replace the current session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        let response = self.auth.login(&credentials(username, password)).await;
        self.adopt(response, "login").await
    }

    /// Register a new account and log in as it.
    pub async fn register(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        let response = self.auth.register(&credentials(username, password)).await;
        self.adopt(response, "register").await
    }

    /// Drop the session everywhere and close the console.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.console.close();
        self.session.clear().await
    }

    /// Capability level of the current session.
    pub fn capability(&self) -> Capability {
        Capability::of(self.session.session().as_ref())
    }

    /// Public profile of any user, with their roles.
    pub async fn profile(&self, user_id: i64) -> Result<Profile, ClientError> {
        let auth = self.session.current();
        self.auth
            .profile(user_id, auth.as_ref().map(|a| &a.token))
            .await
    }

    /// Update the current user's custom status and/or avatar.
    ///
    /// The stored session takes the values the service returned; other fields
    /// keep their current values. With nothing to change, no request is sent.
    pub async fn update_profile(
        &self,
        custom_status: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<Session, ClientError> {
        let auth = self.session.current().ok_or(ClientError::NoSession)?;
        let update = UpdateProfileRequest {
            user_id: auth.session.id,
            custom_status: custom_status.map(str::to_string),
            avatar_url: avatar_url.map(str::to_string),
        };
        if update.is_empty() {
            return Ok(auth.session.clone());
        }

        let stored = match self.auth.update_profile(&auth.token, &update).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(user_id = auth.session.id, "Profile update failed: {}", e);
                return Err(e);
            }
        };

        let mut session = auth.session.clone();
        session.custom_status = stored.custom_status;
        session.avatar_url = stored.avatar_url;

        let still_current = self
            .session
            .session()
            .is_some_and(|s| s.id == auth.session.id);
        if still_current {
            self.session
                .establish(session.clone(), auth.token.clone())
                .await?;
        } else {
            tracing::debug!("Session changed during profile update; not storing");
        }
        tracing::info!(user_id = session.id, "Profile updated");
        Ok(session)
    }

    async fn adopt(
        &self,
        response: Result<AuthResponse, ClientError>,
        action: &'static str,
    ) -> Result<Session, ClientError> {
        let AuthResponse { user, token } = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(action, "Authentication failed: {}", e);
                return Err(e);
            }
        };
        self.console.close();
        self.session.establish(user.clone(), token).await?;
        Ok(user)
    }
}

fn credentials(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: password.to_string(),
    }
}
