//! Authentication and profile service client.

use reqwest::Client;
use serde::Deserialize;

use super::{with_bearer, ServiceClient};
use crate::errors::ClientError;
use crate::models::{AuthToken, Credentials, Profile, Session, UpdateProfileRequest};

/// Successful login/register body.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: Session,
    pub token: AuthToken,
}

#[derive(Debug, Deserialize)]
struct UpdatedUser {
    user: Session,
}

/// Client for the auth endpoint (login, register, profiles).
#[derive(Clone)]
pub struct AuthService {
    client: ServiceClient,
}

impl AuthService {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            client: ServiceClient::new(http, base_url, "auth"),
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        let request = self.client.post("login").json(credentials);
        self.client.fetch(request, "login").await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        let request = self.client.post("register").json(credentials);
        self.client.fetch(request, "register").await
    }

    /// GET ?action=profile&userId=...
    pub async fn profile(
        &self,
        user_id: i64,
        token: Option<&AuthToken>,
    ) -> Result<Profile, ClientError> {
        let request = with_bearer(
            self.client.get("profile").query(&[("userId", user_id)]),
            token,
        );
        self.client.fetch(request, "profile").await
    }

    /// PUT ?action=update-profile; returns the stored user row.
    pub async fn update_profile(
        &self,
        token: &AuthToken,
        update: &UpdateProfileRequest,
    ) -> Result<Session, ClientError> {
        let request = with_bearer(self.client.put("update-profile").json(update), Some(token));
        let body: UpdatedUser = self.client.fetch(request, "update-profile").await?;
        Ok(body.user)
    }
}
