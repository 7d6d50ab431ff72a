//! Clients for the three remote services.
//!
//! Every service is a single endpoint dispatching on an `action` query
//! parameter and answering JSON; failures carry an `error` field.

mod admin;
mod auth;
mod forum;

pub use admin::*;
pub use auth::*;
pub use forum::*;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::errors::ClientError;
use crate::models::AuthToken;

/// Error body returned by the services.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Shared request plumbing for one service endpoint.
#[derive(Clone)]
pub(crate) struct ServiceClient {
    http: Client,
    base_url: String,
    name: &'static str,
}

impl ServiceClient {
    pub(crate) fn new(http: Client, base_url: &str, name: &'static str) -> Self {
        Self {
            http,
            base_url: format!("{}/", base_url.trim_end_matches('/')),
            name,
        }
    }

    pub(crate) fn get(&self, action: &str) -> RequestBuilder {
        self.http
            .get(&self.base_url)
            .query(&[("action", action)])
    }

    pub(crate) fn post(&self, action: &str) -> RequestBuilder {
        self.http
            .post(&self.base_url)
            .query(&[("action", action)])
    }

    pub(crate) fn put(&self, action: &str) -> RequestBuilder {
        self.http
            .put(&self.base_url)
            .query(&[("action", action)])
    }

    /// Send and decode a JSON success body.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &'static str,
    ) -> Result<T, ClientError> {
        let response = self.send(request, action).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(service = self.name, action, "Unexpected response shape: {}", e);
            ClientError::Malformed(format!("{} {}: unexpected response: {}", self.name, action, e))
        })
    }

    /// Send and require only a 2xx status.
    pub(crate) async fn execute(
        &self,
        request: RequestBuilder,
        action: &'static str,
    ) -> Result<(), ClientError> {
        self.send(request, action).await.map(|_| ())
    }

    async fn send(
        &self,
        request: RequestBuilder,
        action: &'static str,
    ) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let response = Self::ensure_success(response).await?;
        tracing::debug!(service = self.name, action, "Request succeeded");
        Ok(response)
    }

    /// Checks HTTP response status; returns the response on success or the
    /// service-provided error message.
    async fn ensure_success(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// Attach the session token when there is one.
pub(crate) fn with_bearer(request: RequestBuilder, token: Option<&AuthToken>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token.as_str()),
        None => request,
    }
}
