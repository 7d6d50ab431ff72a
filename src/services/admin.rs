//! Administration service client.

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use super::{with_bearer, ServiceClient};
use crate::access::AdminCredentials;
use crate::errors::ClientError;
use crate::models::{
    AdminRosterEntry, AssignFactionRequest, AssignRoleRequest, AuthToken, CreateRoleRequest,
    Faction, ModerationRequest, Role, UpdateStatusRequest,
};

pub const ADMIN_ID_HEADER: &str = "X-Admin-Id";
pub const ADMIN_CODE_HEADER: &str = "X-Admin-Code";

#[derive(Debug, Deserialize)]
struct FactionsResponse {
    factions: Vec<Faction>,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    users: Vec<AdminRosterEntry>,
}

#[derive(Debug, Deserialize)]
struct RolesResponse {
    roles: Vec<Role>,
}

#[derive(Debug, Deserialize)]
struct RoleResponse {
    role: Role,
}

/// Client for the admin endpoint (factions, roster, roles, moderation).
#[derive(Clone)]
pub struct AdminService {
    client: ServiceClient,
}

impl AdminService {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            client: ServiceClient::new(http, base_url, "admin"),
        }
    }

    /// GET ?action=factions under the directory identity.
    pub async fn list_factions(
        &self,
        admin_id: &str,
        token: Option<&AuthToken>,
    ) -> Result<Vec<Faction>, ClientError> {
        let request = with_bearer(
            self.client.get("factions").header(ADMIN_ID_HEADER, admin_id),
            token,
        );
        let body: FactionsResponse = self.client.fetch(request, "factions").await?;
        Ok(body.factions)
    }

    /// GET ?action=users; the service validates the admin code.
    pub async fn list_users(
        &self,
        credentials: &AdminCredentials,
    ) -> Result<Vec<AdminRosterEntry>, ClientError> {
        let request = authorize(self.client.get("users"), credentials);
        let body: UsersResponse = self.client.fetch(request, "users").await?;
        Ok(body.users)
    }

    pub async fn ban_user(
        &self,
        credentials: &AdminCredentials,
        user_id: i64,
    ) -> Result<(), ClientError> {
        let request = authorize(self.client.post("ban"), credentials).json(&ModerationRequest { user_id });
        self.client.execute(request, "ban").await
    }

    pub async fn mute_user(
        &self,
        credentials: &AdminCredentials,
        user_id: i64,
    ) -> Result<(), ClientError> {
        let request = authorize(self.client.post("mute"), credentials).json(&ModerationRequest { user_id });
        self.client.execute(request, "mute").await
    }

    /// GET ?action=roles, built-in roles first.
    pub async fn list_roles(&self, credentials: &AdminCredentials) -> Result<Vec<Role>, ClientError> {
        let request = authorize(self.client.get("roles"), credentials);
        let body: RolesResponse = self.client.fetch(request, "roles").await?;
        Ok(body.roles)
    }

    pub async fn create_role(
        &self,
        credentials: &AdminCredentials,
        role: &CreateRoleRequest,
    ) -> Result<Role, ClientError> {
        let request = authorize(self.client.post("create-role"), credentials).json(role);
        let body: RoleResponse = self.client.fetch(request, "create-role").await?;
        Ok(body.role)
    }

    pub async fn assign_role(
        &self,
        credentials: &AdminCredentials,
        assignment: &AssignRoleRequest,
    ) -> Result<(), ClientError> {
        let request = authorize(self.client.post("assign-role"), credentials).json(assignment);
        self.client.execute(request, "assign-role").await
    }

    /// PUT ?action=update-status.
    pub async fn update_status(
        &self,
        credentials: &AdminCredentials,
        update: &UpdateStatusRequest,
    ) -> Result<(), ClientError> {
        let request = authorize(self.client.put("update-status"), credentials).json(update);
        self.client.execute(request, "update-status").await
    }

    pub async fn assign_faction(
        &self,
        credentials: &AdminCredentials,
        assignment: &AssignFactionRequest,
    ) -> Result<(), ClientError> {
        let request = authorize(self.client.post("assign-faction"), credentials).json(assignment);
        self.client.execute(request, "assign-faction").await
    }
}

fn authorize(request: RequestBuilder, credentials: &AdminCredentials) -> RequestBuilder {
    let request = request.header(ADMIN_ID_HEADER, credentials.admin_id());
    let request = match credentials.code() {
        Some(code) => request.header(ADMIN_CODE_HEADER, code),
        None => request,
    };
    with_bearer(request, Some(credentials.token()))
}
