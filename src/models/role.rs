//! Staff and custom roles managed from the admin console.

use serde::{Deserialize, Serialize};

/// Color given to a custom role created without one.
pub const DEFAULT_ROLE_COLOR: &str = "#FFFFFF";

/// A role from the admin service `roles` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub is_custom: bool,
}

/// Request body for `create-role`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: String,
    pub color: String,
}

impl CreateRoleRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            color: DEFAULT_ROLE_COLOR.to_string(),
        }
    }
}

/// Request body for `assign-role`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub user_id: i64,
    pub role_id: i64,
}

/// Request body for `update-status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub user_id: i64,
    pub status: String,
}

/// Request body for `assign-faction`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignFactionRequest {
    pub user_id: i64,
    pub faction_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_defaults() {
        let role: Role = serde_json::from_str(r#"{"id":4,"name":"Журналист"}"#).unwrap();
        assert!(!role.is_custom);
        assert!(role.color.is_empty());
    }

    #[test]
    fn test_request_bodies_use_service_field_names() {
        assert_eq!(
            serde_json::to_value(AssignRoleRequest { user_id: 7, role_id: 2 }).unwrap(),
            json!({"userId": 7, "roleId": 2})
        );
        assert_eq!(
            serde_json::to_value(AssignFactionRequest { user_id: 7, faction_id: 3 }).unwrap(),
            json!({"userId": 7, "factionId": 3})
        );
        assert_eq!(
            serde_json::to_value(CreateRoleRequest::new("Журналист")).unwrap(),
            json!({"name": "Журналист", "description": "", "color": "#FFFFFF"})
        );
    }
}
