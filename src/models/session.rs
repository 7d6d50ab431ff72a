//! Session model matching the auth service `user` object.

use serde::{Deserialize, Serialize};

/// Status shown for players without a custom one.
pub const DEFAULT_STATUS: &str = "Игрок";

/// The authenticated identity and its role/status metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_status: Option<String>,
}

impl Session {
    /// Minimal session with only the identity fields.
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            admin_role: None,
            status: None,
            rank_level: None,
            faction_name: None,
            avatar_url: None,
            custom_status: None,
        }
    }

    pub fn with_admin_role(mut self, role: impl Into<String>) -> Self {
        self.admin_role = Some(role.into());
        self
    }

    pub fn display_status(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_STATUS)
    }

    /// Rank shown in the profile; unranked players are rank 1.
    pub fn display_rank(&self) -> i32 {
        match self.rank_level {
            Some(rank) if rank > 0 => rank,
            _ => 1,
        }
    }
}

/// Opaque bearer credential issued alongside a [`Session`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// A session together with its token. Only the session store creates these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    pub session: Session,
    pub token: AuthToken,
}

/// Credentials submitted to login and register.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_minimal_json() {
        let session: Session = serde_json::from_str(r#"{"id":7,"username":"Ivan"}"#).unwrap();
        assert_eq!(session, Session::new(7, "Ivan"));
        assert_eq!(session.display_status(), DEFAULT_STATUS);
        assert_eq!(session.display_rank(), 1);
    }

    #[test]
    fn test_session_ignores_unknown_fields() {
        let session: Session = serde_json::from_str(
            r#"{"id":3,"username":"Pancake","admin_role":"Старший администратор",
                "rank_level":5,"faction_id":2,"is_banned":false}"#,
        )
        .unwrap();
        assert_eq!(session.admin_role.as_deref(), Some("Старший администратор"));
        assert_eq!(session.display_rank(), 5);
    }

    #[test]
    fn test_session_serializes_without_empty_fields() {
        let json = serde_json::to_value(Session::new(7, "Ivan")).unwrap();
        assert_eq!(json, serde_json::json!({"id": 7, "username": "Ivan"}));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("tok-secret");
        assert_eq!(format!("{:?}", token), "AuthToken(***)");
        assert_eq!(token.as_str(), "tok-secret");
    }
}
