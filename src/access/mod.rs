//! Access evaluation.
//!
//! Two admin checks are kept apart. Console visibility is decided locally from
//! `admin_role`. Roster access is decided by the admin service, which checks
//! the rotating admin code; this module only assembles the credentials it
//! forwards.

use crate::errors::ClientError;
use crate::models::{AuthToken, Authenticated, Session};

/// Reserved super-admin identity that is not prompted for an admin code.
pub const SUPER_ADMIN_USERNAME: &str = "TOURIST_WAGNERA";

/// Staff role treated as moderator rather than full administrator.
pub const MODERATOR_ROLE: &str = "Младший администратор";

/// Coarse capability level of the current actor.
///
/// Informational only: no level authorizes a roster fetch by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Capability {
    Anonymous,
    Member,
    Moderator,
    Admin,
}

impl Capability {
    pub fn of(session: Option<&Session>) -> Self {
        match session {
            None => Capability::Anonymous,
            Some(s) => match s.admin_role.as_deref() {
                None => Capability::Member,
                Some(MODERATOR_ROLE) => Capability::Moderator,
                Some(_) => Capability::Admin,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Capability::Anonymous => "гость",
            Capability::Member => "игрок",
            Capability::Moderator => "модератор",
            Capability::Admin => "администратор",
        }
    }
}

/// Any live session may post.
pub fn can_post(session: Option<&Session>) -> bool {
    Capability::of(session) >= Capability::Member
}

/// Whether to show the console entry point: any staff role.
pub fn can_view_console(session: Option<&Session>) -> bool {
    Capability::of(session) >= Capability::Moderator
}

/// Whether the console should prompt for the admin code.
pub fn requires_admin_code(session: &Session) -> bool {
    session.username != SUPER_ADMIN_USERNAME
}

/// Identity and code forwarded to the admin service.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    admin_id: String,
    code: Option<String>,
    token: AuthToken,
}

impl AdminCredentials {
    /// Value of the `X-Admin-Id` header.
    pub fn admin_id(&self) -> &str {
        &self.admin_id
    }

    /// Value of the `X-Admin-Code` header, if one is sent.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    /// Assemble credentials for a privileged request.
    ///
    /// Refuses locally when there is no session, no admin role, or a blank code
    /// for an identity that must present one. A non-blank code is forwarded
    /// exactly as entered.
    pub fn for_session(
        auth: Option<&Authenticated>,
        code: Option<&str>,
    ) -> Result<Self, ClientError> {
        let auth = auth.ok_or(ClientError::NoSession)?;
        if auth.session.admin_role.is_none() {
            return Err(ClientError::NotPermitted(
                "Session has no admin role".to_string(),
            ));
        }

        let code = code.filter(|c| !c.trim().is_empty());
        if code.is_none() && requires_admin_code(&auth.session) {
            return Err(ClientError::NotPermitted("Admin code required".to_string()));
        }

        Ok(Self {
            admin_id: auth.session.id.to_string(),
            code: code.map(str::to_string),
            token: auth.token.clone(),
        })
    }
}
