//! Admin console controller.
//!
//! Closed → Open (no roster) → Open (roster loaded). The console is bound to
//! the user who opened it; once the session changes hands it closes itself.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::access::{self, AdminCredentials};
use crate::errors::ClientError;
use crate::models::{
    AdminRosterEntry, AssignFactionRequest, AssignRoleRequest, CreateRoleRequest, Role,
    UpdateStatusRequest,
};
use crate::services::AdminService;
use crate::session::SessionStore;

/// Console state as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleState {
    Closed,
    Open {
        opened_by: i64,
        roster: Option<Arc<Vec<AdminRosterEntry>>>,
    },
}

/// Result of a roster load that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterOutcome {
    /// Nothing was sent: no admin role or console closed.
    Skipped,
    /// Roster replaced with this many entries.
    Loaded(usize),
}

pub struct AdminConsole {
    admin: AdminService,
    session: Arc<SessionStore>,
    state: Mutex<ConsoleState>,
}

impl AdminConsole {
    pub fn new(admin: AdminService, session: Arc<SessionStore>) -> Self {
        Self {
            admin,
            session,
            state: Mutex::new(ConsoleState::Closed),
        }
    }

    /// Open the console for the current session.
    pub fn open(&self) -> Result<(), ClientError> {
        let session = self.session.session().ok_or(ClientError::NoSession)?;
        if !access::can_view_console(Some(&session)) {
            return Err(ClientError::NotPermitted(
                "Session has no admin role".to_string(),
            ));
        }

        let mut state = self.lock();
        match &*state {
            ConsoleState::Open { opened_by, .. } if *opened_by == session.id => {}
            _ => {
                tracing::info!(user_id = session.id, "Admin console opened");
                *state = ConsoleState::Open {
                    opened_by: session.id,
                    roster: None,
                };
            }
        }
        Ok(())
    }

    pub fn close(&self) {
        *self.lock() = ConsoleState::Closed;
    }

    pub fn state(&self) -> ConsoleState {
        let mut state = self.lock();
        self.revalidate(&mut state);
        state.clone()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state(), ConsoleState::Open { .. })
    }

    /// Last roster the service accepted, if any.
    pub fn roster(&self) -> Option<Arc<Vec<AdminRosterEntry>>> {
        match self.state() {
            ConsoleState::Open { roster, .. } => roster,
            ConsoleState::Closed => None,
        }
    }

    /// Whether the console should show the admin code field.
    pub fn prompts_for_code(&self) -> bool {
        self.session
            .session()
            .is_some_and(|s| access::requires_admin_code(&s))
    }

    /// Fetch the user roster with `code`.
    ///
    /// Does nothing when the session has no admin role or the console is
    /// closed. On rejection the previous roster stays in place.
    pub async fn load_roster(&self, code: Option<&str>) -> Result<RosterOutcome, ClientError> {
        let Some(credentials) = self.credentials(code)? else {
            return Ok(RosterOutcome::Skipped);
        };

        let users = match self.admin.list_users(&credentials).await {
            Ok(users) => users,
            Err(e) => {
                tracing::warn!(admin_id = credentials.admin_id(), "Roster load rejected: {}", e);
                return Err(e);
            }
        };

        let count = users.len();
        let mut state = self.lock();
        self.revalidate(&mut state);
        match &mut *state {
            ConsoleState::Open { opened_by, roster } if opened_by.to_string() == credentials.admin_id() => {
                *roster = Some(Arc::new(users));
                tracing::info!("Loaded roster with {} users", count);
                Ok(RosterOutcome::Loaded(count))
            }
            _ => {
                tracing::debug!("Console closed while roster was loading; discarding");
                Ok(RosterOutcome::Skipped)
            }
        }
    }

    /// Ban a user, then reload the roster.
    pub async fn ban_user(&self, user_id: i64, code: Option<&str>) -> Result<RosterOutcome, ClientError> {
        self.moderate(code, "ban", |credentials| async move {
            self.admin.ban_user(&credentials, user_id).await
        })
        .await
    }

    /// Mute a user, then reload the roster.
    pub async fn mute_user(&self, user_id: i64, code: Option<&str>) -> Result<RosterOutcome, ClientError> {
        self.moderate(code, "mute", |credentials| async move {
            self.admin.mute_user(&credentials, user_id).await
        })
        .await
    }

    /// Replace a user's status line, then reload the roster.
    pub async fn update_status(
        &self,
        user_id: i64,
        status: &str,
        code: Option<&str>,
    ) -> Result<RosterOutcome, ClientError> {
        let update = UpdateStatusRequest {
            user_id,
            status: status.to_string(),
        };
        self.moderate(code, "update-status", |credentials| async move {
            self.admin.update_status(&credentials, &update).await
        })
        .await
    }

    /// Move a user into a faction, then reload the roster.
    pub async fn assign_faction(
        &self,
        user_id: i64,
        faction_id: i64,
        code: Option<&str>,
    ) -> Result<RosterOutcome, ClientError> {
        let assignment = AssignFactionRequest { user_id, faction_id };
        self.moderate(code, "assign-faction", |credentials| async move {
            self.admin.assign_faction(&credentials, &assignment).await
        })
        .await
    }

    /// Grant a role to a user, then reload the roster.
    pub async fn assign_role(
        &self,
        user_id: i64,
        role_id: i64,
        code: Option<&str>,
    ) -> Result<RosterOutcome, ClientError> {
        let assignment = AssignRoleRequest { user_id, role_id };
        self.moderate(code, "assign-role", |credentials| async move {
            self.admin.assign_role(&credentials, &assignment).await
        })
        .await
    }

    /// List built-in and custom roles. `None` when the call was skipped.
    pub async fn list_roles(&self, code: Option<&str>) -> Result<Option<Vec<Role>>, ClientError> {
        let Some(credentials) = self.credentials(code)? else {
            return Ok(None);
        };
        self.admin.list_roles(&credentials).await.map(Some)
    }

    /// Create a custom role. `None` when the call was skipped.
    pub async fn create_role(
        &self,
        role: &CreateRoleRequest,
        code: Option<&str>,
    ) -> Result<Option<Role>, ClientError> {
        let Some(credentials) = self.credentials(code)? else {
            return Ok(None);
        };
        let created = self.admin.create_role(&credentials, role).await?;
        tracing::info!(role_id = created.id, name = %created.name, "Role created");
        Ok(Some(created))
    }

    /// Run a privileged user mutation and reload the roster after it.
    async fn moderate<F, Fut>(
        &self,
        code: Option<&str>,
        action: &'static str,
        call: F,
    ) -> Result<RosterOutcome, ClientError>
    where
        F: FnOnce(AdminCredentials) -> Fut,
        Fut: Future<Output = Result<(), ClientError>>,
    {
        let Some(credentials) = self.credentials(code)? else {
            return Ok(RosterOutcome::Skipped);
        };
        let admin_id = credentials.admin_id().to_string();
        if let Err(e) = call(credentials).await {
            tracing::warn!(admin_id = %admin_id, action, "Admin action rejected: {}", e);
            return Err(e);
        }
        tracing::info!(admin_id = %admin_id, action, "Admin action applied");
        self.load_roster(code).await
    }

    /// Credentials for a privileged call, or `None` when the call must be
    /// skipped without touching the network.
    fn credentials(&self, code: Option<&str>) -> Result<Option<AdminCredentials>, ClientError> {
        let auth = self.session.current();
        let has_role = auth
            .as_ref()
            .is_some_and(|a| access::can_view_console(Some(&a.session)));
        if !has_role {
            tracing::debug!("Skipping privileged call: session has no admin role");
            return Ok(None);
        }
        if !self.is_open() {
            tracing::debug!("Skipping privileged call: console is closed");
            return Ok(None);
        }
        AdminCredentials::for_session(auth.as_deref(), code).map(Some)
    }

    /// Close the console if the session no longer belongs to its opener.
    fn revalidate(&self, state: &mut ConsoleState) {
        if let ConsoleState::Open { opened_by, .. } = state {
            let still_owner = self
                .session
                .session()
                .is_some_and(|s| s.id == *opened_by && s.admin_role.is_some());
            if !still_owner {
                tracing::info!("Session changed; closing admin console");
                *state = ConsoleState::Closed;
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
