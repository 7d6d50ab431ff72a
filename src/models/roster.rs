//! Admin roster model matching the admin service `users` list.

use serde::{Deserialize, Serialize};

/// A user as seen from the admin console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRosterEntry {
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
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default)]
    pub is_muted: bool,
}

impl AdminRosterEntry {
    pub fn badge(&self) -> RosterBadge {
        RosterBadge::of(self)
    }

    /// Subtitle line: staff role (or status) and faction.
    pub fn summary(&self) -> String {
        let mut line = match (&self.admin_role, &self.status) {
            (Some(role), _) => format!("🛡️ {}", role),
            (None, Some(status)) => status.clone(),
            (None, None) => String::new(),
        };
        if let Some(faction) = &self.faction_name {
            line.push_str(" • ");
            line.push_str(faction);
        }
        line
    }
}

/// Moderation badge of a roster entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterBadge {
    Banned,
    Muted,
    Active,
}

impl RosterBadge {
    /// Banned wins over muted, muted over active.
    pub fn of(entry: &AdminRosterEntry) -> Self {
        if entry.is_banned {
            RosterBadge::Banned
        } else if entry.is_muted {
            RosterBadge::Muted
        } else {
            RosterBadge::Active
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RosterBadge::Banned => "Забанен",
            RosterBadge::Muted => "Мут",
            RosterBadge::Active => "Активен",
        }
    }
}

/// Request body for ban and mute actions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationRequest {
    pub user_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(is_banned: bool, is_muted: bool) -> AdminRosterEntry {
        AdminRosterEntry {
            id: 1,
            username: "gotnevl".to_string(),
            admin_role: None,
            status: None,
            rank_level: None,
            faction_name: None,
            is_banned,
            is_muted,
        }
    }

    #[test]
    fn test_badge_priority() {
        assert_eq!(entry(true, true).badge(), RosterBadge::Banned);
        assert_eq!(entry(true, false).badge(), RosterBadge::Banned);
        assert_eq!(entry(false, true).badge(), RosterBadge::Muted);
        assert_eq!(entry(false, false).badge(), RosterBadge::Active);
        assert_eq!(RosterBadge::Banned.label(), "Забанен");
    }

    #[test]
    fn test_summary_prefers_admin_role() {
        let mut e = entry(false, false);
        e.status = Some("Игрок".to_string());
        e.faction_name = Some("Армия".to_string());
        assert_eq!(e.summary(), "Игрок • Армия");

        e.admin_role = Some("Администратор".to_string());
        assert_eq!(e.summary(), "🛡️ Администратор • Армия");
    }

    #[test]
    fn test_missing_flags_default_to_false() {
        let e: AdminRosterEntry =
            serde_json::from_str(r#"{"id":2,"username":"Cj","faction_name":null}"#).unwrap();
        assert_eq!(e.badge(), RosterBadge::Active);
    }
}
