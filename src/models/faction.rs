//! Faction model matching the admin service `factions` list.

use serde::{Deserialize, Serialize};

/// Faction access class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactionType {
    #[serde(rename = "открытая", alias = "open")]
    Open,
    #[serde(rename = "закрытая", alias = "closed")]
    Closed,
    #[serde(rename = "криминальная", alias = "criminal")]
    Criminal,
}

impl FactionType {
    pub const ALL: [FactionType; 3] = [FactionType::Open, FactionType::Closed, FactionType::Criminal];

    pub fn as_str(&self) -> &'static str {
        match self {
            FactionType::Open => "открытая",
            FactionType::Closed => "закрытая",
            FactionType::Criminal => "криминальная",
        }
    }
}

/// A playable faction on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub faction_type: FactionType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_name: Option<String>,
}

/// Factions split by [`FactionType`], borrowed from a cached list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FactionPartition<'a> {
    pub open: Vec<&'a Faction>,
    pub closed: Vec<&'a Faction>,
    pub criminal: Vec<&'a Faction>,
}

impl<'a> FactionPartition<'a> {
    /// Partition `factions` by type, preserving list order within each class.
    pub fn of(factions: &'a [Faction]) -> Self {
        let mut partition = Self::default();
        for faction in factions {
            match faction.faction_type {
                FactionType::Open => partition.open.push(faction),
                FactionType::Closed => partition.closed.push(faction),
                FactionType::Criminal => partition.criminal.push(faction),
            }
        }
        partition
    }

    pub fn get(&self, faction_type: FactionType) -> &[&'a Faction] {
        match faction_type {
            FactionType::Open => &self.open,
            FactionType::Closed => &self.closed,
            FactionType::Criminal => &self.criminal,
        }
    }

    pub fn len(&self) -> usize {
        self.open.len() + self.closed.len() + self.criminal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
