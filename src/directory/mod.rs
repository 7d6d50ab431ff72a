//! Directory cache: read-only snapshots of factions and forum posts.
//!
//! Each load replaces its list wholesale or leaves it untouched. Faction
//! classes are derived from the cached list on every read and never stored.

mod snapshot;

pub use snapshot::Snapshot;

use std::sync::Arc;

use tokio::sync::watch;

use crate::errors::ClientError;
use crate::models::{Faction, FactionPartition, FactionType, ForumPost};
use crate::services::{AdminService, ForumService};
use crate::session::SessionStore;
use snapshot::SequencedCell;

/// What happened to a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The cache now holds this many entries.
    Applied(usize),
    /// A newer load was issued meanwhile; the response was discarded.
    Superseded,
}

/// Cached faction and forum lists.
pub struct DirectoryCache {
    admin: AdminService,
    forum: ForumService,
    session: Arc<SessionStore>,
    directory_admin_id: String,
    factions: SequencedCell<Faction>,
    posts: SequencedCell<ForumPost>,
}

impl DirectoryCache {
    pub fn new(
        admin: AdminService,
        forum: ForumService,
        session: Arc<SessionStore>,
        directory_admin_id: impl Into<String>,
    ) -> Self {
        Self {
            admin,
            forum,
            session,
            directory_admin_id: directory_admin_id.into(),
            factions: SequencedCell::new(),
            posts: SequencedCell::new(),
        }
    }

    /// Fetch the full faction list and replace the cache with it.
    pub async fn load_factions(&self) -> Result<LoadOutcome, ClientError> {
        let ticket = self.factions.issue();
        let auth = self.session.current();
        let token = auth.as_ref().map(|a| &a.token);

        match self.admin.list_factions(&self.directory_admin_id, token).await {
            Ok(factions) => {
                let count = factions.len();
                if self.factions.commit(ticket, factions) {
                    tracing::info!("Loaded {} factions", count);
                    Ok(LoadOutcome::Applied(count))
                } else {
                    tracing::debug!("Discarded superseded faction list");
                    Ok(LoadOutcome::Superseded)
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load factions: {}", e);
                Err(e)
            }
        }
    }

    /// Fetch the full post list and replace the cache with it.
    pub async fn load_forum_posts(&self) -> Result<LoadOutcome, ClientError> {
        let ticket = self.posts.issue();
        let auth = self.session.current();
        let token = auth.as_ref().map(|a| &a.token);

        match self.forum.list_posts(token).await {
            Ok(posts) => {
                let count = posts.len();
                if self.posts.commit(ticket, posts) {
                    tracing::info!("Loaded {} forum posts", count);
                    Ok(LoadOutcome::Applied(count))
                } else {
                    tracing::debug!("Discarded superseded post list");
                    Ok(LoadOutcome::Superseded)
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load forum posts: {}", e);
                Err(e)
            }
        }
    }

    /// Load both lists concurrently; each result stands on its own.
    pub async fn load_all(
        &self,
    ) -> (
        Result<LoadOutcome, ClientError>,
        Result<LoadOutcome, ClientError>,
    ) {
        tokio::join!(self.load_factions(), self.load_forum_posts())
    }

    pub fn factions(&self) -> Arc<Snapshot<Faction>> {
        self.factions.get()
    }

    pub fn posts(&self) -> Arc<Snapshot<ForumPost>> {
        self.posts.get()
    }

    /// Factions of one class, computed from the current snapshot.
    pub fn factions_of(&self, faction_type: FactionType) -> Vec<Faction> {
        let snapshot = self.factions.get();
        FactionPartition::of(&snapshot.items)
            .get(faction_type)
            .iter()
            .map(|f| (*f).clone())
            .collect()
    }

    pub fn open_factions(&self) -> Vec<Faction> {
        self.factions_of(FactionType::Open)
    }

    pub fn closed_factions(&self) -> Vec<Faction> {
        self.factions_of(FactionType::Closed)
    }

    pub fn criminal_factions(&self) -> Vec<Faction> {
        self.factions_of(FactionType::Criminal)
    }

    /// Posts in `category`, filtered from the current snapshot.
    pub fn posts_in_category(&self, category: &str) -> Vec<ForumPost> {
        self.posts
            .get()
            .items
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect()
    }

    pub fn subscribe_factions(&self) -> watch::Receiver<Arc<Snapshot<Faction>>> {
        self.factions.subscribe()
    }

    pub fn subscribe_posts(&self) -> watch::Receiver<Arc<Snapshot<ForumPost>>> {
        self.posts.subscribe()
    }
}
