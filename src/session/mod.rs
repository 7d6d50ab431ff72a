//! Session store: the single authoritative view of who is logged in.
//!
//! The in-memory state lives in a `watch` channel so every component reading
//! the session sees each `establish`/`clear` as soon as it happens.

use std::sync::Arc;

use tokio::sync::watch;

use crate::errors::ClientError;
use crate::models::{AuthToken, Authenticated, Session};
use crate::storage::{KeyValueStore, SESSION_KEY, TOKEN_KEY};

/// Snapshot of the session state; `None` is the anonymous state.
pub type SessionSnapshot = Option<Arc<Authenticated>>;

/// Owner of the current session and token.
pub struct SessionStore {
    storage: KeyValueStore,
    state: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
    /// Restore the persisted session, falling back to anonymous when it is
    /// absent, partial or unreadable. Never fails.
    pub async fn restore(storage: KeyValueStore) -> Self {
        let restored = match read_persisted(&storage).await {
            Ok(Some(auth)) => {
                tracing::info!(
                    user_id = auth.session.id,
                    username = %auth.session.username,
                    "Restored persisted session"
                );
                Some(Arc::new(auth))
            }
            Ok(None) => {
                tracing::debug!("No persisted session");
                None
            }
            Err(e) => {
                tracing::warn!("Ignoring persisted session: {}", e);
                None
            }
        };

        Self {
            storage,
            state: watch::Sender::new(restored),
        }
    }

    /// Replace the current session and token, persisting both.
    ///
    /// The in-memory state only changes once storage has accepted the pair.
    pub async fn establish(&self, session: Session, token: AuthToken) -> Result<(), ClientError> {
        let record = serde_json::to_string(&session)?;
        self.storage
            .put_many(&[(SESSION_KEY, record.as_str()), (TOKEN_KEY, token.as_str())])
            .await?;

        tracing::info!(user_id = session.id, username = %session.username, "Session established");
        self.state
            .send_replace(Some(Arc::new(Authenticated { session, token })));
        Ok(())
    }

    /// Remove the session and token from storage and memory. Idempotent.
    pub async fn clear(&self) -> Result<(), ClientError> {
        self.storage.remove_many(&[SESSION_KEY, TOKEN_KEY]).await?;

        if self.state.send_replace(None).is_some() {
            tracing::info!("Session cleared");
        }
        Ok(())
    }

    /// Current session and token.
    pub fn current(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Current session only.
    pub fn session(&self) -> Option<Session> {
        self.state.borrow().as_ref().map(|auth| auth.session.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Receiver notified on every `establish` and `clear`.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }
}

async fn read_persisted(storage: &KeyValueStore) -> Result<Option<Authenticated>, ClientError> {
    let record = storage.get(SESSION_KEY).await?;
    let token = storage.get(TOKEN_KEY).await?;

    match (record, token) {
        (Some(record), Some(token)) => {
            let session: Session = serde_json::from_str(&record)?;
            Ok(Some(Authenticated {
                session,
                token: AuthToken::new(token),
            }))
        }
        (None, None) => Ok(None),
        _ => Err(ClientError::Malformed(
            "Persisted session is missing its session record or token".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_store(temp_dir: &TempDir) -> KeyValueStore {
        KeyValueStore::open(&temp_dir.path().join("client.sqlite"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_restore_empty_storage_is_anonymous() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::restore(open_store(&temp_dir).await).await;

        assert!(store.current().is_none());
        assert!(!store.is_logged_in());
    }

    #[tokio::test]
    async fn test_establish_then_restore_in_new_instance() {
        let temp_dir = TempDir::new().unwrap();
        let storage = open_store(&temp_dir).await;
        let store = SessionStore::restore(storage.clone()).await;

        let session = Session::new(7, "Ivan").with_admin_role("Администратор");
        store
            .establish(session.clone(), AuthToken::new("tok-1"))
            .await
            .unwrap();
        storage.close().await;

        let restored = SessionStore::restore(open_store(&temp_dir).await).await;
        let auth = restored.current().unwrap();
        assert_eq!(auth.session, session);
        assert_eq!(auth.token, AuthToken::new("tok-1"));
    }

    #[tokio::test]
    async fn test_establish_replaces_wholesale() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::restore(open_store(&temp_dir).await).await;

        store
            .establish(
                Session::new(1, "Pancake").with_admin_role("Старший администратор"),
                AuthToken::new("tok-a"),
            )
            .await
            .unwrap();
        store
            .establish(Session::new(2, "Cj"), AuthToken::new("tok-b"))
            .await
            .unwrap();

        let auth = store.current().unwrap();
        assert_eq!(auth.session, Session::new(2, "Cj"));
        assert!(auth.session.admin_role.is_none());
        assert_eq!(auth.token.as_str(), "tok-b");
    }

    #[tokio::test]
    async fn test_clear_is_idempotent_and_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let storage = open_store(&temp_dir).await;
        let store = SessionStore::restore(storage.clone()).await;

        store
            .establish(Session::new(7, "Ivan"), AuthToken::new("tok-1"))
            .await
            .unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.current().is_none());
        storage.close().await;

        let restored = SessionStore::restore(open_store(&temp_dir).await).await;
        assert!(restored.current().is_none());
    }

    #[tokio::test]
    async fn test_malformed_record_yields_anonymous() {
        let temp_dir = TempDir::new().unwrap();
        let storage = open_store(&temp_dir).await;
        storage
            .put_many(&[(SESSION_KEY, "{not json"), (TOKEN_KEY, "tok-1")])
            .await
            .unwrap();

        let store = SessionStore::restore(storage).await;
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_token_without_record_yields_anonymous() {
        let temp_dir = TempDir::new().unwrap();
        let storage = open_store(&temp_dir).await;
        storage.put_many(&[(TOKEN_KEY, "tok-1")]).await.unwrap();

        let store = SessionStore::restore(storage).await;
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::restore(open_store(&temp_dir).await).await;
        let mut rx = store.subscribe();

        store
            .establish(Session::new(7, "Ivan"), AuthToken::new("tok-1"))
            .await
            .unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().session.id, 7);

        store.clear().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}
