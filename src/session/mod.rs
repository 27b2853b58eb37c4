//! Persisted session access.
//!
//! The session is two entries in a key/value store: `token` (bearer token) and
//! `user` (JSON-serialized [`UserRecord`]). Everything that needs identity or role
//! goes through a [`SessionProvider`] instead of touching storage directly.

pub mod store;

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::StorageError;
use crate::types::{Session, UserRecord};

pub use store::{FileStore, KeyValueStore, MemoryStore};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Notification sent after the persisted session changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Updated,
    Cleared,
}

/// get/set/clear/on-change contract over the persisted session
pub trait SessionProvider: Send + Sync {
    /// Stored bearer token, if any
    fn token(&self) -> Option<String>;

    /// Stored user entry, unparsed
    fn user_raw(&self) -> Option<String>;

    /// Persist both entries and notify subscribers
    fn set(&self, session: &Session) -> Result<(), StorageError>;

    /// Remove both entries and notify subscribers
    fn clear(&self) -> Result<(), StorageError>;

    /// Best-effort change notifications; lagging receivers simply miss events
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;

    /// Both entries present (no validity or expiry check)
    fn is_present(&self) -> bool {
        self.token().is_some() && self.user_raw().is_some()
    }

    /// Parsed session, `None` when either entry is missing or the user is unreadable
    fn get(&self) -> Option<Session> {
        let token = self.token()?;
        let raw = self.user_raw()?;
        match serde_json::from_str::<UserRecord>(&raw) {
            Ok(user) => Some(Session { token, user }),
            Err(e) => {
                tracing::warn!("Error parsing user data: {}", e);
                None
            }
        }
    }
}

/// [`SessionProvider`] backed by any [`KeyValueStore`]
pub struct StorageSessionProvider<S: KeyValueStore> {
    store: S,
    events: broadcast::Sender<SessionEvent>,
}

impl<S: KeyValueStore> StorageSessionProvider<S> {
    pub fn new(store: S) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { store, events }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read '{}' from session storage: {}", key, e);
                None
            }
        }
    }

    fn notify(&self, event: SessionEvent) {
        // No receivers is fine; nobody is listening for changes.
        let _ = self.events.send(event);
    }
}

impl StorageSessionProvider<FileStore> {
    /// Provider over the configured on-disk location
    pub fn from_config() -> Result<Self, StorageError> {
        Ok(Self::new(FileStore::from_config()?))
    }
}

impl StorageSessionProvider<MemoryStore> {
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: KeyValueStore> SessionProvider for StorageSessionProvider<S> {
    fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY)
    }

    fn user_raw(&self) -> Option<String> {
        self.read(USER_KEY)
    }

    fn set(&self, session: &Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(&session.user)?;
        self.store.set(TOKEN_KEY, &session.token)?;
        self.store.set(USER_KEY, &user)?;
        self.notify(SessionEvent::Updated);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        // Attempt both removals before reporting a failure.
        let token = self.store.remove(TOKEN_KEY);
        let user = self.store.remove(USER_KEY);
        self.notify(SessionEvent::Cleared);
        token.and(user)
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl<P: SessionProvider + ?Sized> SessionProvider for Arc<P> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }

    fn user_raw(&self) -> Option<String> {
        (**self).user_raw()
    }

    fn set(&self, session: &Session) -> Result<(), StorageError> {
        (**self).set(session)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        (**self).subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn session(role: Role) -> Session {
        Session {
            token: "tok".to_string(),
            user: UserRecord::new("alice", role),
        }
    }

    #[test]
    fn set_then_get_returns_session() {
        let provider = StorageSessionProvider::in_memory();
        provider.set(&session(Role::Manager)).unwrap();

        let stored = provider.get().unwrap();
        assert_eq!(stored.token, "tok");
        assert_eq!(stored.user.username, "alice");
        assert!(provider.is_present());
    }

    #[test]
    fn clear_removes_both_entries_and_notifies() {
        let provider = StorageSessionProvider::in_memory();
        provider.set(&session(Role::Admin)).unwrap();
        let mut rx = provider.subscribe();

        provider.clear().unwrap();

        assert!(provider.store().is_empty());
        assert!(!provider.is_present());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Cleared);
    }

    #[test]
    fn corrupted_user_is_not_a_session() {
        let provider = StorageSessionProvider::in_memory();
        provider.store().set(TOKEN_KEY, "tok").unwrap();
        provider.store().set(USER_KEY, "{not json").unwrap();

        // Presence only looks at the entries, parsing is separate
        assert!(provider.is_present());
        assert!(provider.get().is_none());
    }

    #[test]
    fn empty_entries_count_as_missing() {
        let provider = StorageSessionProvider::in_memory();
        provider.store().set(TOKEN_KEY, "").unwrap();
        provider.store().set(USER_KEY, "{}").unwrap();
        assert!(!provider.is_present());
    }
}
