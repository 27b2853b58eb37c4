//! Session fixtures for unit tests.

use std::sync::Arc;

use crate::session::{KeyValueStore, MemoryStore, SessionProvider, StorageSessionProvider, TOKEN_KEY, USER_KEY};
use crate::types::{Role, Session, UserRecord};

pub type TestProvider = Arc<StorageSessionProvider<MemoryStore>>;

/// Signed-in provider whose user has `role`
pub fn session_for(role: Role) -> TestProvider {
    let provider = StorageSessionProvider::in_memory();
    provider
        .set(&Session {
            token: format!("token-{}", role.as_str().to_lowercase()),
            user: UserRecord::new(format!("{}-user", role.as_str().to_lowercase()), role),
        })
        .expect("memory store never fails");
    Arc::new(provider)
}

/// Provider with a token and a `user` entry that is not valid JSON
pub fn corrupted_session() -> TestProvider {
    raw_session("tok", "{not json")
}

/// Provider holding exactly these raw entries
pub fn raw_session(token: &str, user: &str) -> TestProvider {
    let provider = StorageSessionProvider::in_memory();
    provider.store().set(TOKEN_KEY, token).expect("memory store never fails");
    provider.store().set(USER_KEY, user).expect("memory store never fails");
    Arc::new(provider)
}
