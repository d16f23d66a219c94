//! Process-local store used by tests and the `memory` backend.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::dao::{
    match_store::MatchStore,
    models::{MatchEntity, UserEntity},
    storage::{StorageError, StorageResult},
};

/// Store kept in process memory. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<InMemoryInner>,
}

#[derive(Default)]
struct InMemoryInner {
    current_match: RwLock<Option<MatchEntity>>,
    users: DashMap<String, UserEntity>,
    offline: AtomicBool,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every operation fails with [`StorageError::Unavailable`] while set.
    #[cfg(test)]
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Copy of the stored match, bypassing the outage switch.
    #[cfg(test)]
    pub async fn stored_match(&self) -> Option<MatchEntity> {
        self.inner.current_match.read().await.clone()
    }

    fn ensure_online(&self) -> StorageResult<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable(
                "in-memory store is offline".into(),
                io::Error::new(io::ErrorKind::NotConnected, "offline"),
            ));
        }
        Ok(())
    }
}

impl MatchStore for InMemoryStore {
    fn load_current_match(&self) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            Ok(store.inner.current_match.read().await.clone())
        })
    }

    fn save_current_match(&self, game: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            *store.inner.current_match.write().await = Some(game);
            Ok(())
        })
    }

    fn find_user(&self, username: String) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            Ok(store
                .inner
                .users
                .get(&username)
                .map(|entry| entry.value().clone()))
        })
    }

    fn insert_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            match store.inner.users.entry(user.username.clone()) {
                Entry::Occupied(_) => Err(StorageError::Conflict(format!(
                    "username `{}` already exists",
                    user.username
                ))),
                Entry::Vacant(slot) => {
                    slot.insert(user);
                    Ok(())
                }
            }
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_online() })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_online() })
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use uuid::Uuid;

    use super::*;

    fn user(username: &str) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: username.into(),
            password_hash: "$argon2id$stub".into(),
            created_at: SystemTime::now(),
        }
    }

    #[tokio::test]
    async fn second_user_with_same_name_conflicts() {
        let store = InMemoryStore::new();
        store.insert_user(user("ada@example.com")).await.unwrap();

        assert!(matches!(
            store.insert_user(user("ada@example.com")).await,
            Err(StorageError::Conflict(_))
        ));
        assert!(store.find_user("ada@example.com".into()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn offline_store_fails_every_operation() {
        let store = InMemoryStore::new();
        store.set_offline(true);

        assert!(store.health_check().await.is_err());
        assert!(store.load_current_match().await.is_err());
        assert!(store.find_user("ada@example.com".into()).await.is_err());

        store.set_offline(false);
        assert!(store.health_check().await.is_ok());
    }
}
