/// Credential storage
///
/// [`CredentialStore`] is the seam handlers depend on; [`InMemoryCredentialStore`]
/// keeps identities for the lifetime of the process behind a single
/// reader/writer lock.
use crate::error::{IdentityError, Result};
use crate::models::Credential;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a copy of `credential`
    ///
    /// Fails with `IdentityError::UsernameAlreadyExists` if the username is taken.
    async fn save(&self, credential: &Credential) -> Result<()>;

    /// Copy of the credential stored for `username`, `None` if absent
    async fn find(&self, username: &str) -> Result<Option<Credential>>;
}

#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn save(&self, credential: &Credential) -> Result<()> {
        let mut users = self.users.write().await;

        if users.contains_key(&credential.username) {
            return Err(IdentityError::UsernameAlreadyExists(
                credential.username.clone(),
            ));
        }

        users.insert(credential.username.clone(), credential.clone());
        debug!(username = %credential.username, role = %credential.role, "Credential saved");
        Ok(())
    }

    async fn find(&self, username: &str) -> Result<Option<Credential>> {
        Ok(self.users.read().await.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn credential(username: &str, role: &str) -> Credential {
        Credential {
            username: username.to_string(),
            password_hash: format!("hash-of-{username}"),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_then_find() {
        let store = InMemoryCredentialStore::new();
        store.save(&credential("admin1", "admin")).await.unwrap();

        let found = store.find("admin1").await.unwrap().unwrap();
        assert_eq!(found, credential("admin1", "admin"));
    }

    #[tokio::test]
    async fn test_find_missing_is_none() {
        let store = InMemoryCredentialStore::new();
        assert!(store.find("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let store = InMemoryCredentialStore::new();
        store.save(&credential("admin1", "admin")).await.unwrap();

        let err = store
            .save(&credential("admin1", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::UsernameAlreadyExists(name) if name == "admin1"));

        // original record untouched
        let found = store.find("admin1").await.unwrap().unwrap();
        assert_eq!(found.role, "admin");
    }

    #[tokio::test]
    async fn test_returned_copy_is_independent() {
        let store = InMemoryCredentialStore::new();
        let mut original = credential("user1", "user");
        store.save(&original).await.unwrap();

        // mutating the caller's value after save
        original.role = "admin".to_string();
        // mutating a value returned by find
        let mut found = store.find("user1").await.unwrap().unwrap();
        found.role = "admin".to_string();

        let again = store.find("user1").await.unwrap().unwrap();
        assert_eq!(again.role, "user");
    }

    #[tokio::test]
    async fn test_concurrent_saves_of_same_username() {
        let store = Arc::new(InMemoryCredentialStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .save(&credential("racer", &format!("role-{i}")))
                        .await
                        .is_ok()
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.len().await, 1);
    }
}
