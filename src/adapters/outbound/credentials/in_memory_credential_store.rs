use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{domain::errors::StoreResult, ports::credentials::CredentialStore};

/// In-memory implementation of the credential store port for testing and
/// development. OS keychain backends implement the same port out of tree.
pub struct InMemoryCredentialStore {
    service: String,
    records: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryCredentialStore {
    /// `service` is the namespace, normally derived from the host
    /// application's name.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records held, across all accounts.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    fn service(&self) -> &str {
        &self.service
    }

    async fn load(&self, account: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.records.read().await.get(account).cloned())
    }

    async fn store(&self, account: &str, record: &[u8]) -> StoreResult<()> {
        self.records
            .write()
            .await
            .insert(account.to_string(), record.to_vec());
        Ok(())
    }

    async fn remove(&self, account: &str) -> StoreResult<()> {
        self.records.write().await.remove(account);
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        self.records.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_load_remove() {
        let store = InMemoryCredentialStore::new("app.test");
        assert_eq!(store.service(), "app.test");

        store.store("user", b"record").await.unwrap();
        assert_eq!(store.load("user").await.unwrap(), Some(b"record".to_vec()));

        store.remove("user").await.unwrap();
        assert_eq!(store.load("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_empties_namespace() {
        let store = InMemoryCredentialStore::new("app.test");
        store.store("a", b"1").await.unwrap();
        store.store("b", b"2").await.unwrap();

        store.clear().await.unwrap();
        assert!(store.is_empty().await);
    }
}
