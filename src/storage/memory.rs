use super::{CredentialStore, PersistenceError, StoreFuture};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process store with the same unique-email rule as the `users` table.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credentials: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, email: &str) -> Option<String> {
        self.credentials.read().await.get(email).cloned()
    }

    pub async fn len(&self) -> usize {
        self.credentials.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.credentials.read().await.is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save<'a>(
        &'a self,
        email: &'a str,
        encoded_hash: &'a str,
    ) -> StoreFuture<'a, Result<(), PersistenceError>> {
        Box::pin(async move {
            let mut credentials = self.credentials.write().await;
            if credentials.contains_key(email) {
                return Err(PersistenceError::DuplicateEmail);
            }
            credentials.insert(email.to_string(), encoded_hash.to_string());
            Ok(())
        })
    }

    fn ping(&self) -> StoreFuture<'_, Result<(), PersistenceError>> {
        Box::pin(async { Ok(()) })
    }
}
