//! In-memory registration store.

use super::{RegistrationStore, StoreError};
use crate::registration::Registration;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A stored record with its assigned identifier.
#[derive(Debug, Clone)]
pub struct StoredRegistration {
    pub id: String,
    pub registration: Registration,
}

/// Registration records held in process memory, indexed by email.
///
/// Enforces the same email uniqueness as the MongoDB collection. Data is
/// lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, StoredRegistration>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a record by email.
    pub async fn get(&self, email: &str) -> Option<StoredRegistration> {
        self.records.read().await.get(email).cloned()
    }

    /// Number of stored records.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.records.read().await.contains_key(email))
    }

    async fn insert(&self, registration: &Registration) -> Result<String, StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&registration.email) {
            return Err(StoreError::DuplicateEmail(registration.email.clone()));
        }

        let id = ObjectId::new().to_hex();
        records.insert(
            registration.email.clone(),
            StoredRegistration {
                id: id.clone(),
                registration: registration.clone(),
            },
        );
        Ok(id)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{ClientMetadata, Profession, ValidRegistration};

    fn registration(email: &str) -> Registration {
        Registration::new(
            ValidRegistration {
                name: "João Lima".into(),
                profession: Profession::Builder,
                specialties: vec![],
                company: String::new(),
                phone: "11987654321".into(),
                email: email.into(),
                city: "Recife".into(),
            },
            ClientMetadata {
                ip: "127.0.0.1".into(),
                user_agent: "test".into(),
            },
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        assert!(!store.email_exists("joao@example.com").await.unwrap());

        let id = store.insert(&registration("joao@example.com")).await.unwrap();
        assert_eq!(id.len(), 24);

        assert!(store.email_exists("joao@example.com").await.unwrap());
        let stored = store.get("joao@example.com").await.unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.registration.city, "Recife");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.insert(&registration("joao@example.com")).await.unwrap();

        let result = store.insert(&registration("joao@example.com")).await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail(email)) if email == "joao@example.com"));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_emails() {
        let store = MemoryStore::new();
        let first = store.insert(&registration("a@example.com")).await.unwrap();
        let second = store.insert(&registration("b@example.com")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.count().await, 2);
    }
}
