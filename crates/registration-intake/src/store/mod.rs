//! Registration persistence.
//!
//! The backing store is reached through [`Store`], a process-wide handle that
//! connects on first use and keeps the connection for the life of the
//! process. A failed connection attempt is not cached; the next request
//! tries again.

mod memory;
mod mongo;

pub use memory::{MemoryStore, StoredRegistration};
pub use mongo::MongoStore;

use crate::config::DatabaseConfig;
use crate::registration::Registration;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MONGODB_URI is not configured")]
    NotConfigured,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Backend(String),
}

/// A collection of registration records, unique by email.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Whether a record with this (normalized) email exists.
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    /// Insert a new record and return its identifier.
    ///
    /// Fails with [`StoreError::DuplicateEmail`] if the email is taken, even
    /// when a prior [`email_exists`](Self::email_exists) check passed.
    async fn insert(&self, registration: &Registration) -> Result<String, StoreError>;

    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Lazily-connected handle to the registration store.
pub struct Store {
    config: Option<DatabaseConfig>,
    backend: OnceCell<Arc<dyn RegistrationStore>>,
}

impl Store {
    /// Create a handle that connects to MongoDB on first use.
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config: Some(config),
            backend: OnceCell::new(),
        }
    }

    /// Create a handle over an in-memory store (no persistence).
    pub fn memory() -> Self {
        Self::with_backend(Arc::new(MemoryStore::new()))
    }

    /// Create a handle over an already-initialized backend.
    pub fn with_backend(backend: Arc<dyn RegistrationStore>) -> Self {
        Self {
            config: None,
            backend: OnceCell::from(backend),
        }
    }

    /// Whether the backend has been initialized.
    pub fn is_connected(&self) -> bool {
        self.backend.initialized()
    }

    /// Get the backend, connecting if this is the first use.
    pub async fn get(&self) -> Result<&Arc<dyn RegistrationStore>, StoreError> {
        self.backend
            .get_or_try_init(|| async {
                let config = self.config.as_ref().ok_or(StoreError::NotConfigured)?;
                debug!(database = %config.name, "Connecting to registration store");
                let store = MongoStore::connect(config).await?;
                info!(
                    database = %config.name,
                    collection = %config.collection,
                    "Connected to registration store"
                );
                Ok::<_, StoreError>(Arc::new(store) as Arc<dyn RegistrationStore>)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_handle_is_ready() {
        let store = Store::memory();
        assert!(store.is_connected());
        assert!(store.get().await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_uri_is_not_configured() {
        let store = Store::new(DatabaseConfig::default());

        let result = store.get().await;
        assert!(matches!(result, Err(StoreError::NotConfigured)));

        // Failure is not cached as a connection
        assert!(!store.is_connected());
    }
}
