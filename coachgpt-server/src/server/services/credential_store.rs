use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

use crate::server::models::CredentialRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Data store returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("More than one credential record for {0}")]
    Duplicate(String),
}

/// Persistence for credential records, keyed by email.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert the record, or overwrite the existing one with the same email.
    async fn upsert(&self, record: &CredentialRecord) -> Result<(), StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, StoreError>;
}

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<String, CredentialRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        tracing::warn!("Using in-memory credential store, tokens will not survive a restart");
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn upsert(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        self.records.insert(record.email.clone(), record.clone());
        tracing::debug!(email = %record.email, "Stored credentials");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, StoreError> {
        Ok(self.records.get(email).map(|r| r.clone()))
    }
}
