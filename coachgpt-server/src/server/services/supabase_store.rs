use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use super::credential_store::{CredentialStore, StoreError};
use crate::server::models::CredentialRecord;

pub const TABLE: &str = "users_tokens";
const COLUMNS: &str = "email,access_token,refresh_token,expires_at";

/// `users_tokens` table behind Supabase's PostgREST interface.
pub struct SupabaseStore {
    http_client: Client,
    table_url: String,
    key: SecretString,
}

impl SupabaseStore {
    pub fn new(url: &str, key: &SecretString, timeout: Duration) -> Result<Self, StoreError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        let table_url = format!("{}/rest/v1/{}", url.trim_end_matches('/'), TABLE);

        tracing::info!(table = TABLE, "Supabase credential store initialized");

        Ok(Self {
            http_client,
            table_url,
            key: SecretString::from(key.expose_secret().to_string()),
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let key = self.key.expose_secret();
        builder.header("apikey", key).bearer_auth(key)
    }
}

async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status { status, body })
}

#[async_trait]
impl CredentialStore for SupabaseStore {
    async fn upsert(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        let response = self
            .authorized(self.http_client.post(&self.table_url))
            .query(&[("on_conflict", "email")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(record)
            .send()
            .await?;

        ensure_success(response).await?;

        tracing::debug!(email = %record.email, "Upserted credentials");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, StoreError> {
        let filter = format!("eq.{}", email);
        let response = self
            .authorized(self.http_client.get(&self.table_url))
            .query(&[("select", COLUMNS), ("email", filter.as_str())])
            .send()
            .await?;

        let mut rows: Vec<CredentialRecord> = ensure_success(response).await?.json().await?;

        match rows.len() {
            0 | 1 => Ok(rows.pop()),
            _ => Err(StoreError::Duplicate(email.to_string())),
        }
    }
}
