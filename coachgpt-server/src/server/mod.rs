pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use self::config::Configuration;
pub use error::ServerError;

use axum::{routing::get, Router};
use self::config::StoreBackend;
use services::{CredentialStore, MemoryStore, OAuthClient, SupabaseStore};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub credential_store: Arc<dyn CredentialStore>,
    pub oauth_client: Arc<OAuthClient>,
    pub strava_api_base_url: Arc<str>,
}

impl AppState {
    /// Build the state with the store selected by the configuration
    pub fn new(configuration: &Configuration) -> Result<Self, ServerError> {
        let credential_store: Arc<dyn CredentialStore> = match configuration.store.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Supabase => {
                let (Some(url), Some(key)) = (&configuration.store.url, &configuration.store.key)
                else {
                    return Err(ServerError::Configuration(
                        "Supabase store requires a URL and a key".to_string(),
                    ));
                };
                Arc::new(SupabaseStore::new(
                    url,
                    key,
                    upstream_timeout(configuration),
                )?)
            }
        };

        Self::with_store(configuration, credential_store)
    }

    pub fn with_store(
        configuration: &Configuration,
        credential_store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ServerError> {
        let oauth_client = Arc::new(OAuthClient::new(
            &configuration.strava,
            upstream_timeout(configuration),
        )?);

        Ok(Self {
            credential_store,
            oauth_client,
            strava_api_base_url: configuration.strava.api_base_url.as_str().into(),
        })
    }
}

fn upstream_timeout(configuration: &Configuration) -> Duration {
    Duration::from_secs(configuration.server.upstream_timeout_seconds)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health_check))
        .route("/auth/strava", get(handlers::connect_strava))
        .route("/auth/strava/callback", get(handlers::oauth_callback))
        .route("/strava/activities", get(handlers::list_activities))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
