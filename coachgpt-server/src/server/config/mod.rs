use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Flat variable names accepted for compatibility with existing deployments.
/// They take precedence over `config.toml` and `COACHGPT__*` variables.
const LEGACY_ENVIRONMENT: &[(&str, &str)] = &[
    ("strava.client_id", "STRAVA_CLIENT_ID"),
    ("strava.client_secret", "STRAVA_CLIENT_SECRET"),
    ("store.url", "SUPABASE_URL"),
    ("store.key", "SUPABASE_KEY"),
    ("server.port", "PORT"),
];

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Missing required setting `{key}` (set {hint})")]
    Missing {
        key: &'static str,
        hint: &'static str,
    },

    #[error("Invalid URL for `{key}`: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub server: ServerConfiguration,

    #[serde(default)]
    pub strava: StravaConfiguration,

    #[serde(default)]
    pub store: StoreConfiguration,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfiguration {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Applied to token exchange and data store requests.
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
pub struct StravaConfiguration {
    #[serde(default)]
    pub client_id: String,

    #[serde(default = "empty_secret")]
    pub client_secret: SecretString,

    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Supabase,
    Memory,
}

#[derive(Debug, Deserialize, Default)]
pub struct StoreConfiguration {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Supabase project URL, e.g. `https://abcd.supabase.co`
    pub url: Option<String>,

    pub key: Option<SecretString>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upstream_timeout() -> u64 {
    30
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn default_redirect_uri() -> String {
    "http://localhost:3000/auth/strava/callback".to_string()
}

fn default_authorize_url() -> String {
    "https://www.strava.com/oauth/authorize".to_string()
}

fn default_token_url() -> String {
    "https://www.strava.com/oauth/token".to_string()
}

fn default_api_base_url() -> String {
    strava_api::BASE_URL.to_string()
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upstream_timeout_seconds: default_upstream_timeout(),
        }
    }
}

impl Default for StravaConfiguration {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: empty_secret(),
            redirect_uri: default_redirect_uri(),
            authorize_url: default_authorize_url(),
            token_url: default_token_url(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl Configuration {
    /// Load from `config.toml`, `COACHGPT__*` variables and the legacy flat
    /// variables, then validate.
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::load(Path::new("config.toml"))
    }

    /// Same layering as [`Configuration::new`] with the file source read from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let mut builder = config::Config::builder();

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(config::Environment::with_prefix("COACHGPT").separator("__"));

        for (key, variable) in LEGACY_ENVIRONMENT {
            builder = builder.set_override_option(*key, std::env::var(variable).ok())?;
        }

        Self::from_config(builder.build()?)
    }

    pub fn from_config(config: config::Config) -> Result<Self, ConfigurationError> {
        let configuration: Self = config.try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        require(&self.strava.client_id, "strava.client_id", "STRAVA_CLIENT_ID")?;
        require(
            self.strava.client_secret.expose_secret(),
            "strava.client_secret",
            "STRAVA_CLIENT_SECRET",
        )?;

        parse_url(&self.strava.redirect_uri, "strava.redirect_uri")?;
        parse_url(&self.strava.authorize_url, "strava.authorize_url")?;
        parse_url(&self.strava.token_url, "strava.token_url")?;
        parse_url(&self.strava.api_base_url, "strava.api_base_url")?;

        if self.store.backend == StoreBackend::Supabase {
            let url = self.store.url.as_deref().unwrap_or_default();
            require(url, "store.url", "SUPABASE_URL")?;
            parse_url(url, "store.url")?;

            let key = self
                .store
                .key
                .as_ref()
                .map(|key| key.expose_secret())
                .unwrap_or_default();
            require(key, "store.key", "SUPABASE_KEY")?;
        }

        Ok(())
    }
}

fn require(value: &str, key: &'static str, hint: &'static str) -> Result<(), ConfigurationError> {
    if value.trim().is_empty() {
        return Err(ConfigurationError::Missing { key, hint });
    }
    Ok(())
}

fn parse_url(value: &str, key: &'static str) -> Result<Url, ConfigurationError> {
    Url::parse(value).map_err(|source| ConfigurationError::InvalidUrl { key, source })
}
