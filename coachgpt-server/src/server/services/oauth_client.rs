use chrono::{DateTime, Utc};
use oauth2::{
    basic::{
        BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
        BasicTokenType,
    },
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet,
    EndpointSet, ExtraTokenFields, HttpRequest, HttpResponse, RedirectUrl, Scope,
    StandardRevocableToken, StandardTokenResponse, TokenResponse, TokenUrl,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strava_api::endpoints::athlete::SummaryAthlete;

use crate::server::config::StravaConfiguration;
use crate::server::error::ServerError;

const SCOPES: &str = "read,activity:read_all";

/// Fields Strava adds to the standard token response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StravaTokenFields {
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub athlete: Option<SummaryAthlete>,
}

impl ExtraTokenFields for StravaTokenFields {}

type StravaTokenResponse = StandardTokenResponse<StravaTokenFields, BasicTokenType>;

type StravaOAuth2Client = oauth2::Client<
    BasicErrorResponse,
    StravaTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Result of a successful authorization code exchange.
#[derive(Debug, Clone)]
pub struct StravaTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub athlete: SummaryAthlete,
}

async fn execute(
    http_client: reqwest::Client,
    request: HttpRequest,
) -> Result<HttpResponse, reqwest::Error> {
    let mut builder = http_client
        .request(request.method().clone(), request.uri().to_string())
        .body(request.body().clone());

    for (name, value) in request.headers() {
        builder = builder.header(name.as_str(), value.as_bytes());
    }

    let response = builder.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    let mut http_response = HttpResponse::new(body);
    *http_response.status_mut() = status;
    *http_response.headers_mut() = headers;

    Ok(http_response)
}

pub struct OAuthClient {
    client: StravaOAuth2Client,
    http_client: reqwest::Client,
}

impl OAuthClient {
    pub fn new(config: &StravaConfiguration, timeout: Duration) -> Result<Self, ServerError> {
        let auth_url = AuthUrl::new(config.authorize_url.clone())
            .map_err(|e| ServerError::Configuration(format!("Invalid auth URL: {}", e)))?;

        let token_url = TokenUrl::new(config.token_url.clone())
            .map_err(|e| ServerError::Configuration(format!("Invalid token URL: {}", e)))?;

        let redirect_url = RedirectUrl::new(config.redirect_uri.clone())
            .map_err(|e| ServerError::Configuration(format!("Invalid redirect URI: {}", e)))?;

        // Strava expects the client credentials as form fields, not basic auth.
        let client_id = ClientId::new(config.client_id.clone());
        let client: StravaOAuth2Client = oauth2::Client::new(client_id)
            .set_client_secret(ClientSecret::new(
                config.client_secret.expose_secret().to_string(),
            ))
            .set_auth_type(AuthType::RequestBody)
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url);

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ServerError::Configuration(format!("Invalid HTTP client: {}", e)))?;

        Ok(Self {
            client,
            http_client,
        })
    }

    /// Strava authorization page the athlete is sent to.
    ///
    /// The random `state` is required by `oauth2` but is not kept, and the
    /// callback does not check it.
    pub fn build_authorization_url(&self) -> String {
        let (auth_url, _) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new(SCOPES.to_string()))
            .add_extra_param("approval_prompt", "auto")
            .url();
        auth_url.to_string()
    }

    /// Exchange authorization code for tokens and the authenticated athlete
    pub async fn exchange_code_for_token(&self, code: &str) -> Result<StravaTokens, ServerError> {
        let http_client = self.http_client.clone();
        let send = move |request: HttpRequest| execute(http_client.clone(), request);

        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&send)
            .await?;

        let access_token = token_result.access_token().secret().to_string();
        let refresh_token = token_result
            .refresh_token()
            .ok_or_else(|| ServerError::OAuthError("No refresh token in response".to_string()))?
            .secret()
            .to_string();

        let extra = token_result.extra_fields();

        let expires_at = match (extra.expires_at, token_result.expires_in()) {
            (Some(timestamp), _) => DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
                ServerError::OAuthError(format!("Invalid expiration time: {}", timestamp))
            })?,
            (None, Some(expires_in)) => Utc::now() + expires_in,
            (None, None) => {
                return Err(ServerError::OAuthError(
                    "No expiration time in response".to_string(),
                ))
            }
        };

        let athlete = extra
            .athlete
            .clone()
            .ok_or_else(|| ServerError::OAuthError("No athlete in response".to_string()))?;

        tracing::debug!(
            athlete_id = athlete.id,
            "Successfully exchanged code for tokens, expires_at: {}",
            expires_at
        );

        Ok(StravaTokens {
            access_token,
            refresh_token,
            expires_at,
            athlete,
        })
    }
}
