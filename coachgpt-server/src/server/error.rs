use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use strava_api::StravaApiError;
use thiserror::Error;

use crate::server::services::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("OAuth error: {0}")]
    OAuthError(String),

    #[error("Strava API error: {0}")]
    Provider(#[from] StravaApiError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::OAuthError(_)
            | ServerError::Provider(_)
            | ServerError::Store(_)
            | ServerError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller. Upstream details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::BadRequest(msg) | ServerError::NotFound(msg) => msg.clone(),
            ServerError::OAuthError(_) => "Failed to connect to Strava".to_string(),
            ServerError::Provider(_) => "Failed to fetch Strava activities.".to_string(),
            ServerError::Store(_) => "Failed to access stored credentials.".to_string(),
            ServerError::Configuration(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.public_message(),
        }));

        (self.status(), body).into_response()
    }
}

impl
    From<
        oauth2::RequestTokenError<
            reqwest::Error,
            oauth2::StandardErrorResponse<oauth2::basic::BasicErrorResponseType>,
        >,
    > for ServerError
{
    fn from(
        err: oauth2::RequestTokenError<
            reqwest::Error,
            oauth2::StandardErrorResponse<oauth2::basic::BasicErrorResponseType>,
        >,
    ) -> Self {
        let detail = match err {
            oauth2::RequestTokenError::ServerResponse(response) => response.to_string(),
            oauth2::RequestTokenError::Parse(parse_error, body) => format!(
                "{}: {}",
                parse_error,
                String::from_utf8_lossy(&body)
            ),
            other => other.to_string(),
        };
        ServerError::OAuthError(format!("Token request failed: {}", detail))
    }
}
