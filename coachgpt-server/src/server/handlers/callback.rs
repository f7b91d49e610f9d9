use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::Instrument;

use crate::server::{
    error::ServerError,
    models::{CallbackParams, CredentialRecord},
    AppState,
};

pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let span = tracing::info_span!("oauth_callback", scope = params.scope.as_deref());

    match connect_athlete(&state, params).instrument(span).await {
        Ok(identifier) => format!("Connected successfully for {}!", identifier).into_response(),
        Err(err) => failure(&err).into_response(),
    }
}

async fn connect_athlete(state: &AppState, params: CallbackParams) -> Result<String, ServerError> {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "Strava authorization denied");
        return Err(ServerError::BadRequest(
            "Strava authorization was not granted".to_string(),
        ));
    }

    let code = params
        .code
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("Missing authorization code".to_string()))?;

    let tokens = state
        .oauth_client
        .exchange_code_for_token(&code)
        .await
        .inspect_err(|err| tracing::error!(error = %err, "Strava token exchange failed"))?;

    let record = CredentialRecord {
        email: CredentialRecord::identifier_for(&tokens.athlete),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_at: tokens.expires_at.timestamp(),
    };

    state
        .credential_store
        .upsert(&record)
        .await
        .inspect_err(|err| {
            tracing::error!(email = %record.email, error = %err, "Failed to store tokens")
        })?;

    tracing::info!(
        email = %record.email,
        athlete_id = tokens.athlete.id,
        "Strava account connected"
    );

    Ok(record.email)
}

/// Plain text rendering; this page is shown directly in the athlete's browser.
fn failure(err: &ServerError) -> (StatusCode, String) {
    let message = match err {
        ServerError::BadRequest(msg) => msg.clone(),
        ServerError::Store(_) => "Failed to store tokens".to_string(),
        ServerError::OAuthError(_) | ServerError::Provider(_) => {
            "Failed to connect to Strava".to_string()
        }
        other => other.public_message(),
    };
    (err.status(), message)
}
