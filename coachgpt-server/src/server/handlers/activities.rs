use axum::{
    extract::{Query, State},
    Json,
};
use strava_api::Request;
use tracing::Instrument;

use crate::server::{
    error::ServerError,
    models::{ActivitiesParams, ActivitiesResponse, FormattedActivity},
    AppState,
};

/// Number of most recent activities returned per call.
pub const ACTIVITY_PAGE_SIZE: u32 = 3;

pub async fn list_activities(
    State(state): State<AppState>,
    Query(params): Query<ActivitiesParams>,
) -> Result<Json<ActivitiesResponse>, ServerError> {
    let email = params
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| {
            tracing::warn!("Activities requested without email");
            ServerError::BadRequest("Missing email".to_string())
        })?;

    let span = tracing::info_span!("list_activities", email = %email);

    fetch_recent_activities(&state, &email)
        .instrument(span)
        .await
        .map(Json)
}

async fn fetch_recent_activities(
    state: &AppState,
    email: &str,
) -> Result<ActivitiesResponse, ServerError> {
    let record = state
        .credential_store
        .find_by_email(email)
        .await
        .inspect_err(|err| tracing::error!(error = %err, "Failed to load stored credentials"))?
        .ok_or_else(|| {
            tracing::warn!("No stored credentials for email");
            ServerError::NotFound("User not found or incorrect identifier.".to_string())
        })?;

    let client =
        strava_api::Client::with_base_url(&state.strava_api_base_url, &record.access_token);
    let request = Request::activities().list().per_page(ACTIVITY_PAGE_SIZE);

    let activities = client.send(request).await.inspect_err(|err| {
        tracing::error!(status = ?err.status(), error = %err, "Failed to fetch Strava activities")
    })?;

    if activities.is_empty() {
        tracing::info!("No activities found");
        return Ok(ActivitiesResponse::empty());
    }

    let formatted: Vec<FormattedActivity> = activities
        .into_iter()
        .take(ACTIVITY_PAGE_SIZE as usize)
        .map(FormattedActivity::from)
        .collect();

    tracing::info!(count = formatted.len(), "Activities fetched");

    Ok(ActivitiesResponse::found(formatted))
}
