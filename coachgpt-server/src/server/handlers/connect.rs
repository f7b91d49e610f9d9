use axum::{extract::State, response::Redirect};

use crate::server::AppState;

pub async fn connect_strava(State(state): State<AppState>) -> Redirect {
    let auth_url = state.oauth_client.build_authorization_url();

    tracing::debug!("Redirecting to Strava authorization");

    Redirect::to(&auth_url)
}
