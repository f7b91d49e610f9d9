use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strava_api::endpoints::activities::SummaryActivity;

// GET /auth/strava/callback
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    /// Set by Strava when the athlete denies access
    pub error: Option<String>,
    /// Scopes actually granted by the athlete
    pub scope: Option<String>,
}

// GET /strava/activities
#[derive(Debug, Deserialize)]
pub struct ActivitiesParams {
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedActivity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub distance: f64,
    pub moving_time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
}

impl From<SummaryActivity> for FormattedActivity {
    fn from(activity: SummaryActivity) -> Self {
        Self {
            name: activity.name,
            distance: activity.distance,
            moving_time: activity.moving_time,
            start_date: activity.start_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivitiesResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<FormattedActivity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActivitiesResponse {
    pub fn found(activities: Vec<FormattedActivity>) -> Self {
        Self {
            success: true,
            activities: Some(activities),
            error: None,
        }
    }

    /// The athlete exists but Strava returned no activities.
    pub fn empty() -> Self {
        Self {
            success: false,
            activities: None,
            error: Some("No activities found for this user.".to_string()),
        }
    }
}
