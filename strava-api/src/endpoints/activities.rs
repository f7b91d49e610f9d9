use super::MetaAthlete;
use crate::macros::setter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{Request, RequestData};

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryActivity {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub athlete: Option<MetaAthlete>,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: u64,
    /// Elapsed time in seconds
    #[serde(default)]
    pub elapsed_time: u64,
    /// Total elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: f64,
    #[serde(default)]
    pub sport_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Wall-clock start time in the athlete's timezone. Strava suffixes it with `Z` regardless.
    #[serde(default)]
    pub start_date_local: Option<String>,
}

// Requests

#[derive(Default, Debug, Clone, Serialize)]
pub struct ListActivities {
    #[serde(skip_serializing_if = "Option::is_none")]
    per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    /// Epoch seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<i64>,
    /// Epoch seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<i64>,
}

impl ListActivities {
    pub fn new() -> Self {
        Self::default()
    }

    setter!(opt per_page: u32);
    setter!(opt page: u32);

    pub fn before(mut self, before: DateTime<Utc>) -> Self {
        self.before = Some(before.timestamp());
        self
    }

    pub fn after(mut self, after: DateTime<Utc>) -> Self {
        self.after = Some(after.timestamp());
        self
    }
}

impl Request for ListActivities {
    type Data = Self;
    type Response = Vec<SummaryActivity>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/athlete/activities".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Query(self)
    }
}
