use serde::{Deserialize, Serialize};
use tower_api_client::{Error as ApiError, StatusCode};

#[derive(Debug)]
pub enum StravaApiError {
    Strava(StatusCode, Fault),
    Internal(ApiError),
}

impl StravaApiError {
    /// HTTP status returned by Strava, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            StravaApiError::Strava(status, _) => Some(*status),
            StravaApiError::Internal(_) => None,
        }
    }
}

impl From<ApiError> for StravaApiError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::ClientError(status, detail) | ApiError::ServerError(status, detail) => {
                StravaApiError::Strava(status, Fault::from_body(&detail))
            }
            e => StravaApiError::Internal(e),
        }
    }
}

impl std::fmt::Display for StravaApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StravaApiError::Internal(e) => write!(f, "Internal error: {}", e),
            StravaApiError::Strava(status, fault) => write!(f, "({}) {}", status, fault),
        }
    }
}

impl std::error::Error for StravaApiError {}

/// Error body returned by the Strava API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fault {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<FaultError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultError {
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub code: String,
}

impl Fault {
    /// Decode a fault body. Anything that is not a Strava fault is kept verbatim as the message.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Fault {
            message: body.to_string(),
            errors: Vec::new(),
        })
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)?;
        for error in &self.errors {
            write!(f, "; {} {} {}", error.resource, error.field, error.code)?;
        }
        Ok(())
    }
}
