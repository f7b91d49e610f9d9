use serde::{Deserialize, Serialize};

/// Athlete as returned alongside OAuth tokens.
///
/// `email` is only present when the application was granted the
/// `profile:read_all` scope and the athlete shared it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryAthlete {
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl SummaryAthlete {
    /// The shared email, ignoring blank values.
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}
