use serde::{Deserialize, Serialize};
use strava_api::endpoints::athlete::SummaryAthlete;

/// Domain used to synthesize an identifier for athletes that do not share an email.
pub const FALLBACK_EMAIL_DOMAIN: &str = "coachgpt.app";

/// Row of the `users_tokens` table. `email` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Epoch seconds. Stored as received, never checked before use.
    pub expires_at: i64,
}

impl CredentialRecord {
    /// The identifier a record for `athlete` is stored under.
    pub fn identifier_for(athlete: &SummaryAthlete) -> String {
        match athlete.email() {
            Some(email) => email.to_string(),
            None => format!("user-{}@{}", athlete.id, FALLBACK_EMAIL_DOMAIN),
        }
    }
}
