mod credential;
mod requests;

pub use credential::{CredentialRecord, FALLBACK_EMAIL_DOMAIN};
pub use requests::*;
