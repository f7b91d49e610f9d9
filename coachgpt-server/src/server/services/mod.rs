pub mod credential_store;
pub mod oauth_client;
pub mod supabase_store;

pub use credential_store::{CredentialStore, MemoryStore, StoreError};
pub use oauth_client::{OAuthClient, StravaTokens};
pub use supabase_store::SupabaseStore;
