mod activities;
mod callback;
mod connect;

pub use activities::list_activities;
pub use callback::oauth_callback;
pub use connect::connect_strava;

pub const BANNER: &str = "CoachGPT backend connected to Strava + Supabase!";

pub async fn health_check() -> &'static str {
    BANNER
}
