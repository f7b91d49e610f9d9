pub mod server;

pub use server::{router, AppState, Configuration, ServerError};
