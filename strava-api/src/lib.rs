pub mod endpoints;
mod error;
mod macros;
pub mod repositories;

pub use crate::error::{Fault, FaultError, StravaApiError};
use repositories::*;
use tower_api_client::{Client as ApiClient, Request as ApiRequest};

pub const BASE_URL: &str = "https://www.strava.com/api/v3";

pub struct Client {
    inner: ApiClient,
}

impl Client {
    pub fn new(access_token: &str) -> Self {
        Self::with_base_url(BASE_URL, access_token)
    }

    /// Target a different API root, e.g. a local stub or a proxy.
    pub fn with_base_url(base_url: &str, access_token: &str) -> Self {
        Self {
            inner: ApiClient::new(base_url.trim_end_matches('/')).bearer_auth(access_token),
        }
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, StravaApiError>
    where
        R: ApiRequest,
    {
        self.inner.send(request).await.map_err(From::from)
    }
}

pub struct Request;

impl Request {
    pub fn activities() -> ActivityRepository {
        ActivityRepository::new()
    }
}
