//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds configuration and the root `ApiClient`. The root client never
//! carries a bearer; each request gets a detached copy through `session`.

use std::sync::Arc;

use axum_extra::extract::cookie::CookieJar;

use crate::config::AppConfig;
use crate::net::api::ApiClient;
use crate::session::{SessionCookies, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    api: ApiClient,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialization failure).
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let api = ApiClient::new(http, &config.api_url);
        Ok(Self { config: Arc::new(config), api })
    }

    /// Client without credentials, for calls made before sign-in.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// A session store bound to this request's cookies.
    #[must_use]
    pub fn session(&self, jar: CookieJar) -> SessionStore {
        SessionStore::new(self.api.detached(), SessionCookies::new(jar, self.config.cookie_secure))
    }
}
