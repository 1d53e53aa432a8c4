//! Session store: sign-in, sign-out and rehydration.
//!
//! ARCHITECTURE
//! ============
//! One `SessionStore` is built per request from the browser's cookie jar and
//! a detached `ApiClient`. It is the only writer of the session cookies and
//! of the client's bearer header. Views read identity through `current()`
//! and call the backend through `api()`.
//!
//! TRADE-OFFS
//! ==========
//! Sign-out is local only. The backend has no revocation endpoint, so a
//! token stays valid server-side until it expires.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use super::cookies::SessionCookies;
use super::role::Role;
use super::snapshot::{SnapshotError, UserSnapshot};
use crate::net::api::{ApiClient, ApiError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The account's role does not match the login tab that was used.
    #[error("Access denied: this account is a {} account, use the {} tab.", .actual.tab_label(), .actual.tab_label())]
    AccessDenied { selected: Role, actual: Role },
    /// Bad credentials or any backend failure. The source is kept for logs
    /// and never shown to the user.
    #[error("Login failed. Check your email and password.")]
    AuthenticationFailed(#[source] ApiError),
    #[error("could not persist session: {0}")]
    Persist(#[from] SnapshotError),
}

/// Credentials plus the login tab the user picked.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug)]
pub struct SessionStore {
    api: ApiClient,
    cookies: SessionCookies,
    user: Option<UserSnapshot>,
}

impl SessionStore {
    #[must_use]
    pub fn new(api: ApiClient, cookies: SessionCookies) -> Self {
        Self { api, cookies, user: None }
    }

    #[must_use]
    pub fn current(&self) -> Option<&UserSnapshot> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Client that carries this session's bearer header.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn cookies(&self) -> &SessionCookies {
        &self.cookies
    }

    #[must_use]
    pub fn into_cookies(self) -> SessionCookies {
        self.cookies
    }

    /// Authenticate against the backend and persist the session.
    ///
    /// Returns the landing route for the signed-in role.
    ///
    /// # Errors
    ///
    /// `AccessDenied` when the account's role differs from `req.role`;
    /// `AuthenticationFailed` for any backend failure; `Persist` when the
    /// returned user would not survive a later rehydrate. None of them
    /// writes cookies.
    pub async fn sign_in(&mut self, req: SignIn) -> Result<&'static str, AuthError> {
        let resp = self
            .api
            .login(&req.email, &req.password)
            .await
            .map_err(AuthError::AuthenticationFailed)?;

        let actual = Role::from_role_id(resp.user.papel_usuario_id);
        if actual != req.role {
            tracing::info!(user_id = resp.user.id, selected = %req.role, %actual, "login tab does not match account role");
            return Err(AuthError::AccessDenied { selected: req.role, actual });
        }

        let snapshot = UserSnapshot::from_api_user(&resp.user, actual);
        let user_json = snapshot.encode()?;
        self.api.set_bearer(&resp.token).map_err(AuthError::AuthenticationFailed)?;

        self.cookies.write(&resp.token, actual, &user_json);
        self.user = Some(snapshot);
        tracing::info!(user_id = resp.user.id, role = %actual, "signed in");
        Ok(actual.landing())
    }

    /// Drop every trace of the session. Never fails.
    pub fn sign_out(&mut self) {
        self.cookies.clear();
        self.api.clear_bearer();
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = user.id, "signed out");
        }
    }

    /// Restore identity from the request cookies.
    ///
    /// Any missing, malformed or inconsistent cookie leaves the store
    /// unauthenticated.
    pub fn rehydrate(&mut self) -> Option<&UserSnapshot> {
        self.user = None;
        self.api.clear_bearer();

        let raw = self.cookies.read();
        let (Some(token), Some(user_json)) = (raw.token.as_deref(), raw.user.as_deref()) else {
            return None;
        };

        let snapshot = match UserSnapshot::decode(user_json) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring session with unreadable user cookie");
                return None;
            }
        };
        if raw.role() != Some(snapshot.role) {
            tracing::debug!(role = ?raw.role, snapshot_role = %snapshot.role, "ignoring session with mismatched role cookie");
            return None;
        }
        if let Err(e) = self.api.set_bearer(token) {
            tracing::debug!(error = %e, "ignoring session with unusable token cookie");
            return None;
        }

        self.user = Some(snapshot);
        self.user.as_ref()
    }
}
