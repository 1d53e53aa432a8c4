//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every request passes `guard_layer` first, which applies `guard::decide`
//! to the path and the raw session cookies. Handlers behind it rehydrate the
//! session through the `CurrentSession` extractor and talk to the remote API
//! with the session's bearer.

pub mod auth;
pub mod posts;
pub mod users;

use axum::Router;
use axum::extract::{DefaultBodyLimit, FromRef, FromRequestParts, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::routing::{get, post};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::guard::{self, Decision, LOGIN_PATH};
use crate::net::api::ApiError;
use crate::session::{RawSession, SessionStore, UserSnapshot};
use crate::state::AppState;

/// Cover uploads are larger than axum's default body limit.
const EDITOR_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn app(state: AppState) -> Router {
    let editor = Router::new()
        .route("/admin/post", get(posts::new_post_form).post(posts::save_new_post))
        .route("/admin/post/{id}", get(posts::edit_post_form).post(posts::save_post))
        .layer(DefaultBodyLimit::max(EDITOR_BODY_LIMIT));

    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/register", post(auth::register))
        .route("/api/session", get(auth::session))
        .route("/feed", get(posts::feed))
        .route("/admin", get(posts::admin))
        .route("/admin/post/{id}/delete", post(posts::delete_post))
        .route("/post/{id}", get(posts::view_post))
        .route("/profile", get(users::profile).post(users::update_profile))
        .route("/healthz", get(healthz))
        .merge(editor)
        .layer(middleware::from_fn(guard_layer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Apply the route guard before any handler runs.
/// Redirects are 303 so a guarded POST lands on a plain GET.
async fn guard_layer(jar: CookieJar, req: Request, next: Next) -> Response {
    let session = RawSession::from_jar(&jar);
    match guard::decide(req.uri().path(), &session) {
        Decision::Allow => next.run(req).await,
        Decision::Redirect(to) => {
            tracing::debug!(path = req.uri().path(), to, "route guard redirect");
            Redirect::to(to).into_response()
        }
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// SESSION EXTRACTOR
// =============================================================================

/// Rehydrated session for the request.
/// Use as a handler parameter to require a signed-in user; visitors without
/// a valid session are sent to `/login` with their leftover session cookies
/// expired, so the guard lets them through to the login page.
pub struct CurrentSession {
    pub store: SessionStore,
    pub user: UserSnapshot,
}

impl<S> FromRequestParts<S> for CurrentSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let mut store = app_state.session(CookieJar::from_headers(&parts.headers));
        let Some(user) = store.rehydrate().cloned() else {
            store.sign_out();
            let jar = store.into_cookies().into_jar();
            return Err((jar, Redirect::to(LOGIN_PATH)).into_response());
        };
        Ok(Self { store, user })
    }
}

// =============================================================================
// ERROR RESPONSES
// =============================================================================

pub(crate) fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Status a failed backend call is reported with.
pub(crate) fn api_error_to_status(err: &ApiError) -> StatusCode {
    match err.status() {
        Some(401) => StatusCode::UNAUTHORIZED,
        Some(403) => StatusCode::FORBIDDEN,
        Some(404) => StatusCode::NOT_FOUND,
        Some(409) => StatusCode::CONFLICT,
        Some(400 | 422) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Log a failed data fetch and turn it into an error response.
pub(crate) fn fetch_failed(err: ApiError, fallback: &str) -> Response {
    tracing::error!(error = %err, "backend request failed");
    let message = err.backend_message().unwrap_or(fallback);
    error_body(api_error_to_status(&err), message)
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
