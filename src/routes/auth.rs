//! Auth routes: login, logout, registration, session probe.

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use super::{error_body, fetch_failed};
use crate::guard::LOGIN_PATH;
use crate::net::types::RegisterRequest;
use crate::session::{AuthError, Role, SignIn};
use crate::state::AppState;

/// Login form. `role` is the tab the visitor picked; it defaults to student.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    pub role: Option<Role>,
}

impl RegisterForm {
    fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            nome: self.first_name,
            sobrenome: self.last_name,
            email: self.email,
            senha: self.password,
            telefone: self.phone,
            papel_usuario_id: self.role.unwrap_or(Role::Student).role_id(),
        }
    }
}

pub(crate) fn auth_error_to_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::AccessDenied { .. } => StatusCode::FORBIDDEN,
        AuthError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
        AuthError::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `GET /login`: the guard has already sent signed-in users away.
pub async fn login_page() -> Json<serde_json::Value> {
    Json(json!({ "page": "login", "roles": [Role::Student, Role::Teacher] }))
}

/// `POST /login`: sign in, set the session cookies, land by role.
pub async fn login(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    let mut store = state.session(jar);
    let req = SignIn { email: form.email, password: form.password, role: form.role.unwrap_or(Role::Student) };

    match store.sign_in(req).await {
        Ok(landing) => (store.into_cookies().into_jar(), Redirect::to(landing)).into_response(),
        Err(e) => {
            match &e {
                AuthError::AuthenticationFailed(source) => tracing::warn!(error = %source, "login failed"),
                AuthError::Persist(source) => tracing::error!(error = %source, "session persist failed"),
                AuthError::AccessDenied { .. } => {}
            }
            error_body(auth_error_to_status(&e), &e.to_string())
        }
    }
}

/// `POST /logout`: clear the session cookies and return to login.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let mut store = state.session(jar);
    store.rehydrate();
    store.sign_out();
    (store.into_cookies().into_jar(), Redirect::to(LOGIN_PATH))
}

/// `POST /register`: create an account on the backend. Does not sign in.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    match state.api().register(&form.into_request()).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Account created. Sign in to continue." })),
        )
            .into_response(),
        Err(e) => fetch_failed(e, "Something went wrong. Please try again."),
    }
}

/// `GET /api/session`: the rehydrated user, or 401.
pub async fn session(State(state): State<AppState>, jar: CookieJar) -> Response {
    let mut store = state.session(jar);
    match store.rehydrate() {
        Some(user) => Json(user.clone()).into_response(),
        None => error_body(StatusCode::UNAUTHORIZED, "not signed in"),
    }
}
