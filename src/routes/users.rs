//! Profile routes for the signed-in user.

use axum::Form;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;

use super::{CurrentSession, fetch_failed};
use crate::net::types::ProfileUpdate;
use crate::session::Role;

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: i64,
    pub nome_completo: String,
    pub email: String,
    pub telefone: Option<String>,
    pub role: Role,
    pub account_label: &'static str,
    pub avatar: Option<String>,
    /// Where "back" leads for this role.
    pub back_link: &'static str,
}

fn account_label(role: Role) -> &'static str {
    match role {
        Role::Teacher => "Teacher account",
        Role::Student => "Student account",
    }
}

/// `GET /profile`.
pub async fn profile(session: CurrentSession) -> Response {
    let user = session.user;
    match session.store.api().user(user.id).await {
        Ok(record) => Json(ProfileView {
            id: record.id,
            nome_completo: record.nome_completo,
            email: record.email,
            telefone: record.telefone,
            role: user.role,
            account_label: account_label(user.role),
            avatar: user.avatar,
            back_link: user.role.landing(),
        })
        .into_response(),
        Err(e) => fetch_failed(e, "Could not load your profile."),
    }
}

/// `POST /profile`: the role is never sent, so it cannot change here.
pub async fn update_profile(session: CurrentSession, Form(update): Form<ProfileUpdate>) -> Response {
    match session.store.api().update_user(session.user.id, &update).await {
        Ok(()) => {
            tracing::info!(user_id = session.user.id, "profile updated");
            Json(json!({ "message": "Profile updated." })).into_response()
        }
        Err(e) => fetch_failed(e, "Could not update your profile."),
    }
}
