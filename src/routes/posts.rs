//! Post views: feed, teacher dashboard, editor, single post.

#[cfg(test)]
#[path = "posts_test.rs"]
mod posts_test;

use axum::extract::{Multipart, Path, Query, State};
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::{Deserialize, Serialize};

use super::{CurrentSession, error_body, fetch_failed};
use crate::net::types::{ImageUpload, PageMeta, PageQuery, Post, PostForm};
use crate::session::UserSnapshot;
use crate::state::AppState;

pub const FEED_PAGE_SIZE: u32 = 6;
pub const ADMIN_PAGE_SIZE: u32 = 2;
const ADMIN_PATH: &str = "/admin";

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Please select a cover image.")]
    MissingCover,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid value for `{0}`")]
    InvalidField(&'static str),
    #[error("malformed form: {0}")]
    Multipart(#[from] MultipartError),
}

/// Whether the editor creates a post or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(i64),
}

impl EditorMode {
    /// Only a positive integer route parameter selects edit mode.
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        raw.and_then(|r| r.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map_or(Self::Create, Self::Edit)
    }
}

// =============================================================================
// VIEW MODELS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: i64,
    pub titulo: String,
    pub descricao: String,
    pub visibilidade: bool,
    pub data_publicacao: Option<String>,
    pub autor_id: Option<i64>,
    pub cover_url: String,
}

impl PostView {
    fn new(post: Post, uploads_url: &str) -> Self {
        let cover_url = post.cover_url(uploads_url);
        Self {
            id: post.id,
            titulo: post.titulo,
            descricao: post.descricao,
            visibilidade: post.visibilidade,
            data_publicacao: post.data_publicacao,
            autor_id: post.autor_id,
            cover_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListView {
    pub user: UserSnapshot,
    pub posts: Vec<PostView>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl ListView {
    fn new(user: UserSnapshot, posts: Vec<Post>, meta: PageMeta, q: Option<String>, uploads_url: &str) -> Self {
        Self {
            user,
            posts: posts.into_iter().map(|p| PostView::new(p, uploads_url)).collect(),
            page: meta.page,
            total_pages: meta.total_pages.max(1),
            total: meta.total,
            q,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EditorView {
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostView>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub q: Option<String>,
}

// =============================================================================
// LISTS
// =============================================================================

/// `GET /feed`: published posts, searchable.
pub async fn feed(
    State(state): State<AppState>,
    session: CurrentSession,
    Query(params): Query<ListParams>,
) -> Response {
    let query = PageQuery::new(params.page, FEED_PAGE_SIZE, params.q.as_deref());
    match session.store.api().feed(&query).await {
        Ok(page) => {
            Json(ListView::new(session.user, page.data, page.meta, query.q, &state.config.uploads_url)).into_response()
        }
        Err(e) => fetch_failed(e, "Could not load posts."),
    }
}

/// `GET /admin`: the teacher's own posts.
pub async fn admin(
    State(state): State<AppState>,
    session: CurrentSession,
    Query(params): Query<ListParams>,
) -> Response {
    let query = PageQuery::new(params.page, ADMIN_PAGE_SIZE, None);
    match session.store.api().my_posts(&query).await {
        Ok(page) => {
            Json(ListView::new(session.user, page.data, page.meta, None, &state.config.uploads_url)).into_response()
        }
        Err(e) => fetch_failed(e, "Could not load your posts."),
    }
}

/// `GET /post/{id}`: single post. Failures send the reader back to the feed.
pub async fn view_post(State(state): State<AppState>, session: CurrentSession, Path(id): Path<i64>) -> Response {
    match session.store.api().post(id).await {
        Ok(post) => Json(PostView::new(post, &state.config.uploads_url)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, post_id = id, "post fetch failed");
            Redirect::to("/feed").into_response()
        }
    }
}

/// `POST /admin/post/{id}/delete`.
pub async fn delete_post(session: CurrentSession, Path(id): Path<i64>) -> Response {
    match session.store.api().delete_post(id).await {
        Ok(()) => {
            tracing::info!(post_id = id, user_id = session.user.id, "post deleted");
            Redirect::to(ADMIN_PATH).into_response()
        }
        Err(e) => fetch_failed(e, "Could not delete the post."),
    }
}

// =============================================================================
// EDITOR
// =============================================================================

/// `GET /admin/post`: empty editor.
pub async fn new_post_form(_session: CurrentSession) -> Json<EditorView> {
    Json(EditorView { mode: "create", post: None })
}

/// `GET /admin/post/{id}`: editor prefilled from the backend when `id` is a
/// post id, empty otherwise.
pub async fn edit_post_form(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(raw_id): Path<String>,
) -> Response {
    let EditorMode::Edit(id) = EditorMode::from_param(Some(&raw_id)) else {
        return Json(EditorView { mode: "create", post: None }).into_response();
    };
    match session.store.api().post(id).await {
        Ok(post) => {
            Json(EditorView { mode: "edit", post: Some(PostView::new(post, &state.config.uploads_url)) }).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, post_id = id, "editor prefill failed");
            Redirect::to(ADMIN_PATH).into_response()
        }
    }
}

/// `POST /admin/post`: create.
pub async fn save_new_post(session: CurrentSession, form: Multipart) -> Response {
    save(session, EditorMode::Create, form).await
}

/// `POST /admin/post/{id}`: update when `id` is a post id, create otherwise.
pub async fn save_post(session: CurrentSession, Path(raw_id): Path<String>, form: Multipart) -> Response {
    save(session, EditorMode::from_param(Some(&raw_id)), form).await
}

async fn save(session: CurrentSession, mode: EditorMode, form: Multipart) -> Response {
    let form = match read_post_form(form, mode).await {
        Ok(form) => form,
        Err(e) => return error_body(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()),
    };

    let api = session.store.api();
    let result = match mode {
        EditorMode::Create => api.create_post(form).await,
        EditorMode::Edit(id) => api.update_post(id, form).await,
    };
    match result {
        Ok(()) => {
            tracing::info!(?mode, user_id = session.user.id, "post saved");
            Redirect::to(ADMIN_PATH).into_response()
        }
        Err(e) => fetch_failed(e, "Could not save the post."),
    }
}

async fn read_post_form(mut form: Multipart, mode: EditorMode) -> Result<PostForm, EditorError> {
    let mut titulo = None;
    let mut descricao = None;
    let mut visibilidade = true;
    let mut imagem = None;

    while let Some(field) = form.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "titulo" => titulo = Some(field.text().await?),
            "descricao" => descricao = Some(field.text().await?),
            "visibilidade" => visibilidade = parse_flag(&field.text().await?)?,
            "imagem" => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    imagem = Some(ImageUpload { file_name, content_type, bytes: bytes.to_vec() });
                }
            }
            _ => {}
        }
    }

    if mode == EditorMode::Create && imagem.is_none() {
        return Err(EditorError::MissingCover);
    }
    Ok(PostForm {
        titulo: titulo.ok_or(EditorError::MissingField("titulo"))?,
        descricao: descricao.ok_or(EditorError::MissingField("descricao"))?,
        visibilidade,
        imagem,
    })
}

fn parse_flag(raw: &str) -> Result<bool, EditorError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(EditorError::InvalidField("visibilidade")),
    }
}
