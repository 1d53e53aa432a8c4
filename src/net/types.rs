//! Wire DTOs for the remote PubliFlow API.
//!
//! DESIGN
//! ======
//! Field names follow the backend's JSON (`nomeCompleto`, `papelUsuarioID`,
//! ...) through serde renames so the rest of the crate can use plain Rust
//! names.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Shown when a post has no cover image.
pub const PLACEHOLDER_COVER_URL: &str = "https://via.placeholder.com/800x450?text=Sem+Imagem";

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub senha: &'a str,
}

/// Successful `POST /login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: ApiUser,
}

/// User record as the backend returns it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    pub id: i64,
    pub nome_completo: String,
    #[serde(default)]
    pub telefone: Option<String>,
    pub email: String,
    #[serde(default)]
    pub data_cadastro: Option<String>,
    #[serde(rename = "papelUsuarioID", default)]
    pub papel_usuario_id: Option<i64>,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub nome: String,
    pub sobrenome: String,
    pub email: String,
    pub senha: String,
    pub telefone: String,
    #[serde(rename = "papelUsuarioID")]
    pub papel_usuario_id: i64,
}

/// Body of `PUT /users/:id`. The role is never part of a profile update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub nome_completo: String,
    pub email: String,
    pub telefone: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub titulo: String,
    pub descricao: String,
    #[serde(default = "default_visible")]
    pub visibilidade: bool,
    #[serde(rename = "dataPublicacao", default)]
    pub data_publicacao: Option<String>,
    #[serde(rename = "caminhoImagem", default)]
    pub caminho_imagem: Option<String>,
    #[serde(rename = "autorID", default)]
    pub autor_id: Option<i64>,
}

fn default_visible() -> bool {
    true
}

impl Post {
    /// Resolve the stored image path into a displayable URL.
    #[must_use]
    pub fn cover_url(&self, uploads_url: &str) -> String {
        resolve_cover_url(self.caminho_imagem.as_deref(), uploads_url)
    }
}

/// Empty paths fall back to the placeholder; absolute URLs pass through.
#[must_use]
pub fn resolve_cover_url(path: Option<&str>, uploads_url: &str) -> String {
    match path.map(str::trim) {
        None | Some("") => PLACEHOLDER_COVER_URL.to_owned(),
        Some(p) if p.starts_with("http") => p.to_owned(),
        Some(p) => format!("{}/{}", uploads_url.trim_end_matches('/'), p.trim_start_matches('/')),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

/// `{data, meta}` envelope used by the list endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Query string for paginated endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl PageQuery {
    /// Pages are 1-based; blank search terms are dropped.
    #[must_use]
    pub fn new(page: Option<u32>, limit: u32, q: Option<&str>) -> Self {
        let q = q.map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned);
        Self { page: page.filter(|p| *p > 0).unwrap_or(1), limit, q }
    }
}

/// Cover image attached to a post form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Multipart payload for `POST /posts` and `PUT /posts/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm {
    pub titulo: String,
    pub descricao: String,
    pub visibilidade: bool,
    pub imagem: Option<ImageUpload>,
}

/// Error envelope the backend uses for failures.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
