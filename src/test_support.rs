//! In-process stand-in for the remote PubliFlow API.
//!
//! Binds to `127.0.0.1:0` and records every request it sees so tests can
//! assert on what the gateway actually sent.

use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::{Value, json};

pub const TEACHER_EMAIL: &str = "teacher@escola.test";
pub const STUDENT_EMAIL: &str = "student@escola.test";
/// Student account whose profile comes back with a blank name.
pub const BLANK_NAME_EMAIL: &str = "blank@escola.test";
pub const PASSWORD: &str = "pw";

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    fn push(&self, line: String) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub calls: Recorder,
}

/// Start the mock API and return its base URL.
pub async fn spawn_backend() -> MockBackend {
    let calls = Recorder::default();
    let app = Router::new()
        .route("/login", post(login))
        .route("/users", post(register))
        .route("/users/{id}", get(get_user).put(put_user))
        .route("/posts", post(create_post))
        .route("/posts/feed", get(feed))
        .route("/posts/me", get(my_posts))
        .route("/posts/{id}", get(get_post).put(update_post).delete(delete_post))
        .with_state(calls.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    MockBackend { base_url: format!("http://{addr}"), calls }
}

fn bearer(headers: &HeaderMap) -> Option<i64> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer tok-")?
        .parse()
        .ok()
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Token ausente" }))).into_response()
}

fn user_json(id: i64) -> Value {
    let (name, email, papel) = match id {
        2 => ("Prof. Ana", TEACHER_EMAIL, 2),
        3 => ("", BLANK_NAME_EMAIL, 1),
        _ => ("Aluno Bruno", STUDENT_EMAIL, 1),
    };
    json!({
        "id": id,
        "nomeCompleto": name,
        "telefone": "11999990000",
        "email": email,
        "dataCadastro": "2024-02-01T10:00:00Z",
        "papelUsuarioID": papel,
    })
}

fn post_json(id: i64, titulo: &str) -> Value {
    json!({
        "id": id,
        "titulo": titulo,
        "descricao": "conteudo",
        "visibilidade": true,
        "dataPublicacao": "2024-03-01T12:00:00Z",
        "caminhoImagem": format!("capa-{id}.png"),
        "autorID": 2,
    })
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    senha: String,
}

async fn login(State(calls): State<Recorder>, Json(body): Json<LoginBody>) -> Response {
    calls.push(format!("POST /login {}", body.email));
    let id = match (body.email.as_str(), body.senha.as_str()) {
        (TEACHER_EMAIL, PASSWORD) => 2,
        (STUDENT_EMAIL, PASSWORD) => 1,
        (BLANK_NAME_EMAIL, PASSWORD) => 3,
        _ => {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Credenciais inválidas" }))).into_response();
        }
    };
    Json(json!({ "token": format!("tok-{id}"), "user": user_json(id) })).into_response()
}

async fn register(State(calls): State<Recorder>, Json(body): Json<Value>) -> Response {
    calls.push(format!("POST /users {body}"));
    if body["email"] == TEACHER_EMAIL {
        return (StatusCode::CONFLICT, Json(json!({ "message": "E-mail já cadastrado" }))).into_response();
    }
    StatusCode::CREATED.into_response()
}

async fn get_user(State(calls): State<Recorder>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    calls.push(format!("GET /users/{id}"));
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    Json(user_json(id)).into_response()
}

async fn put_user(
    State(calls): State<Recorder>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    calls.push(format!("PUT /users/{id} {body}"));
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Deserialize)]
struct ListQuery {
    page: u32,
    limit: u32,
    q: Option<String>,
}

fn listing(prefix: &str, query: &ListQuery) -> Value {
    let titulo = match &query.q {
        Some(q) => format!("{prefix} {q}"),
        None => prefix.to_owned(),
    };
    json!({
        "data": [post_json(1, &titulo)],
        "meta": { "total": 13, "page": query.page, "limit": query.limit, "totalPages": 13_u32.div_ceil(query.limit) },
    })
}

async fn feed(State(calls): State<Recorder>, headers: HeaderMap, Query(query): Query<ListQuery>) -> Response {
    calls.push(format!("GET /posts/feed page={} limit={} q={:?}", query.page, query.limit, query.q));
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    Json(listing("feed", &query)).into_response()
}

async fn my_posts(State(calls): State<Recorder>, headers: HeaderMap, Query(query): Query<ListQuery>) -> Response {
    calls.push(format!("GET /posts/me page={} limit={}", query.page, query.limit));
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    Json(listing("mine", &query)).into_response()
}

async fn get_post(State(calls): State<Recorder>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    calls.push(format!("GET /posts/{id}"));
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    if id > 100 {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Postagem não encontrada" }))).into_response();
    }
    Json(post_json(id, "existente")).into_response()
}

async fn multipart_fields(mut form: Multipart) -> Vec<String> {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = form.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await.unwrap_or_default();
        match file_name {
            Some(file) => fields.push(format!("{name}=<{file}:{}>", bytes.len())),
            None => fields.push(format!("{name}={}", String::from_utf8_lossy(&bytes))),
        }
    }
    fields
}

async fn create_post(State(calls): State<Recorder>, headers: HeaderMap, form: Multipart) -> Response {
    let authed = bearer(&headers).is_some();
    let fields = multipart_fields(form).await;
    calls.push(format!("POST /posts {}", fields.join(" ")));
    if !authed {
        return unauthorized();
    }
    StatusCode::CREATED.into_response()
}

async fn update_post(
    State(calls): State<Recorder>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    form: Multipart,
) -> Response {
    let authed = bearer(&headers).is_some();
    let fields = multipart_fields(form).await;
    calls.push(format!("PUT /posts/{id} {}", fields.join(" ")));
    if !authed {
        return unauthorized();
    }
    StatusCode::OK.into_response()
}

async fn delete_post(State(calls): State<Recorder>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    calls.push(format!("DELETE /posts/{id}"));
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    StatusCode::NO_CONTENT.into_response()
}
