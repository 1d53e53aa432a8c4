//! HTTP client for the remote PubliFlow API.
//!
//! DESIGN
//! ======
//! `ApiClient` carries a default header map that every outgoing request
//! copies. Clones share that map, so once the session store sets the bearer
//! header every view holding a clone sends it. Only `session::store` calls
//! the header setters.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `ApiError`. Callers decide whether a failure is an
//! authentication failure or a data fetch failure.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};
use reqwest::{Method, RequestBuilder, multipart};
use serde::de::DeserializeOwned;

use super::types::{
    ApiUser, ErrorBody, LoginRequest, LoginResponse, PageQuery, Paginated, Post, PostForm, ProfileUpdate,
    RegisterRequest,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}")]
    Status {
        endpoint: String,
        status: u16,
        /// `message` field of the backend's error body, when present.
        message: Option<String>,
    },
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl ApiError {
    /// HTTP status returned by the backend, if the request got that far.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-provided message, suitable for showing to the user.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    defaults: Arc<RwLock<HeaderMap>>,
}

impl ApiClient {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            defaults: Arc::new(RwLock::new(HeaderMap::new())),
        }
    }

    /// A client sharing the connection pool and base URL but with its own,
    /// empty default headers.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self::new(self.http.clone(), &self.base_url)
    }

    /// Current `Authorization` default, if any.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        let defaults = self.defaults.read().unwrap_or_else(PoisonError::into_inner);
        defaults
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    pub(crate) fn set_bearer(&self, token: &str) -> Result<(), ApiError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
        value.set_sensitive(true);
        let mut defaults = self.defaults.write().unwrap_or_else(PoisonError::into_inner);
        defaults.insert(AUTHORIZATION, value);
        Ok(())
    }

    pub(crate) fn clear_bearer(&self) {
        let mut defaults = self.defaults.write().unwrap_or_else(PoisonError::into_inner);
        defaults.remove(AUTHORIZATION);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let headers = self.defaults.read().unwrap_or_else(PoisonError::into_inner).clone();
        self.http.request(method, self.url(path)).headers(headers)
    }

    async fn send(&self, endpoint: &str, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let resp = builder
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint: endpoint.to_owned(), source })?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<ErrorBody>(&body).unwrap_or_default().message;
        Err(ApiError::Status { endpoint: endpoint.to_owned(), status: status.as_u16(), message })
    }

    async fn send_json<T: DeserializeOwned>(&self, endpoint: &str, builder: RequestBuilder) -> Result<T, ApiError> {
        self.send(endpoint, builder)
            .await?
            .json::<T>()
            .await
            .map_err(|source| ApiError::Transport { endpoint: endpoint.to_owned(), source })
    }

    /// `POST /login`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest { email, senha: password };
        self.send_json("/login", self.request(Method::POST, "/login").json(&body)).await
    }

    /// `POST /users`.
    pub async fn register(&self, req: &RegisterRequest) -> Result<(), ApiError> {
        self.send("/users", self.request(Method::POST, "/users").json(req)).await?;
        Ok(())
    }

    /// `GET /posts/feed`.
    pub async fn feed(&self, query: &PageQuery) -> Result<Paginated<Post>, ApiError> {
        self.send_json("/posts/feed", self.request(Method::GET, "/posts/feed").query(query))
            .await
    }

    /// `GET /posts/me`.
    pub async fn my_posts(&self, query: &PageQuery) -> Result<Paginated<Post>, ApiError> {
        self.send_json("/posts/me", self.request(Method::GET, "/posts/me").query(query))
            .await
    }

    /// `GET /posts/:id`.
    pub async fn post(&self, id: i64) -> Result<Post, ApiError> {
        let path = post_endpoint(id);
        self.send_json(&path, self.request(Method::GET, &path)).await
    }

    /// `POST /posts` with a multipart body.
    pub async fn create_post(&self, form: PostForm) -> Result<(), ApiError> {
        let body = multipart_form(form).map_err(|source| ApiError::Transport { endpoint: "/posts".into(), source })?;
        self.send("/posts", self.request(Method::POST, "/posts").multipart(body))
            .await?;
        Ok(())
    }

    /// `PUT /posts/:id` with a multipart body.
    pub async fn update_post(&self, id: i64, form: PostForm) -> Result<(), ApiError> {
        let path = post_endpoint(id);
        let body = multipart_form(form).map_err(|source| ApiError::Transport { endpoint: path.clone(), source })?;
        self.send(&path, self.request(Method::PUT, &path).multipart(body)).await?;
        Ok(())
    }

    /// `DELETE /posts/:id`.
    pub async fn delete_post(&self, id: i64) -> Result<(), ApiError> {
        let path = post_endpoint(id);
        self.send(&path, self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    /// `GET /users/:id`.
    pub async fn user(&self, id: i64) -> Result<ApiUser, ApiError> {
        let path = user_endpoint(id);
        self.send_json(&path, self.request(Method::GET, &path)).await
    }

    /// `PUT /users/:id`.
    pub async fn update_user(&self, id: i64, update: &ProfileUpdate) -> Result<(), ApiError> {
        let path = user_endpoint(id);
        self.send(&path, self.request(Method::PUT, &path).json(update)).await?;
        Ok(())
    }
}

fn post_endpoint(id: i64) -> String {
    format!("/posts/{id}")
}

fn user_endpoint(id: i64) -> String {
    format!("/users/{id}")
}

fn multipart_form(form: PostForm) -> Result<multipart::Form, reqwest::Error> {
    let mut body = multipart::Form::new()
        .text("titulo", form.titulo)
        .text("descricao", form.descricao)
        .text("visibilidade", form.visibilidade.to_string());
    if let Some(image) = form.imagem {
        let mut part = multipart::Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(content_type) = image.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        body = body.part("imagem", part);
    }
    Ok(body)
}
