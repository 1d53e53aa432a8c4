//! The three session cookies and the jar they live in.
//!
//! `SessionCookies` wraps an `axum_extra` jar taken from the request. Writes
//! become `Set-Cookie` headers once the jar is returned from a handler.

#[cfg(test)]
#[path = "cookies_test.rs"]
mod cookies_test;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use super::role::Role;

pub const TOKEN_COOKIE: &str = "publiflow.token";
pub const ROLE_COOKIE: &str = "publiflow.role";
pub const USER_COOKIE: &str = "publiflow.user";
pub const SESSION_COOKIES: [&str; 3] = [TOKEN_COOKIE, ROLE_COOKIE, USER_COOKIE];

/// Lifetime of every session cookie.
pub const SESSION_MAX_AGE: Duration = Duration::days(30);

/// Session values as read from the browser, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSession {
    pub token: Option<String>,
    pub role: Option<String>,
    pub user: Option<String>,
}

impl RawSession {
    #[must_use]
    pub fn from_jar(jar: &CookieJar) -> Self {
        let read = |name: &str| jar.get(name).map(|c| c.value().to_owned()).filter(|v| !v.is_empty());
        Self { token: read(TOKEN_COOKIE), role: read(ROLE_COOKIE), user: read(USER_COOKIE) }
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Parsed role cookie. Unrecognised values read as absent.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionCookies {
    jar: CookieJar,
    secure: bool,
}

impl SessionCookies {
    #[must_use]
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Self { jar, secure }
    }

    #[must_use]
    pub fn read(&self) -> RawSession {
        RawSession::from_jar(&self.jar)
    }

    /// Write all three cookies. Values are prepared by the caller so nothing
    /// here can fail halfway.
    pub fn write(&mut self, token: &str, role: Role, user_json: &str) {
        let jar = std::mem::take(&mut self.jar);
        self.jar = jar
            .add(self.session_cookie(TOKEN_COOKIE, token.to_owned()))
            .add(self.session_cookie(ROLE_COOKIE, role.as_str().to_owned()))
            .add(self.session_cookie(USER_COOKIE, user_json.to_owned()));
    }

    pub fn clear(&mut self) {
        let mut jar = std::mem::take(&mut self.jar);
        for name in SESSION_COOKIES {
            jar = jar.remove(Cookie::build(name).path("/"));
        }
        self.jar = jar;
    }

    /// Names of the session cookies currently held.
    #[must_use]
    pub fn present(&self) -> Vec<&'static str> {
        SESSION_COOKIES
            .into_iter()
            .filter(|name| self.jar.get(name).is_some())
            .collect()
    }

    #[must_use]
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }

    fn session_cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(SESSION_MAX_AGE)
            .build()
    }
}
