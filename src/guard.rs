//! Pre-navigation route guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! `decide` is pure: it sees the path and the raw session cookies and
//! nothing else. `routes::guard_layer` runs it before any view handler, so
//! protected views never render or fetch for a visitor who may not see them.
//!
//! Rules, first match wins:
//! 1. protected path without a token        -> `/login`
//! 2. `/login` with a token, role teacher    -> `/admin`
//! 3. `/login` with a token, any other role  -> `/feed`
//! 4. teacher path, role not teacher         -> `/feed`
//! 5. otherwise                              -> allow

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::session::{RawSession, Role};

pub const LOGIN_PATH: &str = "/login";
pub const PROTECTED_PREFIXES: [&str; 2] = ["/feed", "/admin"];
pub const TEACHER_PREFIXES: [&str; 1] = ["/admin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(&'static str),
}

/// `path` equals `prefix` or continues it with a new segment.
fn is_under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn is_under_any(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| is_under(path, prefix))
}

#[must_use]
pub fn decide(path: &str, session: &RawSession) -> Decision {
    let has_token = session.has_token();
    // A missing or unknown role gets the least privileged tier.
    let role = session.role().unwrap_or(Role::Student);

    if is_under_any(path, &PROTECTED_PREFIXES) && !has_token {
        return Decision::Redirect(LOGIN_PATH);
    }

    if path == LOGIN_PATH && has_token {
        return Decision::Redirect(role.landing());
    }

    if is_under_any(path, &TEACHER_PREFIXES) && role != Role::Teacher {
        return Decision::Redirect(Role::Student.landing());
    }

    Decision::Allow
}
