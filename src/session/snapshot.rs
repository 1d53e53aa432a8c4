//! Cached display copy of the signed-in user's profile.
//!
//! DESIGN
//! ======
//! The snapshot lives in a cookie as JSON. Encoding and decoding both
//! validate the shape: a snapshot that could not be read back is never
//! written, and a tampered or truncated cookie surfaces as a typed
//! `SnapshotError` rather than a half-filled user.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use serde::{Deserialize, Serialize};

use super::role::Role;
use crate::net::types::ApiUser;

const AVATAR_BASE_URL: &str = "https://i.pravatar.cc/150";

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("user cookie is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("user cookie has invalid {0}")]
    Invalid(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserSnapshot {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserSnapshot {
    /// Build the snapshot for a user the backend just authenticated.
    #[must_use]
    pub fn from_api_user(user: &ApiUser, role: Role) -> Self {
        Self {
            id: user.id,
            name: user.nome_completo.clone(),
            email: user.email.clone(),
            role,
            avatar: Some(avatar_url(user.id)),
        }
    }

    pub fn encode(&self) -> Result<String, SnapshotError> {
        self.validate()?;
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(raw: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(raw)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        if self.id <= 0 {
            return Err(SnapshotError::Invalid("id"));
        }
        if self.name.trim().is_empty() {
            return Err(SnapshotError::Invalid("name"));
        }
        if !self.email.contains('@') {
            return Err(SnapshotError::Invalid("email"));
        }
        Ok(())
    }
}

#[must_use]
pub fn avatar_url(user_id: i64) -> String {
    format!("{AVATAR_BASE_URL}?u={user_id}")
}
