//! Access tier of a signed-in user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Backend role id for teachers. Every other id is a student.
pub const TEACHER_ROLE_ID: i64 = 2;
/// Backend role id sent when registering a student.
pub const STUDENT_ROLE_ID: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    /// Map the backend's `papelUsuarioID`. Missing or unknown ids are students.
    #[must_use]
    pub fn from_role_id(id: Option<i64>) -> Self {
        if id == Some(TEACHER_ROLE_ID) { Self::Teacher } else { Self::Student }
    }

    #[must_use]
    pub fn role_id(self) -> i64 {
        match self {
            Self::Student => STUDENT_ROLE_ID,
            Self::Teacher => TEACHER_ROLE_ID,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }

    /// Where a freshly signed-in user of this role lands.
    #[must_use]
    pub fn landing(self) -> &'static str {
        match self {
            Self::Student => "/feed",
            Self::Teacher => "/admin",
        }
    }

    /// Label of the login tab for this role.
    #[must_use]
    pub fn tab_label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Teacher => "Teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role {0:?}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}
