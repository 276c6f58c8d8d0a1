//! User administration models

use common::state::Identified;
use serde::{Deserialize, Serialize};

/// User row as returned by the admin endpoints. Passwords are write-only
/// and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    pub employ_code: i64,
}

impl Identified for UserRecord {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

/// New user form input; `employ_code` arrives as raw text and is coerced
/// during validation
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub employ_code: String,
}

impl NewUser {
    /// Copy of the form input with every field trimmed.
    pub fn sanitized(&self) -> NewUser {
        NewUser {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.trim().to_string(),
            employ_code: self.employ_code.trim().to_string(),
        }
    }
}

/// User update form input; an empty password keeps the current one
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub employ_code: String,
}

impl UpdateUser {
    /// Copy of the form input with every field trimmed.
    pub fn sanitized(&self) -> UpdateUser {
        UpdateUser {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.trim().to_string(),
            employ_code: self.employ_code.trim().to_string(),
        }
    }
}
