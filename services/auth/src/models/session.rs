//! Session model

use super::user::User;

/// The authenticated user's token and cached profile
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    /// True when a session token is cached.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}
