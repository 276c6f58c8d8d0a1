//! Route guard decisions
//!
//! Boolean-or-redirect checks evaluated before entering a protected view,
//! consulting only the auth service's current snapshot.

use crate::service::AuthService;

/// Role id granting access to the administration views
pub const ADMIN_ROLE_ID: i64 = 1;

pub const LOGIN_ROUTE: &str = "/auth/login";
pub const HOME_ROUTE: &str = "/home";

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Enter the requested view
    Allow,
    /// Navigate to `path` instead, optionally remembering where the user
    /// wanted to go
    Redirect {
        path: &'static str,
        redirect_to: Option<String>,
    },
}

impl GuardDecision {
    fn redirect(path: &'static str) -> Self {
        GuardDecision::Redirect {
            path,
            redirect_to: None,
        }
    }
}

/// Views for authenticated users: anyone with a token may enter; everyone
/// else is sent to the login view, keeping the requested path as a hint
/// unless it is empty or already the login route.
pub fn require_auth(auth: &AuthService, requested: Option<&str>) -> GuardDecision {
    if auth.has_token() {
        return GuardDecision::Allow;
    }

    let redirect_to = requested
        .filter(|path| !path.is_empty() && *path != LOGIN_ROUTE)
        .map(str::to_owned);

    GuardDecision::Redirect {
        path: LOGIN_ROUTE,
        redirect_to,
    }
}

/// Views for guests only, such as the login view itself.
pub fn require_guest(auth: &AuthService) -> GuardDecision {
    if auth.has_token() {
        GuardDecision::redirect(HOME_ROUTE)
    } else {
        GuardDecision::Allow
    }
}

/// Views for administrators: the cached profile must carry the admin role.
pub fn require_admin(auth: &AuthService) -> GuardDecision {
    match auth.user() {
        Some(user) if user.roles_id == ADMIN_ROLE_ID => GuardDecision::Allow,
        _ => GuardDecision::redirect(HOME_ROUTE),
    }
}
