//! Auth session service
//!
//! Owns the authenticated session: hydrated synchronously from the
//! key-value store at construction, set on successful login, cleared on
//! logout. This service is the only writer of the store's session entries.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::watch;
use tracing::{info, warn};

use common::client::ApiClient;
use common::error::ClientResult;
use common::state::{Snapshot, StateCell};
use common::storage::KeyValueStore;

use crate::models::{LoginCredentials, Session, User};
use crate::validation;

/// Store entry holding the session token
pub const TOKEN_KEY: &str = "leavedesk_token";
/// Store entry holding the serialized user profile
pub const USER_KEY: &str = "leavedesk_user";

const LOGIN_FALLBACK: &str = "Unable to authenticate. Please try again.";

/// Response of the authenticate endpoint
#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: User,
}

/// Auth session service
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    store: Arc<KeyValueStore>,
    state: StateCell<Session>,
}

impl AuthService {
    /// Create the service and hydrate the session from the store.
    ///
    /// A corrupt cached profile is discarded (the entry is removed, the
    /// token kept); hydration itself never fails. A restored token is
    /// installed on the HTTP client so subsequent requests are authorized.
    pub fn new(client: ApiClient, store: Arc<KeyValueStore>) -> Self {
        let session = restore_session(&store);
        client.set_bearer_token(session.token.clone());

        AuthService {
            client,
            store,
            state: StateCell::new(session),
        }
    }

    /// Authenticate and cache the session.
    ///
    /// On success the token and profile are written to the store first,
    /// then published to the in-memory session and installed on the HTTP
    /// client. Store writes are best-effort: a failure is logged and login
    /// still succeeds.
    pub async fn login(&self, credentials: &LoginCredentials) -> ClientResult<User> {
        validation::validate_credentials(credentials)?;

        info!("Logging in user: {}", credentials.username);
        let _guard = self.state.begin_loading();

        match self
            .client
            .post::<AuthResponse, _>("/users/authenticate", credentials)
            .await
        {
            Ok(AuthResponse { token, user }) => {
                self.persist_session(&token, &user);
                Ok(user)
            }
            Err(err) => {
                self.state.set_error(err.display_message(LOGIN_FALLBACK));
                Err(err.into())
            }
        }
    }

    /// Drop the session from the store, the HTTP client, and memory.
    /// Never fails; store removals are best-effort.
    pub fn logout(&self) {
        info!("Logging out");

        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(err) = self.store.remove(key) {
                warn!("Failed to remove store entry {}: {}", key, err);
            }
        }

        self.client.set_bearer_token(None);
        self.state.update(|session| *session = Session::default());
        self.state.clear_error();
    }

    /// True when a session token is cached.
    pub fn has_token(&self) -> bool {
        self.state.snapshot().data.has_token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.has_token()
    }

    /// Cached profile of the authenticated user.
    pub fn user(&self) -> Option<User> {
        self.state.snapshot().data.user
    }

    /// Cached session token.
    pub fn token(&self) -> Option<String> {
        self.state.snapshot().data.token
    }

    /// Reset the stored error, e.g. when the user edits the login form.
    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    /// Clone of the current session snapshot.
    pub fn snapshot(&self) -> Snapshot<Session> {
        self.state.snapshot()
    }

    /// Receiver notified after every session change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Session>> {
        self.state.subscribe()
    }

    fn persist_session(&self, token: &str, user: &User) {
        if let Err(err) = self.store.set(TOKEN_KEY, token) {
            warn!("Failed to persist session token: {}", err);
        }
        match serde_json::to_string(user) {
            Ok(raw) => {
                if let Err(err) = self.store.set(USER_KEY, &raw) {
                    warn!("Failed to persist user profile: {}", err);
                }
            }
            Err(err) => warn!("Failed to serialize user profile: {}", err),
        }

        self.client.set_bearer_token(Some(token.to_string()));
        self.state.update(|session| {
            session.token = Some(token.to_string());
            session.user = Some(user.clone());
        });
    }
}

fn restore_session(store: &KeyValueStore) -> Session {
    let token = store.get(TOKEN_KEY);

    let user = store
        .get(USER_KEY)
        .and_then(|raw| match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("Discarding corrupt cached profile: {}", err);
                if let Err(err) = store.remove(USER_KEY) {
                    warn!("Failed to remove corrupt cached profile: {}", err);
                }
                None
            }
        });

    Session { token, user }
}
