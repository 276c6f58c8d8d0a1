//! Users resource service
//!
//! Mirrors the server's administered user list: loads replace the whole
//! collection, creates prepend, updates replace the matching row in place,
//! deletes remove it. Overlapping calls are not serialized, so concurrent
//! edits of the same user resolve to whichever response arrives last.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use common::client::ApiClient;
use common::error::ClientResult;
use common::state::{Snapshot, StateCell};

use crate::models::{NewUser, UpdateUser, UserRecord};
use crate::validation;

const FALLBACK: &str = "Something went wrong. Please try again later.";

/// Response of the admin list endpoint
#[derive(Debug, Deserialize)]
struct AdminUsersResponse {
    #[serde(default)]
    users: Option<Vec<UserRecord>>,
}

/// Body of the store endpoint
#[derive(Debug, Serialize)]
struct StoreUserRequest {
    name: String,
    email: String,
    username: String,
    password: String,
    employ_code: i64,
}

/// Body of the update endpoint; an absent password keeps the current one
#[derive(Debug, Serialize)]
struct UpdateUserRequest {
    name: String,
    email: String,
    username: String,
    employ_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

/// Users resource service
#[derive(Clone)]
pub struct UsersService {
    client: ApiClient,
    state: StateCell<Vec<UserRecord>>,
}

impl UsersService {
    pub fn new(client: ApiClient) -> Self {
        UsersService {
            client,
            state: StateCell::new(Vec::new()),
        }
    }

    /// Fetch the administered user list, replacing the cached collection.
    pub async fn load_users(&self) -> ClientResult<Vec<UserRecord>> {
        info!("Loading users");
        let _guard = self.state.begin_loading();

        match self.client.get::<AdminUsersResponse>("/users/admin").await {
            Ok(response) => {
                let users = response.users.unwrap_or_default();
                self.state.replace_all(users.clone());
                Ok(users)
            }
            Err(err) => {
                self.state.set_error(err.display_message(FALLBACK));
                Err(err.into())
            }
        }
    }

    /// Create a user and prepend it to the cached collection.
    pub async fn create_user(&self, payload: &NewUser) -> ClientResult<UserRecord> {
        let payload = payload.sanitized();
        let employ_code = validation::validate_new_user(&payload)?;

        info!("Creating user: {}", payload.username);
        let _guard = self.state.begin_submitting();

        let body = StoreUserRequest {
            name: payload.name,
            email: payload.email,
            username: payload.username,
            password: payload.password,
            employ_code,
        };

        match self.client.post::<UserRecord, _>("/users/store", &body).await {
            Ok(user) => {
                self.state.prepend(user.clone());
                Ok(user)
            }
            Err(err) => {
                self.state.set_error(err.display_message(FALLBACK));
                Err(err.into())
            }
        }
    }

    /// Update a user, replacing the cached row in place. A response for a
    /// user no longer cached leaves the collection untouched.
    pub async fn update_user(&self, id: i64, payload: &UpdateUser) -> ClientResult<UserRecord> {
        let payload = payload.sanitized();
        let employ_code = validation::validate_user_update(&payload)?;

        info!("Updating user: {}", id);
        let _guard = self.state.begin_submitting();

        let password = (!payload.password.is_empty()).then_some(payload.password);
        let body = UpdateUserRequest {
            name: payload.name,
            email: payload.email,
            username: payload.username,
            employ_code,
            password,
        };

        match self
            .client
            .patch::<UserRecord, _>(&format!("/users/{id}"), &body)
            .await
        {
            Ok(user) => {
                self.state.apply_update(id, user.clone());
                Ok(user)
            }
            Err(err) => {
                self.state.set_error(err.display_message(FALLBACK));
                Err(err.into())
            }
        }
    }

    /// Delete a user and drop the cached row.
    pub async fn delete_user(&self, id: i64) -> ClientResult<()> {
        info!("Deleting user: {}", id);
        let _guard = self.state.begin_submitting();

        match self.client.delete(&format!("/users/{id}")).await {
            Ok(()) => {
                self.state.remove(id);
                Ok(())
            }
            Err(err) => {
                self.state.set_error(err.display_message(FALLBACK));
                Err(err.into())
            }
        }
    }

    /// True when at least one user is cached.
    pub fn has_users(&self) -> bool {
        !self.state.snapshot().data.is_empty()
    }

    /// Reset the stored error, e.g. when the user edits a form field.
    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    /// Clone of the current collection snapshot.
    pub fn snapshot(&self) -> Snapshot<Vec<UserRecord>> {
        self.state.snapshot()
    }

    /// Receiver notified after every collection change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Vec<UserRecord>>> {
        self.state.subscribe()
    }
}
