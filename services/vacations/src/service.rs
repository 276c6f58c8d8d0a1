//! Vacations resource service
//!
//! Mirrors the server's vacation-request list: fetches replace the whole
//! collection, new requests prepend, status reviews replace the matching
//! entry in place. Overlapping calls are not serialized, so concurrent
//! reviews of the same request resolve to whichever response arrives last.

use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

use common::client::ApiClient;
use common::error::ClientResult;
use common::state::{Snapshot, StateCell};

use crate::models::{NewVacation, Vacation, VacationStatus};
use crate::validation;

const FALLBACK: &str = "Something went wrong. Please try again later.";

/// Body of the request endpoint; dates are calendar dates only
#[derive(Debug, Serialize)]
struct RequestVacationBody {
    date_from: String,
    date_to: String,
    reason: String,
}

/// Body of the review endpoint
#[derive(Debug, Serialize)]
struct UpdateStatusBody {
    status_id: VacationStatus,
}

/// Vacations resource service
#[derive(Clone)]
pub struct VacationsService {
    client: ApiClient,
    state: StateCell<Vec<Vacation>>,
}

impl VacationsService {
    pub fn new(client: ApiClient) -> Self {
        VacationsService {
            client,
            state: StateCell::new(Vec::new()),
        }
    }

    /// Fetch all visible vacation requests, replacing the cached
    /// collection. A null response body counts as an empty list.
    pub async fn fetch_vacations(&self) -> ClientResult<Vec<Vacation>> {
        info!("Fetching vacations");
        let _guard = self.state.begin_loading();

        match self.client.get::<Option<Vec<Vacation>>>("/vacations").await {
            Ok(vacations) => {
                let vacations = vacations.unwrap_or_default();
                self.state.replace_all(vacations.clone());
                Ok(vacations)
            }
            Err(err) => {
                self.state.set_error(err.display_message(FALLBACK));
                Err(err.into())
            }
        }
    }

    /// Submit a vacation request and prepend the created entry. Dates are
    /// normalized to their calendar-date part before submission.
    pub async fn request_vacation(&self, payload: &NewVacation) -> ClientResult<Vacation> {
        let payload = payload.sanitized();
        let (date_from, date_to) = validation::validate_request(&payload)?;

        info!("Requesting vacation from {} to {}", date_from, date_to);
        let _guard = self.state.begin_submitting();

        let body = RequestVacationBody {
            date_from: date_from.to_string(),
            date_to: date_to.to_string(),
            reason: payload.reason,
        };

        match self.client.post::<Vacation, _>("/vacations", &body).await {
            Ok(vacation) => {
                self.state.prepend(vacation.clone());
                Ok(vacation)
            }
            Err(err) => {
                self.state.set_error(err.display_message(FALLBACK));
                Err(err.into())
            }
        }
    }

    /// Change the review status of a request, replacing the cached entry in
    /// place. A response for a request no longer cached leaves the
    /// collection untouched.
    pub async fn update_status(&self, id: i64, status: VacationStatus) -> ClientResult<Vacation> {
        info!("Updating vacation {} to status {}", id, status.label());
        let _guard = self.state.begin_submitting();

        let body = UpdateStatusBody { status_id: status };
        match self
            .client
            .put::<Vacation, _>(&format!("/vacations/{id}"), &body)
            .await
        {
            Ok(vacation) => {
                self.state.apply_update(id, vacation.clone());
                Ok(vacation)
            }
            Err(err) => {
                self.state.set_error(err.display_message(FALLBACK));
                Err(err.into())
            }
        }
    }

    /// True when at least one request is cached.
    pub fn has_vacations(&self) -> bool {
        !self.state.snapshot().data.is_empty()
    }

    /// Reset the stored error, e.g. when the user edits a form field.
    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    /// Clone of the current collection snapshot.
    pub fn snapshot(&self) -> Snapshot<Vec<Vacation>> {
        self.state.snapshot()
    }

    /// Receiver notified after every collection change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Vec<Vacation>>> {
        self.state.subscribe()
    }
}
