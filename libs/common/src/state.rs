//! Observable state engine for the resource services
//!
//! Each service owns one [`StateCell`] holding the current [`Snapshot`] of
//! its resource. Mutations go through the narrow API below and are published
//! over a `tokio::sync::watch` channel, so consumers only ever observe
//! fully-formed snapshots.

use std::sync::Arc;

use tokio::sync::watch;

/// The current value of a service's observable state
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<S> {
    /// Resource data: a collection for list services, a session for auth
    pub data: S,
    /// True while a read call is in flight
    pub is_loading: bool,
    /// True while a mutating call is in flight
    pub is_submitting: bool,
    /// Message of the most recent failed call, kept until the next mutating
    /// action or an explicit clear
    pub error: Option<String>,
}

impl<S> Snapshot<S> {
    fn new(data: S) -> Self {
        Snapshot {
            data,
            is_loading: false,
            is_submitting: false,
            error: None,
        }
    }
}

/// Identifier projection for items kept in a collection snapshot
pub trait Identified {
    type Id: Copy + PartialEq;

    fn id(&self) -> Self::Id;
}

/// State container owned by one resource service
///
/// Operations on the same cell are not mutually exclusive: overlapping calls
/// race, and the last response to arrive determines the final state. For
/// edits to the same identifier that means last-response-wins rather than
/// last-user-action-wins.
#[derive(Debug)]
pub struct StateCell<S> {
    tx: Arc<watch::Sender<Snapshot<S>>>,
}

impl<S> Clone for StateCell<S> {
    fn clone(&self) -> Self {
        StateCell {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<S: Clone> StateCell<S> {
    pub fn new(data: S) -> Self {
        let (tx, _rx) = watch::channel(Snapshot::new(data));
        StateCell { tx: Arc::new(tx) }
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> Snapshot<S> {
        self.tx.borrow().clone()
    }

    /// Receiver notified after every published change. Dropping it stops
    /// observation; in-flight calls keep running.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<S>> {
        self.tx.subscribe()
    }

    /// Flag a read call as in flight and clear any prior error.
    ///
    /// The returned guard resets the flag when dropped, whether the call
    /// finished or its future was cancelled mid-await.
    #[must_use = "the loading flag resets when the guard drops"]
    pub fn begin_loading(&self) -> InFlightGuard<'_, S> {
        self.tx.send_modify(|snapshot| {
            snapshot.is_loading = true;
            snapshot.error = None;
        });
        InFlightGuard {
            cell: self,
            flag: InFlightFlag::Loading,
        }
    }

    /// Flag a mutating call as in flight and clear any prior error.
    #[must_use = "the submitting flag resets when the guard drops"]
    pub fn begin_submitting(&self) -> InFlightGuard<'_, S> {
        self.tx.send_modify(|snapshot| {
            snapshot.is_submitting = true;
            snapshot.error = None;
        });
        InFlightGuard {
            cell: self,
            flag: InFlightFlag::Submitting,
        }
    }

    /// Store the normalized message of a failed call.
    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx
            .send_modify(|snapshot| snapshot.error = Some(message));
    }

    /// Reset the stored error without touching the in-flight flags.
    pub fn clear_error(&self) {
        self.tx.send_modify(|snapshot| snapshot.error = None);
    }

    /// Apply `f` to the resource data and publish the result.
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(|snapshot| f(&mut snapshot.data));
    }
}

impl<T: Identified + Clone> StateCell<Vec<T>> {
    /// Replace the whole collection with the server response.
    pub fn replace_all(&self, items: Vec<T>) {
        self.update(|data| *data = items);
    }

    /// Insert a newly created item at the front; existing items keep their
    /// order.
    pub fn prepend(&self, item: T) {
        self.update(|data| data.insert(0, item));
    }

    /// Replace the item with a matching id in place, preserving its
    /// position. An id with no matching item is silently ignored.
    pub fn apply_update(&self, id: T::Id, item: T) {
        self.update(|data| {
            if let Some(slot) = data.iter_mut().find(|candidate| candidate.id() == id) {
                *slot = item;
            }
        });
    }

    /// Remove the item with a matching id; absence is a no-op.
    pub fn remove(&self, id: T::Id) {
        self.update(|data| data.retain(|item| item.id() != id));
    }
}

enum InFlightFlag {
    Loading,
    Submitting,
}

/// Drop guard that resets an in-flight flag
pub struct InFlightGuard<'a, S> {
    cell: &'a StateCell<S>,
    flag: InFlightFlag,
}

impl<S> Drop for InFlightGuard<'_, S> {
    fn drop(&mut self) {
        self.cell.tx.send_modify(|snapshot| match self.flag {
            InFlightFlag::Loading => snapshot.is_loading = false,
            InFlightFlag::Submitting => snapshot.is_submitting = false,
        });
    }
}
