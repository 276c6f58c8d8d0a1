//! Common library for the leavedesk client
//!
//! This crate provides the shared plumbing used by the resource state
//! services: the HTTP client, the persistent key-value store, error
//! handling, and the observable state engine.

pub mod client;
pub mod error;
pub mod state;
pub mod storage;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialise the global tracing subscriber.
///
/// Later calls leave an already-installed subscriber in place, so tests may
/// call this freely.
pub fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
