//! Vacations resource service for the leavedesk client
//!
//! Handles the vacation-request workflow: listing requests, submitting new
//! ones, and reviewing them, with form validation gating submission.

pub mod models;
pub mod service;
pub mod validation;

pub use service::VacationsService;
