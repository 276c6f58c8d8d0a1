//! Users resource service for the leavedesk client
//!
//! Administers the server's user list: loading, creating, updating, and
//! deleting accounts, with form validation gating every mutation.

pub mod models;
pub mod service;
pub mod validation;

pub use service::UsersService;
