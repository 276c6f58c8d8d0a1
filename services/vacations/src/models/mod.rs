//! Vacations service models

pub mod vacation;

// Re-export for convenience
pub use vacation::{NewVacation, Vacation, VacationStatus};
