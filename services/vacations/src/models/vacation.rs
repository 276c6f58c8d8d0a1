//! Vacation request models

use common::state::Identified;
use serde::{Deserialize, Serialize};

/// Review state of a vacation request, carried on the wire as its numeric
/// id. The enumeration is closed: an unknown id fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VacationStatus {
    Pending = 1,
    Approved = 2,
    Rejected = 3,
}

impl VacationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VacationStatus::Pending => "Pending",
            VacationStatus::Approved => "Approved",
            VacationStatus::Rejected => "Rejected",
        }
    }
}

impl From<VacationStatus> for u8 {
    fn from(status: VacationStatus) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for VacationStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VacationStatus::Pending),
            2 => Ok(VacationStatus::Approved),
            3 => Ok(VacationStatus::Rejected),
            other => Err(format!("unknown vacation status id: {other}")),
        }
    }
}

/// Vacation request as returned by the API. Date and timestamp fields stay
/// in the server's string form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vacation {
    pub id: i64,
    pub user_id: i64,
    pub date_from: String,
    pub date_to: String,
    pub reason: String,
    pub status_id: VacationStatus,
    pub status_name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Identified for Vacation {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Vacation request form input; dates may carry a trailing time part that
/// is dropped before submission
#[derive(Debug, Clone, Default)]
pub struct NewVacation {
    pub date_from: String,
    pub date_to: String,
    pub reason: String,
}

impl NewVacation {
    /// Copy of the form input with every field trimmed.
    pub fn sanitized(&self) -> NewVacation {
        NewVacation {
            date_from: self.date_from.trim().to_string(),
            date_to: self.date_to.trim().to_string(),
            reason: self.reason.trim().to_string(),
        }
    }
}
