//! Vacation request validation

use chrono::NaiveDate;

use common::error::ValidationErrors;

use crate::models::NewVacation;

/// Validate reason
pub fn validate_reason(reason: &str) -> Result<(), String> {
    if reason.is_empty() {
        return Err("Reason is required".to_string());
    }

    if reason.len() < 3 {
        return Err("Reason must be at least 3 characters long".to_string());
    }

    Ok(())
}

/// Parse a form date, ignoring any time part after the calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    if value.is_empty() {
        return Err("Date is required".to_string());
    }

    let date_part = value.split_once('T').map_or(value, |(date, _)| date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| "Date must be a valid calendar date".to_string())
}

/// Validate a sanitized vacation request, returning the parsed date range.
pub fn validate_request(request: &NewVacation) -> Result<(NaiveDate, NaiveDate), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let date_from = match parse_date(&request.date_from) {
        Ok(date) => Some(date),
        Err(message) => {
            errors.push("date_from", message);
            None
        }
    };
    let date_to = match parse_date(&request.date_to) {
        Ok(date) => Some(date),
        Err(message) => {
            errors.push("date_to", message);
            None
        }
    };

    if let Err(message) = validate_reason(&request.reason) {
        errors.push("reason", message);
    }

    if let (Some(from), Some(to)) = (date_from, date_to) {
        if to < from {
            errors.push("date_to", "End date must not be before the start date");
        } else if errors.is_empty() {
            return Ok((from, to));
        }
    }

    Err(errors)
}
