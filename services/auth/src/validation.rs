//! Login form validation

use common::error::ValidationErrors;

use crate::models::LoginCredentials;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username is required".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    Ok(())
}

/// Validate login credentials before they are submitted.
pub fn validate_credentials(credentials: &LoginCredentials) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Err(message) = validate_username(&credentials.username) {
        errors.push("username", message);
    }
    if let Err(message) = validate_password(&credentials.password) {
        errors.push("password", message);
    }

    errors.into_result()
}
