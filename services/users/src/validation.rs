//! User form validation

use std::sync::OnceLock;

use regex::Regex;

use common::error::ValidationErrors;

use crate::models::{NewUser, UpdateUser};

/// Validate name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    Ok(())
}

/// Validate password; `required` distinguishes creation from an edit,
/// where an empty password keeps the current one
pub fn validate_password(password: &str, required: bool) -> Result<(), String> {
    if password.is_empty() {
        if required {
            return Err("Password is required".to_string());
        }
        return Ok(());
    }

    if password.len() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    Ok(())
}

/// Validate the employee code and coerce it to its numeric form.
pub fn validate_employ_code(employ_code: &str) -> Result<i64, String> {
    if employ_code.is_empty() {
        return Err("Employee code is required".to_string());
    }

    employ_code
        .parse::<i64>()
        .map_err(|_| "Employee code must be a number".to_string())
}

/// Validate a sanitized create payload, returning the numeric employee code.
pub fn validate_new_user(user: &NewUser) -> Result<i64, ValidationErrors> {
    validate_user_fields(
        &user.name,
        &user.email,
        &user.username,
        &user.password,
        true,
        &user.employ_code,
    )
}

/// Validate a sanitized update payload, returning the numeric employee code.
pub fn validate_user_update(user: &UpdateUser) -> Result<i64, ValidationErrors> {
    validate_user_fields(
        &user.name,
        &user.email,
        &user.username,
        &user.password,
        false,
        &user.employ_code,
    )
}

fn validate_user_fields(
    name: &str,
    email: &str,
    username: &str,
    password: &str,
    password_required: bool,
    employ_code: &str,
) -> Result<i64, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Err(message) = validate_name(name) {
        errors.push("name", message);
    }
    if let Err(message) = validate_email(email) {
        errors.push("email", message);
    }
    if let Err(message) = validate_username(username) {
        errors.push("username", message);
    }
    if let Err(message) = validate_password(password, password_required) {
        errors.push("password", message);
    }

    let employ_code = match validate_employ_code(employ_code) {
        Ok(code) => code,
        Err(message) => {
            errors.push("employ_code", message);
            return Err(errors);
        }
    };

    errors.into_result()?;
    Ok(employ_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_new_user() -> NewUser {
        NewUser {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            password: "secret1".to_string(),
            employ_code: "100".to_string(),
        }
    }

    #[test]
    fn a_valid_payload_yields_the_numeric_code() {
        assert_eq!(validate_new_user(&valid_new_user()), Ok(100));
    }

    #[test]
    fn a_non_numeric_employ_code_is_a_field_error() {
        let mut user = valid_new_user();
        user.employ_code = "abc".to_string();

        let errors = validate_new_user(&user).expect_err("code must be numeric");
        assert_eq!(
            errors.field("employ_code"),
            Some("Employee code must be a number")
        );
    }

    #[test]
    fn a_malformed_email_is_rejected() {
        let mut user = valid_new_user();
        user.email = "not-an-email".to_string();

        let errors = validate_new_user(&user).expect_err("email shape is checked");
        assert_eq!(errors.field("email"), Some("Invalid email format"));
    }

    #[test]
    fn a_short_password_is_rejected_on_create() {
        let mut user = valid_new_user();
        user.password = "abc".to_string();

        let errors = validate_new_user(&user).expect_err("six characters minimum");
        assert_eq!(
            errors.field("password"),
            Some("Password must be at least 6 characters long")
        );
    }

    #[test]
    fn an_empty_password_is_allowed_on_update() {
        let update = UpdateUser {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            password: String::new(),
            employ_code: "100".to_string(),
        };

        assert_eq!(validate_user_update(&update), Ok(100));
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let errors = validate_new_user(&NewUser::default()).expect_err("nothing filled in");

        assert_eq!(errors.field("name"), Some("Name is required"));
        assert_eq!(errors.field("email"), Some("Email is required"));
        assert_eq!(errors.field("username"), Some("Username is required"));
        assert_eq!(errors.field("password"), Some("Password is required"));
        assert_eq!(errors.field("employ_code"), Some("Employee code is required"));
    }
}
