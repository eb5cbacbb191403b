//! Input validation shared by the route handlers
//!
//! Failures map to 422, matching what the JSON extractor returns for
//! missing or unknown fields.

use crate::error::ApiError;

/// Maximum allowed username length
const MAX_USERNAME_LENGTH: usize = 150;
/// Maximum allowed name length
const MAX_NAME_LENGTH: usize = 150;
/// Maximum allowed password length
const MAX_PASSWORD_LENGTH: usize = 256;
const MAX_AUTHOR_LENGTH: usize = 50;
const MAX_TITLE_LENGTH: usize = 200;

/// Validate username format and length
///
/// Only ASCII letters and digits are allowed, which also keeps `:` (the
/// token separator) out of usernames.
pub fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::Unprocessable("Username cannot be empty".to_string()));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ApiError::Unprocessable(format!(
            "Username exceeds maximum length of {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::Unprocessable(
            "Username can only contain letters and digits".to_string(),
        ));
    }
    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::Unprocessable("Password cannot be empty".to_string()));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::Unprocessable(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Validate a first or last name
pub fn validate_name(field: &str, value: &str) -> Result<(), ApiError> {
    validate_text(field, value, MAX_NAME_LENGTH)
}

/// Validate the fields of a new story
pub fn validate_story(author: &str, title: &str, url: &str) -> Result<(), ApiError> {
    validate_text("author", author, MAX_AUTHOR_LENGTH)?;
    validate_text("title", title, MAX_TITLE_LENGTH)?;
    validate_url(url)
}

fn validate_text(field: &str, value: &str, max_length: usize) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Unprocessable(format!("{} cannot be blank", field)));
    }
    if value.chars().count() > max_length {
        return Err(ApiError::Unprocessable(format!(
            "{} exceeds maximum length of {} characters",
            field, max_length
        )));
    }
    Ok(())
}

fn validate_url(value: &str) -> Result<(), ApiError> {
    let invalid = || ApiError::Unprocessable("url must be a valid http or https URL".to_string());

    let parsed = url::Url::parse(value).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }
    Ok(())
}
