//! Declarative per-field request validation, evaluated before any business
//! logic runs. Failures short-circuit with a 422 and a field_errors map.

use std::collections::HashMap;

use crate::error::ApiError;

const INVALID_INPUTS: &str = "Invalid inputs passed, please check your data.";

/// A single per-field check.
pub enum Check {
    NotEmpty,
    MinLen(usize),
    Email,
}

impl Check {
    fn failure(&self) -> String {
        match self {
            Check::NotEmpty => "must not be empty".to_string(),
            Check::MinLen(min) => format!("must be at least {} characters", min),
            Check::Email => "must be a valid email address".to_string(),
        }
    }

    fn passes(&self, value: &str) -> bool {
        match self {
            Check::NotEmpty => !value.trim().is_empty(),
            Check::MinLen(min) => value.chars().count() >= *min,
            Check::Email => is_valid_email(value),
        }
    }
}

/// Run a rule set over (field, value) pairs, collecting every failure.
pub fn check_fields(rules: &[(&'static str, &str, Check)]) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();
    for (field, value, check) in rules {
        if !check.passes(value) {
            field_errors.insert((*field).to_string(), check.failure());
        }
    }
    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::unprocessable_entity(INVALID_INPUTS, field_errors))
    }
}

/// Trim and lowercase, applied before both uniqueness checks and lookups so
/// the same address never registers twice under different casings.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let mut parts = email.splitn(2, '@');
    let (local, domain) = match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => (local, domain),
        _ => return false,
    };
    !local.is_empty() && !domain.is_empty() && domain.contains('.') && !domain.ends_with('.')
}

pub fn validate_signup(name: &str, email: &str, password: &str) -> Result<(), ApiError> {
    check_fields(&[
        ("name", name, Check::NotEmpty),
        ("email", email, Check::Email),
        ("password", password, Check::MinLen(6)),
    ])
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ApiError> {
    check_fields(&[
        ("email", email, Check::Email),
        ("password", password, Check::MinLen(6)),
    ])
}

pub fn validate_create_place(title: &str, description: &str, address: &str) -> Result<(), ApiError> {
    check_fields(&[
        ("title", title, Check::NotEmpty),
        ("description", description, Check::MinLen(5)),
        ("address", address, Check::NotEmpty),
    ])
}

pub fn validate_update_place(title: &str, description: &str) -> Result<(), ApiError> {
    check_fields(&[
        ("title", title, Check::NotEmpty),
        ("description", description, Check::MinLen(5)),
    ])
}
