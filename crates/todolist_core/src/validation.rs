//! Credential syntax validation.
//!
//! # Responsibility
//! - Check username/password shape before any sign-in or sign-up request.
//! - Produce per-field, human-readable messages for the sign form.
//!
//! # Invariants
//! - Inputs are trimmed before checking.
//! - An empty field reports the empty-field message, never the format one.
//! - Pure and deterministic: no I/O, no logging.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]+(-[a-zA-Z]+)?$").expect("valid username regex"));
static PASSWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_\-!]+$").expect("valid password regex"));

/// Message shown when a field is empty after trimming.
pub const EMPTY_FIELD_MESSAGE: &str = "This field is empty. Please try again.";
/// Message shown when the username does not match the allowed shape.
pub const INVALID_USERNAME_MESSAGE: &str =
    "The username is not valid.\nUse letters and optionally a single hyphen.";
/// Message shown when the password contains disallowed characters.
pub const INVALID_PASSWORD_MESSAGE: &str =
    "The password is not valid.\nUse letters, digits, _, - or !";

/// Per-field validation outcome. Empty strings mean the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub username_error: String,
    pub password_error: String,
}

impl ValidationErrors {
    /// Same message in both slots.
    ///
    /// Used by the sign form to surface a request-level failure through the
    /// field error display.
    pub fn both(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            username_error: message.clone(),
            password_error: message,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.username_error.is_empty() && self.password_error.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.is_valid()
    }
}

/// Validates both credentials and returns per-field messages.
pub fn validate(username: &str, password: &str) -> ValidationErrors {
    ValidationErrors {
        username_error: field_error(username.trim(), &USERNAME_RE, INVALID_USERNAME_MESSAGE),
        password_error: field_error(password.trim(), &PASSWORD_RE, INVALID_PASSWORD_MESSAGE),
    }
}

fn field_error(value: &str, pattern: &Regex, invalid_message: &str) -> String {
    if value.is_empty() {
        return EMPTY_FIELD_MESSAGE.to_string();
    }
    if !pattern.is_match(value) {
        return invalid_message.to_string();
    }
    String::new()
}
