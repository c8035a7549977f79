//! # Utilities Module
//!
//! Field validators shared by the entity constructors and setters.
//!
//! Every writable field is checked on its own, at the moment it is
//! assigned. Validators take raw JSON values so that type mismatches
//! (a string age, a float time) are rejected the same way as range
//! violations.

use serde_json::Value;
use thiserror::Error;

/// Youngest camper accepted.
pub const MIN_CAMPER_AGE: i32 = 8;

/// Oldest camper accepted.
pub const MAX_CAMPER_AGE: i32 = 18;

/// Latest signup hour (signups use a 24-hour clock).
pub const MAX_SIGNUP_HOUR: i32 = 23;

/// A field failed its write-time check.
///
/// The message is logged server side only; callers always receive the
/// generic `{"errors": ["validation errors"]}` body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name must be a non-empty string.")]
    InvalidName,

    #[error("Age must be between 8 and 18, inclusive.")]
    InvalidAge,

    #[error("Time must be an integer between 0 and 23, inclusive.")]
    InvalidTime,

    /// A foreign key was absent or not an integer.
    #[error("{0} must be an integer id.")]
    InvalidReference(&'static str),

    /// A foreign key points at a row that does not exist.
    #[error("{entity} {id} does not exist.")]
    MissingReference { entity: &'static str, id: i64 },

    /// A required field was absent from a create body.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Validate a camper name: a JSON string that is not empty.
///
/// Whitespace-only names pass; only the empty string is rejected.
pub fn validate_name(value: &Value) -> Result<String, ValidationError> {
    match value.as_str() {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(ValidationError::InvalidName),
    }
}

/// Validate a camper age: a JSON integer in `8..=18`.
pub fn validate_age(value: &Value) -> Result<i32, ValidationError> {
    integer_in_range(value, MIN_CAMPER_AGE, MAX_CAMPER_AGE).ok_or(ValidationError::InvalidAge)
}

/// Validate a signup hour: a JSON integer in `0..=23`.
pub fn validate_time(value: &Value) -> Result<i32, ValidationError> {
    integer_in_range(value, 0, MAX_SIGNUP_HOUR).ok_or(ValidationError::InvalidTime)
}

/// Validate a foreign key value: any JSON integer.
///
/// Existence of the referenced row is checked by the store.
pub fn validate_reference(value: &Value, field: &'static str) -> Result<i64, ValidationError> {
    value
        .as_i64()
        .ok_or(ValidationError::InvalidReference(field))
}

/// `as_i64` already rejects floats, strings, booleans and null.
fn integer_in_range(value: &Value, min: i32, max: i32) -> Option<i32> {
    let n = value.as_i64()?;
    if n < i64::from(min) || n > i64::from(max) {
        return None;
    }
    i32::try_from(n).ok()
}
