//! Field-level validation shared by every write path

use serde_json::Value;
use thiserror::Error;

/// Maximum number of cities a lawyer may serve
pub const MAX_SERVICE_CITIES: usize = 4;

/// A rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "This field is required.")
    }
}

/// Require a non-blank value no longer than `max_len` characters.
///
/// Surrounding whitespace is trimmed before storing.
pub fn required_text(
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> Result<String, ValidationError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => check_len(field, v, max_len),
        _ => Err(ValidationError::required(field)),
    }
}

/// Accept a missing or blank value as `None`, otherwise enforce `max_len`.
pub fn optional_text(
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => check_len(field, v, max_len).map(Some),
        _ => Ok(None),
    }
}

fn check_len(field: &str, value: String, max_len: usize) -> Result<String, ValidationError> {
    if value.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("Ensure this field has no more than {} characters.", max_len),
        ));
    }
    Ok(value)
}

/// Collapse duplicate city ids and enforce the service-city ceiling.
///
/// Order of first appearance is kept.
pub fn normalize_service_city_ids(ids: &[i64]) -> Result<Vec<i64>, ValidationError> {
    let mut unique: Vec<i64> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    if unique.len() > MAX_SERVICE_CITIES {
        return Err(ValidationError::new(
            "service_city_ids",
            format!("You can select up to {} cities.", MAX_SERVICE_CITIES),
        ));
    }
    Ok(unique)
}

/// Ratings are on a 0 to 5 scale.
pub fn validate_rating(rating: f64) -> Result<f64, ValidationError> {
    if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
        return Err(ValidationError::new(
            "rating",
            "Rating must be a number between 0 and 5.",
        ));
    }
    Ok(rating)
}

/// Read a record id sent either as a JSON number or as a digit string.
pub fn parse_id(field: &str, value: Option<&Value>) -> Result<i64, ValidationError> {
    let id = match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::Number(n)) => Some(n.as_i64()),
        Some(Value::String(s)) => Some(s.trim().parse::<i64>().ok()),
        Some(_) => Some(None),
    };
    match id {
        None => Err(ValidationError::new(field, format!("{} is required.", field))),
        Some(Some(id)) if id > 0 => Ok(id),
        Some(_) => Err(ValidationError::new(
            field,
            format!("{} must be a positive integer.", field),
        )),
    }
}
