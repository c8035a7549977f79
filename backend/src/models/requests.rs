//! # API Request Models
//!
//! Incoming JSON bodies. Field values are kept as raw `serde_json::Value`
//! so the entity validators decide what counts as a valid name, age or
//! hour; serde only checks that the body is a JSON object.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::utils::ValidationError;

/// Body of `POST /campers`.
///
/// ```json
/// { "name": "Ann", "age": 12 }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCamperRequest {
    pub name: Option<Value>,
    pub age: Option<Value>,
}

/// Body of `PATCH /campers/{id}`: any subset of camper attributes.
///
/// ```json
/// { "age": 13 }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct UpdateCamperRequest {
    pub fields: Map<String, Value>,
}

/// Body of `POST /signups`.
///
/// ```json
/// { "time": 9, "camper_id": 1, "activity_id": 1 }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSignupRequest {
    pub time: Option<Value>,
    pub camper_id: Option<Value>,
    pub activity_id: Option<Value>,
}

/// Unwrap a required body field, turning absence into a validation error.
pub fn required<'a>(
    field: &'a Option<Value>,
    name: &'static str,
) -> Result<&'a Value, ValidationError> {
    field.as_ref().ok_or(ValidationError::MissingField(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_camper_keeps_raw_values() {
        let body: CreateCamperRequest =
            serde_json::from_value(json!({"name": "Ann", "age": "12"})).unwrap();
        assert_eq!(body.age, Some(json!("12")));
    }

    #[test]
    fn test_required_reports_missing_field() {
        let body: CreateSignupRequest =
            serde_json::from_value(json!({"time": 9, "camper_id": 1})).unwrap();

        assert!(required(&body.time, "time").is_ok());
        assert_eq!(
            required(&body.activity_id, "activity_id"),
            Err(ValidationError::MissingField("activity_id"))
        );
    }

    #[test]
    fn test_update_request_is_a_plain_object() {
        let body: UpdateCamperRequest =
            serde_json::from_value(json!({"name": "Bea"})).unwrap();
        assert_eq!(body.fields.get("name"), Some(&json!("Bea")));

        assert!(serde_json::from_value::<UpdateCamperRequest>(json!([1, 2])).is_err());
    }
}
