//! # Database Models
//!
//! The three camp entities and the rows they map to.
//!
//! ## Table Overview
//!
//! | Table | Description |
//! |-------|-------------|
//! | `campers` | Children attending camp |
//! | `activities` | Things campers can sign up for |
//! | `signups` | Join rows: one camper, one activity, one hour |
//!
//! ## Relationship Diagram
//!
//! ```text
//! ┌─────────────┐       ┌──────────────────┐       ┌──────────────┐
//! │   campers   │──────<│     signups      │>──────│  activities  │
//! │             │       │                  │       │              │
//! │ id (PK)     │       │ id (PK)          │       │ id (PK)      │
//! │ name        │       │ time             │       │ name         │
//! │ age         │       │ camper_id (FK)   │       │ difficulty   │
//! └─────────────┘       │ activity_id (FK) │       └──────────────┘
//!                       └──────────────────┘
//! ```
//!
//! Both foreign keys cascade on delete. `Camper.activities` and
//! `Activity.campers` are not stored anywhere; they are traversals over
//! `signups` (see `CampManager::camper_activities`).
//!
//! ## Validation
//!
//! Fields are checked when they are assigned: by the `New*` constructors
//! and by the camper setters. A value that fails its check never reaches
//! the struct, so every `Camper` and `Signup` in memory is valid.

use serde_json::{Map, Value};

use crate::utils::{
    validate_age, validate_name, validate_reference, validate_time, ValidationError,
};

/// A camper that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCamper {
    name: String,
    age: i32,
}

impl NewCamper {
    /// Build a camper from raw JSON values, validating both fields.
    pub fn new(name: &Value, age: &Value) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validate_name(name)?,
            age: validate_age(age)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i32 {
        self.age
    }
}

/// A persisted camper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Camper {
    id: i64,
    name: String,
    age: i32,
}

impl Camper {
    /// Rehydrate a camper from a stored row.
    ///
    /// Rows were validated on the way in, so no checks run here.
    pub(crate) fn from_row(id: i64, name: String, age: i32) -> Self {
        Self { id, name, age }
    }

    /// Attach the id assigned by the store.
    pub(crate) fn from_new(id: i64, new: NewCamper) -> Self {
        Self {
            id,
            name: new.name,
            age: new.age,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn set_name(&mut self, value: &Value) -> Result<(), ValidationError> {
        self.name = validate_name(value)?;
        Ok(())
    }

    pub fn set_age(&mut self, value: &Value) -> Result<(), ValidationError> {
        self.age = validate_age(value)?;
        Ok(())
    }

    /// Apply a partial update, one attribute at a time.
    ///
    /// `name` and `age` are writable. `id` and keys that are not camper
    /// attributes are ignored. If any field fails validation the camper is
    /// left exactly as it was.
    pub fn apply_patch(&mut self, fields: &Map<String, Value>) -> Result<(), ValidationError> {
        let mut patched = self.clone();
        for (key, value) in fields {
            match key.as_str() {
                "name" => patched.set_name(value)?,
                "age" => patched.set_age(value)?,
                _ => {}
            }
        }
        *self = patched;
        Ok(())
    }
}

/// An activity that has not been persisted yet.
///
/// Activities carry no field rules; both columns are nullable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewActivity {
    pub name: Option<String>,
    pub difficulty: Option<i32>,
}

impl NewActivity {
    pub fn new(name: impl Into<String>, difficulty: i32) -> Self {
        Self {
            name: Some(name.into()),
            difficulty: Some(difficulty),
        }
    }
}

/// A persisted activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: i64,
    pub name: Option<String>,
    pub difficulty: Option<i32>,
}

impl Activity {
    pub(crate) fn from_new(id: i64, new: NewActivity) -> Self {
        Self {
            id,
            name: new.name,
            difficulty: new.difficulty,
        }
    }
}

/// A signup that has not been persisted yet.
///
/// The foreign keys are known to be integers; whether they point at real
/// rows is checked by the store inside the insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSignup {
    time: i32,
    camper_id: i64,
    activity_id: i64,
}

impl NewSignup {
    pub fn new(time: &Value, camper_id: &Value, activity_id: &Value) -> Result<Self, ValidationError> {
        Ok(Self {
            time: validate_time(time)?,
            camper_id: validate_reference(camper_id, "camper_id")?,
            activity_id: validate_reference(activity_id, "activity_id")?,
        })
    }

    pub fn time(&self) -> i32 {
        self.time
    }

    pub fn camper_id(&self) -> i64 {
        self.camper_id
    }

    pub fn activity_id(&self) -> i64 {
        self.activity_id
    }
}

/// A persisted signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    id: i64,
    time: i32,
    camper_id: i64,
    activity_id: i64,
}

impl Signup {
    pub(crate) fn from_row(id: i64, time: i32, camper_id: i64, activity_id: i64) -> Self {
        Self {
            id,
            time,
            camper_id,
            activity_id,
        }
    }

    pub(crate) fn from_new(id: i64, new: NewSignup) -> Self {
        Self::from_row(id, new.time, new.camper_id, new.activity_id)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn time(&self) -> i32 {
        self.time
    }

    pub fn camper_id(&self) -> i64 {
        self.camper_id
    }

    pub fn activity_id(&self) -> i64 {
        self.activity_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ann() -> Camper {
        let new = NewCamper::new(&json!("Ann"), &json!(12)).unwrap();
        Camper::from_new(1, new)
    }

    #[test]
    fn test_new_camper_validates_on_construction() {
        assert!(NewCamper::new(&json!("Ann"), &json!(12)).is_ok());
        assert_eq!(
            NewCamper::new(&json!("Ann"), &json!(5)),
            Err(ValidationError::InvalidAge)
        );
        assert_eq!(
            NewCamper::new(&json!(""), &json!(12)),
            Err(ValidationError::InvalidName)
        );
    }

    #[test]
    fn test_setters_reject_without_mutating() {
        let mut camper = ann();

        assert!(camper.set_age(&json!(19)).is_err());
        assert!(camper.set_name(&json!("")).is_err());
        assert_eq!(camper, ann());

        camper.set_age(&json!(17)).unwrap();
        assert_eq!(camper.age(), 17);
    }

    #[test]
    fn test_apply_patch_is_all_or_nothing() {
        let mut camper = ann();
        let patch = json!({"name": "Bea", "age": 30});

        let result = camper.apply_patch(patch.as_object().unwrap());

        assert_eq!(result, Err(ValidationError::InvalidAge));
        assert_eq!(camper.name(), "Ann");
        assert_eq!(camper.age(), 12);
    }

    #[test]
    fn test_apply_patch_ignores_id_and_unknown_keys() {
        let mut camper = ann();
        let patch = json!({"id": 99, "nickname": "A", "age": 9});

        camper.apply_patch(patch.as_object().unwrap()).unwrap();

        assert_eq!(camper.id(), 1);
        assert_eq!(camper.age(), 9);
        assert_eq!(camper.name(), "Ann");
    }

    #[test]
    fn test_new_signup_validation() {
        let signup = NewSignup::new(&json!(9), &json!(1), &json!(2)).unwrap();
        assert_eq!(signup.time(), 9);
        assert_eq!(signup.camper_id(), 1);
        assert_eq!(signup.activity_id(), 2);

        assert_eq!(
            NewSignup::new(&json!(25), &json!(1), &json!(2)),
            Err(ValidationError::InvalidTime)
        );
        assert_eq!(
            NewSignup::new(&json!(9), &json!(null), &json!(2)),
            Err(ValidationError::InvalidReference("camper_id"))
        );
    }
}
