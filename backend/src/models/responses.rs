//! # API Response Models
//!
//! One struct per response shape. Each endpoint picks the view it needs,
//! which is how mutual references are cut: a nested parent is always a
//! flat view without its own `signups`, and no view carries the derived
//! `activities` / `campers` collections.
//!
//! | View | Used by |
//! |------|---------|
//! | `CamperView` | list, create and update campers; parent inside `SignupDetailView` |
//! | `CamperDetailView` | `GET /campers/{id}` |
//! | `SignupWithActivityView` | items of `CamperDetailView::signups` |
//! | `ActivityView` | `GET /activities`; nested parent in signup views |
//! | `SignupDetailView` | `POST /signups` |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Activity, Camper, Signup};

/// Generic body returned for every validation failure.
pub const VALIDATION_ERRORS: &str = "validation errors";

/// `{"error": "<Entity> not found"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn not_found(entity: &str) -> Self {
        Self {
            error: format!("{} not found", entity),
        }
    }

    pub fn internal() -> Self {
        Self {
            error: "Internal server error".to_string(),
        }
    }
}

/// `{"errors": ["validation errors"]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<String>,
}

impl ValidationErrorResponse {
    pub fn generic() -> Self {
        Self {
            errors: vec![VALIDATION_ERRORS.to_string()],
        }
    }
}

/// A camper without relationships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CamperView {
    pub id: i64,
    pub name: String,
    pub age: i32,
}

impl From<&Camper> for CamperView {
    fn from(camper: &Camper) -> Self {
        Self {
            id: camper.id(),
            name: camper.name().to_string(),
            age: camper.age(),
        }
    }
}

/// An activity without relationships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityView {
    pub id: i64,
    pub name: Option<String>,
    pub difficulty: Option<i32>,
}

impl From<&Activity> for ActivityView {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            name: activity.name.clone(),
            difficulty: activity.difficulty,
        }
    }
}

/// A signup as seen from its camper: the back-reference is omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupWithActivityView {
    pub id: i64,
    pub time: i32,
    pub camper_id: i64,
    pub activity_id: i64,
    pub activity: ActivityView,
}

impl SignupWithActivityView {
    pub fn new(signup: &Signup, activity: &Activity) -> Self {
        Self {
            id: signup.id(),
            time: signup.time(),
            camper_id: signup.camper_id(),
            activity_id: signup.activity_id(),
            activity: activity.into(),
        }
    }
}

/// A single camper with its signups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CamperDetailView {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub signups: Vec<SignupWithActivityView>,
}

impl CamperDetailView {
    pub fn new(camper: &Camper, signups: Vec<SignupWithActivityView>) -> Self {
        Self {
            id: camper.id(),
            name: camper.name().to_string(),
            age: camper.age(),
            signups,
        }
    }
}

/// A freshly created signup with both parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupDetailView {
    pub id: i64,
    pub time: i32,
    pub camper_id: i64,
    pub activity_id: i64,
    pub camper: CamperView,
    pub activity: ActivityView,
}

impl SignupDetailView {
    pub fn new(signup: &Signup, camper: &Camper, activity: &Activity) -> Self {
        Self {
            id: signup.id(),
            time: signup.time(),
            camper_id: signup.camper_id(),
            activity_id: signup.activity_id(),
            camper: camper.into(),
            activity: activity.into(),
        }
    }
}

/// Health check response.
///
/// ```json
/// {
///     "status": "healthy",
///     "database": "postgres",
///     "version": "0.1.0",
///     "timestamp": "2026-07-01T12:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}
