//! # API Request Handlers
//!
//! Each handler:
//! 1. Extracts the path id and/or JSON body
//! 2. Calls `CampManager`
//! 3. Maps the result to a status code and JSON body
//!
//! ## Error Handling
//!
//! | Error | Status | Body |
//! |-------|--------|------|
//! | `CampError::NotFound` | 404 | `{"error": "Camper not found"}` |
//! | `CampError::Validation` | 400 | `{"errors": ["validation errors"]}` |
//! | `CampError::Store` | 500 | `{"error": "Internal server error"}` |
//!
//! A body that is not a JSON object is also answered with the generic
//! validation body (see [`json_error_handler`]).

use std::sync::Arc;

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::models::{
    CreateCamperRequest, CreateSignupRequest, ErrorResponse, HealthResponse,
    UpdateCamperRequest, ValidationErrorResponse,
};
use crate::services::CampError;
use crate::AppState;

/// Map a service error to its HTTP response.
fn error_response(e: &CampError) -> HttpResponse {
    match e {
        CampError::NotFound(entity) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found(entity))
        }
        CampError::Validation(_) => {
            HttpResponse::BadRequest().json(ValidationErrorResponse::generic())
        }
        CampError::Store(err) => {
            error!("Store failure: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse::internal())
        }
    }
}

/// Turn JSON extractor failures into the generic validation response.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected body on {} {}: {}", req.method(), req.path(), err);
    let response = HttpResponse::BadRequest().json(ValidationErrorResponse::generic());
    InternalError::from_response(err, response).into()
}

/// `GET /` returns an empty 200.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Health check endpoint.
///
/// `GET /health` answers 200 when the store responds, 503 otherwise.
pub async fn health_check(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let store = state.manager.store();
    let healthy = store.ping().await;

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        database: store.backend_name().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    HttpResponse::build(status_code).json(response)
}

/// List campers.
///
/// `GET /campers` → 200, `[{"id": 1, "name": "Ann", "age": 12}]`
pub async fn list_campers(state: web::Data<Arc<AppState>>) -> HttpResponse {
    match state.manager.list_campers().await {
        Ok(campers) => HttpResponse::Ok().json(campers),
        Err(e) => error_response(&e),
    }
}

/// Create a camper.
///
/// ```bash
/// curl -X POST http://127.0.0.1:5555/campers \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Ann", "age": 12}'
/// ```
///
/// 201 with the camper, 400 on validation failure.
pub async fn create_camper(
    state: web::Data<Arc<AppState>>,
    body: web::Json<CreateCamperRequest>,
) -> HttpResponse {
    match state.manager.create_camper(body.into_inner()).await {
        Ok(camper) => HttpResponse::Created().json(camper),
        Err(e) => error_response(&e),
    }
}

/// Fetch one camper with its signups.
///
/// `GET /campers/{id}` → 200, or 404 `{"error": "Camper not found"}`
pub async fn get_camper(state: web::Data<Arc<AppState>>, path: web::Path<i64>) -> HttpResponse {
    let id = path.into_inner();
    match state.manager.get_camper(id).await {
        Ok(camper) => HttpResponse::Ok().json(camper),
        Err(e) => error_response(&e),
    }
}

/// Partially update a camper.
///
/// `PATCH /campers/{id}` with e.g. `{"age": 13}` → 202, 404 or 400.
pub async fn update_camper(
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
    body: web::Json<UpdateCamperRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    match state.manager.update_camper(id, &body.fields).await {
        Ok(camper) => HttpResponse::Accepted().json(camper),
        Err(e) => error_response(&e),
    }
}

/// List activities.
///
/// `GET /activities` → 200, `[{"id": 1, "name": "Archery", "difficulty": 2}]`
pub async fn list_activities(state: web::Data<Arc<AppState>>) -> HttpResponse {
    match state.manager.list_activities().await {
        Ok(activities) => HttpResponse::Ok().json(activities),
        Err(e) => error_response(&e),
    }
}

/// Delete an activity and its signups.
///
/// `DELETE /activities/{id}` → 204 with an empty body, or 404.
pub async fn delete_activity(
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
) -> HttpResponse {
    let id = path.into_inner();
    match state.manager.delete_activity(id).await {
        Ok(()) => {
            info!("Activity {} deleted", id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => error_response(&e),
    }
}

/// Sign a camper up for an activity.
///
/// ```bash
/// curl -X POST http://127.0.0.1:5555/signups \
///   -H "Content-Type: application/json" \
///   -d '{"time": 9, "camper_id": 1, "activity_id": 1}'
/// ```
///
/// 201 with the signup and both parents; 400 on a bad hour or unknown id.
pub async fn create_signup(
    state: web::Data<Arc<AppState>>,
    body: web::Json<CreateSignupRequest>,
) -> HttpResponse {
    match state.manager.create_signup(body.into_inner()).await {
        Ok(signup) => HttpResponse::Created().json(signup),
        Err(e) => error_response(&e),
    }
}
