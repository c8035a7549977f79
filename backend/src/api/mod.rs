//! # REST API Module
//!
//! HTTP endpoints for the camp backend.
//!
//! ## Endpoint Overview
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/campers` | List campers |
//! | POST | `/campers` | Create camper |
//! | GET | `/campers/{id}` | Camper with signups |
//! | PATCH | `/campers/{id}` | Partial camper update |
//! | GET | `/activities` | List activities |
//! | DELETE | `/activities/{id}` | Delete activity and its signups |
//! | POST | `/signups` | Sign a camper up for an activity |
//! | GET | `/health` | Health check |
//!
//! ## Request/Response Format
//!
//! Bodies are plain JSON objects, not wrapped in an envelope:
//!
//! ```json
//! // 201 POST /campers
//! { "id": 1, "name": "Ann", "age": 12 }
//!
//! // 404
//! { "error": "Camper not found" }
//!
//! // 400
//! { "errors": ["validation errors"] }
//! ```

pub mod handlers;
pub mod routes;

pub use routes::configure_routes;
