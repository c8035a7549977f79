//! # API Models
//!
//! Request and response structures for the REST API. These are separate
//! from the database models so each endpoint controls its own JSON shape.
//!
//! ## Organization
//!
//! - `requests.rs` - Incoming request bodies
//! - `responses.rs` - Outgoing views and error bodies
//!
//! Field names are snake_case on the wire (`camper_id`, `activity_id`).

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
