//! # Services Module
//!
//! Business logic for the camp backend.
//!
//! | Service | Responsibility |
//! |---------|---------------|
//! | `CampManager` | Validation, store calls and response views for campers, activities and signups |

pub mod camp_manager;

pub use camp_manager::{CampError, CampManager};
