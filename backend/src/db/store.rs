//! # Store Abstraction
//!
//! `CampStore` is the seam between the service layer and persistence.
//! Two implementations exist:
//!
//! - [`Database`](super::Database): PostgreSQL through deadpool-postgres
//! - [`MemoryStore`](super::MemoryStore): in-process tables, used when no
//!   `DATABASE_URL` is configured and by the test suite
//!
//! Every write is all-or-nothing. Deletes cascade to signups.

use async_trait::async_trait;
use thiserror::Error;

use super::models::{Activity, Camper, NewActivity, NewCamper, NewSignup, Signup};
use super::DatabaseError;

/// Errors surfaced by a store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A signup referenced a camper or activity that does not exist.
    #[error("{entity} {id} does not exist")]
    MissingReference { entity: &'static str, id: i64 },

    /// The backing database failed.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(e: tokio_postgres::Error) -> Self {
        StoreError::Database(DatabaseError::QueryError(e))
    }
}

/// Persistence operations for campers, activities and signups.
#[async_trait]
pub trait CampStore: Send + Sync {
    /// Short name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;

    /// Check that the backend answers.
    async fn ping(&self) -> bool;

    // ==========================================
    // CAMPERS
    // ==========================================

    /// All campers, ordered by id.
    async fn list_campers(&self) -> Result<Vec<Camper>, StoreError>;

    async fn get_camper(&self, id: i64) -> Result<Option<Camper>, StoreError>;

    async fn insert_camper(&self, camper: NewCamper) -> Result<Camper, StoreError>;

    /// Overwrite a camper's fields. Returns `false` if the row is gone.
    async fn update_camper(&self, camper: &Camper) -> Result<bool, StoreError>;

    /// Delete a camper and its signups. Returns `false` if absent.
    async fn delete_camper(&self, id: i64) -> Result<bool, StoreError>;

    // ==========================================
    // ACTIVITIES
    // ==========================================

    /// All activities, ordered by id.
    async fn list_activities(&self) -> Result<Vec<Activity>, StoreError>;

    async fn get_activity(&self, id: i64) -> Result<Option<Activity>, StoreError>;

    async fn insert_activity(&self, activity: NewActivity) -> Result<Activity, StoreError>;

    /// Delete an activity and its signups. Returns `false` if absent.
    async fn delete_activity(&self, id: i64) -> Result<bool, StoreError>;

    // ==========================================
    // SIGNUPS
    // ==========================================

    /// Insert a signup after checking both parents exist.
    ///
    /// Fails with [`StoreError::MissingReference`] and writes nothing if
    /// either parent is missing.
    async fn insert_signup(&self, signup: NewSignup) -> Result<Signup, StoreError>;

    /// Signups of one camper, ordered by id.
    async fn signups_for_camper(&self, camper_id: i64) -> Result<Vec<Signup>, StoreError>;

    /// Signups for one activity, ordered by id.
    async fn signups_for_activity(&self, activity_id: i64) -> Result<Vec<Signup>, StoreError>;
}
