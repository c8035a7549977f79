//! # Database Queries
//!
//! SQL for the camp tables. Each function performs one logical operation.
//!
//! ## Query Organization
//!
//! - `camper_*` - campers table
//! - `activity_*` - activities table
//! - `signup_*` - signups table
//!
//! Operations that touch more than one row (cascading deletes, signup
//! creation with parent checks) run inside a single transaction.
//!
//! ## Error Handling
//!
//! All queries return `Result<T, StoreError>`. Pool failures become
//! `DatabaseError::ConnectionError`, SQL failures `DatabaseError::QueryError`.

use deadpool_postgres::{Client, Pool};
use tokio_postgres::Row;
use tracing::{debug, info};

use super::models::*;
use super::store::StoreError;
use super::DatabaseError;

// ============================================
// HELPER FUNCTIONS
// ============================================

async fn client(pool: &Pool) -> Result<Client, StoreError> {
    pool.get()
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()).into())
}

fn row_to_camper(row: &Row) -> Camper {
    Camper::from_row(row.get("id"), row.get("name"), row.get("age"))
}

fn row_to_activity(row: &Row) -> Activity {
    Activity {
        id: row.get("id"),
        name: row.get("name"),
        difficulty: row.get("difficulty"),
    }
}

fn row_to_signup(row: &Row) -> Signup {
    Signup::from_row(
        row.get("id"),
        row.get("time"),
        row.get("camper_id"),
        row.get("activity_id"),
    )
}

// ============================================
// CAMPER QUERIES
// ============================================

pub async fn camper_list(pool: &Pool) -> Result<Vec<Camper>, StoreError> {
    debug!("Fetching all campers");

    let client = client(pool).await?;
    let rows = client
        .query("SELECT id, name, age FROM campers ORDER BY id", &[])
        .await?;

    Ok(rows.iter().map(row_to_camper).collect())
}

pub async fn camper_by_id(pool: &Pool, id: i64) -> Result<Option<Camper>, StoreError> {
    debug!("Fetching camper {}", id);

    let client = client(pool).await?;
    let row = client
        .query_opt("SELECT id, name, age FROM campers WHERE id = $1", &[&id])
        .await?;

    Ok(row.as_ref().map(row_to_camper))
}

pub async fn camper_insert(pool: &Pool, camper: NewCamper) -> Result<Camper, StoreError> {
    let client = client(pool).await?;
    let name = camper.name();
    let age = camper.age();
    let row = client
        .query_one(
            "INSERT INTO campers (name, age) VALUES ($1, $2) RETURNING id",
            &[&name, &age],
        )
        .await?;

    let id: i64 = row.get("id");
    info!("Camper {} created", id);
    Ok(Camper::from_new(id, camper))
}

pub async fn camper_update(pool: &Pool, camper: &Camper) -> Result<bool, StoreError> {
    let client = client(pool).await?;
    let name = camper.name();
    let age = camper.age();
    let id = camper.id();
    let rows_affected = client
        .execute(
            "UPDATE campers SET name = $1, age = $2 WHERE id = $3",
            &[&name, &age, &id],
        )
        .await?;

    Ok(rows_affected == 1)
}

pub async fn camper_delete(pool: &Pool, id: i64) -> Result<bool, StoreError> {
    let mut client = client(pool).await?;
    let tx = client.transaction().await?;

    let signups = tx
        .execute("DELETE FROM signups WHERE camper_id = $1", &[&id])
        .await?;
    let deleted = tx
        .execute("DELETE FROM campers WHERE id = $1", &[&id])
        .await?;

    if deleted == 0 {
        tx.rollback().await?;
        return Ok(false);
    }
    tx.commit().await?;

    info!("Deleted camper {} and {} signup(s)", id, signups);
    Ok(true)
}

// ============================================
// ACTIVITY QUERIES
// ============================================

pub async fn activity_list(pool: &Pool) -> Result<Vec<Activity>, StoreError> {
    debug!("Fetching all activities");

    let client = client(pool).await?;
    let rows = client
        .query(
            "SELECT id, name, difficulty FROM activities ORDER BY id",
            &[],
        )
        .await?;

    Ok(rows.iter().map(row_to_activity).collect())
}

pub async fn activity_by_id(pool: &Pool, id: i64) -> Result<Option<Activity>, StoreError> {
    debug!("Fetching activity {}", id);

    let client = client(pool).await?;
    let row = client
        .query_opt(
            "SELECT id, name, difficulty FROM activities WHERE id = $1",
            &[&id],
        )
        .await?;

    Ok(row.as_ref().map(row_to_activity))
}

pub async fn activity_insert(pool: &Pool, activity: NewActivity) -> Result<Activity, StoreError> {
    let client = client(pool).await?;
    let row = client
        .query_one(
            "INSERT INTO activities (name, difficulty) VALUES ($1, $2) RETURNING id",
            &[&activity.name, &activity.difficulty],
        )
        .await?;

    let id: i64 = row.get("id");
    info!("Activity {} created", id);
    Ok(Activity::from_new(id, activity))
}

pub async fn activity_delete(pool: &Pool, id: i64) -> Result<bool, StoreError> {
    let mut client = client(pool).await?;
    let tx = client.transaction().await?;

    let signups = tx
        .execute("DELETE FROM signups WHERE activity_id = $1", &[&id])
        .await?;
    let deleted = tx
        .execute("DELETE FROM activities WHERE id = $1", &[&id])
        .await?;

    if deleted == 0 {
        tx.rollback().await?;
        return Ok(false);
    }
    tx.commit().await?;

    info!("Deleted activity {} and {} signup(s)", id, signups);
    Ok(true)
}

// ============================================
// SIGNUP QUERIES
// ============================================

pub async fn signup_insert(pool: &Pool, signup: NewSignup) -> Result<Signup, StoreError> {
    let mut client = client(pool).await?;
    let tx = client.transaction().await?;

    let camper_id = signup.camper_id();
    let activity_id = signup.activity_id();
    let time = signup.time();

    // FOR SHARE keeps a concurrent delete from removing a parent between
    // the check and the insert.
    let camper = tx
        .query_opt(
            "SELECT id FROM campers WHERE id = $1 FOR SHARE",
            &[&camper_id],
        )
        .await?;
    if camper.is_none() {
        tx.rollback().await?;
        return Err(StoreError::MissingReference {
            entity: "Camper",
            id: camper_id,
        });
    }

    let activity = tx
        .query_opt(
            "SELECT id FROM activities WHERE id = $1 FOR SHARE",
            &[&activity_id],
        )
        .await?;
    if activity.is_none() {
        tx.rollback().await?;
        return Err(StoreError::MissingReference {
            entity: "Activity",
            id: activity_id,
        });
    }

    let row = tx
        .query_one(
            "INSERT INTO signups (time, camper_id, activity_id) VALUES ($1, $2, $3) RETURNING id",
            &[&time, &camper_id, &activity_id],
        )
        .await?;
    tx.commit().await?;

    let id: i64 = row.get("id");
    info!(
        "Signup {} created (camper {}, activity {}, {}:00)",
        id, camper_id, activity_id, time
    );
    Ok(Signup::from_new(id, signup))
}

pub async fn signup_list_by_camper(pool: &Pool, camper_id: i64) -> Result<Vec<Signup>, StoreError> {
    debug!("Fetching signups for camper {}", camper_id);

    let client = client(pool).await?;
    let rows = client
        .query(
            "SELECT id, time, camper_id, activity_id FROM signups WHERE camper_id = $1 ORDER BY id",
            &[&camper_id],
        )
        .await?;

    Ok(rows.iter().map(row_to_signup).collect())
}

pub async fn signup_list_by_activity(
    pool: &Pool,
    activity_id: i64,
) -> Result<Vec<Signup>, StoreError> {
    debug!("Fetching signups for activity {}", activity_id);

    let client = client(pool).await?;
    let rows = client
        .query(
            "SELECT id, time, camper_id, activity_id FROM signups WHERE activity_id = $1 ORDER BY id",
            &[&activity_id],
        )
        .await?;

    Ok(rows.iter().map(row_to_signup).collect())
}
