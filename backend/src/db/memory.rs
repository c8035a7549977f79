//! # In-Process Store
//!
//! Keeps the three tables in `BTreeMap`s behind one mutex. Each write
//! takes the lock once, so a cascading delete or a checked signup insert
//! is never observed half-done.
//!
//! Data lives as long as the process. Ids start at 1 and are never reused.
//! There is no activity endpoint, so the service starts the store with
//! [`DEFAULT_ACTIVITIES`].

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::models::{Activity, Camper, NewActivity, NewCamper, NewSignup, Signup};
use super::store::{CampStore, StoreError};

/// Activity catalogue loaded into a fresh in-memory store: `(name, difficulty)`.
pub const DEFAULT_ACTIVITIES: &[(&str, i32)] = &[
    ("Archery", 2),
    ("Swimming", 3),
    ("Canoeing", 3),
    ("Hiking", 2),
    ("Arts and Crafts", 1),
];

#[derive(Default)]
struct Tables {
    campers: BTreeMap<i64, Camper>,
    activities: BTreeMap<i64, Activity>,
    signups: BTreeMap<i64, Signup>,
    next_camper_id: i64,
    next_activity_id: i64,
    next_signup_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// In-memory [`CampStore`].
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// A store holding the given activities and nothing else.
    pub fn with_activities<I, S>(activities: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        let mut tables = Tables::default();
        for (name, difficulty) in activities {
            let id = Tables::next_id(&mut tables.next_activity_id);
            let activity = Activity::from_new(id, NewActivity::new(name, difficulty));
            tables.activities.insert(id, activity);
        }
        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    /// A store preloaded with [`DEFAULT_ACTIVITIES`].
    pub fn seeded() -> Self {
        Self::with_activities(DEFAULT_ACTIVITIES.iter().copied())
    }
}

#[async_trait]
impl CampStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> bool {
        true
    }

    async fn list_campers(&self) -> Result<Vec<Camper>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.campers.values().cloned().collect())
    }

    async fn get_camper(&self, id: i64) -> Result<Option<Camper>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.campers.get(&id).cloned())
    }

    async fn insert_camper(&self, camper: NewCamper) -> Result<Camper, StoreError> {
        let mut tables = self.tables.lock().await;
        let id = Tables::next_id(&mut tables.next_camper_id);
        let camper = Camper::from_new(id, camper);
        tables.campers.insert(id, camper.clone());
        debug!("Inserted camper {}", id);
        Ok(camper)
    }

    async fn update_camper(&self, camper: &Camper) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        match tables.campers.get_mut(&camper.id()) {
            Some(row) => {
                *row = camper.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_camper(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.campers.remove(&id).is_none() {
            return Ok(false);
        }
        let before = tables.signups.len();
        tables.signups.retain(|_, s| s.camper_id() != id);
        info!(
            "Deleted camper {} and {} signup(s)",
            id,
            before - tables.signups.len()
        );
        Ok(true)
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.activities.values().cloned().collect())
    }

    async fn get_activity(&self, id: i64) -> Result<Option<Activity>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.activities.get(&id).cloned())
    }

    async fn insert_activity(&self, activity: NewActivity) -> Result<Activity, StoreError> {
        let mut tables = self.tables.lock().await;
        let id = Tables::next_id(&mut tables.next_activity_id);
        let activity = Activity::from_new(id, activity);
        tables.activities.insert(id, activity.clone());
        debug!("Inserted activity {}", id);
        Ok(activity)
    }

    async fn delete_activity(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.activities.remove(&id).is_none() {
            return Ok(false);
        }
        let before = tables.signups.len();
        tables.signups.retain(|_, s| s.activity_id() != id);
        info!(
            "Deleted activity {} and {} signup(s)",
            id,
            before - tables.signups.len()
        );
        Ok(true)
    }

    async fn insert_signup(&self, signup: NewSignup) -> Result<Signup, StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.campers.contains_key(&signup.camper_id()) {
            return Err(StoreError::MissingReference {
                entity: "Camper",
                id: signup.camper_id(),
            });
        }
        if !tables.activities.contains_key(&signup.activity_id()) {
            return Err(StoreError::MissingReference {
                entity: "Activity",
                id: signup.activity_id(),
            });
        }
        let id = Tables::next_id(&mut tables.next_signup_id);
        let signup = Signup::from_new(id, signup);
        tables.signups.insert(id, signup.clone());
        debug!("Inserted signup {}", id);
        Ok(signup)
    }

    async fn signups_for_camper(&self, camper_id: i64) -> Result<Vec<Signup>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .signups
            .values()
            .filter(|s| s.camper_id() == camper_id)
            .cloned()
            .collect())
    }

    async fn signups_for_activity(&self, activity_id: i64) -> Result<Vec<Signup>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .signups
            .values()
            .filter(|s| s.activity_id() == activity_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn seeded() -> (MemoryStore, Camper, Activity, Activity) {
        let store = MemoryStore::default();
        let camper = store
            .insert_camper(NewCamper::new(&json!("Ann"), &json!(12)).unwrap())
            .await
            .unwrap();
        let archery = store
            .insert_activity(NewActivity::new("Archery", 2))
            .await
            .unwrap();
        let swimming = store
            .insert_activity(NewActivity::new("Swimming", 3))
            .await
            .unwrap();
        (store, camper, archery, swimming)
    }

    fn signup(time: i64, camper_id: i64, activity_id: i64) -> NewSignup {
        NewSignup::new(&json!(time), &json!(camper_id), &json!(activity_id)).unwrap()
    }

    #[tokio::test]
    async fn test_ids_are_sequential_from_one() {
        let (store, camper, archery, swimming) = seeded().await;
        assert_eq!(camper.id(), 1);
        assert_eq!(archery.id, 1);
        assert_eq!(swimming.id, 2);

        let s = store.insert_signup(signup(9, 1, 2)).await.unwrap();
        assert_eq!(s.id(), 1);
    }

    #[tokio::test]
    async fn test_insert_signup_requires_both_parents() {
        let (store, camper, archery, _) = seeded().await;

        let err = store
            .insert_signup(signup(9, camper.id(), 999))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingReference { entity: "Activity", id: 999 }
        ));

        let err = store
            .insert_signup(signup(9, 42, archery.id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingReference { entity: "Camper", id: 42 }
        ));

        assert!(store.signups_for_camper(camper.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_activity_cascades_to_its_signups_only() {
        let (store, camper, archery, swimming) = seeded().await;
        store.insert_signup(signup(9, camper.id(), archery.id)).await.unwrap();
        store.insert_signup(signup(14, camper.id(), swimming.id)).await.unwrap();

        assert!(store.delete_activity(archery.id).await.unwrap());

        let remaining = store.signups_for_camper(camper.id()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].activity_id(), swimming.id);
        assert!(store.get_camper(camper.id()).await.unwrap().is_some());
        assert!(!store.delete_activity(archery.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_camper_cascades() {
        let (store, camper, archery, _) = seeded().await;
        store.insert_signup(signup(9, camper.id(), archery.id)).await.unwrap();

        assert!(store.delete_camper(camper.id()).await.unwrap());

        assert!(store.signups_for_activity(archery.id).await.unwrap().is_empty());
        assert!(store.get_activity(archery.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_seeded_store_lists_default_activities() {
        let store = MemoryStore::seeded();

        let activities = store.list_activities().await.unwrap();
        assert_eq!(activities.len(), DEFAULT_ACTIVITIES.len());
        assert_eq!(activities[0].id, 1);
        assert_eq!(activities[0].name.as_deref(), Some("Archery"));
        assert_eq!(activities[0].difficulty, Some(2));
        assert!(store.list_campers().await.unwrap().is_empty());

        let next = store
            .insert_activity(NewActivity::new("Fishing", 1))
            .await
            .unwrap();
        assert_eq!(next.id, DEFAULT_ACTIVITIES.len() as i64 + 1);
    }

    #[tokio::test]
    async fn test_update_missing_camper_returns_false() {
        let store = MemoryStore::default();
        let ghost = Camper::from_row(7, "Ghost".to_string(), 10);
        assert!(!store.update_camper(&ghost).await.unwrap());
    }
}
