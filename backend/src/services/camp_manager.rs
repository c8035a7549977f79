//! # Camp Manager Service
//!
//! The CampManager is the central service for camp operations. It sits
//! between the HTTP handlers and the store: it validates input through the
//! entity constructors, calls the store and assembles the response views.
//!
//! ## Flow Example: Create Signup
//!
//! ```text
//! 1. POST /signups arrives
//!                ↓
//! 2. CampManager.create_signup() called
//!                ↓
//! 3. NewSignup::new validates time and id types
//!                ↓
//! 4. Store checks both parents and inserts (one transaction)
//!                ↓
//! 5. Parents fetched, SignupDetailView returned
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::db::{Activity, CampStore, Camper, NewCamper, NewSignup, StoreError};
use crate::models::{
    required, ActivityView, CamperDetailView, CamperView, CreateCamperRequest,
    CreateSignupRequest, SignupDetailView, SignupWithActivityView,
};
use crate::utils::ValidationError;

/// Errors that can occur in camp operations.
#[derive(Debug, thiserror::Error)]
pub enum CampError {
    /// No row with the requested id. Holds the entity name.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Input failed a field rule or referenced a missing parent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The store failed.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for CampError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::MissingReference { entity, id } => {
                CampError::Validation(ValidationError::MissingReference { entity, id })
            }
            other => CampError::Store(other),
        }
    }
}

/// Service for campers, activities and signups.
///
/// ## Usage
///
/// ```rust,ignore
/// let manager = CampManager::new(Arc::new(MemoryStore::default()));
/// let campers = manager.list_campers().await?;
/// ```
#[derive(Clone)]
pub struct CampManager {
    store: Arc<dyn CampStore>,
}

impl CampManager {
    pub fn new(store: Arc<dyn CampStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CampStore> {
        &self.store
    }

    // ==========================================
    // CAMPERS
    // ==========================================

    pub async fn list_campers(&self) -> Result<Vec<CamperView>, CampError> {
        let campers = self.store.list_campers().await?;
        debug!("Listing {} campers", campers.len());
        Ok(campers.iter().map(CamperView::from).collect())
    }

    pub async fn create_camper(&self, request: CreateCamperRequest) -> Result<CamperView, CampError> {
        let new = NewCamper::new(
            required(&request.name, "name")?,
            required(&request.age, "age")?,
        )
        .inspect_err(|e| warn!("Rejected camper: {}", e))?;

        let camper = self.store.insert_camper(new).await?;
        info!("Camper {} ({}) registered", camper.id(), camper.name());
        Ok(CamperView::from(&camper))
    }

    /// A camper with its signups, each carrying its activity.
    pub async fn get_camper(&self, id: i64) -> Result<CamperDetailView, CampError> {
        let camper = self.find_camper(id).await?;
        let signups = self.store.signups_for_camper(id).await?;

        let activity_ids: BTreeSet<i64> = signups.iter().map(|s| s.activity_id()).collect();
        let mut activities = BTreeMap::new();
        for activity_id in activity_ids {
            if let Some(activity) = self.store.get_activity(activity_id).await? {
                activities.insert(activity_id, activity);
            }
        }

        let signups = signups
            .iter()
            .filter_map(|s| {
                activities
                    .get(&s.activity_id())
                    .map(|a| SignupWithActivityView::new(s, a))
            })
            .collect();

        Ok(CamperDetailView::new(&camper, signups))
    }

    /// Apply a partial update. Nothing is written if any field is invalid.
    pub async fn update_camper(
        &self,
        id: i64,
        fields: &Map<String, Value>,
    ) -> Result<CamperView, CampError> {
        let mut camper = self.find_camper(id).await?;

        camper
            .apply_patch(fields)
            .inspect_err(|e| warn!("Rejected update to camper {}: {}", id, e))?;

        if !self.store.update_camper(&camper).await? {
            return Err(CampError::NotFound("Camper"));
        }
        info!("Camper {} updated", id);
        Ok(CamperView::from(&camper))
    }

    /// Activities a camper is signed up for, via the signups join.
    pub async fn camper_activities(&self, id: i64) -> Result<Vec<Activity>, CampError> {
        self.find_camper(id).await?;
        let mut activities = Vec::new();
        for signup in self.store.signups_for_camper(id).await? {
            if let Some(activity) = self.store.get_activity(signup.activity_id()).await? {
                activities.push(activity);
            }
        }
        Ok(activities)
    }

    // ==========================================
    // ACTIVITIES
    // ==========================================

    pub async fn list_activities(&self) -> Result<Vec<ActivityView>, CampError> {
        let activities = self.store.list_activities().await?;
        debug!("Listing {} activities", activities.len());
        Ok(activities.iter().map(ActivityView::from).collect())
    }

    /// Delete an activity together with all its signups.
    pub async fn delete_activity(&self, id: i64) -> Result<(), CampError> {
        if !self.store.delete_activity(id).await? {
            return Err(CampError::NotFound("Activity"));
        }
        Ok(())
    }

    /// Campers signed up for an activity, via the signups join.
    pub async fn activity_campers(&self, id: i64) -> Result<Vec<Camper>, CampError> {
        if self.store.get_activity(id).await?.is_none() {
            return Err(CampError::NotFound("Activity"));
        }
        let mut campers = Vec::new();
        for signup in self.store.signups_for_activity(id).await? {
            if let Some(camper) = self.store.get_camper(signup.camper_id()).await? {
                campers.push(camper);
            }
        }
        Ok(campers)
    }

    // ==========================================
    // SIGNUPS
    // ==========================================

    pub async fn create_signup(
        &self,
        request: CreateSignupRequest,
    ) -> Result<SignupDetailView, CampError> {
        let new = NewSignup::new(
            required(&request.time, "time")?,
            required(&request.camper_id, "camper_id")?,
            required(&request.activity_id, "activity_id")?,
        )
        .inspect_err(|e| warn!("Rejected signup: {}", e))?;

        let signup = self.store.insert_signup(new).await.inspect_err(|e| {
            if let StoreError::MissingReference { .. } = e {
                warn!("Rejected signup: {}", e);
            }
        })?;

        let camper = self
            .store
            .get_camper(signup.camper_id())
            .await?
            .ok_or(CampError::NotFound("Camper"))?;
        let activity = self
            .store
            .get_activity(signup.activity_id())
            .await?
            .ok_or(CampError::NotFound("Activity"))?;

        Ok(SignupDetailView::new(&signup, &camper, &activity))
    }

    async fn find_camper(&self, id: i64) -> Result<Camper, CampError> {
        self.store
            .get_camper(id)
            .await?
            .ok_or(CampError::NotFound("Camper"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, NewActivity};
    use serde_json::json;

    async fn manager_with_activities() -> CampManager {
        let store = MemoryStore::default();
        store
            .insert_activity(NewActivity::new("Archery", 2))
            .await
            .unwrap();
        store
            .insert_activity(NewActivity::new("Swimming", 3))
            .await
            .unwrap();
        CampManager::new(Arc::new(store))
    }

    fn camper_request(body: Value) -> CreateCamperRequest {
        serde_json::from_value(body).unwrap()
    }

    fn signup_request(body: Value) -> CreateSignupRequest {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_campers() {
        let manager = manager_with_activities().await;

        let ann = manager
            .create_camper(camper_request(json!({"name": "Ann", "age": 12})))
            .await
            .unwrap();
        assert_eq!(ann, CamperView { id: 1, name: "Ann".into(), age: 12 });

        let campers = manager.list_campers().await.unwrap();
        assert_eq!(campers, vec![ann]);
    }

    #[tokio::test]
    async fn test_create_camper_missing_field_is_validation_error() {
        let manager = manager_with_activities().await;

        let err = manager
            .create_camper(camper_request(json!({"name": "Ann"})))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CampError::Validation(ValidationError::MissingField("age"))
        ));
        assert!(manager.list_campers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_update_leaves_camper_unchanged() {
        let manager = manager_with_activities().await;
        manager
            .create_camper(camper_request(json!({"name": "Ann", "age": 12})))
            .await
            .unwrap();

        let patch = json!({"name": "Bea", "age": 7});
        let err = manager
            .update_camper(1, patch.as_object().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, CampError::Validation(ValidationError::InvalidAge)));

        let camper = manager.get_camper(1).await.unwrap();
        assert_eq!(camper.name, "Ann");
        assert_eq!(camper.age, 12);
    }

    #[tokio::test]
    async fn test_update_unknown_camper_is_not_found() {
        let manager = manager_with_activities().await;
        let patch = json!({"age": 10});
        let err = manager
            .update_camper(5, patch.as_object().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, CampError::NotFound("Camper")));
    }

    #[tokio::test]
    async fn test_signup_with_missing_parent_is_validation_error() {
        let manager = manager_with_activities().await;
        manager
            .create_camper(camper_request(json!({"name": "Ann", "age": 12})))
            .await
            .unwrap();

        let err = manager
            .create_signup(signup_request(
                json!({"time": 9, "camper_id": 1, "activity_id": 40}),
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CampError::Validation(ValidationError::MissingReference {
                entity: "Activity",
                id: 40
            })
        ));
    }

    #[tokio::test]
    async fn test_derived_relationships_follow_signups() {
        let manager = manager_with_activities().await;
        for name in ["Ann", "Bo"] {
            manager
                .create_camper(camper_request(json!({"name": name, "age": 10})))
                .await
                .unwrap();
        }
        for (time, camper_id, activity_id) in [(9, 1, 1), (10, 1, 2), (11, 2, 2)] {
            manager
                .create_signup(signup_request(json!({
                    "time": time,
                    "camper_id": camper_id,
                    "activity_id": activity_id
                })))
                .await
                .unwrap();
        }

        let ann_activities: Vec<i64> = manager
            .camper_activities(1)
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ann_activities, vec![1, 2]);

        let swimmers: Vec<String> = manager
            .activity_campers(2)
            .await
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(swimmers, vec!["Ann", "Bo"]);

        manager.delete_activity(2).await.unwrap();
        assert!(matches!(
            manager.activity_campers(2).await,
            Err(CampError::NotFound("Activity"))
        ));
        let ann_activities = manager.camper_activities(1).await.unwrap();
        assert_eq!(ann_activities.len(), 1);
        assert!(manager.camper_activities(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_activity_is_not_found() {
        let manager = manager_with_activities().await;
        assert!(matches!(
            manager.delete_activity(999).await,
            Err(CampError::NotFound("Activity"))
        ));
    }
}
