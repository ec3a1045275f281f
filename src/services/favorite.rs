use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::error::{ensure_valid_id, ServiceError};
use super::query::{Condition, Query};
use super::store::{decode_record, decode_records, first_record, RecordStore};
use crate::models::Favorite;

pub const FAVORITE_FIELDS: &[&str] = &["Name", "owner_id", "property_id", "saved_date"];

/// Saved listings, scoped to one owner per call
///
/// Create and remove run one at a time so an owner never holds two records
/// for the same listing.
pub struct FavoriteService {
    store: Arc<dyn RecordStore>,
    table: String,
    guard: Mutex<()>,
}

impl FavoriteService {
    pub fn new(store: Arc<dyn RecordStore>, table: String) -> Self {
        Self {
            store,
            table,
            guard: Mutex::new(()),
        }
    }

    /// The owner's favorites, most recently saved first
    pub async fn get_all(&self, owner: &str) -> Result<Vec<Favorite>, ServiceError> {
        let query = owner_query(owner).order_by_desc("saved_date");
        let records = self.store.fetch_records(&self.table, &query).await?;
        Ok(decode_records(records, &self.table))
    }

    pub async fn get_by_id(&self, owner: &str, id: i64) -> Result<Favorite, ServiceError> {
        let id = ensure_valid_id(id, "favorite")?;
        let record = self
            .store
            .get_record_by_id(&self.table, id, &Query::new(FAVORITE_FIELDS))
            .await
            .map_err(|e| ServiceError::not_found_as(e, || "Favorite not found".to_string()))?;
        let favorite: Favorite = decode_record(record, &self.table)?;

        if favorite.owner_id != owner {
            return Err(ServiceError::NotFound("Favorite not found".into()));
        }
        Ok(favorite)
    }

    pub async fn get_by_property_id(
        &self,
        owner: &str,
        property_id: i64,
    ) -> Result<Option<Favorite>, ServiceError> {
        let property_id = ensure_valid_id(property_id, "property")?;
        let query = owner_query(owner)
            .filter(Condition::equal_to("property_id", property_id))
            .page(1, 0);
        let records = self.store.fetch_records(&self.table, &query).await?;
        Ok(decode_records(records, &self.table).into_iter().next())
    }

    /// Save a listing; saving it twice returns the existing favorite
    pub async fn create(&self, owner: &str, property_id: i64) -> Result<Favorite, ServiceError> {
        let _lock = self.guard.lock().await;

        if let Some(existing) = self.get_by_property_id(owner, property_id).await? {
            tracing::debug!("Property {} already saved by {}", property_id, owner);
            return Ok(existing);
        }

        let record = json!({
            "Name": format!("Property {} Favorite", property_id),
            "owner_id": owner,
            "property_id": property_id,
            "saved_date": chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string(),
        });
        let created = self.store.create_records(&self.table, vec![record]).await?;
        let favorite: Favorite = decode_record(first_record(created, "create")?, &self.table)?;

        tracing::info!("Saved property {} as favorite {}", property_id, favorite.id);
        Ok(favorite)
    }

    pub async fn delete(&self, owner: &str, id: i64) -> Result<(), ServiceError> {
        let favorite = self.get_by_id(owner, id).await?;
        self.store
            .delete_records(&self.table, &[favorite.id])
            .await
            .map_err(|e| ServiceError::not_found_as(e, || "Favorite not found".to_string()))?;
        Ok(())
    }

    pub async fn delete_by_property_id(
        &self,
        owner: &str,
        property_id: i64,
    ) -> Result<(), ServiceError> {
        let _lock = self.guard.lock().await;

        let favorite = self
            .get_by_property_id(owner, property_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Favorite not found".into()))?;
        self.store
            .delete_records(&self.table, &[favorite.id])
            .await
            .map_err(|e| ServiceError::not_found_as(e, || "Favorite not found".to_string()))?;

        tracing::info!("Removed property {} from favorites", property_id);
        Ok(())
    }

    /// `false` on lookup errors as well as on a miss
    pub async fn is_favorite(&self, owner: &str, property_id: i64) -> bool {
        match self.get_by_property_id(owner, property_id).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                tracing::warn!("Favorite lookup for property {} failed: {}", property_id, e);
                false
            }
        }
    }
}

fn owner_query(owner: &str) -> Query {
    Query::new(FAVORITE_FIELDS).filter(Condition::equal_to("owner_id", owner))
}
