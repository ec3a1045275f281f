use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::error::{ensure_valid_id, ServiceError};
use super::property::PropertyService;
use super::query::{Condition, Query};
use super::store::{decode_all_records, decode_record, decode_records, first_record, RecordStore};
use crate::core::compare::CompareList;
use crate::models::{CompareItem, Property};

pub const COMPARE_FIELDS: &[&str] = &["Name", "owner_id", "property_id", "date_added"];

/// Per-user comparison lists with a fixed capacity
///
/// Mutations run one at a time so two concurrent adds cannot both pass the
/// capacity check.
pub struct CompareService {
    store: Arc<dyn RecordStore>,
    table: String,
    properties: Arc<PropertyService>,
    max_items: usize,
    guard: Mutex<()>,
}

impl CompareService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        table: String,
        properties: Arc<PropertyService>,
        max_items: usize,
    ) -> Self {
        Self {
            store,
            table,
            properties,
            max_items,
            guard: Mutex::new(()),
        }
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// The owner's list, most recently added first
    pub async fn get_compare_list(&self, owner: &str) -> Result<Vec<CompareItem>, ServiceError> {
        let records = self.fetch_owned(owner).await?;
        Ok(decode_records(records, &self.table))
    }

    /// Every stored row of the owner's list; a row that does not decode is an error
    async fn stored_items(&self, owner: &str) -> Result<Vec<CompareItem>, ServiceError> {
        let records = self.fetch_owned(owner).await?;
        Ok(decode_all_records(records, &self.table)?)
    }

    async fn fetch_owned(&self, owner: &str) -> Result<Vec<Value>, ServiceError> {
        let query = Query::new(COMPARE_FIELDS)
            .filter(Condition::equal_to("owner_id", owner))
            .order_by_desc("date_added");
        Ok(self.store.fetch_records(&self.table, &query).await?)
    }

    pub async fn add_to_compare(
        &self,
        owner: &str,
        property_id: i64,
    ) -> Result<CompareItem, ServiceError> {
        let property_id = ensure_valid_id(property_id, "property")?;
        let _lock = self.guard.lock().await;

        let current = self.stored_items(owner).await?;
        CompareList::new(&current, self.max_items).check_can_add(property_id)?;

        let record = json!({
            "Name": format!("Property {} Comparison", property_id),
            "owner_id": owner,
            "property_id": property_id,
            "date_added": chrono::Utc::now().to_rfc3339(),
        });
        let created = self.store.create_records(&self.table, vec![record]).await?;
        let item: CompareItem = decode_record(first_record(created, "create")?, &self.table)?;

        tracing::info!(
            "Property {} added to comparison ({}/{})",
            property_id,
            current.len() + 1,
            self.max_items
        );
        Ok(item)
    }

    pub async fn remove_from_compare(&self, owner: &str, property_id: i64) -> Result<(), ServiceError> {
        let property_id = ensure_valid_id(property_id, "property")?;
        let _lock = self.guard.lock().await;

        let item = self
            .stored_items(owner)
            .await?
            .into_iter()
            .find(|item| item.property_id == property_id)
            .ok_or_else(|| ServiceError::NotFound("Property not found in comparison list".into()))?;

        self.store.delete_records(&self.table, &[item.id]).await?;
        Ok(())
    }

    /// Empty the owner's list; clearing an empty list succeeds
    pub async fn clear_compare(&self, owner: &str) -> Result<(), ServiceError> {
        let _lock = self.guard.lock().await;

        let ids: Vec<i64> = self
            .stored_items(owner)
            .await?
            .iter()
            .map(|item| item.id)
            .collect();
        if ids.is_empty() {
            return Ok(());
        }

        self.store.delete_records(&self.table, &ids).await?;
        tracing::info!("Cleared {} comparison items", ids.len());
        Ok(())
    }

    /// `false` on lookup errors as well as on a miss
    pub async fn is_in_compare(&self, owner: &str, property_id: i64) -> bool {
        match self.get_compare_list(owner).await {
            Ok(items) => CompareList::new(&items, self.max_items).contains(property_id),
            Err(e) => {
                tracing::warn!("Comparison lookup failed: {}", e);
                false
            }
        }
    }

    /// Full listings for everything on the owner's list
    pub async fn get_compare_properties(&self, owner: &str) -> Result<Vec<Property>, ServiceError> {
        let ids: Vec<i64> = self
            .get_compare_list(owner)
            .await?
            .iter()
            .map(|item| item.property_id)
            .collect();
        self.properties.get_multiple(&ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::ListingCache;
    use crate::services::memory::MemoryStore;
    use crate::services::store::StoreError;
    use std::time::Duration;

    fn service() -> CompareService {
        service_with_items(vec![])
    }

    fn service_with_items(items: Vec<Value>) -> CompareService {
        let listings = (1..=8)
            .map(|id| json!({"Id": id, "title": format!("Listing {}", id), "price": 100000 * id}))
            .collect();
        let store: Arc<dyn RecordStore> = Arc::new(
            MemoryStore::new(Duration::ZERO)
                .with_table("property", listings)
                .with_table("compare_item", items),
        );
        let properties = Arc::new(PropertyService::new(
            store.clone(),
            "property".into(),
            6,
            ListingCache::new(10, 60),
        ));
        CompareService::new(store, "compare_item".into(), properties, 4)
    }

    #[tokio::test]
    async fn test_fifth_add_is_rejected() {
        let service = service();
        for id in 1..=4 {
            service.add_to_compare("alice", id).await.unwrap();
        }

        let err = service.add_to_compare("alice", 5).await.unwrap_err();
        assert!(matches!(err, ServiceError::LimitExceeded { max: 4 }));
        assert_eq!(service.get_compare_list("alice").await.unwrap().len(), 4);

        // other users have their own list
        service.add_to_compare("bob", 5).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_add_is_rejected() {
        let service = service();
        service.add_to_compare("alice", 2).await.unwrap();
        let err = service.add_to_compare("alice", 2).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_concurrent_adds_respect_capacity() {
        let service = Arc::new(service());
        let handles: Vec<_> = (1..=6)
            .map(|id| {
                let service = service.clone();
                tokio::spawn(async move { service.add_to_compare("alice", id).await })
            })
            .collect();

        let mut added = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                added += 1;
            }
        }
        assert_eq!(added, 4);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let service = service();
        assert!(service.clear_compare("alice").await.is_ok());

        service.add_to_compare("alice", 1).await.unwrap();
        service.add_to_compare("alice", 3).await.unwrap();
        assert!(service.is_in_compare("alice", 3).await);

        service.remove_from_compare("alice", 3).await.unwrap();
        let err = service.remove_from_compare("alice", 3).await.unwrap_err();
        assert_eq!(err.to_string(), "Property not found in comparison list");

        let properties = service.get_compare_properties("alice").await.unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].id, 1);

        service.clear_compare("alice").await.unwrap();
        assert!(service.get_compare_list("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_owner_ids_are_matched_exactly() {
        let service = service();
        service.add_to_compare("1", 1).await.unwrap();
        service.add_to_compare("Alice", 2).await.unwrap();

        assert!(service.get_compare_list("01").await.unwrap().is_empty());
        assert!(service.get_compare_list("alice").await.unwrap().is_empty());
        assert!(!service.is_in_compare("alice", 2).await);
        assert_eq!(service.get_compare_list("1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_nan_owner_is_still_capped() {
        let service = service();
        for id in 1..=4 {
            service.add_to_compare("NaN", id).await.unwrap();
        }

        let err = service.add_to_compare("NaN", 5).await.unwrap_err();
        assert!(matches!(err, ServiceError::LimitExceeded { max: 4 }));
        let err = service.add_to_compare("NaN", 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_space_separated_timestamps_count_toward_capacity() {
        let items = (1..=4)
            .map(|id| {
                json!({
                    "owner_id": "alice",
                    "property_id": id,
                    "date_added": format!("2024-05-0{} 10:00:00", id),
                })
            })
            .collect();
        let service = service_with_items(items);

        let list = service.get_compare_list("alice").await.unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].property_id, 4);

        let err = service.add_to_compare("alice", 5).await.unwrap_err();
        assert!(matches!(err, ServiceError::LimitExceeded { max: 4 }));
    }

    #[tokio::test]
    async fn test_undecodable_row_blocks_add() {
        let items = vec![
            json!({"owner_id": "alice", "property_id": 1}),
            json!({"owner_id": "alice", "property_id": "not a number"}),
        ];
        let service = service_with_items(items);

        assert_eq!(service.get_compare_list("alice").await.unwrap().len(), 1);
        let err = service.add_to_compare("alice", 2).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::InvalidResponse(_))));
    }
}
