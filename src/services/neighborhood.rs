use std::sync::Arc;
use validator::Validate;

use super::error::{ensure_valid_id, ServiceError};
use super::property::with_id;
use super::query::{Condition, Query};
use super::store::{decode_record, decode_records, first_record, RecordStore};
use crate::models::{Neighborhood, NeighborhoodChanges, NewNeighborhood};

pub const NEIGHBORHOOD_FIELDS: &[&str] = &[
    "Name",
    "property_id",
    "school_rating",
    "elementary_rating",
    "middle_school_rating",
    "high_school_rating",
    "transit_score",
    "bus_routes",
    "nearest_station",
    "avg_wait_time",
];

/// School and transit statistics attached to listings
pub struct NeighborhoodService {
    store: Arc<dyn RecordStore>,
    table: String,
}

impl NeighborhoodService {
    pub fn new(store: Arc<dyn RecordStore>, table: String) -> Self {
        Self { store, table }
    }

    /// Statistics for the listing, if any were recorded
    pub async fn get_by_property_id(&self, property_id: i64) -> Result<Neighborhood, ServiceError> {
        let property_id = ensure_valid_id(property_id, "property")?;
        let query = Query::new(NEIGHBORHOOD_FIELDS)
            .filter(Condition::equal_to("property_id", property_id))
            .page(1, 0);
        let records = self.store.fetch_records(&self.table, &query).await?;

        decode_records(records, &self.table)
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound("Neighborhood stats not found".into()))
    }

    /// Every record, best schools first
    pub async fn get_all(&self) -> Result<Vec<Neighborhood>, ServiceError> {
        let query = Query::new(NEIGHBORHOOD_FIELDS).order_by_desc("school_rating");
        let records = self.store.fetch_records(&self.table, &query).await?;
        Ok(decode_records(records, &self.table))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Neighborhood, ServiceError> {
        let id = ensure_valid_id(id, "neighborhood")?;
        let record = self
            .store
            .get_record_by_id(&self.table, id, &Query::new(NEIGHBORHOOD_FIELDS))
            .await
            .map_err(|e| ServiceError::not_found_as(e, || "Neighborhood stats not found".into()))?;
        Ok(decode_record(record, &self.table)?)
    }

    pub async fn create(&self, stats: NewNeighborhood) -> Result<Neighborhood, ServiceError> {
        stats.validate()?;
        let mut record = serde_json::to_value(&stats)
            .map_err(|e| ServiceError::Validation(format!("Unserializable neighborhood: {}", e)))?;
        if stats.name.is_none() {
            record["Name"] = format!("Property {} Neighborhood", stats.property_id).into();
        }

        let created = self.store.create_records(&self.table, vec![record]).await?;
        Ok(decode_record(first_record(created, "create")?, &self.table)?)
    }

    pub async fn update(
        &self,
        id: i64,
        changes: NeighborhoodChanges,
    ) -> Result<Neighborhood, ServiceError> {
        let id = ensure_valid_id(id, "neighborhood")?;
        changes.validate()?;

        let updated = self
            .store
            .update_records(&self.table, vec![with_id(id, &changes)?])
            .await
            .map_err(|e| ServiceError::not_found_as(e, || "Neighborhood stats not found".into()))?;
        Ok(decode_record(first_record(updated, "update")?, &self.table)?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let id = ensure_valid_id(id, "neighborhood")?;
        self.store
            .delete_records(&self.table, &[id])
            .await
            .map_err(|e| ServiceError::not_found_as(e, || "Neighborhood stats not found".into()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::MemoryStore;
    use serde_json::json;
    use std::time::Duration;

    fn service() -> NeighborhoodService {
        let store = MemoryStore::new(Duration::ZERO).with_table(
            "neighborhood",
            vec![
                json!({"Id": 1, "property_id": 1, "school_rating": 7.5, "bus_routes": "10,801"}),
                json!({"Id": 2, "property_id": 2, "school_rating": 9.1, "bus_routes": ["3"]}),
            ],
        );
        NeighborhoodService::new(Arc::new(store), "neighborhood".into())
    }

    #[tokio::test]
    async fn test_lookup_by_property() {
        let stats = service().get_by_property_id(1).await.unwrap();
        assert_eq!(stats.bus_routes, vec!["10", "801"]);

        let err = service().get_by_property_id(9).await.unwrap_err();
        assert_eq!(err.to_string(), "Neighborhood stats not found");
    }

    #[tokio::test]
    async fn test_get_all_best_schools_first() {
        let all = service().get_all().await.unwrap();
        assert_eq!(all[0].property_id, 2);
    }

    #[tokio::test]
    async fn test_create_names_record() {
        let service = service();
        let stats: NewNeighborhood =
            serde_json::from_value(json!({"propertyId": 5, "transitScore": 64})).unwrap();
        let created = service.create(stats).await.unwrap();
        assert_eq!(created.name, "Property 5 Neighborhood");
        assert_eq!(created.transit_score, 64.0);
    }
}
