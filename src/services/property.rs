use serde_json::{json, Value};
use std::sync::Arc;
use validator::Validate;

use super::cache::{CacheKey, CacheStats, ListingCache};
use super::error::{ensure_valid_id, ServiceError};
use super::query::{Condition, Query};
use super::store::{decode_record, decode_records, first_record, RecordStore};
use crate::core::filters::{apply_filters, build_search_query};
use crate::models::{NewProperty, Property, PropertyChanges, PropertyFilters};

/// Columns fetched for every listing
pub const PROPERTY_FIELDS: &[&str] = &[
    "Name",
    "title",
    "price",
    "address",
    "city",
    "state",
    "zip_code",
    "bedrooms",
    "bathrooms",
    "square_feet",
    "property_type",
    "images",
    "description",
    "features",
    "coordinates",
    "listing_date",
    "status",
    "featured",
];

/// Listing access: browsing, search, featured strip and CRUD
pub struct PropertyService {
    store: Arc<dyn RecordStore>,
    table: String,
    featured_limit: usize,
    cache: ListingCache,
}

impl PropertyService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        table: String,
        featured_limit: usize,
        cache: ListingCache,
    ) -> Self {
        Self {
            store,
            table,
            featured_limit,
            cache,
        }
    }

    /// All listings, newest first
    pub async fn get_all(&self) -> Result<Vec<Property>, ServiceError> {
        let query = Query::new(PROPERTY_FIELDS).order_by_desc("listing_date");
        let records = self.store.fetch_records(&self.table, &query).await?;
        Ok(decode_records(records, &self.table))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Property, ServiceError> {
        let id = ensure_valid_id(id, "property")?;
        let key = CacheKey::property(id);
        let generation = self.cache.generation();

        match self.cache.get::<Property>(&key).await {
            Ok(Some(property)) => return Ok(property),
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring unreadable cache entry {}: {}", key, e),
        }

        let record = self
            .store
            .get_record_by_id(&self.table, id, &Query::new(PROPERTY_FIELDS))
            .await
            .map_err(|e| ServiceError::not_found_as(e, || format!("Property {} not found", id)))?;
        let property: Property = decode_record(record, &self.table)?;

        if let Err(e) = self.cache.set_if_current(&key, &property, generation).await {
            tracing::warn!("Failed to cache {}: {}", key, e);
        }
        Ok(property)
    }

    /// Featured listings, newest first, capped at the configured limit
    pub async fn get_featured(&self) -> Result<Vec<Property>, ServiceError> {
        let key = CacheKey::featured(self.featured_limit);
        let generation = self.cache.generation();
        if let Ok(Some(featured)) = self.cache.get::<Vec<Property>>(&key).await {
            return Ok(featured);
        }

        let query = Query::new(PROPERTY_FIELDS)
            .filter(Condition::exact_match("featured", ["true"]))
            .order_by_desc("listing_date")
            .page(self.featured_limit, 0);
        let records = self.store.fetch_records(&self.table, &query).await?;
        let featured: Vec<Property> = decode_records(records, &self.table);

        if let Err(e) = self.cache.set_if_current(&key, &featured, generation).await {
            tracing::warn!("Failed to cache {}: {}", key, e);
        }
        Ok(featured)
    }

    /// Listings matching `filters`, in backend order (newest first)
    ///
    /// The backend narrows the scan; the matching rules are then enforced
    /// locally so results do not depend on how the backend compares text.
    pub async fn search(&self, filters: &PropertyFilters) -> Result<Vec<Property>, ServiceError> {
        let query = build_search_query(PROPERTY_FIELDS, filters);
        let records = self.store.fetch_records(&self.table, &query).await?;
        let properties = apply_filters(decode_records(records, &self.table), filters);

        tracing::debug!(
            "Search returned {} listings ({} active filters)",
            properties.len(),
            filters.active_filter_count()
        );
        Ok(properties)
    }

    pub async fn create(&self, property: NewProperty) -> Result<Property, ServiceError> {
        property.validate()?;

        let name = property
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| property.title.clone());
        let record = json!({
            "Name": name,
            "title": property.title,
            "price": property.price,
            "address": property.address,
            "city": property.city,
            "state": property.state,
            "zip_code": property.zip_code,
            "bedrooms": property.bedrooms,
            "bathrooms": property.bathrooms,
            "square_feet": property.square_feet,
            "property_type": property.property_type,
            "images": property.images,
            "description": property.description,
            "features": property.features,
            "coordinates": property.coordinates,
            "listing_date": chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            "status": property.status.unwrap_or_else(|| "active".to_string()),
            "featured": property.featured.unwrap_or(false),
        });

        let created = self.store.create_records(&self.table, vec![record]).await?;
        let created: Property = decode_record(first_record(created, "create")?, &self.table)?;

        self.cache.invalidate_all();
        tracing::info!("Created property {} ({})", created.id, created.title);
        Ok(created)
    }

    pub async fn update(&self, id: i64, changes: PropertyChanges) -> Result<Property, ServiceError> {
        let id = ensure_valid_id(id, "property")?;
        changes.validate()?;

        let record = with_id(id, &changes)?;
        let updated = self
            .store
            .update_records(&self.table, vec![record])
            .await
            .map_err(|e| ServiceError::not_found_as(e, || format!("Property {} not found", id)))?;
        let updated: Property = decode_record(first_record(updated, "update")?, &self.table)?;

        self.cache.invalidate_all();
        tracing::info!("Updated property {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let id = ensure_valid_id(id, "property")?;
        self.store
            .delete_records(&self.table, &[id])
            .await
            .map_err(|e| ServiceError::not_found_as(e, || format!("Property {} not found", id)))?;

        self.cache.invalidate_all();
        tracing::info!("Deleted property {}", id);
        Ok(())
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Listings for a set of ids; non-positive ids are skipped
    pub async fn get_multiple(&self, ids: &[i64]) -> Result<Vec<Property>, ServiceError> {
        let ids: Vec<i64> = ids.iter().copied().filter(|id| *id > 0).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = Query::new(PROPERTY_FIELDS).filter(Condition::exact_match("Id", ids));
        let records = self.store.fetch_records(&self.table, &query).await?;
        Ok(decode_records(records, &self.table))
    }
}

/// Serialize a partial update and tag it with the record id
pub(crate) fn with_id<T: serde::Serialize>(id: i64, changes: &T) -> Result<Value, ServiceError> {
    let mut record = serde_json::to_value(changes)
        .map_err(|e| ServiceError::Validation(format!("Unserializable update: {}", e)))?;
    match record.as_object_mut() {
        Some(object) => {
            object.insert("Id".to_string(), Value::from(id));
            Ok(record)
        }
        None => Err(ServiceError::Validation("Update must be an object".into())),
    }
}
