// Service exports
pub mod agent;
pub mod cache;
pub mod compare;
pub mod error;
pub mod favorite;
pub mod memory;
pub mod neighborhood;
pub mod property;
pub mod query;
pub mod record_api;
pub mod store;

pub use agent::AgentService;
pub use cache::{CacheError, CacheKey, CacheStats, ListingCache};
pub use compare::CompareService;
pub use error::{parse_record_id, ServiceError};
pub use favorite::FavoriteService;
pub use memory::MemoryStore;
pub use neighborhood::NeighborhoodService;
pub use property::PropertyService;
pub use query::{Condition, GroupOperator, Operator, OrderBy, Paging, Query, SortDirection, WhereGroup};
pub use record_api::RecordApiClient;
pub use store::{RecordStore, StoreError};

use std::sync::Arc;
use std::time::Duration;

use crate::config::{DataMode, Settings};

/// Build the record backend selected by `data.mode`
pub fn build_store(settings: &Settings) -> Result<Arc<dyn RecordStore>, StoreError> {
    match settings.data.mode {
        DataMode::Remote => {
            let api = &settings.record_api;
            if api.project_id.is_empty() || api.public_key.is_empty() {
                tracing::warn!("Record API credentials are empty; requests will be rejected");
            }
            let client = RecordApiClient::new(
                api.endpoint.clone(),
                api.project_id.clone(),
                api.public_key.clone(),
                Duration::from_secs(api.timeout_secs.unwrap_or(30)),
            )?;
            tracing::info!("Using remote record API at {}", api.endpoint);
            Ok(Arc::new(client))
        }
        DataMode::Mock => {
            let store = MemoryStore::from_fixtures(
                &settings.data.fixtures_dir,
                &settings.tables,
                Duration::from_millis(settings.data.mock_delay_ms),
            )?;
            Ok(Arc::new(store))
        }
    }
}
