use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::query::Query;

/// Errors raised by a record backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid project id or public key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    RecordFailed(String),

    #[error("Fixture error: {0}")]
    Fixture(String),
}

/// Generic table-oriented record storage
///
/// Implemented by the remote record API client and by the in-memory mock
/// store, so every service runs unchanged against either.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch all records of `table` matching `query`, in query order
    async fn fetch_records(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Fetch one record by id; `NotFound` when absent
    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        query: &Query,
    ) -> Result<Value, StoreError>;

    /// Insert records, returning them with their assigned `Id`
    async fn create_records(&self, table: &str, records: Vec<Value>)
        -> Result<Vec<Value>, StoreError>;

    /// Apply partial updates; every record must carry its `Id`
    async fn update_records(&self, table: &str, records: Vec<Value>)
        -> Result<Vec<Value>, StoreError>;

    async fn delete_records(&self, table: &str, ids: &[i64]) -> Result<(), StoreError>;

    /// Short backend label for health reporting
    fn backend_name(&self) -> &'static str;
}

/// Decode a list of records, skipping (and logging) rows that do not fit
pub fn decode_records<T: DeserializeOwned>(records: Vec<Value>, table: &str) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value(record) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping malformed {} record: {}", table, e);
                None
            }
        })
        .collect()
}

/// Decode a list of records, failing on the first row that does not fit
///
/// Used where every stored row has to be accounted for, such as capacity checks.
pub fn decode_all_records<T: DeserializeOwned>(
    records: Vec<Value>,
    table: &str,
) -> Result<Vec<T>, StoreError> {
    records
        .into_iter()
        .map(|record| decode_record(record, table))
        .collect()
}

pub fn decode_record<T: DeserializeOwned>(record: Value, table: &str) -> Result<T, StoreError> {
    serde_json::from_value(record)
        .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse {} record: {}", table, e)))
}

/// First record of a create/update result
pub fn first_record(mut records: Vec<Value>, action: &str) -> Result<Value, StoreError> {
    if records.is_empty() {
        return Err(StoreError::InvalidResponse(format!(
            "No results returned from {} operation",
            action
        )));
    }
    Ok(records.swap_remove(0))
}
