use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::query::Query;
use super::store::{RecordStore, StoreError};

const PROJECT_HEADER: &str = "X-Apper-Project-Id";
const KEY_HEADER: &str = "X-Apper-Public-Key";

/// Envelope wrapped around every record API response
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    results: Option<Vec<RecordResult>>,
}

/// Per-record outcome of a bulk create/update/delete
#[derive(Debug, Deserialize)]
struct RecordResult {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

/// Remote record API client
///
/// Talks to the hosted table backend:
/// - `POST /tables/{table}/records/query` to fetch with a [`Query`]
/// - `GET /tables/{table}/records/{id}` for a single record
/// - `POST`, `PUT` and `DELETE` on `/tables/{table}/records` for writes
pub struct RecordApiClient {
    base_url: String,
    project_id: String,
    public_key: String,
    client: Client,
}

impl RecordApiClient {
    pub fn new(
        base_url: String,
        project_id: String,
        public_key: String,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            project_id,
            public_key,
            client,
        })
    }

    fn records_url(&self, table: &str) -> String {
        format!(
            "{}/tables/{}/records",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(table)
        )
    }

    /// Attach credentials, send, and unwrap the response envelope
    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Envelope, StoreError> {
        let response = request
            .header(PROJECT_HEADER, &self.project_id)
            .header(KEY_HEADER, &self.public_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("Record not found during {}", action)));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Record API {} failed: {} - {}", action, status, body);
            return Err(StoreError::ApiError(format!("Failed to {}: {}", action, status)));
        }

        let envelope: Envelope = response.json().await?;
        if !envelope.success {
            return Err(StoreError::ApiError(
                envelope
                    .message
                    .unwrap_or_else(|| format!("Failed to {}", action)),
            ));
        }

        Ok(envelope)
    }

    /// Collect the per-record results of a write, failing on the first rejected record
    fn collect_results(envelope: Envelope, action: &str) -> Result<Vec<Value>, StoreError> {
        let results = envelope.results.ok_or_else(|| {
            StoreError::InvalidResponse(format!("No results returned from {} operation", action))
        })?;

        let failed: Vec<&RecordResult> = results.iter().filter(|r| !r.success).collect();
        if let Some(first) = failed.first() {
            tracing::error!("Failed to {} {} records", action, failed.len());
            return Err(StoreError::RecordFailed(
                first
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("Failed to {} record", action)),
            ));
        }

        Ok(results.into_iter().filter_map(|r| r.data).collect())
    }
}

#[async_trait]
impl RecordStore for RecordApiClient {
    async fn fetch_records(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        let url = format!("{}/query", self.records_url(table));

        tracing::debug!("Fetching {} records from: {}", table, url);

        let envelope = self
            .send(self.client.post(&url).json(&query.to_wire()), "fetch records")
            .await?;

        match envelope.data {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(records)) => Ok(records),
            Some(_) => Err(StoreError::InvalidResponse("Expected a data array".into())),
        }
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        query: &Query,
    ) -> Result<Value, StoreError> {
        let url = format!("{}/{}", self.records_url(table), id);
        let fields = query.fields.join(",");

        tracing::debug!("Fetching {} record {}", table, id);

        let envelope = self
            .send(
                self.client.get(&url).query(&[("fields", fields)]),
                "fetch record",
            )
            .await?;

        envelope
            .data
            .filter(|data| !data.is_null())
            .ok_or_else(|| StoreError::NotFound(format!("{} {} not found", table, id)))
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Value>,
    ) -> Result<Vec<Value>, StoreError> {
        let envelope = self
            .send(
                self.client
                    .post(self.records_url(table))
                    .json(&json!({ "records": records })),
                "create",
            )
            .await?;

        let created = Self::collect_results(envelope, "create")?;
        tracing::debug!("Created {} {} records", created.len(), table);
        Ok(created)
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Value>,
    ) -> Result<Vec<Value>, StoreError> {
        let envelope = self
            .send(
                self.client
                    .put(self.records_url(table))
                    .json(&json!({ "records": records })),
                "update",
            )
            .await?;

        Self::collect_results(envelope, "update")
    }

    async fn delete_records(&self, table: &str, ids: &[i64]) -> Result<(), StoreError> {
        let envelope = self
            .send(
                self.client
                    .delete(self.records_url(table))
                    .json(&json!({ "RecordIds": ids })),
                "delete",
            )
            .await?;

        // A delete without per-record results is a plain success
        if envelope.results.is_some() {
            Self::collect_results(envelope, "delete")?;
        }

        tracing::debug!("Deleted {} {} records", ids.len(), table);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "record-api"
    }
}
