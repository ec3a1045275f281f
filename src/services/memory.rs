use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tokio::sync::RwLock;

use super::query::Query;
use super::store::{RecordStore, StoreError};
use crate::config::TableSettings;

#[derive(Debug, Default)]
struct Table {
    records: Vec<Value>,
    next_id: i64,
}

impl Table {
    fn seeded(records: Vec<Value>) -> Self {
        let mut table = Table {
            records: Vec::with_capacity(records.len()),
            next_id: 1,
        };
        let max_id = records
            .iter()
            .filter_map(|r| r.get("Id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0);
        table.next_id = max_id + 1;

        for mut record in records {
            if record.get("Id").and_then(Value::as_i64).is_none() {
                table.assign_id(&mut record);
            }
            table.records.push(record);
        }
        table
    }

    fn assign_id(&mut self, record: &mut Value) {
        if let Some(object) = record.as_object_mut() {
            object.insert("Id".to_string(), Value::from(self.next_id));
            self.next_id += 1;
        }
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.get("Id").and_then(Value::as_i64) == Some(id))
    }
}

/// In-memory record store used in mock mode and in tests
///
/// Evaluates [`Query`] locally and sleeps for a fixed delay on every call to
/// mimic network latency.
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
    delay: Duration,
}

impl MemoryStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            delay,
        }
    }

    /// Seed a table; records without an `Id` get one assigned
    pub fn with_table(mut self, table: &str, records: Vec<Value>) -> Self {
        self.tables
            .get_mut()
            .insert(table.to_string(), Table::seeded(records));
        self
    }

    /// Load `properties.json`, `agents.json` and `neighborhoods.json` from `dir`.
    /// Favorites and comparison lists always start empty.
    pub fn from_fixtures(
        dir: &Path,
        tables: &TableSettings,
        delay: Duration,
    ) -> Result<Self, StoreError> {
        let store = Self::new(delay)
            .with_table(&tables.property, load_fixture(&dir.join("properties.json"))?)
            .with_table(&tables.agent, load_fixture(&dir.join("agents.json"))?)
            .with_table(&tables.neighborhood, load_fixture(&dir.join("neighborhoods.json"))?)
            .with_table(&tables.favorite, Vec::new())
            .with_table(&tables.compare_item, Vec::new());

        tracing::info!("Mock record store loaded from {}", dir.display());
        Ok(store)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

fn load_fixture(path: &Path) -> Result<Vec<Value>, StoreError> {
    if !path.exists() {
        tracing::warn!("Fixture {} missing, starting with an empty table", path.display());
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| StoreError::Fixture(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map_err(|e| StoreError::Fixture(format!("{}: {}", path.display(), e)))
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_records(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        self.pause().await;
        let tables = self.tables.read().await;
        let Some(table) = tables.get(table) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<&Value> = table.records.iter().filter(|r| query.matches(r)).collect();
        matched.sort_by(|a, b| query.compare(a, b));

        let (offset, limit) = query
            .paging
            .map(|p| (p.offset, p.limit))
            .unwrap_or((0, usize::MAX));

        Ok(matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|r| query.project(r))
            .collect())
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        query: &Query,
    ) -> Result<Value, StoreError> {
        self.pause().await;
        let tables = self.tables.read().await;
        tables
            .get(table)
            .and_then(|t| t.position(id).map(|idx| &t.records[idx]))
            .map(|r| query.project(r))
            .ok_or_else(|| StoreError::NotFound(format!("{} {} not found", table, id)))
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Value>,
    ) -> Result<Vec<Value>, StoreError> {
        self.pause().await;
        if records.iter().any(|r| !r.is_object()) {
            return Err(StoreError::RecordFailed("Records must be JSON objects".into()));
        }

        let mut tables = self.tables.write().await;
        let table = tables.entry(table.to_string()).or_insert_with(|| Table {
            next_id: 1,
            ..Default::default()
        });

        let mut created = Vec::with_capacity(records.len());
        for mut record in records {
            table.assign_id(&mut record);
            table.records.push(record.clone());
            created.push(record);
        }
        Ok(created)
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Value>,
    ) -> Result<Vec<Value>, StoreError> {
        self.pause().await;
        let mut tables = self.tables.write().await;
        let table_name = table;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| StoreError::NotFound(format!("table {}", table_name)))?;

        // Validate the whole batch before touching anything
        let mut targets = Vec::with_capacity(records.len());
        for record in &records {
            let id = record
                .get("Id")
                .and_then(Value::as_i64)
                .ok_or_else(|| StoreError::RecordFailed("Update is missing Id".into()))?;
            let idx = table
                .position(id)
                .ok_or_else(|| StoreError::NotFound(format!("{} {} not found", table_name, id)))?;
            targets.push(idx);
        }

        let mut updated = Vec::with_capacity(records.len());
        for (idx, changes) in targets.into_iter().zip(records) {
            let stored = &mut table.records[idx];
            if let (Some(target), Some(changes)) = (stored.as_object_mut(), changes.as_object()) {
                for (key, value) in changes.iter().filter(|(key, _)| key.as_str() != "Id") {
                    target.insert(key.clone(), value.clone());
                }
            }
            updated.push(stored.clone());
        }
        Ok(updated)
    }

    async fn delete_records(&self, table: &str, ids: &[i64]) -> Result<(), StoreError> {
        self.pause().await;
        let mut tables = self.tables.write().await;
        let table_name = table;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| StoreError::NotFound(format!("table {}", table_name)))?;

        if let Some(missing) = ids.iter().find(|id| table.position(**id).is_none()) {
            return Err(StoreError::NotFound(format!("{} {} not found", table_name, missing)));
        }

        table
            .records
            .retain(|r| !r.get("Id").and_then(Value::as_i64).is_some_and(|id| ids.contains(&id)));
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
