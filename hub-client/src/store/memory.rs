//! In-memory store
//!
//! Backs offline mode and tests. Inserts stamp ids and timestamps the
//! way the hub would, and every write publishes on a local feed so
//! subscriptions behave like the real thing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::query::Query;
use crate::realtime::{LocalFeed, Subscription};
use crate::store::DataStore;
use crate::{ClientError, ClientResult};
use shared::realtime::{ChangeFilter, ChangeKind, RowChange};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    feed: LocalFeed,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the demo dataset
    pub fn with_sample_data() -> Self {
        let store = Self::new();
        crate::store::fixtures::seed(&store);
        store
    }

    /// Insert rows directly, without stamping
    pub fn seed_table(&self, table: &str, rows: Vec<Value>) {
        let mut tables = self.tables.lock().unwrap();
        tables.entry(table.to_string()).or_default().extend(rows);
    }

    fn stamp(row: &mut Map<String, Value>) {
        if !row.contains_key("id") {
            row.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
        }
        if !row.contains_key("created_at") {
            row.insert(
                "created_at".to_string(),
                json!(chrono::Utc::now().to_rfc3339()),
            );
        }
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn fetch_by_id(&self, table: &str, id: &str) -> ClientResult<Option<Value>> {
        let tables = self.tables.lock().unwrap();
        let Some(rows) = tables.get(table) else {
            return Ok(None);
        };
        Ok(rows
            .iter()
            .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
            .cloned())
    }

    async fn fetch_list(&self, query: &Query) -> ClientResult<Vec<Value>> {
        let mut rows: Vec<Value> = {
            let tables = self.tables.lock().unwrap();
            tables
                .get(query.table_name())
                .map(|rows| rows.iter().filter(|row| query.matches(row)).cloned().collect())
                .unwrap_or_default()
        };
        query.sort_and_clip(&mut rows);
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Value) -> ClientResult<Vec<Value>> {
        let incoming = match rows {
            Value::Array(rows) => rows,
            row @ Value::Object(_) => vec![row],
            other => {
                return Err(ClientError::Validation(format!(
                    "Expected row object, got {}",
                    other
                )));
            }
        };

        let mut stored = Vec::with_capacity(incoming.len());
        {
            let mut tables = self.tables.lock().unwrap();
            let entries = tables.entry(table.to_string()).or_default();
            for row in incoming {
                let Value::Object(mut map) = row else {
                    return Err(ClientError::Validation("Expected row object".to_string()));
                };
                Self::stamp(&mut map);
                let row = Value::Object(map);
                entries.push(row.clone());
                stored.push(row);
            }
        }

        // Publish outside the table lock
        for row in &stored {
            self.feed.publish(&RowChange {
                table: table.to_string(),
                kind: ChangeKind::Insert,
                row: row.clone(),
            });
        }

        Ok(stored)
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> ClientResult<Value> {
        let Value::Object(patch) = patch else {
            return Err(ClientError::Validation("Expected patch object".to_string()));
        };

        let updated = {
            let mut tables = self.tables.lock().unwrap();
            let rows = tables
                .get_mut(table)
                .ok_or_else(|| ClientError::NotFound(format!("{}/{}", table, id)))?;
            let row = rows
                .iter_mut()
                .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
                .ok_or_else(|| ClientError::NotFound(format!("{}/{}", table, id)))?;

            if let Value::Object(map) = row {
                for (key, value) in patch {
                    map.insert(key, value);
                }
            }
            row.clone()
        };

        self.feed.publish(&RowChange {
            table: table.to_string(),
            kind: ChangeKind::Update,
            row: updated.clone(),
        });

        Ok(updated)
    }

    async fn subscribe(&self, table: &str, filter: ChangeFilter) -> ClientResult<Subscription> {
        Ok(self.feed.subscribe(table, filter))
    }
}
