//! Data access layer
//!
//! One capability trait with two backends: [`RestStore`] speaking the
//! hub's REST dialect, and [`MemoryStore`] serving offline mode and
//! tests. Rows cross the trait boundary as JSON values so it stays
//! object-safe; the typed helpers live in [`DataStoreExt`].

mod memory;
mod rest;

pub mod fixtures;

pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::query::Query;
use crate::realtime::Subscription;
use crate::{ClientError, ClientResult};
use shared::realtime::ChangeFilter;

/// Capability surface for reading and writing table rows
#[async_trait]
pub trait DataStore: Send + Sync + std::fmt::Debug {
    /// Fetch a row by primary key
    async fn fetch_by_id(&self, table: &str, id: &str) -> ClientResult<Option<Value>>;

    /// Fetch rows matching a query
    async fn fetch_list(&self, query: &Query) -> ClientResult<Vec<Value>>;

    /// Insert one row (object) or several (array), returning the stored rows
    async fn insert(&self, table: &str, rows: Value) -> ClientResult<Vec<Value>>;

    /// Patch a row by primary key, returning the stored row
    async fn update(&self, table: &str, id: &str, patch: Value) -> ClientResult<Value>;

    /// Subscribe to row changes on a table
    async fn subscribe(&self, table: &str, filter: ChangeFilter) -> ClientResult<Subscription>;
}

/// Typed convenience layer over [`DataStore`].
///
/// Blanket-implemented, including for `dyn DataStore`.
#[async_trait]
pub trait DataStoreExt: DataStore {
    /// Fetch a row by primary key, decoded
    async fn get_row<T>(&self, table: &str, id: &str) -> ClientResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.fetch_by_id(table, id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Fetch a row that must exist
    async fn require_row<T>(&self, table: &str, id: &str) -> ClientResult<T>
    where
        T: DeserializeOwned + Send,
    {
        self.get_row(table, id)
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("{}/{}", table, id)))
    }

    /// Fetch rows matching a query, decoded
    async fn list_rows<T>(&self, query: &Query) -> ClientResult<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.fetch_list(query)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(Into::into))
            .collect()
    }

    /// Insert one typed row, returning its stored form
    async fn insert_row<T, R>(&self, table: &str, row: &T) -> ClientResult<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let mut stored = self.insert(table, serde_json::to_value(row)?).await?;
        if stored.is_empty() {
            return Err(ClientError::InvalidResponse(format!(
                "Insert into {} returned no rows",
                table
            )));
        }
        serde_json::from_value(stored.remove(0)).map_err(Into::into)
    }

    /// Insert several typed rows in a single call
    async fn insert_rows<T>(&self, table: &str, rows: &[T]) -> ClientResult<usize>
    where
        T: Serialize + Sync,
    {
        let values = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        let stored = self.insert(table, Value::Array(values)).await?;
        Ok(stored.len())
    }

    /// Patch a typed row by primary key
    async fn update_row<T, R>(&self, table: &str, id: &str, patch: &T) -> ClientResult<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let stored = self.update(table, id, serde_json::to_value(patch)?).await?;
        serde_json::from_value(stored).map_err(Into::into)
    }
}

impl<S: DataStore + ?Sized> DataStoreExt for S {}
