//! REST-backed store

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::query::Query;
use crate::realtime::{FeedClient, Subscription};
use crate::store::DataStore;
use crate::{ClientConfig, ClientError, ClientResult, RestClient};
use shared::realtime::ChangeFilter;

/// Store speaking the hub's REST dialect, one path segment per table.
///
/// The change feed connection is opened lazily on the first subscribe
/// and shared by every later one.
#[derive(Debug, Clone)]
pub struct RestStore {
    http: RestClient,
    feed_addr: Option<String>,
    feed: Arc<OnceCell<FeedClient>>,
}

impl RestStore {
    /// Create a store from configuration
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(config.build_rest_client(), config.feed_addr.clone())
    }

    /// Create a store sharing an existing REST client
    pub fn with_client(http: RestClient, feed_addr: Option<String>) -> Self {
        Self {
            http,
            feed_addr,
            feed: Arc::new(OnceCell::new()),
        }
    }

    /// The REST client this store rides on
    pub fn http(&self) -> &RestClient {
        &self.http
    }

    fn table_path(table: &str) -> String {
        format!("rest/v1/{}", table)
    }

    async fn feed(&self) -> ClientResult<&FeedClient> {
        let addr = self
            .feed_addr
            .as_deref()
            .ok_or_else(|| ClientError::Internal("No feed address configured".to_string()))?;
        self.feed
            .get_or_try_init(|| async {
                tracing::info!("Connecting change feed at {}", addr);
                FeedClient::connect(addr).await
            })
            .await
            .map_err(ClientError::Feed)
    }
}

#[async_trait]
impl DataStore for RestStore {
    async fn fetch_by_id(&self, table: &str, id: &str) -> ClientResult<Option<Value>> {
        let query = Query::table(table).eq("id", id).limit(1);
        let mut rows = self.fetch_list(&query).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    async fn fetch_list(&self, query: &Query) -> ClientResult<Vec<Value>> {
        self.http
            .get(&Self::table_path(query.table_name()), &query.to_params())
            .await
    }

    async fn insert(&self, table: &str, rows: Value) -> ClientResult<Vec<Value>> {
        self.http
            .post_returning(&Self::table_path(table), &rows)
            .await
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> ClientResult<Value> {
        let params = vec![("id".to_string(), format!("eq.{}", id))];
        let mut rows: Vec<Value> = self
            .http
            .patch_returning(&Self::table_path(table), &params, &patch)
            .await?;
        if rows.is_empty() {
            return Err(ClientError::NotFound(format!("{}/{}", table, id)));
        }
        Ok(rows.remove(0))
    }

    async fn subscribe(&self, table: &str, filter: ChangeFilter) -> ClientResult<Subscription> {
        let feed = self.feed().await?;
        feed.subscribe(table, filter).await.map_err(Into::into)
    }
}
