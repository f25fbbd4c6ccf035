//! Change feed client
//!
//! Row-level change notifications arrive over a framed TCP connection.
//! A subscribe is acknowledged with a subscription id; every later change
//! frame carries that id as its correlation id, and the background
//! dispatch task routes it to the matching [`Subscription`] channel.

pub mod transport;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use shared::realtime::{
    ChangeFilter, FeedErrorPayload, FeedFrame, FrameType, RowChange, SubscribeAck,
    SubscribeRequest,
};

use transport::{MemoryTransport, TcpTransport, Transport};

/// How long to wait for the server to acknowledge a subscribe.
const ACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Change feed error type
#[derive(Debug, Error)]
pub enum FeedError {
    /// Socket-level failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection failed or dropped
    #[error("Connection error: {0}")]
    Connection(String),

    /// Frame could not be decoded
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Server rejected the subscription
    #[error("Rejected: {0}")]
    Rejected(String),

    /// No acknowledgment in time
    #[error("Timeout: {0}")]
    Timeout(String),
}

#[derive(Debug, Clone)]
enum FeedTransport {
    Tcp(TcpTransport),
    Memory(MemoryTransport),
}

impl FeedTransport {
    async fn read_frame(&self) -> Result<FeedFrame, FeedError> {
        match self {
            FeedTransport::Tcp(t) => t.read_frame().await,
            FeedTransport::Memory(t) => t.read_frame().await,
        }
    }

    async fn write_frame(&self, frame: &FeedFrame) -> Result<(), FeedError> {
        match self {
            FeedTransport::Tcp(t) => t.write_frame(frame).await,
            FeedTransport::Memory(t) => t.write_frame(frame).await,
        }
    }

    async fn close(&self) -> Result<(), FeedError> {
        match self {
            FeedTransport::Tcp(t) => t.close().await,
            FeedTransport::Memory(t) => t.close().await,
        }
    }
}

/// Feed client
///
/// Holds one connection and multiplexes any number of subscriptions over
/// it. Cloning shares the connection and the dispatch task.
#[derive(Debug, Clone)]
pub struct FeedClient {
    transport: FeedTransport,
    pending: Arc<Mutex<HashMap<Uuid, oneshot::Sender<FeedFrame>>>>,
    routes: Arc<Mutex<HashMap<Uuid, mpsc::UnboundedSender<RowChange>>>>,
    shutdown: CancellationToken,
}

impl FeedClient {
    /// Connect via TCP
    pub async fn connect(addr: &str) -> Result<Self, FeedError> {
        let transport = TcpTransport::connect(addr).await?;
        Ok(Self::new(FeedTransport::Tcp(transport)))
    }

    /// Create an in-memory client wired to a scripted server
    pub fn memory(
        server_tx: &broadcast::Sender<FeedFrame>,
        client_tx: &broadcast::Sender<FeedFrame>,
    ) -> Self {
        let transport = MemoryTransport::new(server_tx, client_tx);
        Self::new(FeedTransport::Memory(transport))
    }

    fn new(transport: FeedTransport) -> Self {
        let pending: Arc<Mutex<HashMap<Uuid, oneshot::Sender<FeedFrame>>>> =
            Arc::new(Mutex::new(HashMap::new()));
        let routes: Arc<Mutex<HashMap<Uuid, mpsc::UnboundedSender<RowChange>>>> =
            Arc::new(Mutex::new(HashMap::new()));
        let shutdown = CancellationToken::new();

        let client = Self {
            transport: transport.clone(),
            pending: pending.clone(),
            routes: routes.clone(),
            shutdown: shutdown.clone(),
        };

        // Spawn background task to dispatch frames
        tokio::spawn(async move {
            loop {
                let frame = tokio::select! {
                    _ = shutdown.cancelled() => {
                        tracing::debug!("Feed dispatch stopped");
                        break;
                    }
                    frame = transport.read_frame() => frame,
                };
                match frame {
                    Ok(frame) => match frame.frame_type {
                        FrameType::Ack | FrameType::Error => {
                            let Some(correlation_id) = frame.correlation_id else {
                                tracing::debug!("Dropping {} frame without correlation", frame.frame_type);
                                continue;
                            };
                            let tx = pending.lock().unwrap().remove(&correlation_id);
                            match tx {
                                Some(tx) => {
                                    let _ = tx.send(frame);
                                }
                                None => {
                                    tracing::debug!("Unmatched {} frame", frame.frame_type)
                                }
                            }
                        }
                        FrameType::Change => {
                            let Some(subscription_id) = frame.correlation_id else {
                                tracing::debug!("Dropping change frame without subscription");
                                continue;
                            };
                            let change: RowChange = match frame.parse_payload() {
                                Ok(change) => change,
                                Err(e) => {
                                    tracing::warn!("Bad change payload: {}", e);
                                    continue;
                                }
                            };

                            let mut routes = routes.lock().unwrap();
                            let delivered = match routes.get(&subscription_id) {
                                Some(tx) => tx.send(change).is_ok(),
                                None => {
                                    tracing::debug!(
                                        "Change for unknown subscription {}",
                                        subscription_id
                                    );
                                    continue;
                                }
                            };
                            if !delivered {
                                // Receiver dropped without closing
                                routes.remove(&subscription_id);
                            }
                        }
                        FrameType::Subscribe | FrameType::Unsubscribe => {
                            tracing::debug!("Ignoring server-bound {} frame", frame.frame_type);
                        }
                    },
                    Err(e) => {
                        tracing::error!("Feed read error: {}", e);
                        break;
                    }
                }
            }
        });

        client
    }

    /// Subscribe to row changes on a table, filtered server-side.
    ///
    /// Waits for the acknowledgment carrying the subscription id.
    pub async fn subscribe(
        &self,
        table: &str,
        filter: ChangeFilter,
    ) -> Result<Subscription, FeedError> {
        let request = SubscribeRequest {
            table: table.to_string(),
            filter,
        };
        let frame = FeedFrame::subscribe(&request);
        let frame_id = frame.frame_id;

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().unwrap();
            pending.insert(frame_id, tx);
        }

        if let Err(e) = self.transport.write_frame(&frame).await {
            let mut pending = self.pending.lock().unwrap();
            pending.remove(&frame_id);
            return Err(e);
        }

        let reply = match tokio::time::timeout(ACK_TIMEOUT, rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => {
                return Err(FeedError::Connection("Reply channel closed".to_string()));
            }
            Err(_) => {
                let mut pending = self.pending.lock().unwrap();
                pending.remove(&frame_id);
                return Err(FeedError::Timeout("Subscribe timed out".to_string()));
            }
        };

        match reply.frame_type {
            FrameType::Ack => {
                let ack: SubscribeAck = reply
                    .parse_payload()
                    .map_err(|e| FeedError::InvalidFrame(e.to_string()))?;

                let (change_tx, change_rx) = mpsc::unbounded_channel();
                self.routes
                    .lock()
                    .unwrap()
                    .insert(ack.subscription_id, change_tx);

                tracing::debug!(
                    "Subscribed to {} as {}",
                    request.table,
                    ack.subscription_id
                );
                Ok(Subscription::feed(
                    ack.subscription_id,
                    request.table,
                    change_rx,
                    self.clone(),
                ))
            }
            FrameType::Error => {
                let payload: FeedErrorPayload = reply
                    .parse_payload()
                    .map_err(|e| FeedError::InvalidFrame(e.to_string()))?;
                Err(FeedError::Rejected(payload.message))
            }
            other => Err(FeedError::InvalidFrame(format!(
                "Unexpected {} reply to subscribe",
                other
            ))),
        }
    }

    /// Stop routing a subscription and tell the server to drop it
    pub async fn release(&self, subscription_id: Uuid) -> Result<(), FeedError> {
        self.routes.lock().unwrap().remove(&subscription_id);
        self.transport
            .write_frame(&FeedFrame::unsubscribe(subscription_id))
            .await
    }

    /// Close the feed connection and stop the dispatch task
    pub async fn close(&self) -> Result<(), FeedError> {
        self.shutdown.cancel();
        self.transport.close().await
    }
}

/// A live subscription to row changes.
///
/// Closing (or dropping) the handle releases the server-side subscription.
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    table: String,
    rx: mpsc::UnboundedReceiver<RowChange>,
    guard: SubscriptionGuard,
}

#[derive(Debug)]
enum SubscriptionGuard {
    Feed(FeedClient),
    Local(LocalFeed),
    Detached,
}

impl Subscription {
    fn feed(id: Uuid, table: String, rx: mpsc::UnboundedReceiver<RowChange>, client: FeedClient) -> Self {
        Self {
            id,
            table,
            rx,
            guard: SubscriptionGuard::Feed(client),
        }
    }

    fn local(id: Uuid, table: String, rx: mpsc::UnboundedReceiver<RowChange>, feed: LocalFeed) -> Self {
        Self {
            id,
            table,
            rx,
            guard: SubscriptionGuard::Local(feed),
        }
    }

    /// Server-assigned subscription id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Table this subscription watches
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Wait for the next change. Returns `None` once the feed closes.
    pub async fn next(&mut self) -> Option<RowChange> {
        self.rx.recv().await
    }

    /// Take a change if one is already queued
    pub fn try_next(&mut self) -> Option<RowChange> {
        self.rx.try_recv().ok()
    }

    /// Release the subscription explicitly
    pub async fn close(mut self) -> Result<(), FeedError> {
        match std::mem::replace(&mut self.guard, SubscriptionGuard::Detached) {
            SubscriptionGuard::Feed(client) => client.release(self.id).await,
            SubscriptionGuard::Local(feed) => {
                feed.release(self.id);
                Ok(())
            }
            SubscriptionGuard::Detached => Ok(()),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        match std::mem::replace(&mut self.guard, SubscriptionGuard::Detached) {
            SubscriptionGuard::Feed(client) => {
                let id = self.id;
                // Best effort: release needs a runtime to send the frame
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    handle.spawn(async move {
                        if let Err(e) = client.release(id).await {
                            tracing::debug!("Release on drop failed: {}", e);
                        }
                    });
                }
            }
            SubscriptionGuard::Local(feed) => feed.release(self.id),
            SubscriptionGuard::Detached => {}
        }
    }
}

/// In-process feed used by the memory store.
///
/// Fans published changes out to every matching subscription, applying
/// the same table and filter scoping the server would.
#[derive(Debug, Clone, Default)]
pub struct LocalFeed {
    subs: Arc<Mutex<Vec<LocalSub>>>,
}

#[derive(Debug)]
struct LocalSub {
    id: Uuid,
    table: String,
    filter: ChangeFilter,
    tx: mpsc::UnboundedSender<RowChange>,
}

impl LocalFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a filtered subscription served from this process
    pub fn subscribe(&self, table: &str, filter: ChangeFilter) -> Subscription {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.subs.lock().unwrap().push(LocalSub {
            id,
            table: table.to_string(),
            filter,
            tx,
        });
        Subscription::local(id, table.to_string(), rx, self.clone())
    }

    /// Deliver a change to every matching subscription
    pub fn publish(&self, change: &RowChange) {
        let mut subs = self.subs.lock().unwrap();
        subs.retain(|sub| {
            if sub.table != change.table || !sub.filter.matches(&change.row) {
                return true;
            }
            sub.tx.send(change.clone()).is_ok()
        });
    }

    fn release(&self, id: Uuid) {
        self.subs.lock().unwrap().retain(|sub| sub.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::realtime::ChangeKind;

    /// Scripted feed server: acks every subscribe, then hands the test a
    /// sender for pushing change frames.
    fn scripted_server() -> (FeedClient, broadcast::Sender<FeedFrame>) {
        let (server_tx, _) = broadcast::channel(64);
        let (client_tx, mut from_client) = broadcast::channel(64);
        let client = FeedClient::memory(&server_tx, &client_tx);

        let push = server_tx.clone();
        tokio::spawn(async move {
            while let Ok(frame) = from_client.recv().await {
                if frame.frame_type == FrameType::Subscribe {
                    let request: SubscribeRequest = frame.parse_payload().unwrap();
                    // Subscription id derived from the filter value so the
                    // test can address it
                    let sub_id = Uuid::new_v5(&Uuid::NAMESPACE_OID, request.filter.value.as_bytes());
                    let _ = push.send(FeedFrame::ack(frame.frame_id, sub_id));
                }
            }
        });

        (client, server_tx)
    }

    fn sub_id_for(value: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, value.as_bytes())
    }

    #[tokio::test]
    async fn subscribe_waits_for_ack() {
        let (client, _server_tx) = scripted_server();

        let sub = client
            .subscribe("orders", ChangeFilter::eq("id", "o1"))
            .await
            .unwrap();

        assert_eq!(sub.table(), "orders");
        assert_eq!(sub.id(), sub_id_for("o1"));
    }

    #[tokio::test]
    async fn changes_route_by_subscription_id() {
        let (client, server_tx) = scripted_server();

        let mut sub = client
            .subscribe("orders", ChangeFilter::eq("id", "o1"))
            .await
            .unwrap();

        let change = RowChange {
            table: "orders".to_string(),
            kind: ChangeKind::Update,
            row: json!({"id": "o1", "status": "preparing"}),
        };
        server_tx
            .send(FeedFrame::change(sub.id(), &change))
            .unwrap();

        let received = sub.next().await.unwrap();
        assert_eq!(received.row["status"], "preparing");
    }

    #[tokio::test]
    async fn change_for_other_subscription_is_not_delivered() {
        let (client, server_tx) = scripted_server();

        let mut sub = client
            .subscribe("orders", ChangeFilter::eq("id", "o1"))
            .await
            .unwrap();

        let stray = RowChange {
            table: "orders".to_string(),
            kind: ChangeKind::Update,
            row: json!({"id": "o2", "status": "delivered"}),
        };
        server_tx
            .send(FeedFrame::change(sub_id_for("o2"), &stray))
            .unwrap();

        let mine = RowChange {
            table: "orders".to_string(),
            kind: ChangeKind::Update,
            row: json!({"id": "o1", "status": "confirmed"}),
        };
        server_tx
            .send(FeedFrame::change(sub.id(), &mine))
            .unwrap();

        // Only the addressed change arrives
        let received = sub.next().await.unwrap();
        assert_eq!(received.row["id"], "o1");
        assert!(sub.try_next().is_none());
    }

    #[tokio::test]
    async fn close_sends_unsubscribe() {
        let (client, _server_tx) = scripted_server();

        let sub = client
            .subscribe("orders", ChangeFilter::eq("id", "o1"))
            .await
            .unwrap();
        let sub_id = sub.id();

        sub.close().await.unwrap();
        assert!(!client.routes.lock().unwrap().contains_key(&sub_id));
    }

    #[tokio::test]
    async fn local_feed_filters_by_table_and_column() {
        let feed = LocalFeed::new();
        let mut orders = feed.subscribe("orders", ChangeFilter::eq("id", "o1"));
        let mut payments = feed.subscribe("payments", ChangeFilter::eq("order_id", "o1"));

        feed.publish(&RowChange {
            table: "orders".to_string(),
            kind: ChangeKind::Update,
            row: json!({"id": "o1", "status": "ready"}),
        });

        assert_eq!(orders.try_next().unwrap().row["status"], "ready");
        assert!(payments.try_next().is_none());
    }

    #[tokio::test]
    async fn local_release_stops_delivery() {
        let feed = LocalFeed::new();
        let sub = feed.subscribe("orders", ChangeFilter::eq("id", "o1"));
        sub.close().await.unwrap();

        // Publishing after release must not panic or leak
        feed.publish(&RowChange {
            table: "orders".to_string(),
            kind: ChangeKind::Delete,
            row: json!({"id": "o1"}),
        });
        assert!(feed.subs.lock().unwrap().is_empty());
    }
}
