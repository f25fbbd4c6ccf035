// hub-client/tests/feed_integration.rs
// Feed client against a scripted TCP server

use std::time::Duration;

use serde_json::json;
use tokio::net::TcpListener;
use tokio::time::timeout;
use uuid::Uuid;

use hub_client::realtime::transport::{TcpTransport, Transport};
use hub_client::{ChangeFilter, ChangeKind, FeedClient, FeedFrame, RowChange};
use shared::realtime::{FrameType, SubscribeRequest, UnsubscribeRequest};

/// Feed server stub: acks every subscribe and immediately pushes one
/// "confirmed" change for the subscribed row. Unsubscribes are recorded
/// on the returned channel.
async fn spawn_feed_server() -> (String, tokio::sync::mpsc::UnboundedReceiver<Uuid>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (released_tx, released_rx) = tokio::sync::mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let transport = TcpTransport::from_stream(stream);

        while let Ok(frame) = transport.read_frame().await {
            match frame.frame_type {
                FrameType::Subscribe => {
                    let request: SubscribeRequest = frame.parse_payload().unwrap();
                    let sub_id = Uuid::new_v4();
                    transport
                        .write_frame(&FeedFrame::ack(frame.frame_id, sub_id))
                        .await
                        .unwrap();

                    let change = RowChange {
                        table: request.table.clone(),
                        kind: ChangeKind::Update,
                        row: json!({
                            "id": request.filter.value,
                            "status": "confirmed",
                        }),
                    };
                    transport
                        .write_frame(&FeedFrame::change(sub_id, &change))
                        .await
                        .unwrap();
                }
                FrameType::Unsubscribe => {
                    let request: UnsubscribeRequest = frame.parse_payload().unwrap();
                    let _ = released_tx.send(request.subscription_id);
                }
                _ => {}
            }
        }
    });

    (addr, released_rx)
}

#[tokio::test]
async fn subscribe_receives_pushed_change() {
    let (addr, _released) = spawn_feed_server().await;
    let client = FeedClient::connect(&addr).await.unwrap();

    let mut sub = client
        .subscribe("orders", ChangeFilter::eq("id", "order-1"))
        .await
        .unwrap();

    let change = timeout(Duration::from_secs(5), sub.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(change.table, "orders");
    assert_eq!(change.row["id"], "order-1");
    assert_eq!(change.row["status"], "confirmed");
}

#[tokio::test]
async fn subscriptions_multiplex_one_connection() {
    let (addr, _released) = spawn_feed_server().await;
    let client = FeedClient::connect(&addr).await.unwrap();

    let mut first = client
        .subscribe("orders", ChangeFilter::eq("id", "order-a"))
        .await
        .unwrap();
    let mut second = client
        .subscribe("orders", ChangeFilter::eq("id", "order-b"))
        .await
        .unwrap();

    let change_a = timeout(Duration::from_secs(5), first.next())
        .await
        .unwrap()
        .unwrap();
    let change_b = timeout(Duration::from_secs(5), second.next())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(change_a.row["id"], "order-a");
    assert_eq!(change_b.row["id"], "order-b");
}

#[tokio::test]
async fn close_tells_server_to_release() {
    let (addr, mut released) = spawn_feed_server().await;
    let client = FeedClient::connect(&addr).await.unwrap();

    let sub = client
        .subscribe("orders", ChangeFilter::eq("id", "order-1"))
        .await
        .unwrap();
    let sub_id = sub.id();

    sub.close().await.unwrap();

    let seen = timeout(Duration::from_secs(5), released.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seen, sub_id);
}

#[tokio::test]
async fn drop_releases_best_effort() {
    let (addr, mut released) = spawn_feed_server().await;
    let client = FeedClient::connect(&addr).await.unwrap();

    let sub_id = {
        let sub = client
            .subscribe("orders", ChangeFilter::eq("id", "order-1"))
            .await
            .unwrap();
        sub.id()
    };

    let seen = timeout(Duration::from_secs(5), released.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seen, sub_id);
}
