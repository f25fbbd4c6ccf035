//! Realtime feed wire types
//!
//! Shared between the feed client and any in-process feed used for tests.
//! Frames travel length-prefixed: 1 byte frame type, 16 bytes frame id,
//! 16 bytes correlation id (nil = none), 4 bytes little-endian payload
//! length, then a JSON payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Raised when a frame byte does not name a known frame type.
#[derive(Debug, Error)]
#[error("invalid frame type: {0}")]
pub struct InvalidFrameType(pub u8);

/// Feed frame type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameType {
    /// Open a filtered subscription on a table
    Subscribe = 0,
    /// Acknowledge a subscribe, carrying the subscription id
    Ack = 1,
    /// Release a subscription
    Unsubscribe = 2,
    /// Row change pushed for a subscription
    Change = 3,
    /// Feed-side failure
    Error = 4,
}

impl TryFrom<u8> for FrameType {
    type Error = InvalidFrameType;

    fn try_from(value: u8) -> Result<Self, InvalidFrameType> {
        match value {
            0 => Ok(FrameType::Subscribe),
            1 => Ok(FrameType::Ack),
            2 => Ok(FrameType::Unsubscribe),
            3 => Ok(FrameType::Change),
            4 => Ok(FrameType::Error),
            other => Err(InvalidFrameType(other)),
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameType::Subscribe => write!(f, "subscribe"),
            FrameType::Ack => write!(f, "ack"),
            FrameType::Unsubscribe => write!(f, "unsubscribe"),
            FrameType::Change => write!(f, "change"),
            FrameType::Error => write!(f, "error"),
        }
    }
}

/// Equality filter scoping a subscription to matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeFilter {
    pub column: String,
    pub value: String,
}

impl ChangeFilter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Whether a row satisfies the filter. Non-string values compare by
    /// their JSON rendering.
    pub fn matches(&self, row: &serde_json::Value) -> bool {
        match row.get(&self.column) {
            Some(serde_json::Value::String(s)) => s == &self.value,
            Some(other) => other.to_string() == self.value,
            None => false,
        }
    }
}

impl fmt::Display for ChangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=eq.{}", self.column, self.value)
    }
}

/// What happened to the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A row-level change delivered on a subscription.
///
/// `row` is the full new row (the old row for deletes); last-write-wins,
/// no client-side merging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowChange {
    pub table: String,
    pub kind: ChangeKind,
    pub row: serde_json::Value,
}

/// Subscribe payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub table: String,
    pub filter: ChangeFilter,
}

/// Ack payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeAck {
    pub subscription_id: Uuid,
}

/// Unsubscribe payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsubscribeRequest {
    pub subscription_id: Uuid,
}

/// Error payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedErrorPayload {
    pub message: String,
}

/// Feed frame body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedFrame {
    pub frame_id: Uuid,
    pub frame_type: FrameType,
    /// Subscribe frame id on acks; subscription id on changes.
    pub correlation_id: Option<Uuid>,
    pub payload: Vec<u8>,
}

impl FeedFrame {
    pub fn new(frame_type: FrameType, payload: Vec<u8>) -> Self {
        Self {
            frame_id: Uuid::new_v4(),
            frame_type,
            correlation_id: None,
            payload,
        }
    }

    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// Build a subscribe frame
    pub fn subscribe(request: &SubscribeRequest) -> Self {
        Self::new(
            FrameType::Subscribe,
            serde_json::to_vec(request).expect("Failed to serialize subscribe request"),
        )
    }

    /// Build an ack for a subscribe frame
    pub fn ack(subscribe_frame_id: Uuid, subscription_id: Uuid) -> Self {
        Self::new(
            FrameType::Ack,
            serde_json::to_vec(&SubscribeAck { subscription_id })
                .expect("Failed to serialize ack"),
        )
        .with_correlation_id(subscribe_frame_id)
    }

    /// Build an unsubscribe frame
    pub fn unsubscribe(subscription_id: Uuid) -> Self {
        Self::new(
            FrameType::Unsubscribe,
            serde_json::to_vec(&UnsubscribeRequest { subscription_id })
                .expect("Failed to serialize unsubscribe request"),
        )
    }

    /// Build a change frame addressed to a subscription
    pub fn change(subscription_id: Uuid, change: &RowChange) -> Self {
        Self::new(
            FrameType::Change,
            serde_json::to_vec(change).expect("Failed to serialize row change"),
        )
        .with_correlation_id(subscription_id)
    }

    /// Build an error frame
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(
            FrameType::Error,
            serde_json::to_vec(&FeedErrorPayload {
                message: message.into(),
            })
            .expect("Failed to serialize error payload"),
        )
    }

    /// Parse the payload as the given type
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}
