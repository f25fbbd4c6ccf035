use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, broadcast};
use uuid::Uuid;

use crate::realtime::FeedError;
use shared::realtime::{FeedFrame, FrameType};

/// Transport abstraction for feed communication
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn read_frame(&self) -> Result<FeedFrame, FeedError>;
    async fn write_frame(&self, frame: &FeedFrame) -> Result<(), FeedError>;
    async fn close(&self) -> Result<(), FeedError>;
}

/// TCP Transport Implementation
#[derive(Debug, Clone)]
pub struct TcpTransport {
    reader: Arc<Mutex<OwnedReadHalf>>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl TcpTransport {
    pub async fn connect(addr: &str) -> Result<Self, FeedError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| FeedError::Connection(e.to_string()))?;
        Ok(Self::from_stream(stream))
    }

    /// Wrap an already established stream
    pub fn from_stream(stream: TcpStream) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn read_frame(&self) -> Result<FeedFrame, FeedError> {
        let mut reader = self.reader.lock().await;

        // Read frame type (1 byte)
        let mut type_buf = [0u8; 1];
        reader
            .read_exact(&mut type_buf)
            .await
            .map_err(FeedError::Io)?;

        let frame_type = FrameType::try_from(type_buf[0])
            .map_err(|_| FeedError::InvalidFrame("Invalid frame type".into()))?;

        // Read frame id (16 bytes)
        let mut uuid_buf = [0u8; 16];
        reader
            .read_exact(&mut uuid_buf)
            .await
            .map_err(FeedError::Io)?;
        let frame_id = Uuid::from_bytes(uuid_buf);

        // Read correlation id (16 bytes)
        let mut correlation_buf = [0u8; 16];
        reader
            .read_exact(&mut correlation_buf)
            .await
            .map_err(FeedError::Io)?;
        let correlation_id_raw = Uuid::from_bytes(correlation_buf);
        let correlation_id = if correlation_id_raw.is_nil() {
            None
        } else {
            Some(correlation_id_raw)
        };

        // Read payload length (4 bytes)
        let mut len_buf = [0u8; 4];
        reader
            .read_exact(&mut len_buf)
            .await
            .map_err(FeedError::Io)?;

        let len = u32::from_le_bytes(len_buf) as usize;

        // Read payload
        let mut payload = vec![0u8; len];
        reader
            .read_exact(&mut payload)
            .await
            .map_err(FeedError::Io)?;

        Ok(FeedFrame {
            frame_id,
            frame_type,
            correlation_id,
            payload,
        })
    }

    async fn write_frame(&self, frame: &FeedFrame) -> Result<(), FeedError> {
        let mut writer = self.writer.lock().await;
        let mut data = Vec::new();
        data.push(frame.frame_type as u8);
        data.extend_from_slice(frame.frame_id.as_bytes());

        // Write correlation id (16 bytes, nil = none)
        let correlation_bytes = frame.correlation_id.unwrap_or(Uuid::nil()).into_bytes();
        data.extend_from_slice(&correlation_bytes);

        data.extend_from_slice(&(frame.payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&frame.payload);

        writer.write_all(&data).await.map_err(FeedError::Io)?;
        Ok(())
    }

    async fn close(&self) -> Result<(), FeedError> {
        // Dropping the Arc references will eventually close the stream
        Ok(())
    }
}

/// Memory Transport Implementation (for in-process communication)
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    /// Receiver for frames FROM the server
    rx: Arc<Mutex<broadcast::Receiver<FeedFrame>>>,
    /// Sender for frames TO the server
    tx: broadcast::Sender<FeedFrame>,
}

impl MemoryTransport {
    /// Create a new memory transport
    ///
    /// # Arguments
    /// * `server_tx` - The server's broadcast sender (to subscribe to pushes)
    /// * `client_tx` - The channel to send frames TO the server
    pub fn new(
        server_tx: &broadcast::Sender<FeedFrame>,
        client_tx: &broadcast::Sender<FeedFrame>,
    ) -> Self {
        Self {
            rx: Arc::new(Mutex::new(server_tx.subscribe())),
            tx: client_tx.clone(),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn read_frame(&self) -> Result<FeedFrame, FeedError> {
        let mut rx = self.rx.lock().await;
        rx.recv()
            .await
            .map_err(|e| FeedError::Connection(format!("Memory channel error: {}", e)))
    }

    async fn write_frame(&self, frame: &FeedFrame) -> Result<(), FeedError> {
        self.tx
            .send(frame.clone())
            .map_err(|e| FeedError::Connection(format!("Failed to send to server: {}", e)))?;
        Ok(())
    }

    async fn close(&self) -> Result<(), FeedError> {
        Ok(())
    }
}
