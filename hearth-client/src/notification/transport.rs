use async_trait::async_trait;
use shared::message::{FRAME_HEADER_LEN, PushMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

use crate::error::{ClientError, ClientResult};

/// Transport abstraction for the push channel
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn read_message(&self) -> ClientResult<PushMessage>;
    async fn write_message(&self, msg: &PushMessage) -> ClientResult<()>;
    async fn close(&self) -> ClientResult<()>;
}

/// TCP Transport Implementation
#[derive(Debug, Clone)]
pub struct TcpTransport {
    reader: Arc<Mutex<OwnedReadHalf>>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl TcpTransport {
    pub async fn connect(addr: &str, timeout: Duration) -> ClientResult<Self> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| ClientError::Connection(format!("connect to {} timed out", addr)))?
            .map_err(|e| ClientError::Connection(format!("{}: {}", addr, e)))?;
        Ok(Self::from_stream(stream))
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
        }
    }
}

fn frame_error(e: shared::message::FrameError) -> ClientError {
    ClientError::InvalidResponse(e.to_string())
}

#[async_trait]
impl Transport for TcpTransport {
    async fn read_message(&self) -> ClientResult<PushMessage> {
        let mut reader = self.reader.lock().await;

        let mut header = [0u8; FRAME_HEADER_LEN];
        reader.read_exact(&mut header).await?;
        let (event_type, id, len) = PushMessage::decode_header(&header).map_err(frame_error)?;

        let mut payload = vec![0u8; len];
        reader.read_exact(&mut payload).await?;

        Ok(PushMessage {
            id,
            event_type,
            payload,
        })
    }

    async fn write_message(&self, msg: &PushMessage) -> ClientResult<()> {
        let data = msg.encode().map_err(frame_error)?;
        let mut writer = self.writer.lock().await;
        writer.write_all(&data).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn close(&self) -> ClientResult<()> {
        let mut writer = self.writer.lock().await;
        writer.shutdown().await?;
        Ok(())
    }
}
