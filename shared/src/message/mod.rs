//! Push channel messages
//!
//! The server pushes "new notification" events over a plain TCP stream.
//! Every frame is:
//!
//! ```text
//! | event type (1) | message id (16) | payload len (u32 LE, 4) | JSON payload |
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub mod payload;
pub use payload::*;

pub const PROTOCOL_VERSION: u16 = 1;

/// Size of the fixed frame header
pub const FRAME_HEADER_LEN: usize = 1 + 16 + 4;

/// Frames larger than this are treated as corrupt
pub const MAX_PAYLOAD_LEN: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Handshake = 0,
    Notification = 1,
    Heartbeat = 2,
}

impl TryFrom<u8> for EventType {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventType::Handshake),
            1 => Ok(EventType::Notification),
            2 => Ok(EventType::Heartbeat),
            other => Err(FrameError::UnknownEventType(other)),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Handshake => write!(f, "handshake"),
            EventType::Notification => write!(f, "notification"),
            EventType::Heartbeat => write!(f, "heartbeat"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("unknown event type: {0}")]
    UnknownEventType(u8),

    #[error("frame payload too large: {0} bytes")]
    TooLarge(usize),

    #[error("truncated frame: need {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// One framed message on the push channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    pub id: Uuid,
    pub event_type: EventType,
    pub payload: Vec<u8>,
}

impl PushMessage {
    pub fn new(event_type: EventType, payload: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            payload,
        }
    }

    fn json<T: Serialize>(event_type: EventType, payload: &T) -> Result<Self, FrameError> {
        Ok(Self::new(event_type, serde_json::to_vec(payload)?))
    }

    pub fn handshake(payload: &HandshakePayload) -> Result<Self, FrameError> {
        Self::json(EventType::Handshake, payload)
    }

    pub fn notification(payload: &NotificationPayload) -> Result<Self, FrameError> {
        Self::json(EventType::Notification, payload)
    }

    pub fn heartbeat() -> Self {
        Self::new(EventType::Heartbeat, Vec::new())
    }

    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, FrameError> {
        Ok(serde_json::from_slice(&self.payload)?)
    }

    /// Encode into a wire frame
    pub fn encode(&self) -> Result<Vec<u8>, FrameError> {
        if self.payload.len() > MAX_PAYLOAD_LEN {
            return Err(FrameError::TooLarge(self.payload.len()));
        }
        let mut data = Vec::with_capacity(FRAME_HEADER_LEN + self.payload.len());
        data.push(self.event_type as u8);
        data.extend_from_slice(self.id.as_bytes());
        data.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&self.payload);
        Ok(data)
    }

    /// Parse the fixed header, returning event type, id and payload length
    pub fn decode_header(header: &[u8; FRAME_HEADER_LEN]) -> Result<(EventType, Uuid, usize), FrameError> {
        let event_type = EventType::try_from(header[0])?;
        let mut id = [0u8; 16];
        id.copy_from_slice(&header[1..17]);
        let mut len = [0u8; 4];
        len.copy_from_slice(&header[17..21]);
        let len = u32::from_le_bytes(len) as usize;
        if len > MAX_PAYLOAD_LEN {
            return Err(FrameError::TooLarge(len));
        }
        Ok((event_type, Uuid::from_bytes(id), len))
    }

    /// Decode a complete frame held in memory
    pub fn decode(frame: &[u8]) -> Result<Self, FrameError> {
        let header: &[u8; FRAME_HEADER_LEN] = frame
            .get(..FRAME_HEADER_LEN)
            .and_then(|h| h.try_into().ok())
            .ok_or(FrameError::Truncated {
                needed: FRAME_HEADER_LEN,
                got: frame.len(),
            })?;
        let (event_type, id, len) = Self::decode_header(header)?;
        let body = &frame[FRAME_HEADER_LEN..];
        if body.len() < len {
            return Err(FrameError::Truncated {
                needed: FRAME_HEADER_LEN + len,
                got: frame.len(),
            });
        }
        Ok(Self {
            id,
            event_type,
            payload: body[..len].to_vec(),
        })
    }
}
