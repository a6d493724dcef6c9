//! Room Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    #[default]
    Available,
    Occupied,
    Cleaning,
    Maintenance,
}

/// Guest room; captain orders may be charged to one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: EntityId,
    pub number: String,
    /// e.g. "single", "double", "suite"
    pub room_type: String,
    /// Nightly rate
    pub rate: Decimal,
    #[serde(default)]
    pub status: RoomStatus,
    #[serde(default)]
    pub floor: Option<i32>,
}

/// Create room payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreate {
    pub number: String,
    pub room_type: String,
    pub rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
}

/// Update room payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RoomStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
}
