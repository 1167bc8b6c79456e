use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub contact_info: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    #[serde(default)]
    pub contact_info: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub mac_address: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDeviceRequest {
    pub name: String,
    #[serde(default)]
    pub mac_address: String,
}

/// Position held by an employee since `date_received`
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Position {
    pub id: i64,
    pub title: String,
    pub date_received: String,
    pub employee_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreatePositionRequest {
    pub title: String,
    /// RFC 3339; values without an offset are read as UTC
    #[serde(deserialize_with = "crate::models::timestamp::deserialize")]
    pub date_received: DateTime<Utc>,
    pub employee_id: i64,
}

/// Access level granted to a position
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccessLevel {
    pub id: i64,
    pub level_access: String,
    pub effective_period: String,
    pub position_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccessLevelRequest {
    pub level_access: String,
    /// RFC 3339; values without an offset are read as UTC
    #[serde(deserialize_with = "crate::models::timestamp::deserialize")]
    pub effective_period: DateTime<Utc>,
    pub position_id: i64,
}
