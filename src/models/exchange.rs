use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Device exchange event
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExchangeHistory {
    pub id: i64,
    pub exchange_date: String,
    pub exchange_status: String,
    pub employee_id: i64,
    pub device_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateExchangeHistoryRequest {
    /// RFC 3339; values without an offset are read as UTC
    #[serde(deserialize_with = "crate::models::timestamp::deserialize")]
    pub exchange_date: DateTime<Utc>,
    pub exchange_status: String,
    pub employee_id: i64,
    pub device_id: i64,
}

/// File ↔ exchange event link
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileExchangeHistory {
    pub file_id: i64,
    pub exchange_history_id: i64,
}
