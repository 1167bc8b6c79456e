use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// File model. Content lives either inline in `data` or on disk at `storage_path`.
#[derive(Debug, Clone, FromRow)]
pub struct FileMain {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub extension: String,
    pub size: i64,
    pub data: Option<Vec<u8>>,
    pub storage_path: Option<String>,
    pub created_at: String,
}

/// File metadata returned to clients; content is only served by download
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FileResponse {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub extension: String,
    pub size: i64,
    pub inline: bool,
    pub storage_path: Option<String>,
    pub created_at: String,
}

/// Recorded physical location of a file
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FileMainLocation {
    pub id: i64,
    pub absolute_path: String,
    pub file_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateFileLocationRequest {
    pub absolute_path: String,
    pub file_id: i64,
}
