use bytes::Bytes;
use chrono::Utc;
use std::path::Path;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{FileMain, FileResponse};
use crate::services::upload::UploadContent;
use crate::storage::StorageProvider;

const FILE_COLUMNS: &str =
    "id, owner_id, name, extension, size, (data IS NOT NULL) AS inline, storage_path, created_at";

/// MIME type served for a file extension. Unknown extensions are opaque binary.
pub fn content_type_for(extension: &str) -> &'static str {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => "application/octet-stream",
    }
}

/// Extension of an uploaded file name including the leading dot, or empty
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default()
}

/// File service
pub struct FileService;

impl FileService {
    /// Persist an upload owned by `owner_id`.
    /// Inline content goes into the row, spooled content is handed to the storage provider.
    pub async fn upload(
        db: &Database,
        storage: &dyn StorageProvider,
        owner_id: i64,
        file_name: String,
        content: UploadContent,
    ) -> Result<FileResponse> {
        let file_name = Path::new(&file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        if file_name.is_empty() {
            return Err(AppError::BadRequest("Invalid file name".to_string()));
        }
        if content.size() == 0 {
            return Err(AppError::BadRequest("File is empty".to_string()));
        }

        let extension = extension_of(&file_name);
        let size = content.size() as i64;
        let now = Utc::now().to_rfc3339();

        let file_id = match content {
            UploadContent::Inline(data) => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO files (owner_id, name, extension, size, data, storage_path, created_at)
                    VALUES (?, ?, ?, ?, ?, NULL, ?)
                    "#,
                )
                .bind(owner_id)
                .bind(&file_name)
                .bind(&extension)
                .bind(size)
                .bind(data.as_ref())
                .bind(&now)
                .execute(db.pool())
                .await?;
                result.last_insert_rowid()
            }
            UploadContent::Spooled { path, .. } => {
                let key = format!("{}{}", Uuid::new_v4(), extension);

                // The temp file is removed when `path` drops, whatever happens here
                storage.put_file(&key, &path).await?;

                let inserted = sqlx::query(
                    r#"
                    INSERT INTO files (owner_id, name, extension, size, data, storage_path, created_at)
                    VALUES (?, ?, ?, ?, NULL, ?, ?)
                    "#,
                )
                .bind(owner_id)
                .bind(&file_name)
                .bind(&extension)
                .bind(size)
                .bind(&key)
                .bind(&now)
                .execute(db.pool())
                .await;

                match inserted {
                    Ok(result) => {
                        tracing::info!(
                            "Stored {} bytes on {} storage as {}",
                            size,
                            storage.storage_type(),
                            key
                        );
                        result.last_insert_rowid()
                    }
                    Err(e) => {
                        if let Err(cleanup) = storage.delete(&key).await {
                            tracing::error!("Failed to remove orphaned blob {}: {}", key, cleanup);
                        }
                        return Err(e.into());
                    }
                }
            }
        };

        Self::get_metadata(db, file_id).await
    }

    /// Get a file by ID, including inline content
    pub async fn get_file(db: &Database, file_id: i64) -> Result<FileMain> {
        let file: FileMain = sqlx::query_as("SELECT * FROM files WHERE id = ?")
            .bind(file_id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        Ok(file)
    }

    /// Get a file the caller owns
    pub async fn get_owned(db: &Database, file_id: i64, user_id: i64) -> Result<FileMain> {
        let file = Self::get_file(db, file_id).await?;

        if file.owner_id != user_id {
            tracing::warn!(
                "Employee {} denied access to file {} owned by {}",
                user_id,
                file_id,
                file.owner_id
            );
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        Ok(file)
    }

    async fn get_metadata(db: &Database, file_id: i64) -> Result<FileResponse> {
        let sql = format!("SELECT {} FROM files WHERE id = ?", FILE_COLUMNS);
        sqlx::query_as(&sql)
            .bind(file_id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    /// Metadata of every file owned by the caller
    pub async fn list_owned(db: &Database, user_id: i64) -> Result<Vec<FileResponse>> {
        let sql = format!("SELECT {} FROM files WHERE owner_id = ? ORDER BY id", FILE_COLUMNS);
        let files: Vec<FileResponse> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(db.pool())
            .await?;
        Ok(files)
    }

    /// Load a file's content for its owner
    pub async fn read(
        db: &Database,
        storage: &dyn StorageProvider,
        file_id: i64,
        user_id: i64,
    ) -> Result<(FileMain, Bytes)> {
        let mut file = Self::get_owned(db, file_id, user_id).await?;

        let data = match (file.data.take(), file.storage_path.as_deref()) {
            (Some(data), _) => Bytes::from(data),
            (None, Some(key)) => storage.get(key).await?,
            (None, None) => {
                return Err(AppError::Internal(format!(
                    "File {} has no content location",
                    file.id
                )))
            }
        };

        Ok((file, data))
    }

    /// Delete a file the caller owns, together with any on-disk content
    pub async fn delete(
        db: &Database,
        storage: &dyn StorageProvider,
        file_id: i64,
        user_id: i64,
    ) -> Result<()> {
        let file = Self::get_owned(db, file_id, user_id).await?;

        sqlx::query("DELETE FROM files WHERE id = ? AND owner_id = ?")
            .bind(file.id)
            .bind(user_id)
            .execute(db.pool())
            .await?;

        if let Some(key) = &file.storage_path {
            if let Err(e) = storage.delete(key).await {
                tracing::error!("File {} deleted but blob {} remains: {}", file.id, key, e);
            }
        }

        tracing::info!("Employee {} deleted file {}", user_id, file.id);
        Ok(())
    }
}
