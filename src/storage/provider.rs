use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

use crate::error::Result;

/// Storage provider for file content that is too large to keep inline
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Take ownership of a spooled local file under `key`
    async fn put_file(&self, key: &str, local_path: &Path) -> Result<()>;

    /// Download data from storage
    async fn get(&self, key: &str) -> Result<Bytes>;

    /// Delete data from storage. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Get the storage type name
    fn storage_type(&self) -> &'static str;
}
