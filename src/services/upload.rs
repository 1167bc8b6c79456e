use bytes::{Bytes, BytesMut};
use std::path::PathBuf;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// Incoming upload content after buffering
#[derive(Debug)]
pub enum UploadContent {
    /// At or below the threshold, kept in memory
    Inline(Bytes),
    /// Above the threshold, spooled to a temp file that is removed on drop
    Spooled { path: TempPath, size: u64 },
}

impl UploadContent {
    pub fn size(&self) -> u64 {
        match self {
            UploadContent::Inline(data) => data.len() as u64,
            UploadContent::Spooled { size, .. } => *size,
        }
    }
}

enum Sink {
    Memory(BytesMut),
    File { path: TempPath, file: tokio::fs::File },
}

/// Accumulates upload chunks in memory and spills to disk once the
/// running size exceeds the threshold. Dropping the buffer at any point
/// removes the spill file.
pub struct UploadBuffer {
    threshold: u64,
    spill_dir: PathBuf,
    len: u64,
    sink: Sink,
}

impl UploadBuffer {
    pub fn new(threshold: u64, spill_dir: impl Into<PathBuf>) -> Self {
        Self {
            threshold,
            spill_dir: spill_dir.into(),
            len: 0,
            sink: Sink::Memory(BytesMut::new()),
        }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub async fn write(&mut self, chunk: &[u8]) -> Result<()> {
        self.len += chunk.len() as u64;

        if let Sink::Memory(buf) = &mut self.sink {
            if self.len <= self.threshold {
                buf.extend_from_slice(chunk);
                return Ok(());
            }

            let buffered = std::mem::take(buf).freeze();
            let (std_file, path) = tempfile::Builder::new()
                .prefix("assettrack_upload_")
                .tempfile_in(&self.spill_dir)
                .map_err(|e| AppError::Internal(format!("Failed to create temp file: {}", e)))?
                .into_parts();
            let mut file = tokio::fs::File::from_std(std_file);
            tracing::debug!("Upload exceeded {} bytes, spooling to {:?}", self.threshold, path);

            // On error `path` drops here and takes the file with it
            file.write_all(&buffered)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to write temp file: {}", e)))?;
            self.sink = Sink::File { path, file };
        }

        if let Sink::File { file, .. } = &mut self.sink {
            if let Err(e) = file.write_all(chunk).await {
                self.abort();
                return Err(AppError::Internal(format!("Failed to write temp file: {}", e)));
            }
        }

        Ok(())
    }

    pub async fn finish(self) -> Result<UploadContent> {
        match self.sink {
            Sink::Memory(buf) => Ok(UploadContent::Inline(buf.freeze())),
            Sink::File { path, mut file } => {
                file.flush()
                    .await
                    .map_err(|e| AppError::Internal(format!("Failed to flush temp file: {}", e)))?;
                Ok(UploadContent::Spooled {
                    path,
                    size: self.len,
                })
            }
        }
    }

    /// Drop buffered content, removing the temp file if one was created
    pub fn abort(&mut self) {
        self.sink = Sink::Memory(BytesMut::new());
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn stays_in_memory_up_to_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let mut buffer = UploadBuffer::new(8, dir.path());
        buffer.write(b"1234").await.unwrap();
        buffer.write(b"5678").await.unwrap();

        match buffer.finish().await.unwrap() {
            UploadContent::Inline(data) => assert_eq!(&data[..], b"12345678"),
            other => panic!("expected inline content, got {:?}", other),
        }
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn spills_once_threshold_is_crossed() {
        let dir = tempfile::tempdir().unwrap();
        let mut buffer = UploadBuffer::new(8, dir.path());
        buffer.write(b"12345").await.unwrap();
        buffer.write(b"6789").await.unwrap();
        buffer.write(b"abc").await.unwrap();
        assert_eq!(buffer.len(), 12);

        let content = buffer.finish().await.unwrap();
        assert_eq!(content.size(), 12);
        match &content {
            UploadContent::Spooled { path, .. } => {
                assert_eq!(std::fs::read(path).unwrap(), b"123456789abc");
            }
            other => panic!("expected spooled content, got {:?}", other),
        }

        drop(content);
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn abort_removes_spill_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut buffer = UploadBuffer::new(2, dir.path());
        buffer.write(b"too long").await.unwrap();
        assert_eq!(entries(dir.path()), 1);

        buffer.abort();
        assert!(buffer.is_empty());
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn dropping_a_spilled_buffer_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut buffer = UploadBuffer::new(2, dir.path());
        buffer.write(b"more than two").await.unwrap();
        assert_eq!(entries(dir.path()), 1);

        // A client disconnect drops the handler future mid-upload
        drop(buffer);
        assert_eq!(entries(dir.path()), 0);
    }
}
