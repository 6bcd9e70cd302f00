use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::StoragePath;

#[async_trait::async_trait]
pub trait UploadStore: Send + Sync {
    /// Writes the stream under `path` and returns the file's location on disk
    /// together with the number of bytes written.
    async fn store(
        &self,
        path: &StoragePath,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<(PathBuf, u64), UploadStoreError>;

    async fn delete(&self, path: &StoragePath) -> Result<(), UploadStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
