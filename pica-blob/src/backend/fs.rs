use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use crate::{BlobError, BlobKey, BlobResult, BlobStore, PutResult};

/// Blob store on the local filesystem.
///
/// Layout under `root`: `{client_id}/{artifact_id}/{filename}`, with the
/// `{client_id}/{artifact_id}` directory as the container.
#[derive(Debug, Clone)]
pub struct FileSystemBlobStore {
    root: PathBuf,
}

impl FileSystemBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn container_dir(&self, key: &BlobKey) -> PathBuf {
        self.root
            .join(key.client_id().as_str())
            .join(key.artifact_id().to_string())
    }

    fn blob_file(&self, key: &BlobKey) -> PathBuf {
        self.container_dir(key).join(key.filename())
    }
}

#[async_trait]
impl BlobStore for FileSystemBlobStore {
    async fn put(
        &self,
        key: &BlobKey,
        _content_type: Option<&str>,
        data: Bytes,
    ) -> BlobResult<PutResult> {
        fs::create_dir_all(self.container_dir(key)).await?;

        let size_bytes = data.len() as u64;
        fs::write(self.blob_file(key), &data).await?;

        Ok(PutResult {
            size_bytes,
        })
    }

    async fn get(&self, key: &BlobKey) -> BlobResult<Bytes> {
        match fs::read(self.blob_file(key)).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(BlobError::not_found(key.path())),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, key: &BlobKey) -> BlobResult<()> {
        let removed = match fs::remove_file(self.blob_file(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(BlobError::not_found(key.path())),
            Err(err) => return Err(err.into()),
        };

        // The container goes whether or not the blob was still there.
        let container = self.container_dir(key);
        match fs::remove_dir(&container).await {
            Ok(()) => debug!(container = %container.display(), "container removed"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => debug!(container = %container.display(), error = %err, "container kept"),
        }

        removed
    }

    fn name(&self) -> &'static str {
        "fs"
    }
}
