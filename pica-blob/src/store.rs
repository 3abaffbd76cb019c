use async_trait::async_trait;
use bytes::Bytes;
use pica_core::record::{storage_path, stored_filename};
use pica_core::{ArtifactId, ArtifactRecord, ClientId};

use crate::BlobResult;

/// Core blob storage operations - must be implemented by all storage backends
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob, creating its container if absent.
    async fn put(
        &self,
        key: &BlobKey,
        content_type: Option<&str>,
        data: Bytes,
    ) -> BlobResult<PutResult>;

    /// Read a whole blob. Missing blobs are `BlobError::NotFound`.
    async fn get(&self, key: &BlobKey) -> BlobResult<Bytes>;

    /// Remove a blob and its container once empty.
    ///
    /// Backends report a missing blob as `BlobError::NotFound`; callers
    /// decide whether that matters.
    async fn delete(&self, key: &BlobKey) -> BlobResult<()>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Result of a successful put operation
#[derive(Debug, Clone)]
pub struct PutResult {
    pub size_bytes: u64,
}

/// Location of one artifact blob: `{client_id}/{artifact_id}/{filename}`.
///
/// `(client_id, artifact_id)` is the container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobKey {
    client_id: ClientId,
    artifact_id: ArtifactId,
    filename: String,
}

impl BlobKey {
    pub fn new(client_id: ClientId, artifact_id: ArtifactId, original_filename: &str) -> Self {
        Self {
            client_id,
            artifact_id,
            filename: stored_filename(original_filename),
        }
    }

    pub fn for_record(record: &ArtifactRecord) -> Self {
        Self::new(record.client_id.clone(), record.id, &record.original_filename)
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn artifact_id(&self) -> &ArtifactId {
        &self.artifact_id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Full object path.
    pub fn path(&self) -> String {
        storage_path(&self.client_id, &self.artifact_id, &self.filename)
    }

    /// Container path, `{client_id}/{artifact_id}`.
    pub fn container(&self) -> String {
        format!("{}/{}", self.client_id, self.artifact_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_path_matches_record_storage_path() {
        let client = ClientId::parse("c1").unwrap();
        let record = ArtifactRecord::new(ArtifactId::new(), client, "shots/cat.png", "image/png");

        let key = BlobKey::for_record(&record);
        assert_eq!(key.path(), record.storage_path);
        assert_eq!(key.container(), format!("c1/{}", record.id));
        assert_eq!(key.filename(), "cat.png");
    }
}
