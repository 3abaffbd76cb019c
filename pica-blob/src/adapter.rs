use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::{BlobConfig, BlobError, BlobKey, BlobReceipt, BlobResult, BlobStore};

/// The blob adapter orchestrators embed: size guard on writes and
/// tolerant deletes over any [`BlobStore`].
#[derive(Clone)]
pub struct BlobAdapter {
    store: Arc<dyn BlobStore>,
    config: BlobConfig,
}

impl BlobAdapter {
    /// Create a new blob adapter
    pub fn new<S: BlobStore + 'static>(store: S, config: BlobConfig) -> Self {
        Self::from_arc(Arc::new(store), config)
    }

    /// Create from an already shared store (as returned by `BlobBackend::connect`)
    pub fn from_arc(store: Arc<dyn BlobStore>, config: BlobConfig) -> Self {
        Self { store, config }
    }

    /// Store a blob under `{client}/{id}/{filename}`.
    pub async fn put(
        &self,
        key: &BlobKey,
        content_type: Option<&str>,
        data: Bytes,
    ) -> BlobResult<BlobReceipt> {
        let size = data.len() as u64;
        if size > self.config.max_blob_bytes {
            return Err(BlobError::invalid(format!(
                "Blob size {} exceeds maximum {}",
                size, self.config.max_blob_bytes
            )));
        }

        let path = key.path();
        let result = self.store.put(key, content_type, data).await?;
        debug!(backend = self.store.name(), path = %path, size_bytes = result.size_bytes, "blob stored");

        let mut receipt = BlobReceipt::new(path, result.size_bytes);
        if let Some(ct) = content_type {
            receipt = receipt.with_content_type(ct);
        }
        Ok(receipt)
    }

    /// Read a whole blob.
    pub async fn get(&self, key: &BlobKey) -> BlobResult<Bytes> {
        self.store.get(key).await
    }

    /// Delete a blob. An already-missing blob is logged, not returned.
    pub async fn delete(&self, key: &BlobKey) -> BlobResult<()> {
        match self.store.delete(key).await {
            Ok(()) => {
                debug!(backend = self.store.name(), path = %key.path(), "blob deleted");
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                warn!(backend = self.store.name(), path = %key.path(), "blob already missing on delete");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
