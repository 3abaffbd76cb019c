use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::{BlobError, BlobKey, BlobResult, BlobStore, PutResult};

/// In-memory blob store for tests and development.
///
/// Containers are implicit: a blob's container exists while it does.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.blobs.read().contains_key(path)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        key: &BlobKey,
        _content_type: Option<&str>,
        data: Bytes,
    ) -> BlobResult<PutResult> {
        let size_bytes = data.len() as u64;
        self.blobs.write().insert(key.path(), data);
        Ok(PutResult {
            size_bytes,
        })
    }

    async fn get(&self, key: &BlobKey) -> BlobResult<Bytes> {
        let path = key.path();
        self.blobs
            .read()
            .get(&path)
            .cloned()
            .ok_or_else(|| BlobError::not_found(path))
    }

    async fn delete(&self, key: &BlobKey) -> BlobResult<()> {
        let path = key.path();
        match self.blobs.write().remove(&path) {
            Some(_) => Ok(()),
            None => Err(BlobError::not_found(path)),
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
