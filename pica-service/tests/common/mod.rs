#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, Rgb, RgbImage};
use pica_blob::{BlobError, BlobKey, BlobResult, BlobStore, MemoryBlobStore, PutResult};
use pica_core::{ArtifactId, ArtifactRecord, RecordField};
use pica_meta::{MemoryMetadataStore, MetaError, MetaResult, MetadataStore};

pub fn png(width: u32, height: u32) -> Bytes {
    encode(width, height, image::ImageFormat::Png)
}

pub fn jpeg(width: u32, height: u32) -> Bytes {
    encode(width, height, image::ImageFormat::Jpeg)
}

fn encode(width: u32, height: u32, format: image::ImageFormat) -> Bytes {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut out, format).unwrap();
    Bytes::from(out.into_inner())
}

fn unreadable_document() -> MetaError {
    MetaError::Document(serde_json::from_str::<serde_json::Value>("{").unwrap_err())
}

/// Metadata store that counts calls and can be told to fail writes.
#[derive(Clone, Default)]
pub struct CountingMetadataStore {
    pub inner: MemoryMetadataStore,
    pub lookups: Arc<AtomicUsize>,
    pub puts: Arc<AtomicUsize>,
    pub deletes: Arc<AtomicUsize>,
    pub fail_puts: bool,
}

impl CountingMetadataStore {
    pub fn failing_puts() -> Self {
        Self {
            fail_puts: true,
            ..Self::default()
        }
    }

    pub fn mutations(&self) -> usize {
        self.puts.load(Ordering::SeqCst) + self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataStore for CountingMetadataStore {
    async fn put(&self, record: ArtifactRecord) -> MetaResult<ArtifactId> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts {
            return Err(unreadable_document());
        }
        self.inner.put(record).await
    }

    async fn get_by_field(&self, field: RecordField, value: &str) -> MetaResult<Option<ArtifactRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_field(field, value).await
    }

    async fn list_by_field(&self, field: RecordField, value: &str) -> MetaResult<Vec<ArtifactRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.list_by_field(field, value).await
    }

    async fn delete(&self, id: &ArtifactId) -> MetaResult<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Blob store whose selected operations fail as if the backend were down.
#[derive(Clone, Default)]
pub struct FlakyBlobStore {
    pub inner: MemoryBlobStore,
    pub fail_puts: bool,
    pub fail_deletes: bool,
}

fn backend_down() -> BlobError {
    BlobError::backend(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "backend down"))
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    async fn put(&self, key: &BlobKey, content_type: Option<&str>, data: Bytes) -> BlobResult<PutResult> {
        if self.fail_puts {
            return Err(backend_down());
        }
        self.inner.put(key, content_type, data).await
    }

    async fn get(&self, key: &BlobKey) -> BlobResult<Bytes> {
        self.inner.get(key).await
    }

    async fn delete(&self, key: &BlobKey) -> BlobResult<()> {
        if self.fail_deletes {
            return Err(backend_down());
        }
        self.inner.delete(key).await
    }

    fn name(&self) -> &'static str {
        "flaky"
    }
}
