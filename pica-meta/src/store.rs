use async_trait::async_trait;
use pica_core::{ArtifactId, ArtifactRecord, RecordField};

use crate::MetaResult;

/// Document store of artifact records.
///
/// Implementations must tolerate concurrent use from many requests.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Insert a new record. A record with the same id is rejected.
    async fn put(&self, record: ArtifactRecord) -> MetaResult<ArtifactId>;

    /// First record whose `field` equals `value`, in insertion order.
    async fn get_by_field(&self, field: RecordField, value: &str) -> MetaResult<Option<ArtifactRecord>>;

    /// Every record whose `field` equals `value`, in insertion order.
    async fn list_by_field(&self, field: RecordField, value: &str) -> MetaResult<Vec<ArtifactRecord>>;

    /// Remove the record with `id`. Returns false if there was none.
    async fn delete(&self, id: &ArtifactId) -> MetaResult<bool>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}
