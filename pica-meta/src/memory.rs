use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use pica_core::{ArtifactId, ArtifactRecord, RecordField};

use crate::{MetaError, MetaResult, MetadataStore};

/// In-memory metadata store for testing and development.
///
/// Records are kept in a vector so listings come back in insertion order.
#[derive(Clone, Default)]
pub struct MemoryMetadataStore {
    records: Arc<RwLock<Vec<ArtifactRecord>>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn put(&self, record: ArtifactRecord) -> MetaResult<ArtifactId> {
        let mut records = self.records.write();
        if records.iter().any(|r| r.id == record.id) {
            return Err(MetaError::Duplicate(record.id.to_string()));
        }
        let id = record.id;
        records.push(record);
        Ok(id)
    }

    async fn get_by_field(&self, field: RecordField, value: &str) -> MetaResult<Option<ArtifactRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .find(|r| r.field_value(field) == value)
            .cloned())
    }

    async fn list_by_field(&self, field: RecordField, value: &str) -> MetaResult<Vec<ArtifactRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| r.field_value(field) == value)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &ArtifactId) -> MetaResult<bool> {
        let mut records = self.records.write();
        match records.iter().position(|r| &r.id == id) {
            Some(index) => {
                records.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
