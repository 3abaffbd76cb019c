use std::sync::Arc;

use async_trait::async_trait;
use pica_blob::{BlobAdapter, BlobKey};
use pica_core::{ArtifactId, PicaResult, RecordField, UseCase};
use pica_meta::MetadataStore;
use tracing::{info, info_span, warn, Instrument};

/// Remove an artifact and its metadata.
#[derive(Debug, Clone, Copy)]
pub struct DeleteImage {
    pub id: ArtifactId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

impl DeleteOutcome {
    /// Wire form: `OK` or `NOT_FOUND`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteOutcome::Deleted => "OK",
            DeleteOutcome::NotFound => "NOT_FOUND",
        }
    }
}

/// Metadata lookup -> blob delete (best effort) -> metadata delete.
///
/// Unknown ids are a no-op. Success is reported iff the metadata record
/// is removed.
pub struct DeleteOrchestrator {
    blobs: BlobAdapter,
    records: Arc<dyn MetadataStore>,
}

impl DeleteOrchestrator {
    pub fn new(blobs: BlobAdapter, records: Arc<dyn MetadataStore>) -> Self {
        Self { blobs, records }
    }

    async fn run(&self, id: ArtifactId) -> PicaResult<DeleteOutcome> {
        let Some(record) = self.records.get_by_field(RecordField::Id, &id.to_string()).await? else {
            info!("nothing to delete");
            return Ok(DeleteOutcome::NotFound);
        };

        let key = BlobKey::for_record(&record);
        if let Err(err) = self.blobs.delete(&key).await {
            warn!(path = %key.path(), error = %err, "blob delete failed; removing metadata anyway");
        }

        if self.records.delete(&id).await? {
            info!(path = %key.path(), "image deleted");
            Ok(DeleteOutcome::Deleted)
        } else {
            info!("record vanished before delete");
            Ok(DeleteOutcome::NotFound)
        }
    }
}

#[async_trait]
impl UseCase<DeleteImage> for DeleteOrchestrator {
    type Output = DeleteOutcome;

    async fn execute(&self, command: DeleteImage) -> PicaResult<DeleteOutcome> {
        let span = info_span!("delete", artifact_id = %command.id);
        self.run(command.id).instrument(span).await
    }
}
