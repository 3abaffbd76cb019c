use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use pica_blob::{BlobAdapter, BlobKey};
use pica_core::{ArtifactId, ArtifactRecord, ClientId, PicaError, PicaResult, RecordField, UseCase};
use pica_meta::MetadataStore;
use tracing::{debug, info_span, warn, Instrument};

/// Metadata of one artifact.
#[derive(Debug, Clone, Copy)]
pub struct GetImage {
    pub id: ArtifactId,
}

/// Metadata of every artifact a client owns, oldest first.
#[derive(Debug, Clone)]
pub struct ListImages {
    pub client_id: ClientId,
}

/// Stored bytes of one artifact.
#[derive(Debug, Clone, Copy)]
pub struct DownloadImage {
    pub id: ArtifactId,
}

#[derive(Debug, Clone)]
pub struct Download {
    pub record: ArtifactRecord,
    pub bytes: Bytes,
}

impl Download {
    pub fn content_type(&self) -> &str {
        &self.record.content_type
    }

    pub fn filename(&self) -> &str {
        &self.record.original_filename
    }
}

/// Metadata lookups, plus blob reads for downloads.
///
/// A record whose blob is gone is reported as `NotFound` and left in place.
pub struct RetrievalOrchestrator {
    blobs: BlobAdapter,
    records: Arc<dyn MetadataStore>,
}

impl RetrievalOrchestrator {
    pub fn new(blobs: BlobAdapter, records: Arc<dyn MetadataStore>) -> Self {
        Self { blobs, records }
    }

    async fn find(&self, id: &ArtifactId) -> PicaResult<ArtifactRecord> {
        self.records
            .get_by_field(RecordField::Id, &id.to_string())
            .await?
            .ok_or_else(|| PicaError::not_found(format!("No image with id '{id}'")))
    }

    async fn download(&self, id: ArtifactId) -> PicaResult<Download> {
        let record = self.find(&id).await?;
        let key = BlobKey::for_record(&record);

        match self.blobs.get(&key).await {
            Ok(bytes) => {
                debug!(path = %key.path(), size_bytes = bytes.len(), "image read");
                Ok(Download { record, bytes })
            }
            Err(err) if err.is_not_found() => {
                warn!(path = %key.path(), "record has no blob");
                Err(PicaError::not_found(format!("No image with id '{id}'")).with_source(err))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl UseCase<GetImage> for RetrievalOrchestrator {
    type Output = ArtifactRecord;

    async fn execute(&self, command: GetImage) -> PicaResult<ArtifactRecord> {
        let span = info_span!("get", artifact_id = %command.id);
        async {
            let record = self.find(&command.id).await?;
            debug!(path = %record.storage_path, "record found");
            Ok::<_, PicaError>(record)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl UseCase<ListImages> for RetrievalOrchestrator {
    type Output = Vec<ArtifactRecord>;

    async fn execute(&self, command: ListImages) -> PicaResult<Vec<ArtifactRecord>> {
        let span = info_span!("list", client_id = %command.client_id);
        async {
            let records = self
                .records
                .list_by_field(RecordField::ClientId, command.client_id.as_str())
                .await?;
            debug!(count = records.len(), "records listed");
            Ok::<_, PicaError>(records)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl UseCase<DownloadImage> for RetrievalOrchestrator {
    type Output = Download;

    async fn execute(&self, command: DownloadImage) -> PicaResult<Download> {
        let span = info_span!("download", artifact_id = %command.id);
        self.download(command.id).instrument(span).await
    }
}
