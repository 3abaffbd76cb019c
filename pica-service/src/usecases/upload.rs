use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use pica_blob::{BlobAdapter, BlobKey};
use pica_core::record::blob_filename;
use pica_core::{ArtifactId, ArtifactRecord, ClientId, IdGenerator, PicaError, PicaResult, UseCase};
use pica_image::{ImageNormalizer, NormalizedImage};
use pica_meta::MetadataStore;
use serde_json::json;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Ingest one image for a client.
#[derive(Debug, Clone)]
pub struct UploadImage {
    pub client_id: ClientId,
    /// Filename as submitted; only its last path component is kept.
    pub filename: String,
    pub bytes: Bytes,
}

/// Progress of one upload. Failures after `BlobWritten` leave an orphan blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Received,
    Normalized,
    BlobWritten,
    MetadataWritten,
    Complete,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UploadStage::Received => "received",
            UploadStage::Normalized => "normalized",
            UploadStage::BlobWritten => "blob_written",
            UploadStage::MetadataWritten => "metadata_written",
            UploadStage::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Identifier generator -> normalizer -> blob store -> metadata store.
///
/// There is no rollback: a metadata failure after the blob write is
/// reported as `OrphanBlob` and the blob stays where it is.
pub struct UploadOrchestrator {
    ids: Arc<dyn IdGenerator>,
    normalizer: ImageNormalizer,
    blobs: BlobAdapter,
    records: Arc<dyn MetadataStore>,
    max_input_bytes: usize,
}

impl UploadOrchestrator {
    pub fn new(
        ids: Arc<dyn IdGenerator>,
        normalizer: ImageNormalizer,
        blobs: BlobAdapter,
        records: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            ids,
            normalizer,
            blobs,
            records,
            max_input_bytes: 10 * 1024 * 1024,
        }
    }

    pub fn with_max_input_bytes(mut self, bytes: usize) -> Self {
        self.max_input_bytes = bytes;
        self
    }

    async fn run(&self, id: ArtifactId, command: UploadImage) -> PicaResult<ArtifactId> {
        let UploadImage {
            client_id,
            filename,
            bytes,
        } = command;
        advance(UploadStage::Received);

        if bytes.len() > self.max_input_bytes {
            return Err(PicaError::invalid_image(format!(
                "Image of {} bytes exceeds the {} byte limit",
                bytes.len(),
                self.max_input_bytes
            )));
        }

        let normalized = self.normalize(bytes).await?;
        advance(UploadStage::Normalized);

        let filename = match blob_filename(&filename) {
            Some(_) => filename,
            None => format!("image.{}", normalized.format.extension()),
        };

        let mut record = ArtifactRecord::new(id, client_id, filename, normalized.content_type());
        if !normalized.tags.is_empty() {
            record = record.with_tags(normalized.tags);
        }

        let key = BlobKey::for_record(&record);
        self.blobs
            .put(&key, Some(record.content_type.as_str()), normalized.bytes)
            .await
            .map_err(|err| {
                warn!(path = %key.path(), error = %err, "blob write failed");
                PicaError::from(err)
            })?;
        advance(UploadStage::BlobWritten);

        if let Err(err) = self.records.put(record).await {
            let path = key.path();
            error!(path = %path, error = %err, "metadata write failed after blob write; blob is orphaned");
            return Err(PicaError::orphan_blob(format!("Metadata write failed; blob left at {path}"))
                .with_data(json!({ "artifactId": id.to_string(), "path": path }))
                .with_source(err));
        }
        advance(UploadStage::MetadataWritten);

        advance(UploadStage::Complete);
        info!(path = %key.path(), "image uploaded");
        Ok(id)
    }

    /// Decoding and resizing are CPU-bound, so they run on the blocking pool.
    async fn normalize(&self, bytes: Bytes) -> PicaResult<NormalizedImage> {
        let normalizer = self.normalizer.clone();
        let normalized = tokio::task::spawn_blocking(move || normalizer.normalize(&bytes))
            .await
            .map_err(|err| PicaError::general_error("Image normalization task failed").with_source(err))?;

        normalized.map_err(|err| {
            debug!(error = %err, "image rejected");
            PicaError::from(err)
        })
    }
}

fn advance(stage: UploadStage) {
    debug!(%stage, "upload stage");
}

#[async_trait]
impl UseCase<UploadImage> for UploadOrchestrator {
    type Output = ArtifactId;

    async fn execute(&self, command: UploadImage) -> PicaResult<ArtifactId> {
        let id = self.ids.generate();
        let span = info_span!("upload", client_id = %command.client_id, artifact_id = %id);
        self.run(id, command).instrument(span).await
    }
}
