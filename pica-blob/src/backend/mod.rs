pub mod fs;
pub mod memory;
pub mod s3;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::{BlobResult, BlobStore};

pub use fs::FileSystemBlobStore;
pub use memory::MemoryBlobStore;
pub use s3::{S3CompatibleStore, S3Config};

/// Blob backend selected once at startup.
#[derive(Debug, Clone)]
pub enum BlobBackend {
    Memory,
    FileSystem {
        /// Base directory holding client containers.
        root: PathBuf,
    },
    S3(S3Config),
}

impl BlobBackend {
    pub async fn connect(&self) -> BlobResult<Arc<dyn BlobStore>> {
        match self {
            Self::Memory => {
                info!("blob backend: memory");
                Ok(Arc::new(MemoryBlobStore::new()))
            }
            Self::FileSystem { root } => {
                tokio::fs::create_dir_all(root).await?;
                info!(root = %root.display(), "blob backend: filesystem");
                Ok(Arc::new(FileSystemBlobStore::new(root.clone())))
            }
            Self::S3(config) => {
                let store = S3CompatibleStore::connect(config.clone()).await?;
                info!(bucket = %config.bucket, endpoint = ?config.endpoint_url, "blob backend: s3");
                Ok(Arc::new(store))
            }
        }
    }
}
