//! # pica-blob
//!
//! Binary storage for image artifacts.
//!
//! Every blob lives at `{client_id}/{artifact_id}/{filename}`; the
//! `{client_id}/{artifact_id}` prefix is its container. Backends implement
//! the small [`BlobStore`] trait, and [`BlobAdapter`] adds what callers rely
//! on regardless of backend:
//!
//! - a size guard on writes ([`BlobConfig::max_blob_bytes`])
//! - deletes that tolerate an already-missing blob
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use pica_blob::{BlobAdapter, BlobConfig, BlobKey, MemoryBlobStore};
//! use pica_core::{ArtifactId, ClientId};
//!
//! # async fn demo() -> pica_blob::BlobResult<()> {
//! let blobs = BlobAdapter::new(MemoryBlobStore::new(), BlobConfig::default());
//! let key = BlobKey::new(ClientId::parse("c1").unwrap(), ArtifactId::new(), "cat.png");
//!
//! blobs.put(&key, Some("image/png"), Bytes::from_static(b"...")).await?;
//! let bytes = blobs.get(&key).await?;
//! blobs.delete(&key).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod backend;
pub mod config;
pub mod error;
pub mod receipt;
pub mod store;

pub use adapter::BlobAdapter;
pub use backend::{BlobBackend, FileSystemBlobStore, MemoryBlobStore, S3CompatibleStore, S3Config};
pub use config::BlobConfig;
pub use error::{BlobError, BlobResult};
pub use receipt::BlobReceipt;
pub use store::{BlobKey, BlobStore, PutResult};
