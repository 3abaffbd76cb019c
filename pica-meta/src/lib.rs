//! pica-meta: artifact records keyed by id, queryable by field equality.

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod store;

use std::sync::Arc;

use tracing::info;

pub use error::{MetaError, MetaResult};
pub use memory::MemoryMetadataStore;
pub use sqlite::SqliteMetadataStore;
pub use store::MetadataStore;

/// Metadata backend selected once at startup.
#[derive(Debug, Clone)]
pub enum MetaBackend {
    Memory,
    Sqlite {
        url: String,
        max_connections: u32,
    },
}

impl MetaBackend {
    pub async fn connect(&self) -> MetaResult<Arc<dyn MetadataStore>> {
        match self {
            Self::Memory => {
                info!("metadata backend: memory");
                Ok(Arc::new(MemoryMetadataStore::new()))
            }
            Self::Sqlite { url, max_connections } => {
                let store = SqliteMetadataStore::connect(url, *max_connections).await?;
                Ok(Arc::new(store))
            }
        }
    }
}
