//! pica-core: shared types for the Pica image service.

pub mod config;
pub mod errors;
pub mod ids;
pub mod record;
pub mod usecase;

pub use config::{PicaConfig, PicaConfigSnapshot};
pub use errors::{ErrorClass, ErrorKind, PicaError, PicaResult};
pub use ids::{ArtifactId, ClientId, IdGenerator, RandomIdGenerator};
pub use record::{ArtifactRecord, RecordField, Tags};
pub use usecase::UseCase;
