//! Orchestrators: each sequences the leaf stores for one family of
//! commands and returns a typed outcome.

mod delete;
mod retrieve;
mod upload;

pub use delete::{DeleteImage, DeleteOrchestrator, DeleteOutcome};
pub use retrieve::{Download, DownloadImage, GetImage, ListImages, RetrievalOrchestrator};
pub use upload::{UploadImage, UploadOrchestrator, UploadStage};
