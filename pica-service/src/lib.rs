//! pica-service: image ingestion over a blob store and a metadata store.
//!
//! Routes (optionally nested under `http.base_path`):
//!
//! | Route | Orchestrator |
//! |---|---|
//! | `POST /images/upload/{client_id}` | [`UploadOrchestrator`] |
//! | `POST`/`DELETE /images/delete/{uuid}` | [`DeleteOrchestrator`] |
//! | `GET /images/metadata/{client_id}` | [`RetrievalOrchestrator`] |
//! | `GET /images/record/{uuid}` | [`RetrievalOrchestrator`] |
//! | `GET /images/download/{uuid}` | [`RetrievalOrchestrator`] |

mod app;
pub mod gate;
pub mod http;
pub mod settings;
pub mod usecases;

use anyhow::Result;

pub use app::PicaApp;
pub use gate::{AccessGate, HttpAccessGate, OpenAccessGate};
pub use settings::Settings;
pub use usecases::{
    DeleteImage, DeleteOrchestrator, DeleteOutcome, Download, DownloadImage, GetImage, ListImages,
    RetrievalOrchestrator, UploadImage, UploadOrchestrator, UploadStage,
};

/// Build the service from `PICA__*` environment settings.
pub async fn build() -> Result<PicaApp> {
    let settings = Settings::from_env()?;
    PicaApp::connect(settings).await
}
