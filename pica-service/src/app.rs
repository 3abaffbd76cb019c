use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use pica_blob::{BlobAdapter, BlobStore};
use pica_core::{IdGenerator, RandomIdGenerator};
use pica_image::ImageNormalizer;
use pica_meta::MetadataStore;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{info, warn};

use crate::gate::{AccessGate, HttpAccessGate, OpenAccessGate};
use crate::http::{self, AppState};
use crate::settings::Settings;
use crate::usecases::{DeleteOrchestrator, RetrievalOrchestrator, UploadOrchestrator};

/// The assembled service: orchestrators wired to their stores, plus the router.
#[derive(Clone)]
pub struct PicaApp {
    pub state: AppState,
    pub router: Router,
}

impl PicaApp {
    /// Connect the configured backends and wire everything up.
    pub async fn connect(settings: Settings) -> Result<Self> {
        let blobs = settings.blob_backend.connect().await?;
        let records = settings.meta_backend.connect().await?;

        let gate: Arc<dyn AccessGate> = match &settings.auth_url {
            Some(url) => {
                info!(url = %url, "uploads authorized by access gate");
                Arc::new(HttpAccessGate::new(url.clone()))
            }
            None => {
                warn!("auth.url not set; uploads are not authenticated");
                Arc::new(OpenAccessGate)
            }
        };

        Ok(Self::assemble(settings, blobs, records, gate, Arc::new(RandomIdGenerator)))
    }

    /// Wire already-connected stores into orchestrators and routes.
    pub fn assemble(
        settings: Settings,
        blob_store: Arc<dyn BlobStore>,
        records: Arc<dyn MetadataStore>,
        gate: Arc<dyn AccessGate>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let blobs = BlobAdapter::from_arc(blob_store, settings.blob.clone());
        let normalizer = ImageNormalizer::new(settings.normalizer.clone());

        let upload = UploadOrchestrator::new(ids, normalizer, blobs.clone(), Arc::clone(&records))
            .with_max_input_bytes(settings.max_upload_bytes);
        let delete = DeleteOrchestrator::new(blobs.clone(), Arc::clone(&records));
        let retrieval = RetrievalOrchestrator::new(blobs, records);

        let state = AppState {
            upload: Arc::new(upload),
            delete: Arc::new(delete),
            retrieval: Arc::new(retrieval),
            gate,
            settings: Arc::new(settings),
        };
        let router = http::router(state.clone());

        Self { state, router }
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub async fn listen<A>(self, addr: A) -> Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "listening");
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
