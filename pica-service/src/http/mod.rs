//! HTTP surface: each route makes exactly one orchestrator call.

mod error;
pub mod images;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use error::PicaAxumError;

use crate::gate::AccessGate;
use crate::settings::Settings;
use crate::usecases::{DeleteOrchestrator, RetrievalOrchestrator, UploadOrchestrator};

/// Multipart framing allowance on top of the image size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub upload: Arc<UploadOrchestrator>,
    pub delete: Arc<DeleteOrchestrator>,
    pub retrieval: Arc<RetrievalOrchestrator>,
    pub gate: Arc<dyn AccessGate>,
    pub settings: Arc<Settings>,
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.settings.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);
    let base_path = state.settings.base_path.clone();

    let images = Router::new()
        .route("/images/upload/{client_id}", post(images::upload))
        .route("/images/delete/{uuid}", post(images::delete).delete(images::delete))
        .route("/images/metadata/{client_id}", get(images::list_by_client))
        .route("/images/record/{uuid}", get(images::get_by_id))
        .route("/images/download/{uuid}", get(images::download))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    let routes = if base_path.is_empty() {
        images
    } else {
        Router::new().nest(&base_path, images)
    };

    routes
        .route("/health", get(|| async { "ok" }))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
