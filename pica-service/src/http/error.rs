use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pica_core::{ErrorClass, PicaError};
use tracing::{debug, error};

/// Handler error: any `PicaError` rendered as its JSON form and status.
#[derive(Debug)]
pub struct PicaAxumError(pub PicaError);

impl From<PicaError> for PicaAxumError {
    fn from(e: PicaError) -> Self {
        Self(e)
    }
}

impl IntoResponse for PicaAxumError {
    fn into_response(self) -> Response {
        let err = self.0;
        match err.class() {
            ErrorClass::BackendUnavailable | ErrorClass::Internal => {
                error!(kind = err.name(), class = err.class().as_str(), error = ?err, "request failed");
            }
            ErrorClass::NotFound | ErrorClass::InvalidInput => {
                debug!(kind = err.name(), class = err.class().as_str(), message = %err.message, "request rejected");
            }
        }

        let safe = err.sanitize_for_client();
        let status = StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(safe.to_json())).into_response()
    }
}
