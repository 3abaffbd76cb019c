//! # Errors (Feathers-style)
//!
//! Pica keeps one structured error type for everything that leaves a
//! component boundary. Leaf crates (blob, metadata, image) define their own
//! `thiserror` enums and convert into [`PicaError`], so an orchestrator never
//! handles an unclassified failure.
//!
//! Every kind collapses into one of four user-visible classes:
//! success is the absence of an error, the rest are listed by [`ErrorClass`].

use std::fmt;

use anyhow::Error as AnyError;
use serde_json::Value;

/// Result type for every Pica operation that crosses a component boundary.
pub type PicaResult<T> = std::result::Result<T, PicaError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidImage,       // 400
    BadRequest,         // 400
    NotAuthenticated,   // 401
    Forbidden,          // 403
    NotFound,           // 404
    GeneralError,       // 500
    BadGateway,         // 502
    StorageUnavailable, // 503
    StoreUnavailable,   // 503
    OrphanBlob,         // 503
}

/// Coarse outcome class shown to callers and used as a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    NotFound,
    InvalidInput,
    BackendUnavailable,
    Internal,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::NotFound => "not-found",
            ErrorClass::InvalidInput => "invalid-input",
            ErrorClass::BackendUnavailable => "backend-unavailable",
            ErrorClass::Internal => "internal",
        }
    }
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::InvalidImage => 400,
            ErrorKind::BadRequest => 400,
            ErrorKind::NotAuthenticated => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::GeneralError => 500,
            ErrorKind::BadGateway => 502,
            ErrorKind::StorageUnavailable => 503,
            ErrorKind::StoreUnavailable => 503,
            ErrorKind::OrphanBlob => 503,
        }
    }

    /// Error `name` (e.g. "NotFound")
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::InvalidImage => "InvalidImage",
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotAuthenticated => "NotAuthenticated",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::GeneralError => "GeneralError",
            ErrorKind::BadGateway => "BadGateway",
            ErrorKind::StorageUnavailable => "StorageUnavailable",
            ErrorKind::StoreUnavailable => "StoreUnavailable",
            ErrorKind::OrphanBlob => "OrphanBlob",
        }
    }

    /// Error `className` (kebab-cased)
    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::InvalidImage => "invalid-image",
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::NotAuthenticated => "not-authenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not-found",
            ErrorKind::GeneralError => "general-error",
            ErrorKind::BadGateway => "bad-gateway",
            ErrorKind::StorageUnavailable => "storage-unavailable",
            ErrorKind::StoreUnavailable => "store-unavailable",
            ErrorKind::OrphanBlob => "orphan-blob",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            ErrorKind::InvalidImage
            | ErrorKind::BadRequest
            | ErrorKind::NotAuthenticated
            | ErrorKind::Forbidden => ErrorClass::InvalidInput,
            ErrorKind::NotFound => ErrorClass::NotFound,
            ErrorKind::BadGateway
            | ErrorKind::StorageUnavailable
            | ErrorKind::StoreUnavailable
            | ErrorKind::OrphanBlob => ErrorClass::BackendUnavailable,
            ErrorKind::GeneralError => ErrorClass::Internal,
        }
    }
}

/// A structured Pica error.
///
/// Mirrors Feathers-style fields:
/// - name
/// - message
/// - code (HTTP status)
/// - class_name
/// - data (optional)
#[derive(Debug)]
pub struct PicaError {
    pub kind: ErrorKind,
    pub message: String,
    pub data: Option<Value>,
    pub source: Option<AnyError>,
}

impl PicaError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
            source: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_source(mut self, source: impl Into<AnyError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// Turn any error into a PicaError:
    /// - if it's already a PicaError, keep it
    /// - otherwise wrap as GeneralError
    pub fn normalize(err: AnyError) -> PicaError {
        match err.downcast::<PicaError>() {
            Ok(pica) => pica,
            Err(other) => PicaError::new(ErrorKind::GeneralError, other.to_string()).with_source(other),
        }
    }

    /// Copy suitable for returning to clients: drops the inner `source`.
    pub fn sanitize_for_client(&self) -> PicaError {
        PicaError {
            kind: self.kind,
            message: self.message.clone(),
            data: self.data.clone(),
            source: None,
        }
    }

    pub fn to_json(&self) -> Value {
        use serde_json::json;

        let mut base = json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.class_name(),
        });

        if let Some(d) = &self.data {
            base["data"] = d.clone();
        }
        base
    }

    // ---- Constructors ----

    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidImage, msg)
    }
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn not_authenticated(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthenticated, msg)
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }
    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadGateway, msg)
    }
    pub fn storage_unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::StorageUnavailable, msg)
    }
    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, msg)
    }
    pub fn orphan_blob(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::OrphanBlob, msg)
    }
}

impl fmt::Display for PicaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for PicaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Return early with a `PicaError` built by one of its constructors.
#[macro_export]
macro_rules! bail_pica {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::PicaError::$ctor($msg));
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::PicaError::$ctor(format!($fmt, $($arg)*)));
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_collapse_into_user_visible_classes() {
        assert_eq!(ErrorKind::InvalidImage.class(), ErrorClass::InvalidInput);
        assert_eq!(ErrorKind::NotFound.class(), ErrorClass::NotFound);
        assert_eq!(ErrorKind::StorageUnavailable.class(), ErrorClass::BackendUnavailable);
        assert_eq!(ErrorKind::StoreUnavailable.class(), ErrorClass::BackendUnavailable);
        assert_eq!(ErrorKind::OrphanBlob.class(), ErrorClass::BackendUnavailable);
    }

    #[test]
    fn to_json_carries_client_fields() {
        let err = PicaError::orphan_blob("metadata write failed")
            .with_data(json!({ "path": "c1/abc/cat.png" }));

        let body = err.to_json();
        assert_eq!(body["name"], "OrphanBlob");
        assert_eq!(body["code"], 503);
        assert_eq!(body["className"], "orphan-blob");
        assert_eq!(body["data"]["path"], "c1/abc/cat.png");
    }

    #[test]
    fn sanitize_drops_source() {
        let err = PicaError::store_unavailable("db down").with_source(anyhow::anyhow!("socket closed"));
        assert!(err.source.is_some());

        let safe = err.sanitize_for_client();
        assert!(safe.source.is_none());
        assert_eq!(safe.message, "db down");
    }

    #[test]
    fn normalize_keeps_pica_errors_and_wraps_others() {
        let kept = PicaError::normalize(anyhow::Error::new(PicaError::not_found("gone")));
        assert_eq!(kept.kind, ErrorKind::NotFound);

        let wrapped = PicaError::normalize(anyhow::anyhow!("boom"));
        assert_eq!(wrapped.kind, ErrorKind::GeneralError);
        assert_eq!(wrapped.message, "boom");
    }

    fn bails(flag: bool) -> PicaResult<()> {
        if flag {
            bail_pica!(bad_request, "flag {} rejected", flag);
        }
        Ok(())
    }

    #[test]
    fn bail_macro_returns_constructed_error() {
        let err = bails(true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
        assert_eq!(err.message, "flag true rejected");
        assert!(bails(false).is_ok());
    }
}
