use std::path::PathBuf;

use pica_blob::{BlobBackend, BlobConfig, S3Config};
use pica_core::{PicaConfig, PicaConfigSnapshot, PicaError, PicaResult};
use pica_image::NormalizerConfig;
use pica_meta::MetaBackend;

/// Environment prefix: `PICA__HTTP__PORT=8080` sets `http.port`.
pub const ENV_PREFIX: &str = "PICA__";

/// Typed service settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Prefix all routes are nested under, e.g. `/api`. Empty for none.
    pub base_path: String,
    pub blob_backend: BlobBackend,
    pub blob: BlobConfig,
    pub meta_backend: MetaBackend,
    pub normalizer: NormalizerConfig,
    pub max_upload_bytes: usize,
    /// Declared multipart content types accepted for upload.
    pub allowed_content_types: Vec<String>,
    /// Access gate endpoint. `None` leaves uploads unauthenticated.
    pub auth_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            base_path: String::new(),
            blob_backend: BlobBackend::Memory,
            blob: BlobConfig::default(),
            meta_backend: MetaBackend::Memory,
            normalizer: NormalizerConfig::default(),
            max_upload_bytes: 10 * 1024 * 1024,
            allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/png".to_string(),
            ],
            auth_url: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> PicaResult<Self> {
        Self::from_config(&PicaConfig::from_env(ENV_PREFIX).snapshot())
    }

    pub fn from_config(config: &PicaConfigSnapshot) -> PicaResult<Self> {
        let defaults = Self::default();

        let port = match config.get("http.port") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| invalid("http.port", raw))?,
            None => defaults.port,
        };

        let base_path = config
            .get("http.base_path")
            .map(|p| format!("/{}", p.trim_matches('/')))
            .filter(|p| p != "/")
            .unwrap_or_default();

        let blob_backend = match config.get_or("blob.backend", "memory").as_str() {
            "memory" => BlobBackend::Memory,
            "fs" | "filesystem" => BlobBackend::FileSystem {
                root: PathBuf::from(config.get_or("blob.root", "files")),
            },
            "s3" => {
                let bucket = config
                    .get_string("blob.bucket")
                    .ok_or_else(|| PicaError::general_error("blob.bucket is required for the s3 backend"))?;
                let mut s3 = S3Config::new(bucket, config.get_or("blob.s3.region", "us-east-1"));
                if let Some(endpoint) = config.get("blob.s3.endpoint") {
                    s3 = s3.with_endpoint(endpoint);
                }
                if let (Some(key_id), Some(secret)) = (
                    config.get("blob.s3.access_key_id"),
                    config.get("blob.s3.secret_access_key"),
                ) {
                    s3 = s3.with_credentials(key_id, secret);
                }
                BlobBackend::S3(s3)
            }
            other => return Err(invalid("blob.backend", other)),
        };

        let meta_backend = match config.get_or("meta.backend", "memory").as_str() {
            "memory" => MetaBackend::Memory,
            "sqlite" => MetaBackend::Sqlite {
                url: config.get_or("meta.url", "sqlite://pica.db"),
                max_connections: config.get_u32("meta.max_connections").unwrap_or(5),
            },
            other => return Err(invalid("meta.backend", other)),
        };

        let max_width = config
            .get_u32("thumbnail.max_width")
            .unwrap_or(defaults.normalizer.max_width);
        let max_height = config
            .get_u32("thumbnail.max_height")
            .unwrap_or(defaults.normalizer.max_height);
        if max_width == 0 || max_height == 0 {
            return Err(PicaError::general_error(format!(
                "Thumbnail bounds must be positive, got {max_width}x{max_height}"
            )));
        }
        let normalizer = NormalizerConfig::new().with_thumbnail_bounds(max_width, max_height);

        let blob = BlobConfig::new().with_max_blob_bytes(
            config
                .get_u64("blob.max_bytes")
                .unwrap_or(defaults.blob.max_blob_bytes),
        );

        Ok(Self {
            host: config.get_or("http.host", &defaults.host),
            port,
            base_path,
            blob_backend,
            blob,
            meta_backend,
            normalizer,
            max_upload_bytes: config
                .get_usize("upload.max_bytes")
                .unwrap_or(defaults.max_upload_bytes),
            allowed_content_types: config
                .get_list("upload.allowed_content_types")
                .map(|types| types.into_iter().map(|t| t.to_ascii_lowercase()).collect())
                .unwrap_or(defaults.allowed_content_types),
            auth_url: config.get_string("auth.url"),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn accepts_content_type(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.allowed_content_types.iter().any(|t| *t == essence)
    }
}

fn invalid(key: &str, value: &str) -> PicaError {
    PicaError::general_error(format!("Invalid value '{value}' for configuration key {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pica_core::ErrorKind;

    #[test]
    fn defaults_match_the_documented_service() {
        let settings = Settings::from_config(&PicaConfig::new().snapshot()).unwrap();

        assert_eq!(settings.addr(), "127.0.0.1:5000");
        assert_eq!(settings.base_path, "");
        assert!(matches!(settings.blob_backend, BlobBackend::Memory));
        assert!(matches!(settings.meta_backend, MetaBackend::Memory));
        assert_eq!((settings.normalizer.max_width, settings.normalizer.max_height), (512, 512));
        assert!(settings.auth_url.is_none());
    }

    #[test]
    fn backends_and_bounds_come_from_config() {
        let config = PicaConfig::new()
            .with("http.port", "8080")
            .with("http.base_path", "api/")
            .with("blob.backend", "fs")
            .with("blob.root", "/var/lib/pica")
            .with("meta.backend", "sqlite")
            .with("meta.url", "sqlite::memory:")
            .with("thumbnail.max_width", "256")
            .with("auth.url", "http://auth.local/whoami");

        let settings = Settings::from_config(&config.snapshot()).unwrap();

        assert_eq!(settings.port, 8080);
        assert_eq!(settings.base_path, "/api");
        assert!(matches!(
            settings.blob_backend,
            BlobBackend::FileSystem { ref root } if root == &PathBuf::from("/var/lib/pica")
        ));
        assert!(matches!(
            settings.meta_backend,
            MetaBackend::Sqlite { ref url, max_connections: 5 } if url == "sqlite::memory:"
        ));
        assert_eq!((settings.normalizer.max_width, settings.normalizer.max_height), (256, 512));
        assert_eq!(settings.auth_url.as_deref(), Some("http://auth.local/whoami"));
    }

    #[test]
    fn s3_backend_requires_a_bucket() {
        let config = PicaConfig::new().with("blob.backend", "s3");
        let err = Settings::from_config(&config.snapshot()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::GeneralError);

        let config = config
            .with("blob.bucket", "images")
            .with("blob.s3.endpoint", "http://localhost:9000");
        let settings = Settings::from_config(&config.snapshot()).unwrap();
        match settings.blob_backend {
            BlobBackend::S3(s3) => {
                assert_eq!(s3.bucket, "images");
                assert_eq!(s3.endpoint_url.as_deref(), Some("http://localhost:9000"));
            }
            other => panic!("expected s3 backend, got {other:?}"),
        }
    }

    #[test]
    fn unknown_backends_and_zero_bounds_are_rejected() {
        for (key, value) in [
            ("blob.backend", "ftp"),
            ("meta.backend", "mongo"),
            ("thumbnail.max_height", "0"),
            ("http.port", "99999"),
        ] {
            let config = PicaConfig::new().with(key, value);
            assert!(Settings::from_config(&config.snapshot()).is_err(), "{key}={value}");
        }
    }

    #[test]
    fn content_type_check_ignores_case_and_parameters() {
        let settings = Settings::default();
        assert!(settings.accepts_content_type("image/PNG"));
        assert!(settings.accepts_content_type("image/jpeg; charset=binary"));
        assert!(!settings.accepts_content_type("image/gif"));
        assert!(!settings.accepts_content_type("text/plain"));
    }
}
