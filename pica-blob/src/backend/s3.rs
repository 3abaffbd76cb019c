use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::{primitives::ByteStream as AwsByteStream, Client};
use bytes::Bytes;

use crate::{BlobError, BlobKey, BlobResult, BlobStore, PutResult};

/// Connection settings for an S3-compatible bucket.
///
/// With no explicit credentials the default AWS provider chain is used.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl S3Config {
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }
}

/// Blob store on an S3-compatible object service.
///
/// Containers are key prefixes and need no explicit creation or removal.
#[derive(Clone)]
pub struct S3CompatibleStore {
    client: Client,
    bucket: String,
}

impl S3CompatibleStore {
    pub async fn connect(config: S3Config) -> BlobResult<Self> {
        if config.bucket.is_empty() {
            return Err(BlobError::invalid("S3 bucket name is required"));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            let credentials = Credentials::new(key_id, secret, None, None, "pica");
            loader = loader.credentials_provider(credentials);
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let shared = loader.load().await;
        let client = Client::from_conf(
            aws_sdk_s3::config::Builder::from(&shared)
                // Custom endpoints (MinIO, RustFS, ...) generally need path-style addressing
                .force_path_style(config.endpoint_url.is_some())
                .build(),
        );

        Ok(Self::from_client(client, config.bucket))
    }

    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn map_aws_error(err: impl std::error::Error + Send + Sync + 'static) -> BlobError {
        BlobError::backend(err)
    }
}

#[async_trait]
impl BlobStore for S3CompatibleStore {
    async fn put(
        &self,
        key: &BlobKey,
        content_type: Option<&str>,
        data: Bytes,
    ) -> BlobResult<PutResult> {
        let size_bytes = data.len() as u64;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key.path())
            .body(AwsByteStream::from(data));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request.send().await.map_err(Self::map_aws_error)?;

        Ok(PutResult { size_bytes })
    }

    async fn get(&self, key: &BlobKey) -> BlobResult<Bytes> {
        let path = key.path();
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&path)
            .send()
            .await;

        match result {
            Ok(output) => {
                let body = output.body.collect().await.map_err(Self::map_aws_error)?;
                Ok(body.into_bytes())
            }
            Err(err) => {
                let err = err.into_service_error();
                if err.is_no_such_key() {
                    Err(BlobError::not_found(path))
                } else {
                    Err(Self::map_aws_error(err))
                }
            }
        }
    }

    async fn delete(&self, key: &BlobKey) -> BlobResult<()> {
        let path = key.path();

        // DeleteObject succeeds for absent keys, so probe first to report them.
        let head = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&path)
            .send()
            .await;
        if let Err(err) = head {
            let err = err.into_service_error();
            if err.is_not_found() {
                return Err(BlobError::not_found(path));
            }
            return Err(Self::map_aws_error(err));
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&path)
            .send()
            .await
            .map_err(Self::map_aws_error)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}
