//! Access gate: the trust boundary that says which client a caller acts for.

use async_trait::async_trait;
use pica_core::{ClientId, PicaError, PicaResult};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

#[async_trait]
pub trait AccessGate: Send + Sync {
    /// Confirm that the caller presenting `token` may act for `client_id`.
    async fn authorize(&self, token: Option<&str>, client_id: &ClientId) -> PicaResult<()>;
}

/// Accepts every caller. Used when no gate endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAccessGate;

#[async_trait]
impl AccessGate for OpenAccessGate {
    async fn authorize(&self, _token: Option<&str>, _client_id: &ClientId) -> PicaResult<()> {
        Ok(())
    }
}

/// Resolves tokens against an external HTTP endpoint.
///
/// The endpoint receives the token in `Authorization` and answers 200 with
/// the client id, either as a JSON string or as `{"client_id": ...}`.
#[derive(Debug, Clone)]
pub struct HttpAccessGate {
    client: reqwest::Client,
    url: String,
}

impl HttpAccessGate {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Map a caller token to the client id it belongs to.
    pub async fn resolve(&self, token: &str) -> PicaResult<ClientId> {
        let response = self
            .client
            .get(&self.url)
            .header(AUTHORIZATION, token)
            .send()
            .await
            .map_err(|err| PicaError::bad_gateway("Access gate unreachable").with_source(err))?;

        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), "access gate rejected token");
            return Err(PicaError::not_authenticated("Invalid user token"));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| PicaError::bad_gateway("Access gate sent an unreadable reply").with_source(err))?;

        let client_id = match &body {
            Value::String(id) => Some(id.as_str()),
            Value::Object(map) => map
                .get("client_id")
                .or_else(|| map.get("clientId"))
                .and_then(Value::as_str),
            _ => None,
        }
        .ok_or_else(|| PicaError::bad_gateway("Access gate reply carries no client id"))?;

        ClientId::parse(client_id).map_err(|err| {
            PicaError::bad_gateway("Access gate reply carries a malformed client id").with_source(err)
        })
    }
}

#[async_trait]
impl AccessGate for HttpAccessGate {
    async fn authorize(&self, token: Option<&str>, client_id: &ClientId) -> PicaResult<()> {
        let token = token.ok_or_else(|| PicaError::not_authenticated("Missing authorization token"))?;
        let resolved = self.resolve(token).await?;

        if &resolved != client_id {
            return Err(PicaError::forbidden(format!(
                "Token does not grant access to client '{client_id}'"
            )));
        }
        Ok(())
    }
}
