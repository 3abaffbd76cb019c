//! SQLite-backed metadata store.
//!
//! Each record is one JSON document. Equality queries go through
//! `json_extract`, and `seq` keeps insertion order.

use std::str::FromStr;

use async_trait::async_trait;
use pica_core::{ArtifactId, ArtifactRecord, RecordField};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::{MetaError, MetaResult, MetadataStore};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS artifacts (
    seq      INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid     TEXT NOT NULL UNIQUE,
    document TEXT NOT NULL
)";

pub struct SqliteMetadataStore {
    pool: SqlitePool,
}

impl SqliteMetadataStore {
    /// Open (creating if needed) the database at `url` and ensure the schema.
    ///
    /// In-memory databases are pinned to a single long-lived connection,
    /// since each new connection would see an empty database.
    pub async fn connect(url: &str, max_connections: u32) -> MetaResult<Self> {
        let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(opts)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .connect_with(opts)
                .await?
        };

        info!(url = url, in_memory, "connected to sqlite metadata store");

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> MetaResult<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    fn json_path(field: RecordField) -> String {
        format!("$.{}", field.as_str())
    }

    fn decode(documents: Vec<String>) -> MetaResult<Vec<ArtifactRecord>> {
        documents
            .iter()
            .map(|doc| serde_json::from_str(doc).map_err(MetaError::from))
            .collect()
    }
}

#[async_trait]
impl MetadataStore for SqliteMetadataStore {
    async fn put(&self, record: ArtifactRecord) -> MetaResult<ArtifactId> {
        let document = serde_json::to_string(&record)?;

        let result = sqlx::query("INSERT INTO artifacts (uuid, document) VALUES (?1, ?2)")
            .bind(record.id.to_string())
            .bind(document)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(record.id),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(MetaError::Duplicate(record.id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_by_field(&self, field: RecordField, value: &str) -> MetaResult<Option<ArtifactRecord>> {
        let document: Option<String> = sqlx::query_scalar(
            "SELECT document FROM artifacts WHERE json_extract(document, ?1) = ?2 ORDER BY seq LIMIT 1",
        )
        .bind(Self::json_path(field))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        match document {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    async fn list_by_field(&self, field: RecordField, value: &str) -> MetaResult<Vec<ArtifactRecord>> {
        let documents: Vec<String> = sqlx::query_scalar(
            "SELECT document FROM artifacts WHERE json_extract(document, ?1) = ?2 ORDER BY seq",
        )
        .bind(Self::json_path(field))
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        Self::decode(documents)
    }

    async fn delete(&self, id: &ArtifactId) -> MetaResult<bool> {
        let result = sqlx::query("DELETE FROM artifacts WHERE uuid = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
