//! The metadata record kept for every stored artifact.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{is_path_segment, ArtifactId, ClientId};

/// Embedded descriptive tags, keyed by standard tag name.
pub type Tags = BTreeMap<String, String>;

/// Document shape shared with the metadata store.
///
/// Field names on the wire are `uuid`, `client_id`, `file_name`,
/// `content_type`, `file_path` and `tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    #[serde(rename = "uuid")]
    pub id: ArtifactId,
    pub client_id: ClientId,
    #[serde(rename = "file_name")]
    pub original_filename: String,
    pub content_type: String,
    #[serde(rename = "file_path")]
    pub storage_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

impl ArtifactRecord {
    pub fn new(
        id: ArtifactId,
        client_id: ClientId,
        original_filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        let original_filename = original_filename.into();
        let storage_path = storage_path(&client_id, &id, &original_filename);
        Self {
            id,
            client_id,
            original_filename,
            content_type: content_type.into(),
            storage_path,
            tags: None,
        }
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = Some(tags);
        self
    }

    /// String value of `field`, used for equality queries.
    pub fn field_value(&self, field: RecordField) -> String {
        match field {
            RecordField::Id => self.id.to_string(),
            RecordField::ClientId => self.client_id.to_string(),
            RecordField::OriginalFilename => self.original_filename.clone(),
            RecordField::ContentType => self.content_type.clone(),
            RecordField::StoragePath => self.storage_path.clone(),
        }
    }
}

/// Fields a record can be looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Id,
    ClientId,
    OriginalFilename,
    ContentType,
    StoragePath,
}

impl RecordField {
    /// Document key of this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::Id => "uuid",
            RecordField::ClientId => "client_id",
            RecordField::OriginalFilename => "file_name",
            RecordField::ContentType => "content_type",
            RecordField::StoragePath => "file_path",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Segment used when a record was built from a name with no usable last
/// component. Uploads replace such names with `image.{ext}` first.
const UNNAMED: &str = "image";

/// `{clientId}/{artifactId}/{filename}`.
pub fn storage_path(client_id: &ClientId, id: &ArtifactId, original_filename: &str) -> String {
    format!("{}/{}/{}", client_id, id, stored_filename(original_filename))
}

/// Last component of a submitted filename, if it is usable as a path segment.
pub fn blob_filename(original_filename: &str) -> Option<String> {
    let last = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    is_path_segment(last).then(|| last.to_string())
}

/// The path segment a blob is stored under.
pub fn stored_filename(original_filename: &str) -> String {
    blob_filename(original_filename).unwrap_or_else(|| UNNAMED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str) -> ClientId {
        ClientId::parse(id).unwrap()
    }

    #[test]
    fn storage_path_is_derived_from_client_id_and_filename() {
        let id = ArtifactId::new();
        let record = ArtifactRecord::new(id, client("c1"), "cat.png", "image/png");

        assert_eq!(record.storage_path, format!("c1/{id}/cat.png"));
        assert_eq!(record.storage_path, storage_path(&client("c1"), &id, "cat.png"));
    }

    #[test]
    fn directory_parts_of_filenames_are_dropped() {
        assert_eq!(blob_filename("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(blob_filename("C:\\photos\\dog.jpg").as_deref(), Some("dog.jpg"));
        assert_eq!(blob_filename(""), None);
        assert_eq!(blob_filename("photos/"), None);
        assert_eq!(blob_filename("photos/.."), None);
        assert_eq!(stored_filename("photos/.."), "image");
    }

    #[test]
    fn document_uses_stored_field_names() {
        let id = ArtifactId::new();
        let record = ArtifactRecord::new(id, client("c1"), "cat.png", "image/png");

        let doc = serde_json::to_value(&record).unwrap();
        assert_eq!(doc["uuid"], id.to_string());
        assert_eq!(doc["client_id"], "c1");
        assert_eq!(doc["file_name"], "cat.png");
        assert_eq!(doc["content_type"], "image/png");
        assert_eq!(doc["file_path"], format!("c1/{id}/cat.png"));
        assert!(doc.get("tags").is_none());

        let back: ArtifactRecord = serde_json::from_value(doc).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn field_value_matches_document_key() {
        let record = ArtifactRecord::new(ArtifactId::new(), client("c7"), "a.jpg", "image/jpeg");
        let doc = serde_json::to_value(&record).unwrap();

        for field in [
            RecordField::Id,
            RecordField::ClientId,
            RecordField::OriginalFilename,
            RecordField::ContentType,
            RecordField::StoragePath,
        ] {
            assert_eq!(doc[field.as_str()], record.field_value(field));
        }
    }
}
