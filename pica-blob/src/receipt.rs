use serde::{Deserialize, Serialize};

/// Receipt returned after successfully storing a blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobReceipt {
    pub path: String,
    pub size_bytes: u64,
    pub content_type: Option<String>,
}

impl BlobReceipt {
    pub fn new(path: String, size_bytes: u64) -> Self {
        Self {
            path,
            size_bytes,
            content_type: None,
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}
