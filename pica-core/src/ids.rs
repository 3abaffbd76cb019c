//! Identifiers for artifacts and the clients that own them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::PicaError;

/// Globally unique, immutable artifact identifier.
///
/// Also used verbatim as a path segment in the blob store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A string that is not a valid id can never name a stored artifact,
/// so parse failures are reported as `NotFound`.
impl FromStr for ArtifactId {
    type Err = PicaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| PicaError::not_found(format!("No artifact with id '{s}'")))
    }
}

/// Opaque owner scope. Not checked for existence here; the access gate is
/// the trust boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Validate a client id for use as a path segment.
    pub fn parse(value: impl Into<String>) -> Result<Self, PicaError> {
        let value = value.into();
        if !is_path_segment(&value) {
            return Err(PicaError::bad_request(format!("Invalid client id '{value}'")));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClientId {
    type Err = PicaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// True when `value` can be used as a single hierarchical path segment.
pub fn is_path_segment(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains(['/', '\\', '\0'])
}

/// Source of fresh artifact ids.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> ArtifactId;
}

/// Random UUIDv4 ids. Collisions are not guarded against.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> ArtifactId {
        ArtifactId::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn artifact_id_round_trips_through_display() {
        let id = ArtifactId::new();
        let parsed: ArtifactId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn malformed_artifact_id_is_not_found() {
        let err = "not-a-uuid".parse::<ArtifactId>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn client_id_rejects_path_tricks() {
        assert!(ClientId::parse("c1").is_ok());
        for bad in ["", ".", "..", "a/b", "a\\b"] {
            let err = ClientId::parse(bad).unwrap_err();
            assert_eq!(err.kind, ErrorKind::BadRequest, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn random_generator_yields_distinct_ids() {
        let ids = RandomIdGenerator;
        assert_ne!(ids.generate(), ids.generate());
    }
}
