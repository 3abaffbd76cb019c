//! Image normalization pipeline used at ingest.
//!
//! - **decode**: sniff the container and decode pixels, keeping any EXIF block
//! - **thumbnail**: aspect-preserving shrink to a bounding box, never enlarging
//! - **metadata**: EXIF tags by standard name
//! - **encode**: back into the source container
//!
//! [`ImageNormalizer`] composes the stages with configured bounds.

pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod metadata;
pub mod normalizer;
pub mod thumbnail;

pub use decode::{decode, DecodedImage};
pub use encode::encode;
pub use error::{ImageError, ImageResult};
pub use format::ImageFormat;
pub use metadata::extract_tags;
pub use normalizer::{ImageNormalizer, NormalizedImage, NormalizerConfig};
pub use thumbnail::thumbnail;
