use bytes::Bytes;
use pica_core::Tags;
use tracing::debug;

use crate::{decode, encode, extract_tags, thumbnail, DecodedImage, ImageFormat, ImageResult};

/// Bounds applied during normalization.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Thumbnail bound (width)
    pub max_width: u32,
    /// Thumbnail bound (height)
    pub max_height: u32,
    /// Largest source width accepted by the decoder
    pub max_decode_width: u32,
    /// Largest source height accepted by the decoder
    pub max_decode_height: u32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_width: 512,
            max_height: 512,
            max_decode_width: 16_384,
            max_decode_height: 16_384,
        }
    }
}

impl NormalizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thumbnail_bounds(mut self, max_width: u32, max_height: u32) -> Self {
        self.max_width = max_width;
        self.max_height = max_height;
        self
    }

    pub fn with_decode_limits(mut self, max_width: u32, max_height: u32) -> Self {
        self.max_decode_width = max_width;
        self.max_decode_height = max_height;
        self
    }
}

/// Output of [`ImageNormalizer::normalize`].
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub bytes: Bytes,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub tags: Tags,
}

impl NormalizedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Decode, bound and re-encode images at ingest.
///
/// All methods are CPU-bound and synchronous; async callers should run
/// them on a blocking thread.
#[derive(Debug, Clone, Default)]
pub struct ImageNormalizer {
    config: NormalizerConfig,
}

impl ImageNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn decode(&self, bytes: &[u8]) -> ImageResult<DecodedImage> {
        decode(bytes, self.config.max_decode_width, self.config.max_decode_height)
    }

    pub fn thumbnail(&self, image: DecodedImage, max_width: u32, max_height: u32) -> ImageResult<DecodedImage> {
        thumbnail(image, max_width, max_height)
    }

    pub fn extract_tags(&self, image: &DecodedImage) -> Tags {
        extract_tags(image)
    }

    pub fn encode(&self, image: &DecodedImage, format: ImageFormat) -> ImageResult<Bytes> {
        encode(image, format)
    }

    /// decode -> thumbnail -> extract tags -> encode in the source format.
    pub fn normalize(&self, bytes: &[u8]) -> ImageResult<NormalizedImage> {
        let decoded = self.decode(bytes)?;
        let (source_width, source_height) = decoded.dimensions();

        let thumb = self.thumbnail(decoded, self.config.max_width, self.config.max_height)?;
        let tags = self.extract_tags(&thumb);
        let encoded = self.encode(&thumb, thumb.format())?;

        debug!(
            format = thumb.format().name(),
            source_width,
            source_height,
            width = thumb.width(),
            height = thumb.height(),
            tags = tags.len(),
            "image normalized"
        );

        Ok(NormalizedImage {
            bytes: encoded,
            format: thumb.format(),
            width: thumb.width(),
            height: thumb.height(),
            tags,
        })
    }
}
