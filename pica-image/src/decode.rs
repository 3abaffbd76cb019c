use std::fmt;
use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageReader, Limits};

use crate::metadata::read_exif;
use crate::{ImageError, ImageFormat, ImageResult};

/// A decoded image with the container it came from and its EXIF block.
pub struct DecodedImage {
    pub(crate) pixels: DynamicImage,
    pub(crate) format: ImageFormat,
    pub(crate) exif: Option<exif::Exif>,
}

impl DecodedImage {
    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    /// Container format of the source bytes.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn exif(&self) -> Option<&exif::Exif> {
        self.exif.as_ref()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("format", &self.format)
            .field("dimensions", &self.dimensions())
            .field("exif", &self.exif.is_some())
            .finish()
    }
}

/// Decode `bytes`, refusing unknown containers and images larger than
/// `max_width` x `max_height`.
pub fn decode(bytes: &[u8], max_width: u32, max_height: u32) -> ImageResult<DecodedImage> {
    let format = ImageFormat::sniff(bytes).ok_or_else(|| {
        ImageError::InvalidImageFormat("not a PNG, JPEG, GIF or WebP image".to_string())
    })?;

    let mut limits = Limits::default();
    limits.max_image_width = Some(max_width);
    limits.max_image_height = Some(max_height);

    let mut reader = ImageReader::with_format(Cursor::new(bytes), format.codec());
    reader.limits(limits);
    let pixels = reader.decode().map_err(ImageError::Decode)?;

    Ok(DecodedImage {
        pixels,
        format,
        exif: read_exif(bytes),
    })
}
