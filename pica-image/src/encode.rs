use std::io::Cursor;

use bytes::Bytes;
use image::DynamicImage;

use crate::{DecodedImage, ImageError, ImageFormat, ImageResult};

/// Serialize `image` into `format`.
///
/// JPEG has no alpha channel, and the GIF and WebP encoders take RGBA.
pub fn encode(image: &DecodedImage, format: ImageFormat) -> ImageResult<Bytes> {
    let mut out = Cursor::new(Vec::new());
    let pixels = image.pixels();

    let written = match format {
        ImageFormat::Png => pixels.write_to(&mut out, format.codec()),
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(pixels.to_rgb8()).write_to(&mut out, format.codec()),
        ImageFormat::Gif | ImageFormat::WebP => {
            DynamicImage::ImageRgba8(pixels.to_rgba8()).write_to(&mut out, format.codec())
        }
    };
    written.map_err(|source| ImageError::Encode {
        format: format.name(),
        source,
    })?;

    Ok(Bytes::from(out.into_inner()))
}
