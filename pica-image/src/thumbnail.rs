use crate::{DecodedImage, ImageError, ImageResult};

/// Shrink `image` to fit within `max_width` x `max_height`, keeping its
/// aspect ratio. Images that already fit come back untouched.
pub fn thumbnail(image: DecodedImage, max_width: u32, max_height: u32) -> ImageResult<DecodedImage> {
    if max_width == 0 || max_height == 0 {
        return Err(ImageError::InvalidBounds {
            width: max_width,
            height: max_height,
        });
    }

    let (width, height) = image.dimensions();
    if width <= max_width && height <= max_height {
        return Ok(image);
    }

    let pixels = image.pixels.thumbnail(max_width, max_height);
    Ok(DecodedImage { pixels, ..image })
}
