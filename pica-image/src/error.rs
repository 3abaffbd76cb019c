use pica_core::PicaError;
use thiserror::Error;

pub type ImageResult<T> = Result<T, ImageError>;

#[derive(Error, Debug)]
pub enum ImageError {
    /// Bytes are not an encoded image in a supported container.
    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    #[error("Image could not be decoded: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Image could not be encoded as {format}: {source}")]
    Encode {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid thumbnail bounds {width}x{height}")]
    InvalidBounds { width: u32, height: u32 },
}

impl From<ImageError> for PicaError {
    fn from(err: ImageError) -> Self {
        let message = err.to_string();
        let classified = match &err {
            ImageError::InvalidImageFormat(_) | ImageError::Decode(_) => PicaError::invalid_image(message),
            ImageError::Encode { .. } | ImageError::InvalidBounds { .. } => PicaError::general_error(message),
        };
        classified.with_source(err)
    }
}
