use image::ImageFormat as CodecFormat;

/// Containers accepted at ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageFormat {
    /// Detect the container from magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        image::guess_format(bytes).ok().and_then(Self::from_codec)
    }

    pub fn from_codec(format: CodecFormat) -> Option<Self> {
        match format {
            CodecFormat::Png => Some(Self::Png),
            CodecFormat::Jpeg => Some(Self::Jpeg),
            CodecFormat::Gif => Some(Self::Gif),
            CodecFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn codec(&self) -> CodecFormat {
        match self {
            Self::Png => CodecFormat::Png,
            Self::Jpeg => CodecFormat::Jpeg,
            Self::Gif => CodecFormat::Gif,
            Self::WebP => CodecFormat::WebP,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::WebP => "webp",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Gif => "GIF",
            Self::WebP => "WebP",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_supported_magic_numbers() {
        assert_eq!(ImageFormat::sniff(b"\x89PNG\r\n\x1a\n...."), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(b"\xff\xd8\xff\xe0...."), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(b"GIF89a......"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"BM.........."), None);
        assert_eq!(ImageFormat::sniff(b"hello world"), None);
    }
}
