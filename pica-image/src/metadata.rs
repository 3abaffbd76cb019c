use std::io::Cursor;

use exif::{In, Tag, Value};
use pica_core::Tags;
use tracing::debug;

use crate::DecodedImage;

/// Parse the EXIF block of any container kamadak-exif understands.
pub(crate) fn read_exif(bytes: &[u8]) -> Option<exif::Exif> {
    match exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => Some(exif),
        Err(exif::Error::NotFound(_)) => None,
        Err(err) => {
            debug!(error = %err, "ignoring unreadable exif block");
            None
        }
    }
}

/// Known EXIF tags of the primary image, keyed by standard tag name.
///
/// Images without EXIF yield an empty map. Unknown tags, IFD pointers and
/// maker notes are skipped.
pub fn extract_tags(image: &DecodedImage) -> Tags {
    let mut tags = Tags::new();
    let Some(exif) = image.exif() else {
        return tags;
    };

    for field in exif.fields() {
        if field.ifd_num != In::PRIMARY || field.tag.description().is_none() {
            continue;
        }
        if matches!(
            field.tag,
            Tag::ExifIFDPointer | Tag::GPSInfoIFDPointer | Tag::InteropIFDPointer | Tag::MakerNote
        ) {
            continue;
        }

        let value = match &field.value {
            Value::Ascii(parts) => parts
                .iter()
                .map(|part| String::from_utf8_lossy(part).trim().to_string())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            _ => field.display_value().to_string(),
        };

        tags.entry(field.tag.to_string()).or_insert(value);
    }

    tags
}
