use std::io::Cursor;

use exif::{Field, In, Value};
use image::ImageDecoder;

use crate::{error::Result, image_utils::reader_for, input::ImageInput};

use super::{TagMap, TagSource};

const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Reads the EXIF/TIFF tag table straight out of the container bytes.
pub struct ContainerExif;

impl TagSource for ContainerExif {
    fn name(&self) -> &str {
        "container-exif"
    }

    fn read(&self, input: &ImageInput) -> Result<TagMap> {
        let mut reader = Cursor::new(input.bytes());
        let exif_data = exif::Reader::new().read_from_container(&mut reader)?;
        Ok(tags_from_exif(&exif_data))
    }
}

/// Lets the image decoder locate the EXIF block, then parses it as raw TIFF.
pub struct DecoderExif;

impl TagSource for DecoderExif {
    fn name(&self) -> &str {
        "decoder-exif"
    }

    fn read(&self, input: &ImageInput) -> Result<TagMap> {
        let mut decoder = reader_for(input)?.into_decoder()?;

        let Some(mut raw) = decoder.exif_metadata()? else {
            return Ok(TagMap::new());
        };

        if raw.starts_with(EXIF_HEADER) {
            raw.drain(..EXIF_HEADER.len());
        }

        let exif_data = exif::Reader::new().read_raw(raw)?;
        Ok(tags_from_exif(&exif_data))
    }
}

/// Builds the name/value map. Primary image fields win over thumbnail fields
/// carrying the same tag.
pub fn tags_from_exif(exif_data: &exif::Exif) -> TagMap {
    tags_from_fields(exif_data.fields())
}

fn tags_from_fields<'a>(fields: impl IntoIterator<Item = &'a Field>) -> TagMap {
    let mut tags = TagMap::new();

    for field in fields {
        let name = field.tag.to_string();
        let value = field_text(field);

        if field.ifd_num == In::PRIMARY {
            tags.insert(name, value);
        } else {
            tags.entry(name).or_insert(value);
        }
    }

    tags
}

/// Text fields are decoded as UTF-8 when possible; everything else uses the
/// library's display form.
pub fn field_text(field: &Field) -> String {
    let text = match &field.value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|part| std::str::from_utf8(part).map(|s| s.trim_end_matches('\0')))
            .collect::<std::result::Result<Vec<_>, _>>()
            .ok()
            .map(|parts| parts.join(" ")),
        Value::Undefined(bytes, _) => std::str::from_utf8(bytes)
            .ok()
            .map(|s| s.trim_end_matches('\0').to_string()),
        _ => None,
    };

    text.unwrap_or_else(|| field.display_value().to_string())
}
