use image::{ColorType, ImageDecoder, ImageFormat};

use crate::{error::Result, image_utils::reader_for, input::ImageInput};

use super::{TagMap, TagSource};

/// Last resort when no EXIF survives: basic container attributes.
pub struct ContainerAttributes;

impl TagSource for ContainerAttributes {
    fn name(&self) -> &str {
        "container-attributes"
    }

    fn read(&self, input: &ImageInput) -> Result<TagMap> {
        let reader = reader_for(input)?;
        let format = reader.format();
        let decoder = reader.into_decoder()?;
        let (width, height) = decoder.dimensions();

        let mut tags = TagMap::new();
        if let Some(format) = format {
            tags.insert("Format".into(), format_name(format));
        }
        tags.insert("Mode".into(), mode_name(decoder.color_type()));
        tags.insert("Size".into(), format!("{}x{}", width, height));

        Ok(tags)
    }
}

pub fn format_name(format: ImageFormat) -> String {
    format!("{:?}", format).to_uppercase()
}

pub fn mode_name(color: ColorType) -> String {
    match color {
        ColorType::L8 => "L".into(),
        ColorType::La8 => "LA".into(),
        ColorType::Rgb8 => "RGB".into(),
        ColorType::Rgba8 => "RGBA".into(),
        ColorType::L16 => "I;16".into(),
        ColorType::La16 => "LA;16".into(),
        ColorType::Rgb16 => "RGB;16".into(),
        ColorType::Rgba16 => "RGBA;16".into(),
        ColorType::Rgb32F => "RGB;F".into(),
        ColorType::Rgba32F => "RGBA;F".into(),
        other => format!("{:?}", other),
    }
}
