use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, ImageReader, Luma, RgbImage};

use crate::{error::Result, input::ImageInput};

/// Opens the input as an `ImageReader`, sniffing the container signature first
/// and falling back to the caller's format hint.
pub fn reader_for<'a>(input: &ImageInput<'a>) -> Result<ImageReader<Cursor<&'a [u8]>>> {
    let mut reader = ImageReader::new(Cursor::new(input.bytes())).with_guessed_format()?;

    if reader.format().is_none() {
        if let Some(hint) = input.format_hint() {
            reader.set_format(hint);
        }
    }

    Ok(reader)
}

pub fn decode(input: &ImageInput) -> Result<DynamicImage> {
    let image = reader_for(input)?.decode()?;
    Ok(image)
}

/// ITU-R 601 luma with integer rounding, the same weights classic imaging
/// libraries use for their "L" conversion.
pub fn rgb_to_gray(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut gray = GrayImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        let lum = (pixel[0] as u32 * 299 + pixel[1] as u32 * 587 + pixel[2] as u32 * 114 + 500)
            / 1000;
        gray.put_pixel(x, y, Luma([lum.min(255) as u8]));
    }

    gray
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}
