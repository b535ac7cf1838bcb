#![allow(dead_code)]

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage, codecs::jpeg::JpegEncoder};

pub const TAG_MODEL: u16 = 0x0110;
pub const TAG_SOFTWARE: u16 = 0x0131;
pub const TAG_DATE_TIME: u16 = 0x0132;

pub fn textured(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 13 + y * 7 + (x * y) % 29) % 256) as u8,
            ((x * 3 + y * 17) % 256) as u8,
            ((x ^ y) % 256) as u8,
        ])
    })
}

pub fn inverted(image: &RgbImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        Rgb([255 - p[0], 255 - p[1], 255 - p[2]])
    })
}

pub fn jpeg_bytes(image: &RgbImage, quality: u8) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder.encode_image(image).unwrap();
    buffer.into_inner()
}

pub fn png_bytes(image: &RgbImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

/// Little-endian TIFF with a single IFD of ASCII entries.
pub fn exif_tiff(entries: &[(u16, &str)]) -> Vec<u8> {
    let mut entries = entries.to_vec();
    entries.sort_by_key(|(tag, _)| *tag);

    let ifd_len = 2 + 12 * entries.len() + 4;
    let mut data_offset = 8 + ifd_len;
    let mut ifd = Vec::new();
    let mut data = Vec::new();

    ifd.extend((entries.len() as u16).to_le_bytes());
    for (tag, value) in &entries {
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(0);

        ifd.extend(tag.to_le_bytes());
        ifd.extend(2u16.to_le_bytes());
        ifd.extend((bytes.len() as u32).to_le_bytes());

        if bytes.len() <= 4 {
            bytes.resize(4, 0);
            ifd.extend(&bytes);
        } else {
            ifd.extend((data_offset as u32).to_le_bytes());
            data_offset += bytes.len();
            data.extend(bytes);
        }
    }
    ifd.extend(0u32.to_le_bytes());

    let mut tiff = b"II".to_vec();
    tiff.extend(42u16.to_le_bytes());
    tiff.extend(8u32.to_le_bytes());
    tiff.extend(ifd);
    tiff.extend(data);
    tiff
}

/// Splices an APP1 EXIF segment right after the JPEG SOI marker.
pub fn with_exif(jpeg: &[u8], tiff: &[u8]) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    let mut out = jpeg[..2].to_vec();
    out.extend([0xFF, 0xE1]);
    out.extend(((2 + 6 + tiff.len()) as u16).to_be_bytes());
    out.extend(b"Exif\0\0");
    out.extend(tiff);
    out.extend(&jpeg[2..]);
    out
}

pub fn camera_jpeg() -> Vec<u8> {
    let tiff = exif_tiff(&[
        (TAG_MODEL, "PowerShot G7 X"),
        (TAG_DATE_TIME, "2022:08:14 16:20:05"),
    ]);
    with_exif(&jpeg_bytes(&textured(64, 48), 92), &tiff)
}
