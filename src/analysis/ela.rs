use std::{io::Cursor, path::Path};

use image::{DynamicImage, GrayImage, Rgb, RgbImage, codecs::jpeg::JpegEncoder};
use log::warn;

use crate::{
    error::{ForensicsError, Result},
    image_utils::{decode, encode_png, rgb_to_gray},
    input::ImageInput,
};

/// JPEG quality used for the recompression pass.
pub const ELA_QUALITY: u8 = 90;

/// Brightness gain applied to the raw differences. Anything above 255/30
/// saturates to white.
pub const ELA_AMPLIFICATION: f64 = 30.0;

/// Amplified difference between an image and a once-recompressed copy of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ElaMap {
    image: RgbImage,
    max_intensity: u8,
    mean_intensity: f64,
}

impl From<RgbImage> for ElaMap {
    fn from(image: RgbImage) -> Self {
        let raw = image.as_raw();
        let max_intensity = raw.iter().copied().max().unwrap_or(0);
        let mean_intensity = if raw.is_empty() {
            0.0
        } else {
            raw.iter().map(|&v| v as f64).sum::<f64>() / raw.len() as f64
        };

        Self {
            image,
            max_intensity,
            mean_intensity,
        }
    }
}

impl ElaMap {
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Brightest channel value anywhere in the map.
    pub fn max_intensity(&self) -> u8 {
        self.max_intensity
    }

    /// Mean over every channel of every pixel.
    pub fn mean_intensity(&self) -> f64 {
        self.mean_intensity
    }

    pub fn luminance(&self) -> GrayImage {
        rgb_to_gray(&self.image)
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}

pub struct ElaGenerator {
    quality: u8,
    amplification: f64,
}

impl Default for ElaGenerator {
    fn default() -> Self {
        Self::new(ELA_QUALITY)
    }
}

impl ElaGenerator {
    pub fn new(quality: u8) -> Self {
        Self {
            quality,
            amplification: ELA_AMPLIFICATION,
        }
    }

    pub fn with_amplification(mut self, amp: f64) -> Self {
        self.amplification = amp;
        self
    }

    pub fn generate(&self, input: &ImageInput) -> Result<ElaMap> {
        let image = decode(input)?;
        self.analyze(&image)
    }

    pub fn analyze(&self, image: &DynamicImage) -> Result<ElaMap> {
        self.validate()?;

        let rgb = image.to_rgb8();
        let recompressed = self.recompress_jpeg(&rgb)?;

        if rgb.dimensions() != recompressed.dimensions() {
            let (w1, h1) = rgb.dimensions();
            let (w2, h2) = recompressed.dimensions();
            return Err(ForensicsError::DimensionMismatch(w1, h1, w2, h2));
        }

        let (width, height) = rgb.dimensions();
        let ela = RgbImage::from_fn(width, height, |x, y| {
            let orig = rgb.get_pixel(x, y);
            let recomp = recompressed.get_pixel(x, y);

            Rgb([0, 1, 2].map(|c| self.amplify(orig[c].abs_diff(recomp[c]))))
        });

        Ok(ElaMap::from(ela))
    }

    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(ForensicsError::InvalidParameter(format!(
                "JPEG quality must be in 1..=100, got {}",
                self.quality
            )));
        }

        if !(self.amplification > 0.0) {
            return Err(ForensicsError::InvalidParameter(format!(
                "amplification must be positive, got {}",
                self.amplification
            )));
        }

        Ok(())
    }

    fn amplify(&self, diff: u8) -> u8 {
        (diff as f64 * self.amplification).min(255.0) as u8
    }

    fn recompress_jpeg(&self, rgb: &RgbImage) -> Result<RgbImage> {
        let mut buffer = Cursor::new(Vec::new());

        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
        encoder.encode_image(rgb)?;

        let recompressed = image::load_from_memory(&buffer.into_inner())?;

        Ok(recompressed.to_rgb8())
    }
}

/// ELA map with the default quality and gain, or `None` when the input cannot
/// be decoded or re-encoded.
pub fn generate_ela(input: &ImageInput) -> Option<ElaMap> {
    ElaGenerator::default()
        .generate(input)
        .map_err(|e| warn!("ELA generation failed: {}", e))
        .ok()
}

/// Share of pixels, in percent rounded to two decimals, whose luminance differs
/// between the two maps.
pub fn ela_difference_percent(a: &ElaMap, b: &ElaMap) -> Result<f64> {
    let (w1, h1) = a.dimensions();
    let (w2, h2) = b.dimensions();

    if (w1, h1) != (w2, h2) {
        return Err(ForensicsError::DimensionMismatch(w1, h1, w2, h2));
    }

    let total = w1 as u64 * h1 as u64;
    if total == 0 {
        return Err(ForensicsError::EmptyImage);
    }

    let lum_a = a.luminance();
    let lum_b = b.luminance();
    let changed = lum_a
        .pixels()
        .zip(lum_b.pixels())
        .filter(|(p, q)| p[0] != q[0])
        .count();

    let percent = changed as f64 / total as f64 * 100.0;
    Ok((percent * 100.0).round() / 100.0)
}

pub fn compare_ela(a: &ElaMap, b: &ElaMap) -> Option<f64> {
    ela_difference_percent(a, b)
        .map_err(|e| warn!("ELA comparison failed: {}", e))
        .ok()
}
