//! DCT-based perceptual hashing.
//!
//! The image is reduced to a 32x32 luminance thumbnail, transformed with a
//! 2-D DCT-II and the 8x8 block of lowest frequencies is thresholded against
//! its median. Visually similar images share most of those 64 bits, so the
//! Hamming distance between two hashes tracks perceptual difference:
//!
//! - 0: identical down to the hash resolution
//! - 1-10: same picture after light edits or recompression
//! - above 10: substantially different content

use std::fmt;

use image::{DynamicImage, imageops::FilterType};
use log::warn;
use ndarray::{Array2, s};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    image_utils::{decode, rgb_to_gray},
    input::ImageInput,
};

/// Side of the low-frequency block kept from the DCT.
pub const HASH_SIZE: usize = 8;

pub const HASH_BITS: u32 = (HASH_SIZE * HASH_SIZE) as u32;

/// Thumbnail side fed to the DCT.
const SAMPLE_SIZE: usize = HASH_SIZE * 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PerceptualHash(u64);

impl PerceptualHash {
    pub fn compute(input: &ImageInput) -> Result<Self> {
        let image = decode(input)?;
        Ok(Self::from_image(&image))
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        let gray = rgb_to_gray(&image.to_rgb8());
        let small = image::imageops::resize(
            &gray,
            SAMPLE_SIZE as u32,
            SAMPLE_SIZE as u32,
            FilterType::Lanczos3,
        );

        let pixels = Array2::from_shape_fn((SAMPLE_SIZE, SAMPLE_SIZE), |(y, x)| {
            small.get_pixel(x as u32, y as u32)[0] as f64
        });

        let basis = dct_matrix(SAMPLE_SIZE);
        let coefficients = basis.dot(&pixels).dot(&basis.t());
        let low = coefficients.slice(s![..HASH_SIZE, ..HASH_SIZE]);

        let mut values = low.iter().copied().collect::<Vec<_>>();
        let median = median(&mut values);

        let bits = low
            .iter()
            .fold(0u64, |acc, &c| (acc << 1) | u64::from(c > median));

        Self(bits)
    }

    pub fn bits(&self) -> u64 {
        self.0
    }

    /// Number of differing bit positions.
    pub fn distance(&self, other: &PerceptualHash) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

impl fmt::Display for PerceptualHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Unnormalized DCT-II basis: row k holds 2cos(pi*k*(2n+1)/2N).
fn dct_matrix(n: usize) -> Array2<f64> {
    Array2::from_shape_fn((n, n), |(k, i)| {
        2.0 * (std::f64::consts::PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n as f64)).cos()
    })
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;

    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Result of hashing and comparing two inputs. A failure carries the reason
/// instead of a distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HashOutcome {
    Compared {
        hash_a: String,
        hash_b: String,
        distance: u32,
    },
    Failed {
        message: String,
    },
}

impl HashOutcome {
    pub fn from_hashes<E: fmt::Display>(
        a: std::result::Result<PerceptualHash, E>,
        b: std::result::Result<PerceptualHash, E>,
    ) -> Self {
        match (a, b) {
            (Ok(a), Ok(b)) => HashOutcome::Compared {
                hash_a: a.to_string(),
                hash_b: b.to_string(),
                distance: a.distance(&b),
            },
            (Err(e), _) | (_, Err(e)) => {
                warn!("perceptual hash failed: {}", e);
                HashOutcome::Failed {
                    message: format!("Error: {}", e),
                }
            }
        }
    }

    pub fn distance(&self) -> Option<u32> {
        match self {
            HashOutcome::Compared { distance, .. } => Some(*distance),
            HashOutcome::Failed { .. } => None,
        }
    }
}

impl fmt::Display for HashOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashOutcome::Compared { distance, .. } => write!(f, "{}", distance),
            HashOutcome::Failed { message } => f.write_str(message),
        }
    }
}

pub fn compare_hash(a: &ImageInput, b: &ImageInput) -> HashOutcome {
    HashOutcome::from_hashes(PerceptualHash::compute(a), PerceptualHash::compute(b))
}
