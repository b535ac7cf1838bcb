use log::{debug, warn};

use crate::{
    analysis::{
        ElaGenerator, ElaMap, HashOutcome, PerceptualHash,
        ela::{ELA_AMPLIFICATION, ELA_QUALITY},
    },
    detection::{ELA_DIFF_THRESHOLD, HASH_DISTANCE_THRESHOLD, Verdict},
    error::{ForensicsError, Result},
    image_utils::decode,
    report::JsonReport,
};

pub mod analysis;
pub mod detection;
pub mod error;
pub mod image_utils;
pub mod input;
pub mod metadata;
pub mod report;

pub use analysis::{compare_ela, compare_hash, generate_ela};
pub use detection::classify;
pub use input::ImageInput;
pub use metadata::{MetadataRecord, extract_metadata};
pub use report::assemble_report;

#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    pub ela_quality: u8,
    pub ela_amplification: f64,
    pub hash_distance_threshold: u32,
    pub ela_diff_threshold: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            ela_quality: ELA_QUALITY,
            ela_amplification: ELA_AMPLIFICATION,
            hash_distance_threshold: HASH_DISTANCE_THRESHOLD,
            ela_diff_threshold: ELA_DIFF_THRESHOLD,
        }
    }
}

impl ComparisonConfig {
    pub fn with_ela_quality(mut self, quality: u8) -> Self {
        self.ela_quality = quality;
        self
    }

    pub fn with_ela_amplification(mut self, amp: f64) -> Self {
        self.ela_amplification = amp;
        self
    }

    pub fn with_hash_distance_threshold(mut self, threshold: u32) -> Self {
        self.hash_distance_threshold = threshold;
        self
    }

    pub fn with_ela_diff_threshold(mut self, threshold: f64) -> Self {
        self.ela_diff_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.ela_quality) {
            return Err(ForensicsError::InvalidParameter(format!(
                "ela_quality must be in 1..=100, got {}",
                self.ela_quality
            )));
        }

        if !(self.ela_amplification > 0.0) {
            return Err(ForensicsError::InvalidParameter(format!(
                "ela_amplification must be positive, got {}",
                self.ela_amplification
            )));
        }

        if !(self.ela_diff_threshold >= 0.0) {
            return Err(ForensicsError::InvalidParameter(format!(
                "ela_diff_threshold must be non-negative, got {}",
                self.ela_diff_threshold
            )));
        }

        Ok(())
    }
}

/// Runs metadata extraction, ELA and perceptual hashing on an original/suspect
/// pair and classifies the result. Holds no state besides its configuration,
/// so one instance can serve concurrent comparisons.
#[derive(Debug, Clone, Default)]
pub struct ForensicsComparator {
    config: ComparisonConfig,
}

impl ForensicsComparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ComparisonConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    pub fn compare(&self, original: &ImageInput, suspect: &ImageInput) -> ComparisonResult {
        let (a, b) = rayon::join(|| self.examine(original), || self.examine(suspect));

        let hash = HashOutcome::from_hashes(a.hash, b.hash);

        let ela_diff_percent = match (&a.ela, &b.ela) {
            (Some(ela_a), Some(ela_b)) => compare_ela(ela_a, ela_b),
            _ => {
                debug!("skipping ELA comparison: a map is missing");
                None
            }
        };

        let verdict = Verdict::evaluate(hash.distance(), ela_diff_percent, &self.config);

        ComparisonResult {
            metadata_a: a.metadata,
            metadata_b: b.metadata,
            hash,
            ela_a: a.ela,
            ela_b: b.ela,
            ela_diff_percent,
            verdict,
        }
    }

    /// Per-image work. The image is decoded once and shared by ELA and hashing.
    fn examine(&self, input: &ImageInput) -> ImageEvidence {
        let metadata = extract_metadata(input);

        let (ela, hash) = match decode(input) {
            Ok(image) => {
                let ela = ElaGenerator::new(self.config.ela_quality)
                    .with_amplification(self.config.ela_amplification)
                    .analyze(&image)
                    .map_err(|e| warn!("ELA generation failed: {}", e))
                    .ok();
                (ela, Ok(PerceptualHash::from_image(&image)))
            }
            Err(e) => {
                warn!("could not decode image: {}", e);
                (None, Err(e.to_string()))
            }
        };

        ImageEvidence {
            metadata,
            ela,
            hash,
        }
    }
}

struct ImageEvidence {
    metadata: MetadataRecord,
    ela: Option<ElaMap>,
    hash: std::result::Result<PerceptualHash, String>,
}

#[derive(Debug, Clone)]
pub struct ComparisonResult {
    pub metadata_a: MetadataRecord,
    pub metadata_b: MetadataRecord,
    pub hash: HashOutcome,
    pub ela_a: Option<ElaMap>,
    pub ela_b: Option<ElaMap>,
    pub ela_diff_percent: Option<f64>,
    pub verdict: Verdict,
}

impl ComparisonResult {
    pub fn is_manipulated(&self) -> bool {
        self.verdict.manipulated
    }

    pub fn report(&self, filename_a: &str, filename_b: &str) -> String {
        assemble_report(
            filename_a,
            filename_b,
            &self.metadata_a,
            &self.metadata_b,
            &self.hash,
            self.ela_diff_percent,
            self.verdict.manipulated,
        )
    }

    pub fn json_report<'a>(&'a self, filename_a: &'a str, filename_b: &'a str) -> JsonReport<'a> {
        JsonReport::new(self, filename_a, filename_b)
    }
}
