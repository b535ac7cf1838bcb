use serde::{Deserialize, Serialize};

use crate::ComparisonConfig;

/// Hash distances strictly above this suggest the suspect image was altered.
pub const HASH_DISTANCE_THRESHOLD: u32 = 10;

/// ELA difference percentages strictly above this suggest alteration.
pub const ELA_DIFF_THRESHOLD: f64 = 2.0;

/// `true` means possible manipulation. Missing signals never count as
/// evidence, so with neither available the answer is `false`.
pub fn classify(hash_distance: Option<u32>, ela_diff_percent: Option<f64>) -> bool {
    Verdict::evaluate(hash_distance, ela_diff_percent, &ComparisonConfig::default()).manipulated
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub manipulated: bool,
    pub evidence: Vec<String>,
}

impl Verdict {
    pub fn evaluate(
        hash_distance: Option<u32>,
        ela_diff_percent: Option<f64>,
        config: &ComparisonConfig,
    ) -> Self {
        let mut evidence = Vec::new();

        if let Some(distance) = hash_distance {
            if distance > config.hash_distance_threshold {
                evidence.push(format!(
                    "Perceptual hash distance {} exceeds {}",
                    distance, config.hash_distance_threshold
                ));
            }
        }

        // NaN compares false and is ignored here.
        if let Some(percent) = ela_diff_percent {
            if percent > config.ela_diff_threshold {
                evidence.push(format!(
                    "ELA difference {:.2}% exceeds {:.2}%",
                    percent, config.ela_diff_threshold
                ));
            }
        }

        Self {
            manipulated: !evidence.is_empty(),
            evidence,
        }
    }
}
