pub mod text;
pub mod visualization;

use serde::Serialize;

use crate::{
    ComparisonResult,
    analysis::{ElaMap, HashOutcome},
    detection::Verdict,
    metadata::MetadataRecord,
};

pub use text::assemble_report;

#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub original: CaseSection<'a>,
    pub suspect: CaseSection<'a>,
    pub perceptual_hash: &'a HashOutcome,
    pub ela_difference_percent: Option<f64>,
    pub verdict: &'a Verdict,
}

#[derive(Serialize)]
pub struct CaseSection<'a> {
    pub filename: &'a str,
    pub metadata: &'a MetadataRecord,
    pub ela: Option<ElaSection>,
}

#[derive(Serialize)]
pub struct ElaSection {
    pub width: u32,
    pub height: u32,
    pub max_intensity: u8,
    pub mean_intensity: f64,
}

impl<'a> JsonReport<'a> {
    pub fn new(result: &'a ComparisonResult, filename_a: &'a str, filename_b: &'a str) -> Self {
        Self {
            original: CaseSection {
                filename: filename_a,
                metadata: &result.metadata_a,
                ela: result.ela_a.as_ref().map(ElaSection::from),
            },
            suspect: CaseSection {
                filename: filename_b,
                metadata: &result.metadata_b,
                ela: result.ela_b.as_ref().map(ElaSection::from),
            },
            perceptual_hash: &result.hash,
            ela_difference_percent: result.ela_diff_percent,
            verdict: &result.verdict,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&ElaMap> for ElaSection {
    fn from(ela: &ElaMap) -> Self {
        let (width, height) = ela.dimensions();
        Self {
            width,
            height,
            max_intensity: ela.max_intensity(),
            mean_intensity: ela.mean_intensity(),
        }
    }
}
