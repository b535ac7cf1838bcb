use std::fmt::Write;

use crate::{analysis::HashOutcome, metadata::MetadataRecord};

pub const MANIPULATION_STATUS: &str = "Edited / possible manipulation";
pub const CLEAN_STATUS: &str = "Important: no indication of editing";
pub const NO_SOFTWARE: &str = "No software detected";

/// Renders the two-case comparison report. Pure formatting: every missing
/// signal is rendered, never treated as an error.
pub fn assemble_report(
    filename_a: &str,
    filename_b: &str,
    meta_a: &MetadataRecord,
    meta_b: &MetadataRecord,
    hash: &HashOutcome,
    ela_diff_percent: Option<f64>,
    manipulated: bool,
) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Comparison report:");
    let _ = writeln!(out, "Case 1: Original image '{}'", filename_a);
    let _ = writeln!(out, "  - Camera model: {}", meta_a.camera_model);
    let _ = writeln!(out, "  - Capture date: {}", meta_a.date_created);
    let _ = writeln!(out, "  - Modification date: {}", meta_a.date_modified);
    let _ = writeln!(out, "  - Perceptual hash: reference");
    let _ = writeln!(out, "  - ELA: reference");

    let software = if meta_b.has_software() {
        meta_b.software.as_str()
    } else {
        NO_SOFTWARE
    };

    let _ = writeln!(out, "Case 2: Suspect image '{}'", filename_b);
    let _ = writeln!(out, "  - Software: {}", software);
    let _ = writeln!(out, "  - Capture date: {}", meta_b.date_created);
    let _ = writeln!(out, "  - Modification date: {}", meta_b.date_modified);
    let _ = writeln!(out, "  - Perceptual hash: difference = {}", hash);

    if let Some(percent) = ela_diff_percent {
        let _ = writeln!(out, "  - ELA comparison: {:.2}% differing pixels", percent);
    }

    let status = if manipulated { MANIPULATION_STATUS } else { CLEAN_STATUS };
    let _ = write!(out, "  - Status: {}", status);

    out
}
