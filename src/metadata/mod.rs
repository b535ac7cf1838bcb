pub mod container;
pub mod exif;

use std::{collections::BTreeMap, time::SystemTime};

use chrono::{DateTime, Local};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{error::Result, input::ImageInput};

use self::{
    container::ContainerAttributes,
    exif::{ContainerExif, DecoderExif},
};

/// Tag name to display value. Ordered so reports list tags deterministically.
pub type TagMap = BTreeMap<String, String>;

pub const UNKNOWN: &str = "unknown";

/// Layout of EXIF date fields, reused for the filesystem timestamp fallback.
pub const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// One step of the metadata fallback chain.
pub trait TagSource {
    fn name(&self) -> &str;

    fn read(&self, input: &ImageInput) -> Result<TagMap>;

    /// Runs the source, folding failures and empty results into `None`.
    fn extract(&self, input: &ImageInput) -> Option<TagMap> {
        match self.read(input) {
            Ok(tags) if !tags.is_empty() => Some(tags),
            Ok(_) => {
                debug!("{}: no tags found", self.name());
                None
            }
            Err(e) => {
                debug!("{}: {}", self.name(), e);
                None
            }
        }
    }
}

/// Sources in the order they are consulted.
pub fn default_sources() -> Vec<Box<dyn TagSource + Send + Sync>> {
    vec![
        Box::new(ContainerExif),
        Box::new(DecoderExif),
        Box::new(ContainerAttributes),
    ]
}

/// First non-empty mapping produced by `sources`, or an empty map.
pub fn extract_tags_with(input: &ImageInput, sources: &[Box<dyn TagSource + Send + Sync>]) -> TagMap {
    sources
        .iter()
        .find_map(|source| source.extract(input))
        .unwrap_or_default()
}

pub fn extract_tags(input: &ImageInput) -> TagMap {
    extract_tags_with(input, &default_sources())
}

/// Extracts and normalizes metadata. Never fails: unreadable input produces
/// an empty tag map with every derived field at its fallback.
pub fn extract_metadata(input: &ImageInput) -> MetadataRecord {
    MetadataRecord::from_tags(extract_tags(input), input.modified())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    pub camera_model: String,
    pub date_created: String,
    pub date_modified: String,
    pub software: String,
    #[serde(rename = "all_metadata")]
    pub all_metadata: TagMap,
}

impl MetadataRecord {
    pub fn from_tags(tags: TagMap, modified: Option<SystemTime>) -> Self {
        let camera_model = first_of(&tags, &["Model", "CameraModelName"])
            .unwrap_or(UNKNOWN)
            .to_string();

        let date_created = first_of(&tags, &["DateTimeOriginal", "DateTime"])
            .unwrap_or(UNKNOWN)
            .to_string();

        let date_modified = match first_of(&tags, &["ModifyDate", "DateTimeDigitized"]) {
            Some(date) => date.to_string(),
            None => modified
                .map(format_timestamp)
                .unwrap_or_else(|| UNKNOWN.to_string()),
        };

        // An empty Software tag reads as "no software", same as a missing one.
        let software = first_of(&tags, &["Software"]).unwrap_or(UNKNOWN).to_string();

        Self {
            camera_model,
            date_created,
            date_modified,
            software,
            all_metadata: tags,
        }
    }

    pub fn has_software(&self) -> bool {
        self.software != UNKNOWN
    }
}

fn first_of<'a>(tags: &'a TagMap, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| tags.get(*name))
        .map(String::as_str)
        .find(|value| !value.is_empty())
}

pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(EXIF_DATE_FORMAT).to_string()
}
