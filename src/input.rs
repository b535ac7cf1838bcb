use std::time::SystemTime;

use image::ImageFormat;

/// Raw, still-encoded image bytes handed to the engine by the caller.
///
/// The buffer is borrowed for the duration of a call and never mutated. The
/// optional modification time stands in for the file timestamp the caller
/// may know about; the engine itself never touches the filesystem.
#[derive(Debug, Clone, Copy)]
pub struct ImageInput<'a> {
    bytes: &'a [u8],
    format_hint: Option<ImageFormat>,
    modified: Option<SystemTime>,
}

impl<'a> ImageInput<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            format_hint: None,
            modified: None,
        }
    }

    /// Format to fall back on when the container signature is not recognized.
    pub fn with_format_hint(mut self, format: ImageFormat) -> Self {
        self.format_hint = Some(format);
        self
    }

    pub fn with_format_hint_from_extension(mut self, extension: &str) -> Self {
        self.format_hint = ImageFormat::from_extension(extension);
        self
    }

    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn format_hint(&self) -> Option<ImageFormat> {
        self.format_hint
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }
}
