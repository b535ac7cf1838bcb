use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForensicsError {
    #[error("Image loading error: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("EXIF parsing error: {0}")]
    Exif(#[from] exif::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Image dimensions differ: {0}x{1} vs {2}x{3}")]
    DimensionMismatch(u32, u32, u32, u32),

    #[error("Image has no pixels")]
    EmptyImage,
}

pub type Result<T> = std::result::Result<T, ForensicsError>;
