use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::ImageFormat;

pub type Result<T> = std::result::Result<T, ImageError>;

/// Broad category of an [`ImageError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Load,
    Bounds,
    Filter,
    Save,
}

/// Stage of the filter primitive that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    Allocate,
    Copy,
    Apply,
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocate => write!(f, "allocate"),
            Self::Copy => write!(f, "copy"),
            Self::Apply => write!(f, "apply"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid extension on {}", path.display())]
    InvalidExtension { path: PathBuf },

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to decode {format} image: {reason}")]
    Decode { format: ImageFormat, reason: String },

    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "crop out of bounds: {width}x{height} at ({x}, {y}) exceeds {image_width}x{image_height}"
    )]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("invalid target dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("error filtering image ({stage}): {reason}")]
    Filter { stage: FilterStage, reason: String },

    #[error("unsupported save format: {0}")]
    UnsupportedSaveFormat(ImageFormat),

    #[error("codec declares no formats")]
    NoFormats,

    #[error("failed to encode {format} image: {reason}")]
    Encode { format: ImageFormat, reason: String },

    #[error("failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ImageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidExtension { .. }
            | Self::UnsupportedFormat(_)
            | Self::Decode { .. }
            | Self::ReadFile { .. } => ErrorKind::Load,
            Self::OutOfBounds { .. } | Self::InvalidDimensions { .. } => ErrorKind::Bounds,
            Self::Filter { .. } => ErrorKind::Filter,
            Self::UnsupportedSaveFormat(_)
            | Self::NoFormats
            | Self::Encode { .. }
            | Self::WriteFile { .. } => ErrorKind::Save,
        }
    }

    pub(crate) fn filter(stage: FilterStage, reason: impl Into<String>) -> Self {
        Self::Filter {
            stage,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_groups_variants() {
        assert_eq!(
            ImageError::UnsupportedFormat("bmp".into()).kind(),
            ErrorKind::Load
        );
        assert_eq!(
            ImageError::InvalidDimensions { width: 0, height: 4 }.kind(),
            ErrorKind::Bounds
        );
        assert_eq!(
            ImageError::filter(FilterStage::Copy, "boom").kind(),
            ErrorKind::Filter
        );
        assert_eq!(
            ImageError::UnsupportedSaveFormat(ImageFormat::Gd).kind(),
            ErrorKind::Save
        );
    }

    #[test]
    fn test_filter_message_names_stage() {
        let err = ImageError::filter(FilterStage::Allocate, "too large");
        assert_eq!(err.to_string(), "error filtering image (allocate): too large");
    }
}
