use crate::format::ImageFormat;

pub const DEFAULT_QUALITY: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Output encoding
    pub format: ImageFormat,
    /// JPEG quality 0-100 (ignored by PNG and GIF)
    pub quality: u8,
}

impl SaveOptions {
    pub fn new(format: ImageFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            quality: DEFAULT_QUALITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_png_at_90() {
        let opts = SaveOptions::default();
        assert_eq!(opts.format, ImageFormat::Png);
        assert_eq!(opts.quality, 90);
    }

    #[test]
    fn test_builder_keeps_default_quality() {
        let opts = SaveOptions::new(ImageFormat::Jpeg);
        assert_eq!(opts.quality, DEFAULT_QUALITY);
        assert_eq!(opts.with_quality(40).quality, 40);
    }
}
