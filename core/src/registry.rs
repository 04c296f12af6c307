use image::DynamicImage;

use crate::codec::gd::GdCodec;
use crate::codec::gif::GifCodec;
use crate::codec::jpg::JpgCodec;
use crate::codec::png::PngCodec;
use crate::codec::Codec;
use crate::error::{ImageError, Result};
use crate::format::ImageFormat;

/// Format-tag to codec dispatch table.
pub struct CodecRegistry {
    codecs: Vec<Box<dyn Codec>>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self { codecs: Vec::new() }
    }

    /// PNG, JPEG and GIF through the `image` crate, plus the GD reader.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PngCodec));
        registry.register(Box::new(JpgCodec));
        registry.register(Box::new(GifCodec));
        registry.register(Box::new(GdCodec));
        registry
    }

    /// Later registrations win over earlier ones for the same format.
    pub fn register(&mut self, codec: Box<dyn Codec>) {
        self.codecs.insert(0, codec);
    }

    /// Find a codec that supports the given format.
    pub fn find(&self, format: ImageFormat) -> Option<&dyn Codec> {
        self.codecs
            .iter()
            .find(|c| c.supported_formats().contains(&format))
            .map(|c| c.as_ref())
    }

    pub fn decode(&self, format: ImageFormat, input: &[u8]) -> Result<DynamicImage> {
        let codec = self
            .find(format)
            .ok_or_else(|| ImageError::UnsupportedFormat(format.as_str().to_string()))?;
        codec.decode(input)
    }

    pub fn encode(
        &self,
        format: ImageFormat,
        image: &DynamicImage,
        quality: u8,
    ) -> Result<Vec<u8>> {
        let codec = self
            .find(format)
            .ok_or(ImageError::UnsupportedSaveFormat(format))?;
        codec.encode(image, quality)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
