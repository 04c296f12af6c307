pub mod gd;
pub mod gif;
pub mod jpg;
pub mod png;

use image::DynamicImage;

use crate::error::{ImageError, Result};
use crate::format::ImageFormat;

/// Decoder/encoder pair for one or more format tags.
pub trait Codec: Send + Sync {
    fn supported_formats(&self) -> &[ImageFormat];

    fn decode(&self, input: &[u8]) -> Result<DynamicImage>;

    /// Encode to the codec's primary format. Load-only codecs keep the
    /// default, which rejects the format.
    fn encode(&self, _image: &DynamicImage, _quality: u8) -> Result<Vec<u8>> {
        match self.supported_formats().first() {
            Some(&format) => Err(ImageError::UnsupportedSaveFormat(format)),
            None => Err(ImageError::NoFormats),
        }
    }
}

/// Decode through the `image` crate with an explicit container format.
fn decode_with(
    input: &[u8],
    format: ImageFormat,
    native: image::ImageFormat,
) -> Result<DynamicImage> {
    image::load_from_memory_with_format(input, native).map_err(|e| ImageError::Decode {
        format,
        reason: e.to_string(),
    })
}
