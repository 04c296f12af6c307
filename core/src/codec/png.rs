use image::DynamicImage;

use crate::codec::{decode_with, Codec};
use crate::error::{ImageError, Result};
use crate::format::ImageFormat;

/// zlib level used for every PNG write: stored blocks, no compression.
pub const PNG_COMPRESSION_LEVEL: u8 = 0;

pub struct PngCodec;

impl Codec for PngCodec {
    fn supported_formats(&self) -> &[ImageFormat] {
        &[ImageFormat::Png]
    }

    fn decode(&self, input: &[u8]) -> Result<DynamicImage> {
        decode_with(input, ImageFormat::Png, image::ImageFormat::Png)
    }

    /// `quality` does not apply to PNG; output is always written uncompressed.
    fn encode(&self, image: &DynamicImage, _quality: u8) -> Result<Vec<u8>> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut encoder = lodepng::Encoder::new();
        encoder.set_auto_convert(false);
        {
            let raw = encoder.info_raw_mut();
            raw.set_colortype(lodepng::ColorType::RGBA);
            raw.set_bitdepth(8);
        }
        encoder
            .settings_mut()
            .zlibsettings
            .set_level(PNG_COMPRESSION_LEVEL);

        encoder
            .encode(rgba.as_raw(), width as usize, height as usize)
            .map_err(|e| ImageError::Encode {
                format: ImageFormat::Png,
                reason: e.to_string(),
            })
    }
}
