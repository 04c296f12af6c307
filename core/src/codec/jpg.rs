use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use crate::codec::{decode_with, Codec};
use crate::error::{ImageError, Result};
use crate::format::ImageFormat;

pub struct JpgCodec;

impl Codec for JpgCodec {
    fn supported_formats(&self) -> &[ImageFormat] {
        &[ImageFormat::Jpeg]
    }

    fn decode(&self, input: &[u8]) -> Result<DynamicImage> {
        decode_with(input, ImageFormat::Jpeg, image::ImageFormat::Jpeg)
    }

    fn encode(&self, image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        // JPEG has no alpha channel
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let clamped = quality.clamp(1, 100);
        if clamped != quality {
            log::warn!("JPEG quality {} out of range, using {}", quality, clamped);
        }

        let mut output = Vec::new();
        let mut cursor = Cursor::new(&mut output);
        let mut encoder = JpegEncoder::new_with_quality(&mut cursor, clamped);

        encoder
            .encode(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .map_err(|e| ImageError::Encode {
                format: ImageFormat::Jpeg,
                reason: e.to_string(),
            })?;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    fn noisy(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 31 + y * 17) as u8, (x * y) as u8, (x ^ y) as u8])
        }))
    }

    #[test]
    fn test_encode_decode_keeps_dimensions() {
        let bytes = JpgCodec.encode(&noisy(40, 24), 90).unwrap();
        let back = JpgCodec.decode(&bytes).unwrap();
        assert_eq!(back.dimensions(), (40, 24));
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let img = noisy(64, 64);
        let low = JpgCodec.encode(&img, 10).unwrap();
        let high = JpgCodec.encode(&img, 100).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_zero_quality_still_encodes() {
        assert!(JpgCodec.encode(&noisy(8, 8), 0).is_ok());
    }
}
