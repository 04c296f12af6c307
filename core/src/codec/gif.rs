use image::codecs::gif::GifEncoder;
use image::DynamicImage;

use crate::codec::{decode_with, Codec};
use crate::error::{ImageError, Result};
use crate::format::ImageFormat;

pub struct GifCodec;

impl Codec for GifCodec {
    fn supported_formats(&self) -> &[ImageFormat] {
        &[ImageFormat::Gif]
    }

    fn decode(&self, input: &[u8]) -> Result<DynamicImage> {
        decode_with(input, ImageFormat::Gif, image::ImageFormat::Gif)
    }

    fn encode(&self, image: &DynamicImage, _quality: u8) -> Result<Vec<u8>> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut output = Vec::new();
        {
            // The trailer is written when the encoder drops.
            let mut encoder = GifEncoder::new(&mut output);
            encoder
                .encode(rgba.as_raw(), width, height, image::ExtendedColorType::Rgba8)
                .map_err(|e| ImageError::Encode {
                    format: ImageFormat::Gif,
                    reason: e.to_string(),
                })?;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    #[test]
    fn test_encode_decode_keeps_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(20, 10, |x, _| {
            if x < 10 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        }));
        let bytes = GifCodec.encode(&img, 90).unwrap();
        assert!(bytes.starts_with(b"GIF8"));
        let back = GifCodec.decode(&bytes).unwrap();
        assert_eq!(back.dimensions(), (20, 10));
    }
}
