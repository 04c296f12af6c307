//! Reader for libgd's uncompressed `.gd` raster container.
//!
//! Three layouts exist, told apart by the first word:
//! - `0xFFFE`: GD 2.x truecolor, one big-endian ARGB `i32` per pixel
//! - `0xFFFF`: GD 2.x palette, 256 RGBA entries and one index byte per pixel
//! - anything else: GD 1.x palette (that word is the width), RGB entries
//!
//! GD alpha runs 0 (opaque) to 127 (transparent).

use image::{DynamicImage, Rgba, RgbaImage};

use crate::codec::Codec;
use crate::error::{ImageError, Result};
use crate::format::ImageFormat;

const TRUECOLOR_SIGNATURE: u16 = 0xFFFE;
const PALETTE_SIGNATURE: u16 = 0xFFFF;
const MAX_COLORS: usize = 256;
const GD1_NO_TRANSPARENT: u16 = 257;

pub const GD_ALPHA_MAX: u8 = 127;

pub struct GdCodec;

impl Codec for GdCodec {
    fn supported_formats(&self) -> &[ImageFormat] {
        &[ImageFormat::Gd]
    }

    fn decode(&self, input: &[u8]) -> Result<DynamicImage> {
        decode_gd(input)
            .map(DynamicImage::ImageRgba8)
            .map_err(|reason| ImageError::Decode {
                format: ImageFormat::Gd,
                reason,
            })
    }
}

/// Convert an 8-bit alpha (255 opaque) to GD's 7-bit inverted alpha.
pub fn to_gd_alpha(alpha: u8) -> u8 {
    GD_ALPHA_MAX - (alpha >> 1)
}

/// Convert GD's 7-bit inverted alpha back to 8 bits.
pub fn from_gd_alpha(gd_alpha: u8) -> u8 {
    let a = gd_alpha.min(GD_ALPHA_MAX);
    255 - ((a << 1) + (a >> 6))
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> std::result::Result<&'a [u8], String> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| format!("truncated at byte {}", self.pos))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> std::result::Result<u8, String> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> std::result::Result<u16, String> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn i32(&mut self) -> std::result::Result<i32, String> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

fn decode_gd(input: &[u8]) -> std::result::Result<RgbaImage, String> {
    let mut r = Reader::new(input);

    let first = r.u16()?;
    let (gd2, width) = match first {
        TRUECOLOR_SIGNATURE | PALETTE_SIGNATURE => (true, r.u16()?),
        w => (false, w),
    };
    let height = r.u16()?;

    if width == 0 || height == 0 {
        return Err(format!("invalid dimensions {}x{}", width, height));
    }

    let truecolor = if gd2 { r.u8()? != 0 } else { false };
    if gd2 && truecolor != (first == TRUECOLOR_SIGNATURE) {
        return Err("truecolor flag does not match signature".into());
    }

    let (width, height) = (u32::from(width), u32::from(height));

    if truecolor {
        let transparent = r.i32()?;
        read_truecolor(&mut r, width, height, transparent)
    } else {
        let transparent = if gd2 {
            let _colors_total = r.u16()?;
            r.i32()?
        } else {
            let _colors_total = r.u8()?;
            match r.u16()? {
                GD1_NO_TRANSPARENT => -1,
                t => i32::from(t),
            }
        };
        read_palette(&mut r, width, height, transparent, gd2)
    }
}

fn read_truecolor(
    r: &mut Reader<'_>,
    width: u32,
    height: u32,
    transparent: i32,
) -> std::result::Result<RgbaImage, String> {
    let mut img = RgbaImage::new(width, height);
    for pixel in img.pixels_mut() {
        let argb = r.i32()?;
        let gd_alpha = ((argb >> 24) & 0x7F) as u8;
        let [_, red, green, blue] = argb.to_be_bytes();
        let alpha = if transparent != -1 && argb == transparent {
            0
        } else {
            from_gd_alpha(gd_alpha)
        };
        *pixel = Rgba([red, green, blue, alpha]);
    }
    Ok(img)
}

fn read_palette(
    r: &mut Reader<'_>,
    width: u32,
    height: u32,
    transparent: i32,
    with_alpha: bool,
) -> std::result::Result<RgbaImage, String> {
    let mut palette = [Rgba([0u8, 0, 0, 255]); MAX_COLORS];
    for (index, entry) in palette.iter_mut().enumerate() {
        let red = r.u8()?;
        let green = r.u8()?;
        let blue = r.u8()?;
        let alpha = if with_alpha {
            from_gd_alpha(r.u8()?)
        } else {
            255
        };
        let alpha = if index as i32 == transparent { 0 } else { alpha };
        *entry = Rgba([red, green, blue, alpha]);
    }

    let mut img = RgbaImage::new(width, height);
    for pixel in img.pixels_mut() {
        *pixel = palette[usize::from(r.u8()?)];
    }
    Ok(img)
}
