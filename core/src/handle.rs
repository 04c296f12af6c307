use std::borrow::Cow;
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImage, RgbaImage};

use crate::config::SaveOptions;
use crate::error::{FilterStage, ImageError, Result};
use crate::filter::Filter;
use crate::format::{extension_of, ImageFormat};
use crate::io::{read_file, write_file};
use crate::registry::CodecRegistry;

/// Resampling used by every scale operation.
pub const RESAMPLE_FILTER: FilterType = FilterType::Triangle;

/// An owned, decoded image.
///
/// Every transform leaves `self` untouched and returns a new `Image`; the
/// pixel buffer is released when the handle drops.
///
/// ```ignore
/// let thumb = Image::load("photo.jpg")?
///     .squarify()?
///     .scale_width(128)?
///     .desaturate()?;
/// thumb.save("thumb.png", &SaveOptions::default())?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pixels: DynamicImage,
    width: u32,
    height: u32,
}

impl Image {
    /// Wrap a decoded buffer. Empty buffers are rejected.
    pub fn from_dynamic(pixels: DynamicImage) -> Result<Self> {
        let (width, height) = (pixels.width(), pixels.height());
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions { width, height });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Load a file, picking the decoder from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(&CodecRegistry::standard(), path)
    }

    pub fn load_with(registry: &CodecRegistry, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = extension_of(path).ok_or_else(|| ImageError::InvalidExtension {
            path: path.to_path_buf(),
        })?;
        let format = ImageFormat::from_extension(ext)
            .ok_or_else(|| ImageError::UnsupportedFormat(ext.to_ascii_lowercase()))?;

        let data = read_file(path)?;
        let pixels = registry.decode(format, &data)?;
        let image = Self::from_dynamic(pixels).map_err(|_| ImageError::Decode {
            format,
            reason: "decoded image is empty".into(),
        })?;

        log::debug!(
            "Loaded {} ({}x{}, {})",
            path.display(),
            image.width,
            image.height,
            format
        );
        Ok(image)
    }

    /// Decode in-memory bytes of a known format.
    pub fn decode(input: &[u8], format: ImageFormat) -> Result<Self> {
        let pixels = CodecRegistry::standard().decode(format, input)?;
        Self::from_dynamic(pixels).map_err(|_| ImageError::Decode {
            format,
            reason: "decoded image is empty".into(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.pixels
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.pixels
    }

    /// Copy the `width` x `height` region whose top-left corner is (`x`, `y`).
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Self> {
        let fits = |start: u32, len: u32, limit: u32| {
            u64::from(start) + u64::from(len) <= u64::from(limit)
        };
        if !fits(x, width, self.width) || !fits(y, height, self.height) {
            return Err(ImageError::OutOfBounds {
                x,
                y,
                width,
                height,
                image_width: self.width,
                image_height: self.height,
            });
        }
        check_target(width, height)?;

        log::debug!("Cropping {}x{} at ({}, {})", width, height, x, y);
        Self::from_dynamic(self.pixels.crop_imm(x, y, width, height))
    }

    /// Resample the whole image to exactly `width` x `height`.
    pub fn scale(&self, width: u32, height: u32) -> Result<Self> {
        check_target(width, height)?;
        log::debug!(
            "Scaling {}x{} -> {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        Self::from_dynamic(self.pixels.resize_exact(width, height, RESAMPLE_FILTER))
    }

    /// Scale to `width`, keeping the aspect ratio. The height is truncated.
    pub fn scale_width(&self, width: u32) -> Result<Self> {
        let aspect = f64::from(self.height) / f64::from(self.width);
        let height = scaled_side(width, aspect).ok_or(ImageError::InvalidDimensions {
            width,
            height: u32::MAX,
        })?;
        self.scale(width, height)
    }

    /// Scale to `height`, keeping the aspect ratio. The width is truncated.
    pub fn scale_height(&self, height: u32) -> Result<Self> {
        let aspect = f64::from(self.width) / f64::from(self.height);
        let width = scaled_side(height, aspect).ok_or(ImageError::InvalidDimensions {
            width: u32::MAX,
            height,
        })?;
        self.scale(width, height)
    }

    /// Largest centered square. A square image is returned as-is, borrowed.
    pub fn squarify(&self) -> Result<Cow<'_, Self>> {
        let (width, height) = self.dimensions();
        if width == height {
            return Ok(Cow::Borrowed(self));
        }

        let side = width.min(height);
        let (x, y) = if width > height {
            ((width - height) / 2, 0)
        } else {
            (0, (height - width) / 2)
        };
        self.crop(x, y, side, side).map(Cow::Owned)
    }

    /// Horizontal flip.
    pub fn mirror(&self) -> Result<Self> {
        Self::from_dynamic(self.pixels.fliph())
    }

    pub fn desaturate(&self) -> Result<Self> {
        self.apply_filter(Filter::Grayscale)
    }

    pub fn emboss(&self) -> Result<Self> {
        self.apply_filter(Filter::Emboss)
    }

    pub fn negative(&self) -> Result<Self> {
        self.apply_filter(Filter::Negate)
    }

    pub fn edge_detect(&self) -> Result<Self> {
        self.apply_filter(Filter::EdgeDetect)
    }

    pub fn mean_removal(&self) -> Result<Self> {
        self.apply_filter(Filter::MeanRemoval)
    }

    /// Tint by per-channel amounts. `alpha` runs 0 (opaque) to 127
    /// (fully transparent).
    pub fn colorize(&self, red: i32, green: i32, blue: i32, alpha: i32) -> Result<Self> {
        self.apply_filter(Filter::Colorize {
            red,
            green,
            blue,
            alpha,
        })
    }

    /// Copy into a fresh full-size RGBA buffer, then run `filter` on the copy.
    pub fn apply_filter(&self, filter: Filter) -> Result<Self> {
        let mut buffer = allocate(self.width, self.height)?;
        buffer
            .copy_from(&self.pixels.to_rgba8(), 0, 0)
            .map_err(|e| ImageError::filter(FilterStage::Copy, e.to_string()))?;
        filter
            .apply(&mut buffer)
            .map_err(|reason| ImageError::filter(FilterStage::Apply, reason))?;

        log::debug!("Applied {} filter", filter.name());
        Self::from_dynamic(DynamicImage::ImageRgba8(buffer))
    }

    pub fn save(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
        self.save_with(&CodecRegistry::standard(), path, options)
    }

    /// Encode fully in memory, then write. Nothing touches `path` unless
    /// encoding succeeded.
    pub fn save_with(
        &self,
        registry: &CodecRegistry,
        path: impl AsRef<Path>,
        options: &SaveOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        let bytes = registry.encode(options.format, &self.pixels, options.quality)?;
        write_file(path, &bytes)?;

        log::debug!(
            "Saved {} ({}, {} bytes)",
            path.display(),
            options.format,
            bytes.len()
        );
        Ok(())
    }
}

/// Truncated `side * aspect`, or `None` when it does not fit a `u32`.
fn scaled_side(side: u32, aspect: f64) -> Option<u32> {
    let scaled = (f64::from(side) * aspect).trunc();
    (scaled <= f64::from(u32::MAX)).then_some(scaled as u32)
}

/// Byte length of an RGBA8 buffer, or `None` on overflow.
fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
}

fn check_target(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 || rgba_len(width, height).is_none() {
        return Err(ImageError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn allocate(width: u32, height: u32) -> Result<RgbaImage> {
    let len = rgba_len(width, height).ok_or_else(|| {
        ImageError::filter(
            FilterStage::Allocate,
            format!("{}x{} buffer overflows", width, height),
        )
    })?;
    RgbaImage::from_raw(width, height, vec![0; len]).ok_or_else(|| {
        ImageError::filter(
            FilterStage::Allocate,
            format!("cannot create {}x{} buffer", width, height),
        )
    })
}
