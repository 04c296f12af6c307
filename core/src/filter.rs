use image::imageops;
use image::{Rgba, RgbaImage};
use imageproc::filter::filter3x3;

use crate::codec::gd::{from_gd_alpha, to_gd_alpha, GD_ALPHA_MAX};

/// In-place pixel filter, following libgd's `imagefilter` kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    Grayscale,
    Emboss,
    Negate,
    EdgeDetect,
    MeanRemoval,
    /// Channel offsets; `alpha` is in GD units (0 opaque .. 127 transparent).
    Colorize {
        red: i32,
        green: i32,
        blue: i32,
        alpha: i32,
    },
}

/// 3x3 convolution with a divisor and an offset added after division.
/// `weights` are row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    pub weights: [f32; 9],
    pub divisor: f32,
    pub offset: f32,
}

pub const EMBOSS: Kernel = Kernel {
    weights: [1.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.5],
    divisor: 1.0,
    offset: 127.0,
};

pub const EDGE_DETECT: Kernel = Kernel {
    weights: [-1.0, 0.0, -1.0, 0.0, 4.0, 0.0, -1.0, 0.0, -1.0],
    divisor: 1.0,
    offset: 127.0,
};

pub const MEAN_REMOVAL: Kernel = Kernel {
    weights: [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0],
    divisor: 1.0,
    offset: 0.0,
};

impl Filter {
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Grayscale => "grayscale",
            Filter::Emboss => "emboss",
            Filter::Negate => "negate",
            Filter::EdgeDetect => "edge-detect",
            Filter::MeanRemoval => "mean-removal",
            Filter::Colorize { .. } => "colorize",
        }
    }

    /// Apply the filter to `img` in place.
    pub fn apply(&self, img: &mut RgbaImage) -> Result<(), String> {
        match *self {
            Filter::Grayscale => {
                grayscale(img);
                Ok(())
            }
            Filter::Negate => {
                imageops::invert(img);
                Ok(())
            }
            Filter::Emboss => convolve(img, &EMBOSS),
            Filter::EdgeDetect => convolve(img, &EDGE_DETECT),
            Filter::MeanRemoval => convolve(img, &MEAN_REMOVAL),
            Filter::Colorize {
                red,
                green,
                blue,
                alpha,
            } => {
                colorize(img, red, green, blue, alpha);
                Ok(())
            }
        }
    }
}

fn grayscale(img: &mut RgbaImage) {
    for pixel in img.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let luma = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) as u8;
        *pixel = Rgba([luma, luma, luma, a]);
    }
}

fn colorize(img: &mut RgbaImage, red: i32, green: i32, blue: i32, alpha: i32) {
    let shift = |channel: u8, by: i32| (channel as i32 + by).clamp(0, 255) as u8;
    for pixel in img.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let gd_alpha = (to_gd_alpha(a) as i32 + alpha).clamp(0, GD_ALPHA_MAX as i32) as u8;
        *pixel = Rgba([
            shift(r, red),
            shift(g, green),
            shift(b, blue),
            from_gd_alpha(gd_alpha),
        ]);
    }
}

/// Samples outside the image clamp to the nearest edge pixel. Alpha is
/// kept from the source pixel.
pub fn convolve(img: &mut RgbaImage, kernel: &Kernel) -> Result<(), String> {
    if kernel.divisor == 0.0 {
        return Err("convolution divisor is zero".into());
    }

    let sums = filter3x3::<_, f32, f32>(&*img, &kernel.weights);
    let out = |v: f32| (v / kernel.divisor + kernel.offset).clamp(0.0, 255.0) as u8;
    for (pixel, sum) in img.pixels_mut().zip(sums.pixels()) {
        let alpha = pixel[3];
        *pixel = Rgba([out(sum[0]), out(sum[1]), out(sum[2]), alpha]);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(4, 3, Rgba(color))
    }

    #[test]
    fn test_grayscale_uses_luma_weights() {
        let mut img = flat([255, 0, 0, 200]);
        Filter::Grayscale.apply(&mut img).unwrap();
        assert_eq!(*img.get_pixel(1, 1), Rgba([76, 76, 76, 200]));
    }

    #[test]
    fn test_negate_keeps_alpha() {
        let mut img = flat([10, 200, 255, 17]);
        Filter::Negate.apply(&mut img).unwrap();
        assert_eq!(*img.get_pixel(0, 0), Rgba([245, 55, 0, 17]));
    }

    #[test]
    fn test_flat_image_emboss_is_offset_gray() {
        let mut img = flat([90, 90, 90, 255]);
        Filter::Emboss.apply(&mut img).unwrap();
        assert_eq!(*img.get_pixel(2, 1), Rgba([127, 127, 127, 255]));
    }

    #[test]
    fn test_flat_image_edge_detect_is_offset_gray() {
        let mut img = flat([30, 60, 90, 255]);
        Filter::EdgeDetect.apply(&mut img).unwrap();
        assert_eq!(*img.get_pixel(3, 2), Rgba([127, 127, 127, 255]));
    }

    fn spike(size: u32, at: (u32, u32), value: u8) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 255]));
        img.put_pixel(at.0, at.1, Rgba([value, value, value, 255]));
        img
    }

    #[test]
    fn test_emboss_weights_diagonal_neighbours() {
        let mut img = spike(5, (1, 1), 40);
        Filter::Emboss.apply(&mut img).unwrap();
        // spike is up-left of (2, 2): +1.5 * 40
        assert_eq!(*img.get_pixel(2, 2), Rgba([187, 187, 187, 255]));
        // spike is down-right of (0, 0): -1.5 * 40
        assert_eq!(*img.get_pixel(0, 0), Rgba([67, 67, 67, 255]));
        assert_eq!(*img.get_pixel(1, 1), Rgba([127, 127, 127, 255]));
        assert_eq!(*img.get_pixel(2, 1), Rgba([127, 127, 127, 255]));
    }

    #[test]
    fn test_edge_detect_weights_center_and_diagonals() {
        let mut img = spike(5, (2, 2), 20);
        Filter::EdgeDetect.apply(&mut img).unwrap();
        assert_eq!(*img.get_pixel(2, 2), Rgba([207, 207, 207, 255]));
        for (x, y) in [(1, 1), (3, 1), (1, 3), (3, 3)] {
            assert_eq!(*img.get_pixel(x, y), Rgba([107, 107, 107, 255]));
        }
        for (x, y) in [(2, 1), (1, 2), (3, 2), (2, 3)] {
            assert_eq!(*img.get_pixel(x, y), Rgba([127, 127, 127, 255]));
        }
    }

    #[test]
    fn test_convolve_keeps_source_alpha() {
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([50, 50, 50, 255]));
        img.put_pixel(1, 1, Rgba([50, 50, 50, 9]));
        Filter::Emboss.apply(&mut img).unwrap();
        assert_eq!(img.get_pixel(1, 1)[3], 9);
        assert_eq!(img.get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn test_mean_removal_keeps_flat_image() {
        let mut img = flat([30, 60, 90, 255]);
        Filter::MeanRemoval.apply(&mut img).unwrap();
        assert_eq!(img, flat([30, 60, 90, 255]));
    }

    #[test]
    fn test_mean_removal_sharpens_spike() {
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([10, 10, 10, 255]));
        img.put_pixel(1, 1, Rgba([50, 50, 50, 255]));
        Filter::MeanRemoval.apply(&mut img).unwrap();
        // 9 * 50 - 8 * 10
        assert_eq!(*img.get_pixel(1, 1), Rgba([255, 255, 255, 255]));
        // corner: 9*10 - (7*10 + 50) = -30
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_colorize_clamps_channels() {
        let mut img = flat([250, 5, 100, 255]);
        Filter::Colorize {
            red: 20,
            green: -20,
            blue: 50,
            alpha: 0,
        }
        .apply(&mut img)
        .unwrap();
        assert_eq!(*img.get_pixel(0, 0), Rgba([255, 0, 150, 255]));
    }

    #[test]
    fn test_colorize_full_alpha_is_transparent() {
        let mut img = flat([1, 2, 3, 255]);
        Filter::Colorize {
            red: 0,
            green: 0,
            blue: 0,
            alpha: 127,
        }
        .apply(&mut img)
        .unwrap();
        assert_eq!(img.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_zero_divisor_is_rejected() {
        let mut img = flat([1, 2, 3, 255]);
        let kernel = Kernel {
            divisor: 0.0,
            ..MEAN_REMOVAL
        };
        assert!(convolve(&mut img, &kernel).is_err());
    }
}
