//! Template-mode masks: luminance-to-alpha conversion and tinting.

use image::{Rgba, RgbaImage};
use palette::{LinSrgb, Srgb};

/// Rec. 709 luminance weights applied to linear sRGB.
const LUMA_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Converts a bitmap into a monochrome alpha mask.
///
/// Each pixel is composited over white and inverted, and its perceptual
/// luminance becomes the mask alpha. The colour channels are cleared.
/// White or transparent regions end up transparent, dark ink ends up opaque,
/// and saturated colours land in between.
pub fn luminance_to_alpha(image: &RgbaImage) -> RgbaImage {
    let linear = srgb_to_linear_table();
    let mut mask = RgbaImage::new(image.width(), image.height());

    for (dst, src) in mask.pixels_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        let alpha = a as f32 / 255.0;

        let inverted = |c: u8| -> usize {
            let over_white = c as f32 * alpha + 255.0 * (1.0 - alpha);
            255 - over_white.round().clamp(0.0, 255.0) as usize
        };

        let y = LUMA_WEIGHTS[0] * linear[inverted(r)]
            + LUMA_WEIGHTS[1] * linear[inverted(g)]
            + LUMA_WEIGHTS[2] * linear[inverted(b)];

        let encoded: Srgb<f32> = Srgb::from_linear(LinSrgb::new(y, y, y));
        let luma = (encoded.red.clamp(0.0, 1.0) * 255.0).round() as u8;

        *dst = Rgba([0, 0, 0, luma]);
    }

    mask
}

/// Recolours every pixel with `color`, keeping only the source alpha.
pub fn tint(image: &RgbaImage, color: Srgb<u8>) -> RgbaImage {
    let mut tinted = image.clone();
    for pixel in tinted.pixels_mut() {
        pixel.0 = [color.red, color.green, color.blue, pixel[3]];
    }
    tinted
}

fn srgb_to_linear_table() -> [f32; 256] {
    let mut table = [0.0; 256];
    for (i, slot) in table.iter_mut().enumerate() {
        let v = i as f32 / 255.0;
        let lin: LinSrgb<f32> = Srgb::new(v, v, v).into_linear();
        *slot = lin.red;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_of(pixel: [u8; 4]) -> u8 {
        let img = RgbaImage::from_pixel(1, 1, Rgba(pixel));
        luminance_to_alpha(&img).get_pixel(0, 0)[3]
    }

    #[test]
    fn black_becomes_opaque() {
        assert_eq!(alpha_of([0, 0, 0, 255]), 255);
    }

    #[test]
    fn white_and_transparent_become_clear() {
        assert_eq!(alpha_of([255, 255, 255, 255]), 0);
        assert_eq!(alpha_of([12, 200, 40, 0]), 0);
    }

    #[test]
    fn red_is_partially_opaque() {
        let a = alpha_of([255, 0, 0, 255]);
        assert!(a > 128 && a < 255, "red should map to a partial alpha, got {a}");
    }

    #[test]
    fn half_transparent_black_is_dimmer() {
        assert!(alpha_of([0, 0, 0, 128]) < alpha_of([0, 0, 0, 255]));
    }

    #[test]
    fn mask_discards_colour() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([200, 30, 90, 255]));
        let mask = luminance_to_alpha(&img);
        assert_eq!(mask.dimensions(), (3, 2));
        assert!(mask.pixels().all(|p| p[0] == 0 && p[1] == 0 && p[2] == 0));
    }

    #[test]
    fn tint_keeps_alpha() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 77]));
        let tinted = tint(&img, Srgb::new(10, 20, 30));
        assert_eq!(tinted.get_pixel(1, 1).0, [10, 20, 30, 77]);
    }
}
