//! Bevel styling: an inner shadow plus a soft drop highlight.
//!
//! Both effects are derived from the foreground's alpha channel only, so the
//! same styling works for a tinted glyph and for a luminance mask.

use image::imageops;
use image::{GrayImage, Luma, Rgba, RgbaImage};
use palette::Srgb;

use super::svg::composite_over;

/// A blurred, offset copy of a shape's alpha.
///
/// `radius` and `offset_y` are in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Srgb<u8>,
    pub opacity: f32,
    pub radius: f32,
    pub offset_y: f32,
}

impl Shadow {
    fn sigma(&self, scale: f32) -> f32 {
        (self.radius * scale).max(0.1)
    }

    fn offset_px(&self, scale: f32) -> i32 {
        (self.offset_y * scale).round() as i32
    }

    /// Pixels of padding needed so the blurred, offset shadow isn't clipped.
    fn reach(&self, scale: f32) -> u32 {
        (self.sigma(scale) * 3.0).ceil() as u32 + self.offset_px(scale).unsigned_abs()
    }
}

/// Inner shadow and drop highlight applied to template-mode foregrounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BevelStyle {
    /// Darkens the top inside edge of the shape.
    pub inner_shadow: Shadow,
    /// Lightens just below the shape.
    pub drop_highlight: Shadow,
}

impl Default for BevelStyle {
    fn default() -> Self {
        Self {
            inner_shadow: Shadow {
                color: Srgb::new(0, 0, 0),
                opacity: 0.1,
                radius: 0.5,
                offset_y: 0.5,
            },
            drop_highlight: Shadow {
                color: Srgb::new(255, 255, 255),
                opacity: 0.4,
                radius: 1.0,
                offset_y: 1.0,
            },
        }
    }
}

/// A foreground sprite after bevel styling.
///
/// The image is larger than its input by `padding` on every side so the
/// highlight has room to spread.
#[derive(Debug, Clone, PartialEq)]
pub struct BeveledSprite {
    pub image: RgbaImage,
    pub padding: u32,
}

impl BevelStyle {
    /// Pixels the bevel adds on each side of a sprite at `scale`.
    pub fn padding(&self, scale: f32) -> u32 {
        self.inner_shadow.reach(scale).max(self.drop_highlight.reach(scale)) + 1
    }

    /// Applies the bevel to `sprite`, rendered at `scale` pixels per logical unit.
    pub fn apply(&self, sprite: &RgbaImage, scale: f32) -> BeveledSprite {
        let padding = self.padding(scale);
        let width = sprite.width() + padding * 2;
        let height = sprite.height() + padding * 2;

        let mut padded = RgbaImage::new(width, height);
        imageops::replace(&mut padded, sprite, padding as i64, padding as i64);

        let alpha = GrayImage::from_fn(width, height, |x, y| Luma([padded.get_pixel(x, y)[3]]));

        // Drop highlight sits underneath the shape.
        let drop = &self.drop_highlight;
        let spread = imageops::blur(&shift_down(&alpha, drop.offset_px(scale), 0), drop.sigma(scale));
        let mut out = shadow_layer(&spread, drop, |_, _| 1.0);

        composite_over(&mut out, &padded, 0, 0);

        // Inner shadow is cast by the area outside the shape, clipped to it.
        let inner = &self.inner_shadow;
        let outside = GrayImage::from_fn(width, height, |x, y| Luma([255 - alpha.get_pixel(x, y)[0]]));
        let cast = imageops::blur(&shift_down(&outside, inner.offset_px(scale), 255), inner.sigma(scale));
        let clip = |x: u32, y: u32| alpha.get_pixel(x, y)[0] as f32 / 255.0;
        let inner_layer = shadow_layer(&cast, inner, clip);

        composite_over(&mut out, &inner_layer, 0, 0);

        BeveledSprite { image: out, padding }
    }
}

/// Builds a solid-colour layer whose alpha is `coverage * opacity * clip(x, y)`.
fn shadow_layer(coverage: &GrayImage, shadow: &Shadow, clip: impl Fn(u32, u32) -> f32) -> RgbaImage {
    let (red, green, blue) = shadow.color.into_components();
    RgbaImage::from_fn(coverage.width(), coverage.height(), |x, y| {
        let c = coverage.get_pixel(x, y)[0] as f32 / 255.0;
        let a = (c * shadow.opacity * clip(x, y) * 255.0).round() as u8;
        Rgba([red, green, blue, a])
    })
}

/// Moves every row down by `dy` pixels, filling the vacated rows with `fill`.
fn shift_down(plane: &GrayImage, dy: i32, fill: u8) -> GrayImage {
    let height = plane.height() as i32;
    GrayImage::from_fn(plane.width(), plane.height(), |x, y| {
        let sy = y as i32 - dy;
        if sy < 0 || sy >= height {
            Luma([fill])
        } else {
            *plane.get_pixel(x, sy as u32)
        }
    })
}
