//! The icon compositor: folder template + one foreground = one bitmap.
//!
//! [`Compositor::composite`] is a pure function of its template, glyph
//! library, layout and the [`Foreground`] passed in. Calling it twice with the
//! same inputs yields pixel-identical output.
//!
//! # Pipeline
//!
//! 1. Render the template at `canvas * scale` pixels (1024x1024 by default).
//! 2. Rasterise the foreground so it *fills* the foreground box, then shrink
//!    it to 85%.
//!     - Symbol: glyph SVG, tinted with the folder accent, bevelled.
//!     - Bitmap with luminance-to-alpha: converted to a mask, tinted, bevelled.
//!     - Bitmap without: drawn as-is.
//! 3. Centre the foreground horizontally and on the box centre, which sits a
//!    fixed distance below the canvas centre, and blend it over the template.
//!
//! Only the part of a filled foreground that lands on the canvas (plus the
//! reach of the bevel) is ever rasterised, so a very thin source costs no
//! more than a square one.
//!
//! # Example
//!
//! ```
//! use folder_icon_generator::{Compositor, Foreground};
//!
//! let compositor = Compositor::new().unwrap();
//! let icon = compositor.composite(&Foreground::Symbol("star.fill")).unwrap();
//!
//! assert_eq!(icon.data.dimensions(), (1024, 1024));
//! assert_eq!(icon.scale, 2.0);
//! ```

use image::RgbaImage;
use log::{debug, warn};
use palette::Srgb;
use resvg::tiny_skia::Transform;

use crate::error::RenderError;
use crate::icon::{IconImage, RectPx, SizePx};
use crate::layer::bevel::BevelStyle;
use crate::layer::glyph::GlyphLibrary;
use crate::layer::mask::{luminance_to_alpha, tint};
use crate::layer::svg::{composite_over, draw_bitmap, intrinsic_size, parse_svg, render_tree_into};
use crate::template::FolderTemplate;

/// Colour glyphs and luminance masks are tinted with.
pub const FOLDER_ACCENT: Srgb<u8> = Srgb::new(0x4C, 0x9D, 0xE3);

// ============================================================================
// Foreground
// ============================================================================

/// What gets drawn on top of the folder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Foreground<'a> {
    /// A named glyph, drawn in template mode.
    Symbol(&'a str),

    /// A user-supplied bitmap.
    Bitmap {
        image: &'a RgbaImage,
        /// Convert to a luminance mask and draw in template mode.
        luminance_to_alpha: bool,
    },

    /// Template only.
    None,
}

impl<'a> Foreground<'a> {
    /// Picks the foreground for the current state: a custom icon, when
    /// present, wins over the symbol name.
    pub fn select(
        symbol_name: &'a str,
        custom_icon: Option<&'a RgbaImage>,
        luminance_to_alpha: bool,
    ) -> Self {
        match custom_icon {
            Some(image) => Self::Bitmap {
                image,
                luminance_to_alpha,
            },
            None => Self::Symbol(symbol_name),
        }
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Canvas geometry, in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Width and height of the square canvas.
    pub canvas: f32,
    /// Pixels per logical unit.
    pub scale: f32,
    /// Side of the square box the foreground fills.
    pub box_size: f32,
    /// How far below the canvas centre the box centre sits.
    pub offset_y: f32,
    /// Uniform shrink applied after filling the box.
    pub foreground_scale: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            canvas: 512.0,
            scale: 2.0,
            box_size: 180.0,
            offset_y: 25.0,
            foreground_scale: 0.85,
        }
    }
}

impl Layout {
    /// Output size in pixels.
    pub fn pixel_size(&self) -> SizePx {
        let side = (self.canvas * self.scale).round().max(0.0) as u32;
        SizePx::new(side, side)
    }

    /// Centre of the foreground box in pixels.
    pub fn box_center(&self) -> (f32, f32) {
        let half = self.canvas / 2.0;
        (half * self.scale, (half + self.offset_y) * self.scale)
    }

    /// Scale factor that makes content of `width x height` fill the box
    /// (preserving aspect ratio) and then shrinks it.
    pub fn fill_scale(&self, width: f32, height: f32) -> f32 {
        let short = width.min(height);
        if short <= 0.0 {
            return 0.0;
        }
        self.box_size * self.scale / short * self.foreground_scale
    }

    /// Where content of the given pixel size lands on the canvas.
    pub fn place(&self, width: u32, height: u32) -> RectPx {
        let (cx, cy) = self.box_center();
        RectPx::centered_at(cx, cy, width, height)
    }

    /// The part of `rect` within `margin` pixels of the canvas, or `None` if
    /// it can't affect the output.
    pub fn visible(&self, rect: RectPx, margin: u32) -> Option<RectPx> {
        let side = i64::from(self.pixel_size().width);
        let margin = i64::from(margin);
        let left = i64::from(rect.x).max(-margin);
        let top = i64::from(rect.y).max(-margin);
        let right = (i64::from(rect.x) + i64::from(rect.width)).min(side + margin);
        let bottom = (i64::from(rect.y) + i64::from(rect.height)).min(side + margin);
        if right <= left || bottom <= top {
            return None;
        }
        Some(RectPx::new(
            left as i32,
            top as i32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

// ============================================================================
// Compositor
// ============================================================================

/// A rasterised foreground and its position on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSprite {
    pub image: RgbaImage,
    pub rect: RectPx,
}

/// Renders folder icons.
#[derive(Debug)]
pub struct Compositor {
    template: FolderTemplate,
    glyphs: GlyphLibrary,
    layout: Layout,
    accent: Srgb<u8>,
    bevel: BevelStyle,
}

impl Compositor {
    /// A compositor with the built-in template and glyphs.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Self::with_template(FolderTemplate::builtin()?))
    }

    /// A compositor with a custom template.
    pub fn with_template(template: FolderTemplate) -> Self {
        Self {
            template,
            glyphs: GlyphLibrary::new(),
            layout: Layout::default(),
            accent: FOLDER_ACCENT,
            bevel: BevelStyle::default(),
        }
    }

    /// Replaces the glyph library.
    pub fn with_glyphs(mut self, glyphs: GlyphLibrary) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Replaces the layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn glyphs(&self) -> &GlyphLibrary {
        &self.glyphs
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Renders the template with `foreground` on top.
    pub fn composite(&self, foreground: &Foreground) -> Result<IconImage, RenderError> {
        let size = self.layout.pixel_size();
        let mut canvas = self.template.render(size)?;

        if let Some(sprite) = self.foreground_sprite(foreground) {
            composite_over(&mut canvas, &sprite.image, sprite.rect.x, sprite.rect.y);
        }

        Ok(IconImage::new(canvas, self.layout.scale))
    }

    /// Rasterises and positions the foreground without drawing it.
    ///
    /// The sprite covers only the visible part of the filled foreground.
    /// Returns `None` when there is nothing to draw: no foreground, an
    /// unknown or unparsable symbol, or an empty bitmap.
    pub fn foreground_sprite(&self, foreground: &Foreground) -> Option<PlacedSprite> {
        let margin = self.bevel.padding(self.layout.scale);
        match *foreground {
            Foreground::None => None,
            Foreground::Symbol(name) => {
                let glyph = self.render_symbol(name, margin)?;
                Some(self.bevelled(glyph))
            }
            Foreground::Bitmap {
                image,
                luminance_to_alpha: true,
            } => {
                let mask = self.fill_box(&luminance_to_alpha(image), margin)?;
                Some(self.bevelled(mask))
            }
            Foreground::Bitmap {
                image,
                luminance_to_alpha: false,
            } => self.fill_box(image, 0),
        }
    }

    /// Fills the box with content of `width x height`. Returns the visible
    /// window of the placement and the transform that maps content
    /// coordinates into that window.
    fn fit(&self, width: f32, height: f32, margin: u32) -> Option<(RectPx, Transform)> {
        let s = self.layout.fill_scale(width, height);
        let placed = self.layout.place(
            (width * s).round() as u32,
            (height * s).round() as u32,
        );
        if placed.width == 0 || placed.height == 0 {
            return None;
        }
        let window = self.layout.visible(placed, margin)?;
        let transform = Transform::from_row(
            placed.width as f32 / width,
            0.0,
            0.0,
            placed.height as f32 / height,
            (i64::from(placed.x) - i64::from(window.x)) as f32,
            (i64::from(placed.y) - i64::from(window.y)) as f32,
        );
        Some((window, transform))
    }

    fn render_symbol(&self, name: &str, margin: u32) -> Option<PlacedSprite> {
        let Some(svg) = self.glyphs.resolve(name) else {
            debug!("no glyph named {name:?}; rendering template only");
            return None;
        };
        let tree = match parse_svg(svg) {
            Ok(tree) => tree,
            Err(e) => {
                warn!("glyph {name:?} is not valid SVG: {e}");
                return None;
            }
        };
        let (w, h) = intrinsic_size(&tree);
        let (rect, transform) = self.fit(w, h, margin)?;
        let image = render_tree_into(&tree, transform, rect.width, rect.height)?;
        Some(PlacedSprite { image, rect })
    }

    fn fill_box(&self, image: &RgbaImage, margin: u32) -> Option<PlacedSprite> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return None;
        }
        let (rect, transform) = self.fit(w as f32, h as f32, margin)?;
        let image = draw_bitmap(image, transform, rect.width, rect.height)?;
        Some(PlacedSprite { image, rect })
    }

    /// Tints a template-mode sprite and applies the bevel around it.
    fn bevelled(&self, sprite: PlacedSprite) -> PlacedSprite {
        let tinted = tint(&sprite.image, self.accent);
        let beveled = self.bevel.apply(&tinted, self.layout.scale);
        let pad = beveled.padding;
        PlacedSprite {
            rect: RectPx::new(
                sprite.rect.x - pad as i32,
                sprite.rect.y - pad as i32,
                sprite.rect.width + 2 * pad,
                sprite.rect.height + 2 * pad,
            ),
            image: beveled.image,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const ACCENT: [u8; 4] = [0x4C, 0x9D, 0xE3, 255];

    fn red_square() -> RgbaImage {
        RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255]))
    }

    fn assert_near(actual: [u8; 4], expected: [u8; 4]) {
        let close = actual.iter().zip(expected).all(|(a, e)| a.abs_diff(e) <= 1);
        assert!(close, "expected {expected:?}, got {actual:?}");
    }

    fn template_pixels() -> RgbaImage {
        FolderTemplate::builtin()
            .unwrap()
            .render(SizePx::new(1024, 1024))
            .unwrap()
    }

    #[test]
    fn layout_defaults() {
        let layout = Layout::default();
        assert_eq!(layout.pixel_size(), SizePx::new(1024, 1024));
        assert_eq!(layout.box_center(), (512.0, 562.0));
        // A square fills 180pt, shrinks to 153pt, doubled for @2x.
        assert!((layout.fill_scale(100.0, 100.0) * 100.0 - 306.0).abs() < 0.001);
        assert_eq!(layout.fill_scale(0.0, 10.0), 0.0);
    }

    #[test]
    fn select_prefers_custom_icon() {
        let img = red_square();
        assert_eq!(
            Foreground::select("star.fill", None, true),
            Foreground::Symbol("star.fill")
        );
        assert_eq!(
            Foreground::select("star.fill", Some(&img), false),
            Foreground::Bitmap {
                image: &img,
                luminance_to_alpha: false
            }
        );
    }

    #[test]
    fn symbol_output_is_deterministic() {
        let compositor = Compositor::new().unwrap();
        let a = compositor.composite(&Foreground::Symbol("heart.fill")).unwrap();
        let b = compositor.composite(&Foreground::Symbol("heart.fill")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn person_fill_is_tinted_and_centered() {
        let compositor = Compositor::new().unwrap();
        let icon = compositor.composite(&Foreground::Symbol("person.fill")).unwrap();
        let template = template_pixels();

        assert_eq!(icon.data.dimensions(), (1024, 1024));

        // Head centre: glyph (12, 7) on a 24-unit viewport filling 306px.
        assert_eq!(icon.data.get_pixel(512, 498).0, ACCENT);

        // Shoulders on both sides of the vertical axis.
        assert_eq!(icon.data.get_pixel(450, 650).0, ACCENT);
        assert_eq!(icon.data.get_pixel(574, 650).0, ACCENT);

        // Far from the glyph the template is untouched.
        assert_eq!(icon.data.get_pixel(100, 800), template.get_pixel(100, 800));
        assert_eq!(icon.data.get_pixel(0, 0), template.get_pixel(0, 0));
    }

    #[test]
    fn unknown_symbol_renders_template_only() {
        let compositor = Compositor::new().unwrap();
        let icon = compositor.composite(&Foreground::Symbol("not.a.symbol")).unwrap();
        assert_eq!(icon.data, template_pixels());

        let none = compositor.composite(&Foreground::None).unwrap();
        assert_eq!(none, icon);
    }

    #[test]
    fn invalid_custom_glyph_renders_template_only() {
        let mut glyphs = GlyphLibrary::new();
        glyphs.insert("broken", "<svg");
        let compositor = Compositor::new().unwrap().with_glyphs(glyphs);

        let icon = compositor.composite(&Foreground::Symbol("broken")).unwrap();
        assert_eq!(icon.data, template_pixels());
    }

    #[test]
    fn red_bitmap_with_luminance_becomes_tinted_silhouette() {
        let compositor = Compositor::new().unwrap();
        let img = red_square();
        let fg = Foreground::Bitmap {
            image: &img,
            luminance_to_alpha: true,
        };

        let sprite = compositor.foreground_sprite(&fg).unwrap();
        let (cx, cy) = (512 - sprite.rect.x, 562 - sprite.rect.y);
        let p = sprite.image.get_pixel(cx as u32, cy as u32);
        // The highlight underneath shows through a little, so only roughly the accent.
        assert!(p[0] < 128 && p[0] < p[2], "colour is replaced by the accent: {:?}", p.0);
        assert!(p[3] > 128 && p[3] < 255, "red maps to partial alpha, got {}", p[3]);

        let icon = compositor.composite(&fg).unwrap();
        let out = icon.data.get_pixel(512, 562);
        assert!(out[0] < out[2], "result should not stay red: {:?}", out.0);
        assert_ne!(out, template_pixels().get_pixel(512, 562));
    }

    #[test]
    fn red_bitmap_without_luminance_keeps_colour_and_placement() {
        let compositor = Compositor::new().unwrap();
        let img = red_square();
        let fg = Foreground::Bitmap {
            image: &img,
            luminance_to_alpha: false,
        };

        let sprite = compositor.foreground_sprite(&fg).unwrap();
        assert_eq!(sprite.rect, RectPx::new(359, 409, 306, 306));

        let icon = compositor.composite(&fg).unwrap();
        let template = template_pixels();
        assert_near(icon.data.get_pixel(512, 562).0, [255, 0, 0, 255]);
        assert_near(icon.data.get_pixel(360, 410).0, [255, 0, 0, 255]);
        assert_eq!(icon.data.get_pixel(356, 562), template.get_pixel(356, 562));
        // No bevel in raw mode.
        assert_eq!(icon.data.get_pixel(512, 717), template.get_pixel(512, 717));
    }

    #[test]
    fn wide_bitmap_fills_box_height() {
        let compositor = Compositor::new().unwrap();
        let img = RgbaImage::from_pixel(200, 100, Rgba([0, 255, 0, 255]));
        let fg = Foreground::Bitmap {
            image: &img,
            luminance_to_alpha: false,
        };

        let sprite = compositor.foreground_sprite(&fg).unwrap();
        assert_eq!(sprite.rect, RectPx::new(206, 409, 612, 306));
    }

    #[test]
    fn thin_bitmap_is_clipped_to_canvas() {
        let compositor = Compositor::new().unwrap();
        let pad = BevelStyle::default().padding(2.0);
        let img = RgbaImage::from_pixel(1, 4000, Rgba([0, 0, 0, 255]));

        let raw = Foreground::Bitmap {
            image: &img,
            luminance_to_alpha: false,
        };
        let sprite = compositor.foreground_sprite(&raw).unwrap();
        assert_eq!(sprite.rect, RectPx::new(359, 0, 306, 1024));
        assert_eq!(sprite.image.dimensions(), (306, 1024));

        let masked = Foreground::Bitmap {
            image: &img,
            luminance_to_alpha: true,
        };
        let sprite = compositor.foreground_sprite(&masked).unwrap();
        let (w, h) = sprite.image.dimensions();
        assert!(w <= 1024 + 4 * pad && h <= 1024 + 4 * pad, "sprite is {w}x{h}");
        assert_eq!((w, h), (sprite.rect.width, sprite.rect.height));

        // The strip still runs the full height of the canvas.
        let icon = compositor.composite(&raw).unwrap();
        assert_near(icon.data.get_pixel(512, 2).0, [0, 0, 0, 255]);
        assert_near(icon.data.get_pixel(512, 1021).0, [0, 0, 0, 255]);
        assert_eq!(icon.data.get_pixel(100, 800), template_pixels().get_pixel(100, 800));
    }

    #[test]
    fn transparent_edges_stay_clean_in_raw_mode() {
        let compositor = Compositor::new().unwrap();
        // Opaque white logo on a transparent black background.
        let img = RgbaImage::from_fn(10, 10, |x, _| {
            if x < 5 { Rgba([255, 255, 255, 255]) } else { Rgba([0, 0, 0, 0]) }
        });
        let fg = Foreground::Bitmap {
            image: &img,
            luminance_to_alpha: false,
        };

        let sprite = compositor.foreground_sprite(&fg).unwrap();
        let row = sprite.image.height() / 2;
        let partial: Vec<_> = (0..sprite.image.width())
            .map(|x| sprite.image.get_pixel(x, row).0)
            .filter(|p| p[3] > 0 && p[3] < 255)
            .collect();

        assert!(!partial.is_empty(), "the edge should be antialiased");
        for p in partial {
            assert!(p[0] >= 250 && p[1] >= 250 && p[2] >= 250, "dark fringe: {p:?}");
        }
    }

    #[test]
    fn visible_window_clips_to_canvas_and_margin() {
        let layout = Layout::default();
        let inside = RectPx::new(359, 409, 306, 306);
        assert_eq!(layout.visible(inside, 9), Some(inside));
        assert_eq!(
            layout.visible(RectPx::new(-50, -2000, 100, 5000), 9),
            Some(RectPx::new(-9, -9, 59, 1042))
        );
        assert_eq!(layout.visible(RectPx::new(2000, 0, 10, 10), 9), None);
    }

    #[test]
    fn toggling_luminance_keeps_canvas_and_template() {
        let compositor = Compositor::new().unwrap();
        let img = red_square();
        let on = compositor
            .composite(&Foreground::Bitmap {
                image: &img,
                luminance_to_alpha: true,
            })
            .unwrap();
        let off = compositor
            .composite(&Foreground::Bitmap {
                image: &img,
                luminance_to_alpha: false,
            })
            .unwrap();

        assert_eq!(on.data.dimensions(), (1024, 1024));
        assert_eq!(off.data.dimensions(), (1024, 1024));
        assert_ne!(on.data.get_pixel(512, 562), off.data.get_pixel(512, 562));

        let template = template_pixels();
        for (x, y) in [(0, 0), (100, 800), (900, 300), (60, 200)] {
            assert_eq!(on.data.get_pixel(x, y), template.get_pixel(x, y));
            assert_eq!(off.data.get_pixel(x, y), template.get_pixel(x, y));
        }
    }

    #[test]
    fn empty_bitmap_draws_nothing() {
        let compositor = Compositor::new().unwrap();
        let img = RgbaImage::new(0, 0);
        let fg = Foreground::Bitmap {
            image: &img,
            luminance_to_alpha: true,
        };
        assert!(compositor.foreground_sprite(&fg).is_none());
    }

    #[test]
    fn zero_scale_layout_is_render_error() {
        let layout = Layout {
            scale: 0.0,
            ..Layout::default()
        };
        let compositor = Compositor::new().unwrap().with_layout(layout);
        assert!(compositor.composite(&Foreground::None).is_err());
    }

    #[test]
    fn layout_scale_one_renders_512() {
        let layout = Layout {
            scale: 1.0,
            ..Layout::default()
        };
        let compositor = Compositor::new().unwrap().with_layout(layout);
        let icon = compositor.composite(&Foreground::Symbol("star.fill")).unwrap();
        assert_eq!(icon.data.dimensions(), (512, 512));
        assert_eq!(icon.logical_size(), (512.0, 512.0));
    }
}
