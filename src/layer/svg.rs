//! SVG rasterisation and pixel compositing using resvg/tiny-skia.
//!
//! Both the folder template and the named glyphs are vector assets; this
//! module turns them into straight-alpha [`RgbaImage`]s and provides the
//! source-over blend every other stage composites with.
//!
//! Bitmaps are scaled through the same tiny-skia pipeline, premultiplied, so
//! fully transparent pixels never bleed their colour into visible edges.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{ColorU8, FilterQuality, Pixmap, PixmapPaint, Transform};
use resvg::usvg::{self, Options, Tree};

// ============================================================================
// SVG Rendering
// ============================================================================

/// Parses SVG markup into a render tree.
pub fn parse_svg(svg_data: &str) -> Result<Tree, usvg::Error> {
    let opts = Options::default();
    Tree::from_str(svg_data, &opts)
}

/// Returns the intrinsic (viewport) size of a parsed SVG.
pub fn intrinsic_size(tree: &Tree) -> (f32, f32) {
    let size = tree.size();
    (size.width(), size.height())
}

/// Renders a parsed SVG, scaling its viewport by `scale_x` and `scale_y`.
///
/// The output is `ceil(width * scale_x) x ceil(height * scale_y)` pixels.
/// Returns `None` if that size is zero or too large to allocate.
pub fn render_tree(tree: &Tree, scale_x: f32, scale_y: f32) -> Option<RgbaImage> {
    let (w, h) = intrinsic_size(tree);
    let width = (w * scale_x).ceil() as u32;
    let height = (h * scale_y).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height)?;
    let transform = Transform::from_scale(scale_x, scale_y);
    resvg::render(tree, transform, &mut pixmap.as_mut());

    Some(pixmap_to_rgba_image(&pixmap))
}

/// Renders a parsed SVG with `transform` into a `width x height` image.
///
/// Anything the transform places outside the target is never rasterised.
pub fn render_tree_into(tree: &Tree, transform: Transform, width: u32, height: u32) -> Option<RgbaImage> {
    let mut pixmap = Pixmap::new(width, height)?;
    resvg::render(tree, transform, &mut pixmap.as_mut());
    Some(pixmap_to_rgba_image(&pixmap))
}

/// Draws `image` with `transform` into a transparent `width x height` image.
///
/// Filtering happens on premultiplied pixels; edges past the source are
/// padded, not faded.
pub fn draw_bitmap(image: &RgbaImage, transform: Transform, width: u32, height: u32) -> Option<RgbaImage> {
    let source = rgba_image_to_pixmap(image)?;
    let mut pixmap = Pixmap::new(width, height)?;
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    Some(pixmap_to_rgba_image(&pixmap))
}

fn rgba_image_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    // tiny_skia stores premultiplied alpha
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }

    img
}

// ============================================================================
// Compositing
// ============================================================================

/// Blends `src` over `dest` with its top-left corner at (`x`, `y`).
///
/// Parts of `src` outside `dest` are clipped, so sprites may hang off the
/// canvas edge.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let (dw, dh) = (dest.width() as i64, dest.height() as i64);

    for (sx, sy, px) in src.enumerate_pixels() {
        if px[3] == 0 {
            continue;
        }
        let (tx, ty) = (x as i64 + sx as i64, y as i64 + sy as i64);
        if !(0..dw).contains(&tx) || !(0..dh).contains(&ty) {
            continue;
        }
        let under = dest.get_pixel_mut(tx as u32, ty as u32);
        *under = alpha_blend(*px, *under);
    }
}

/// Porter-Duff source-over on straight (non-premultiplied) alpha pixels.
pub fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let src_a = f32::from(src[3]) / 255.0;
    let dst_a = f32::from(dst[3]) / 255.0 * (1.0 - src_a);
    let alpha = src_a + dst_a;
    if alpha <= 0.0 {
        return Rgba([0; 4]);
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let v = (f32::from(src[c]) * src_a + f32::from(dst[c]) * dst_a) / alpha;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (alpha * 255.0).round() as u8;
    Rgba(out)
}

// ============================================================================
// Tests
// ============================================================================
