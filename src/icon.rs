//! Bitmap and geometry types shared by the compositor.
//!
//! All geometry in the compositor is expressed in logical units and turned
//! into pixels by multiplying with the bitmap's scale factor, the same way a
//! 512pt canvas rendered at @2x becomes a 1024px image.

use image::RgbaImage;

/// A rectangle in pixel coordinates.
///
/// The origin may be negative: an aspect-filled foreground can overhang its
/// box, and compositing clips whatever falls outside the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    /// X offset from the left edge of the canvas
    pub x: i32,
    /// Y offset from the top edge of the canvas
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle of the given size centred on `(cx, cy)`.
    pub fn centered_at(cx: f32, cy: f32, width: u32, height: u32) -> Self {
        Self {
            x: (cx - width as f32 / 2.0).round() as i32,
            y: (cy - height as f32 / 2.0).round() as i32,
            width,
            height,
        }
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Returns the centre point.
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rendered bitmap together with its display scale.
///
/// The composite is a 512x512 logical image at scale 2.0, so its pixel data
/// is 1024x1024. Pixels are straight (non-premultiplied) RGBA.
#[derive(Debug, Clone, PartialEq)]
pub struct IconImage {
    /// The image data in RGBA format.
    pub data: RgbaImage,

    /// The display scale factor.
    ///
    /// - 1.0 for standard resolution (@1x)
    /// - 2.0 for retina/HiDPI (@2x)
    ///
    /// The "logical" size of the icon is `dimensions / scale`.
    pub scale: f32,
}

impl IconImage {
    pub fn new(data: RgbaImage, scale: f32) -> Self {
        Self { data, scale }
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Returns the logical size of the icon (dimensions / scale).
    ///
    /// For a 1024x1024 @2x icon, the logical size is 512x512.
    pub fn logical_size(&self) -> (f32, f32) {
        (
            self.data.width() as f32 / self.scale,
            self.data.height() as f32 / self.scale,
        )
    }
}
