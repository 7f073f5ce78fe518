//! Rendering stages used by the compositor.
//!
//! - [`svg`]: rasterising vector assets and source-over blending
//! - [`glyph`]: resolving symbol names to SVG glyphs
//! - [`mask`]: luminance-to-alpha masks and template-mode tinting
//! - [`bevel`]: inner shadow and drop highlight

pub mod bevel;
pub mod glyph;
pub mod mask;
pub mod svg;

pub use bevel::{BevelStyle, BeveledSprite, Shadow};
pub use glyph::{DEFAULT_SYMBOL_NAME, GlyphLibrary};
