//! The folder template the foreground is composited onto.
//!
//! The built-in template is a vector folder drawn on a 512x512 viewport. A
//! replacement can be loaded from an SVG or any raster format the `image`
//! crate decodes; either way it is stretched to the canvas.

use std::fmt;
use std::fs;
use std::path::Path;

use image::RgbaImage;
use image::imageops;
use resvg::tiny_skia::Transform;
use resvg::usvg::Tree;

use crate::error::RenderError;
use crate::icon::SizePx;
use crate::layer::svg::{draw_bitmap, intrinsic_size, parse_svg, render_tree};

const FOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="512" height="512" viewBox="0 0 512 512">
  <defs>
    <linearGradient id="back" x1="0" y1="0" x2="0" y2="1">
      <stop offset="0" stop-color="#5FAFEF"/>
      <stop offset="1" stop-color="#4A9FE6"/>
    </linearGradient>
    <linearGradient id="front" x1="0" y1="0" x2="0" y2="1">
      <stop offset="0" stop-color="#8DCDF8"/>
      <stop offset="1" stop-color="#70B9F2"/>
    </linearGradient>
  </defs>
  <path d="M40 94 Q40 70 64 70 H194 Q208 70 218 82 L234 102 H448 Q472 102 472 126 V412 Q472 436 448 436 H64 Q40 436 40 412 Z" fill="url(#back)"/>
  <path d="M40 150 Q40 126 64 126 H448 Q472 126 472 150 V412 Q472 436 448 436 H64 Q40 436 40 412 Z" fill="url(#front)"/>
  <path d="M64 126 H448 Q472 126 472 150 V152 Q472 130 448 130 H64 Q40 130 40 152 V150 Q40 126 64 126 Z" fill="#FFFFFF" fill-opacity="0.35"/>
</svg>"##;

enum Source {
    Vector(Tree),
    Raster(RgbaImage),
}

/// A folder-shaped background image.
pub struct FolderTemplate {
    source: Source,
}

impl fmt::Debug for FolderTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.source {
            Source::Vector(tree) => {
                let (w, h) = intrinsic_size(tree);
                format!("Vector({w}x{h})")
            }
            Source::Raster(img) => format!("Raster({}x{})", img.width(), img.height()),
        };
        f.debug_struct("FolderTemplate").field("source", &kind).finish()
    }
}

impl FolderTemplate {
    /// The built-in folder template.
    pub fn builtin() -> Result<Self, RenderError> {
        Self::from_svg(FOLDER_SVG)
    }

    /// A template from SVG markup.
    pub fn from_svg(svg: &str) -> Result<Self, RenderError> {
        Ok(Self {
            source: Source::Vector(parse_svg(svg)?),
        })
    }

    /// A template from an already decoded bitmap.
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            source: Source::Raster(image),
        }
    }

    /// Loads a template file. `.svg` files are parsed as vectors, everything
    /// else is decoded as a bitmap.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

        let io_err = |source: std::io::Error| RenderError::TemplateIo {
            path: path.to_path_buf(),
            source,
        };

        if is_svg {
            let svg = fs::read_to_string(path).map_err(io_err)?;
            Self::from_svg(&svg)
        } else {
            let bytes = fs::read(path).map_err(io_err)?;
            let image = image::load_from_memory(&bytes)
                .map_err(|e| io_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?
                .to_rgba8();
            Ok(Self::from_image(image))
        }
    }

    /// Renders the template stretched to `size` pixels.
    pub fn render(&self, size: SizePx) -> Result<RgbaImage, RenderError> {
        let canvas_err = || RenderError::Canvas {
            width: size.width,
            height: size.height,
        };
        if size.is_empty() {
            return Err(canvas_err());
        }

        match &self.source {
            Source::Vector(tree) => {
                let (w, h) = intrinsic_size(tree);
                let img = render_tree(tree, size.width as f32 / w, size.height as f32 / h)
                    .ok_or_else(canvas_err)?;
                // ceil() in render_tree can add a pixel on fractional scales
                if img.dimensions() == (size.width, size.height) {
                    Ok(img)
                } else {
                    Ok(imageops::crop_imm(&img, 0, 0, size.width, size.height).to_image())
                }
            }
            Source::Raster(img) if img.dimensions() == (size.width, size.height) => {
                Ok(img.clone())
            }
            Source::Raster(img) => {
                let scale = Transform::from_scale(
                    size.width as f32 / img.width() as f32,
                    size.height as f32 / img.height() as f32,
                );
                draw_bitmap(img, scale, size.width, size.height).ok_or_else(canvas_err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn builtin_renders_at_2x() {
        let template = FolderTemplate::builtin().unwrap();
        let img = template.render(SizePx::new(1024, 1024)).unwrap();
        assert_eq!(img.dimensions(), (1024, 1024));

        // Corners are transparent, the folder body is opaque.
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(512, 562)[3], 255);
    }

    #[test]
    fn empty_size_is_render_error() {
        let template = FolderTemplate::builtin().unwrap();
        assert!(matches!(
            template.render(SizePx::new(0, 1024)),
            Err(RenderError::Canvas { width: 0, .. })
        ));
    }

    #[test]
    fn invalid_svg_is_template_error() {
        assert!(matches!(
            FolderTemplate::from_svg("<nope"),
            Err(RenderError::Template(_))
        ));
    }

    #[test]
    fn raster_template_is_resized() {
        let template = FolderTemplate::from_image(RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])));
        let img = template.render(SizePx::new(16, 16)).unwrap();
        assert_eq!(img.dimensions(), (16, 16));
        let p = img.get_pixel(8, 8).0;
        assert!(p[0].abs_diff(9) <= 1 && p[3] >= 254, "got {p:?}");
    }

    #[test]
    fn from_file_reads_svg_and_png() {
        let dir = tempfile::tempdir().unwrap();

        let svg_path = dir.path().join("folder.svg");
        std::fs::write(&svg_path, FOLDER_SVG).unwrap();
        assert!(FolderTemplate::from_file(&svg_path).is_ok());

        let png_path = dir.path().join("folder.png");
        RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]))
            .save(&png_path)
            .unwrap();
        let template = FolderTemplate::from_file(&png_path).unwrap();
        assert_eq!(template.render(SizePx::new(8, 8)).unwrap().get_pixel(0, 0).0, [1, 2, 3, 255]);

        assert!(matches!(
            FolderTemplate::from_file(dir.path().join("missing.png")),
            Err(RenderError::TemplateIo { .. })
        ));
    }
}
