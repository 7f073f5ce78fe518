//! Writing the composite somewhere the user can paste it from.
//!
//! The Finder's "Get Info" panel accepts a pasted image as a folder icon, so
//! the main destination is the system clipboard. A PNG file exporter covers
//! headless use.

use std::borrow::Cow;
use std::io::Cursor;
use std::path::PathBuf;

use arboard::{Clipboard, ImageData};
use image::{ImageFormat, RgbaImage};
use log::info;

use crate::error::ExportError;
use crate::icon::IconImage;

/// Receives a finished composite.
pub trait ClipboardExporter {
    fn export(&mut self, image: &IconImage) -> Result<(), ExportError>;
}

/// Encodes a composite as PNG, the lossless representation used for
/// clipboard and file exports.
pub fn encode_png(image: &IconImage) -> Result<Vec<u8>, ExportError> {
    let mut out = Cursor::new(Vec::new());
    image.data.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

// ============================================================================
// System clipboard
// ============================================================================

/// The OS clipboard.
///
/// On X11 and Wayland the contents belong to the process that set them and
/// vanish when it exits. A short-lived process should call
/// [`SystemClipboard::hold_until_replaced`], which makes each export block
/// until another application takes over the clipboard.
pub struct SystemClipboard {
    clipboard: Clipboard,
    hold: bool,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ExportError> {
        Ok(Self {
            clipboard: Clipboard::new()?,
            hold: false,
        })
    }

    /// Keeps serving the image after export until something else is copied.
    /// Only has an effect on Linux.
    pub fn hold_until_replaced(mut self, hold: bool) -> Self {
        self.hold = hold;
        self
    }
}

/// Whether an export has to block to keep the clipboard contents alive.
fn must_hold(hold: bool) -> bool {
    hold && cfg!(target_os = "linux")
}

#[cfg(target_os = "linux")]
fn set_and_hold(clipboard: &mut Clipboard, data: ImageData<'_>) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;
    clipboard.set().wait().image(data)
}

#[cfg(not(target_os = "linux"))]
fn set_and_hold(clipboard: &mut Clipboard, data: ImageData<'_>) -> Result<(), arboard::Error> {
    clipboard.set_image(data)
}

impl ClipboardExporter for SystemClipboard {
    fn export(&mut self, image: &IconImage) -> Result<(), ExportError> {
        let (width, height) = image.data.dimensions();
        let data = ImageData {
            width: width as usize,
            height: height as usize,
            bytes: Cow::Borrowed(image.data.as_raw()),
        };
        if must_hold(self.hold) {
            set_and_hold(&mut self.clipboard, data)?;
        } else {
            self.clipboard.set_image(data)?;
        }
        info!("copied {width}x{height} icon to the clipboard");
        Ok(())
    }
}

// ============================================================================
// In-memory clipboard
// ============================================================================

/// A clipboard that keeps the last export as PNG bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    png: Option<Vec<u8>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw PNG of the last export.
    pub fn png(&self) -> Option<&[u8]> {
        self.png.as_deref()
    }

    /// Decodes the last export back into pixels.
    pub fn read_image(&self) -> Option<Result<RgbaImage, ExportError>> {
        let png = self.png.as_ref()?;
        Some(
            image::load_from_memory_with_format(png, ImageFormat::Png)
                .map(|img| img.to_rgba8())
                .map_err(ExportError::from),
        )
    }
}

impl ClipboardExporter for MemoryClipboard {
    fn export(&mut self, image: &IconImage) -> Result<(), ExportError> {
        self.png = Some(encode_png(image)?);
        Ok(())
    }
}

// ============================================================================
// PNG file
// ============================================================================

/// Writes each export to a PNG file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngFileExporter {
    path: PathBuf,
}

impl PngFileExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ClipboardExporter for PngFileExporter {
    fn export(&mut self, image: &IconImage) -> Result<(), ExportError> {
        image.data.save_with_format(&self.path, ImageFormat::Png)?;
        info!("wrote {}", self.path.display());
        Ok(())
    }
}
