//! Turning dropped or pasted sources into bitmaps.

use std::fs;
use std::path::PathBuf;

use image::RgbaImage;
use log::debug;

use crate::error::DecodeError;

/// Something the user dropped or pasted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropSource {
    /// A file reference, as delivered by drag-and-drop.
    Path(PathBuf),
    /// Raw encoded image data, as delivered by a paste.
    Bytes(Vec<u8>),
}

impl From<PathBuf> for DropSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<Vec<u8>> for DropSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Decodes a [`DropSource`] into an RGBA bitmap.
pub trait ImageDecoder {
    fn decode(&self, source: &DropSource) -> Result<RgbaImage, DecodeError>;
}

/// Decodes any format the `image` crate recognises, sniffing the content
/// rather than trusting the file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDecoder;

impl ImageDecoder for FileDecoder {
    fn decode(&self, source: &DropSource) -> Result<RgbaImage, DecodeError> {
        let image = match source {
            DropSource::Path(path) => {
                let bytes = fs::read(path).map_err(|source| DecodeError::Io {
                    path: path.clone(),
                    source,
                })?;
                debug!("decoding {} ({} bytes)", path.display(), bytes.len());
                image::load_from_memory(&bytes)?
            }
            DropSource::Bytes(bytes) => image::load_from_memory(bytes)?,
        };

        let image = image.to_rgba8();
        if image.width() == 0 || image.height() == 0 {
            return Err(DecodeError::Empty {
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(image)
    }
}
