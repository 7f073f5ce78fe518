//! Error types for decoding, rendering, exporting and preference storage.
//!
//! None of these are fatal: a [`DecodeError`] rejects a drop, a
//! [`RenderError`] leaves the preview empty, and a [`PreferencesError`] falls
//! back to defaults. Only [`ExportError`] is surfaced to the user.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A dropped or pasted source could not be turned into a bitmap.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("source is not a decodable image: {0}")]
    Image(#[from] image::ImageError),

    #[error("decoded image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// The composite bitmap could not be produced.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("template SVG is invalid: {0}")]
    Template(#[from] resvg::usvg::Error),

    #[error("failed to read template {path}: {source}")]
    TemplateIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The composite could not be written to its destination.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("nothing to export: the preview is empty")]
    EmptyPreview,
}

/// Preferences could not be loaded or saved.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("no configuration directory is available for this user")]
    NoConfigDir,

    #[error("preferences I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("preferences file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
