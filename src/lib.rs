//! folder-icon-generator: custom macOS folder icons from a symbol or image
//!
//! This crate composites a named glyph, or a dropped bitmap, onto a folder
//! template and produces a 1024x1024 (@2x) image ready to paste into the
//! Finder's "Get Info" panel.
//!
//! # Example
//!
//! ```
//! use folder_icon_generator::{Compositor, Foreground};
//!
//! let compositor = Compositor::new().unwrap();
//!
//! // A built-in glyph, tinted and bevelled
//! let icon = compositor.composite(&Foreground::Symbol("person.fill")).unwrap();
//! assert_eq!(icon.data.dimensions(), (1024, 1024));
//! ```
//!
//! # Sessions
//!
//! [`IconSession`] models the editing window: persisted [`Preferences`], an
//! optional custom icon, and a cached preview that is recomputed whenever
//! either changes.
//!
//! ```
//! use folder_icon_generator::{
//!     Compositor, DropSource, FileDecoder, IconSession, Preferences,
//! };
//!
//! let mut session = IconSession::new(Compositor::new().unwrap(), Preferences::default());
//!
//! // Not an image: the drop is rejected and nothing changes
//! let rejected = DropSource::Bytes(b"plain text".to_vec());
//! assert!(!session.drop_source(&FileDecoder, &rejected));
//! assert!(!session.is_custom_icon());
//!
//! // The luminance toggle only applies to a custom icon
//! assert_eq!(session.toggle_luminance_to_alpha(), None);
//! assert!(session.render().is_some());
//! ```

mod compositor;
mod error;
mod export;
mod icon;
mod intake;
mod layer;
mod preferences;
mod session;
mod template;

pub use compositor::{Compositor, FOLDER_ACCENT, Foreground, Layout, PlacedSprite};
pub use error::{DecodeError, ExportError, PreferencesError, RenderError};
pub use export::{ClipboardExporter, MemoryClipboard, PngFileExporter, SystemClipboard, encode_png};
pub use icon::{IconImage, RectPx, SizePx};
pub use intake::{DropSource, FileDecoder, ImageDecoder};
pub use layer::glyph::builtin_names;
pub use layer::mask::luminance_to_alpha;
pub use layer::{BevelStyle, BeveledSprite, DEFAULT_SYMBOL_NAME, GlyphLibrary, Shadow};
pub use preferences::{JsonFileStore, PreferenceStore, Preferences};
pub use session::{Configurable, IconSession};
pub use template::FolderTemplate;

/// Apple's guide to changing a folder's icon by pasting an image.
pub const HELP_URL: &str =
    "https://support.apple.com/guide/mac-help/change-icons-for-files-or-folders-on-mac-mchlp2313/mac";
