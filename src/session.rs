//! The state of one icon-editing window.
//!
//! An [`IconSession`] holds the preferences, the optional custom icon and the
//! last composite. Every mutation that can change the output bumps a version
//! counter; [`IconSession::render`] recomputes only when the version moved
//! since the cached result was stored.

use image::RgbaImage;
use log::{debug, info, warn};

use crate::compositor::{Compositor, Foreground};
use crate::error::ExportError;
use crate::export::ClipboardExporter;
use crate::icon::IconImage;
use crate::intake::{DropSource, ImageDecoder};
use crate::preferences::Preferences;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Types whose settings can be exchanged as [`Preferences`].
pub trait Configurable {
    /// Applies saved preferences.
    fn apply_preferences(&mut self, prefs: &Preferences);

    /// Exports the current settings.
    fn export_preferences(&self) -> Preferences;
}

// ============================================================================
// IconSession
// ============================================================================

/// Window state with explicit, cached recomputation.
///
/// # Example
///
/// ```
/// use folder_icon_generator::{Compositor, IconSession, MemoryClipboard, Preferences};
///
/// let compositor = Compositor::new().unwrap();
/// let mut session = IconSession::new(compositor, Preferences::default());
///
/// assert!(session.set_symbol_name("person.fill"));
/// assert_eq!(session.render().unwrap().data.dimensions(), (1024, 1024));
///
/// let mut clipboard = MemoryClipboard::new();
/// session.copy_to_clipboard(&mut clipboard).unwrap();
/// assert!(clipboard.png().is_some());
/// ```
#[derive(Debug)]
pub struct IconSession {
    compositor: Compositor,
    prefs: Preferences,
    custom_icon: Option<RgbaImage>,
    version: u64,
    /// Last composite and the version it was rendered at. `None` inside
    /// means the render failed and the preview is empty.
    cache: Option<(u64, Option<IconImage>)>,
}

impl IconSession {
    pub fn new(compositor: Compositor, prefs: Preferences) -> Self {
        Self {
            compositor,
            prefs,
            custom_icon: None,
            version: 0,
            cache: None,
        }
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn custom_icon(&self) -> Option<&RgbaImage> {
        self.custom_icon.as_ref()
    }

    /// True while a custom icon overrides the symbol.
    pub fn is_custom_icon(&self) -> bool {
        self.custom_icon.is_some()
    }

    /// Returns the current state version.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Sets the symbol name. Returns true if it changed.
    ///
    /// Editing is disabled while a custom icon is set, so this returns false
    /// and leaves the name alone in that case.
    pub fn set_symbol_name(&mut self, name: impl Into<String>) -> bool {
        if self.is_custom_icon() {
            debug!("symbol name is locked while a custom icon is set");
            return false;
        }
        let name = name.into();
        if self.prefs.symbol_name == name {
            return false;
        }
        self.prefs.symbol_name = name;
        self.bump();
        true
    }

    /// Sets the luminance-to-alpha flag. Returns true if it changed.
    pub fn set_luminance_to_alpha(&mut self, enabled: bool) -> bool {
        if self.prefs.luminance_to_alpha == enabled {
            return false;
        }
        self.prefs.luminance_to_alpha = enabled;
        self.bump();
        true
    }

    /// Flips the luminance-to-alpha flag and returns the new value.
    ///
    /// Like clearing, this acts on the custom icon: without one it returns
    /// `None` and nothing changes. Use [`set_luminance_to_alpha`] to change
    /// the preference directly.
    ///
    /// [`set_luminance_to_alpha`]: Self::set_luminance_to_alpha
    pub fn toggle_luminance_to_alpha(&mut self) -> Option<bool> {
        if !self.is_custom_icon() {
            debug!("luminance toggle is disabled without a custom icon");
            return None;
        }
        let enabled = !self.prefs.luminance_to_alpha;
        self.set_luminance_to_alpha(enabled);
        Some(enabled)
    }

    /// Installs a custom icon, replacing any previous one.
    pub fn set_custom_icon(&mut self, image: RgbaImage) {
        self.custom_icon = Some(image);
        self.bump();
    }

    /// Removes the custom icon. Returns true if there was one.
    pub fn clear_custom_icon(&mut self) -> bool {
        if self.custom_icon.take().is_some() {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Handles a drop: decodes `source` and installs it as the custom icon.
    ///
    /// Returns false, leaving the session untouched, if the source is not an
    /// image.
    pub fn drop_source(&mut self, decoder: &impl ImageDecoder, source: &DropSource) -> bool {
        match decoder.decode(source) {
            Ok(image) => {
                info!("custom icon set ({}x{})", image.width(), image.height());
                self.set_custom_icon(image);
                true
            }
            Err(e) => {
                debug!("drop rejected: {e}");
                false
            }
        }
    }

    /// The foreground the current state selects.
    pub fn foreground(&self) -> Foreground<'_> {
        Foreground::select(
            &self.prefs.symbol_name,
            self.custom_icon.as_ref(),
            self.prefs.luminance_to_alpha,
        )
    }

    /// Returns the composite for the current state, recomputing it if the
    /// state changed. `None` means the preview is empty because rendering
    /// failed.
    pub fn render(&mut self) -> Option<&IconImage> {
        let stale = !matches!(self.cache, Some((v, _)) if v == self.version);
        if stale {
            let result = match self.compositor.composite(&self.foreground()) {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!("render failed, preview is empty: {e}");
                    None
                }
            };
            self.cache = Some((self.version, result));
        }
        self.cache.as_ref().and_then(|(_, image)| image.as_ref())
    }

    /// Copies the current composite to `exporter`.
    pub fn copy_to_clipboard(&mut self, exporter: &mut impl ClipboardExporter) -> Result<(), ExportError> {
        let image = self.render().ok_or(ExportError::EmptyPreview)?;
        exporter.export(image)
    }

    /// Drops the cached composite.
    pub fn clear_cache(&mut self) {
        self.cache = None;
    }
}

impl Configurable for IconSession {
    /// Replaces both settings. The custom icon is not part of the
    /// preferences and is kept.
    fn apply_preferences(&mut self, prefs: &Preferences) {
        if self.prefs != *prefs {
            self.prefs = prefs.clone();
            self.bump();
        }
    }

    fn export_preferences(&self) -> Preferences {
        self.prefs.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
