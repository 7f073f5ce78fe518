//! Named glyph lookup.
//!
//! A symbol name selects a monochrome vector glyph. Names are resolved
//! against, in order: glyphs registered on the [`GlyphLibrary`] (for example
//! loaded from a user directory), the built-in table, and, with the
//! `twemoji` feature, emoji characters.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use log::debug;

/// Default symbol shown when no preference has been saved.
pub const DEFAULT_SYMBOL_NAME: &str = "folder.fill.badge.sparkles";

macro_rules! glyph {
    ($body:literal) => {
        concat!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="#000000">"##,
            $body,
            "</svg>"
        )
    };
}

/// Built-in glyphs, keyed by their public symbol name.
const BUILTIN_GLYPHS: &[(&str, &str)] = &[
    (
        "bolt.fill",
        glyph!(r#"<path d="M13.5 2L4 13.5h6.5L9 22l10-12h-6.5z"/>"#),
    ),
    (
        "checkmark",
        glyph!(r#"<path d="M4 12.5l2-2 4 4 8-8 2 2-10 10z"/>"#),
    ),
    ("circle.fill", glyph!(r#"<circle cx="12" cy="12" r="10"/>"#)),
    (
        "folder.fill.badge.sparkles",
        glyph!(
            r#"<path d="M2 8a2 2 0 0 1 2-2h5l2 2h7a2 2 0 0 1 2 2v9a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2z"/><path d="M21 .5l.7 1.8 1.8.7-1.8.7-.7 1.8-.7-1.8-1.8-.7 1.8-.7z"/>"#
        ),
    ),
    (
        "heart.fill",
        glyph!(
            r#"<path d="M12 21s-8-5.3-8-11.2C4 6.6 6.4 4.5 9 4.5c1.4 0 2.4.6 3 1.5.6-.9 1.6-1.5 3-1.5 2.6 0 5 2.1 5 5.3C20 15.7 12 21 12 21z"/>"#
        ),
    ),
    (
        "house.fill",
        glyph!(r#"<path d="M12 3l9 8h-3v10h-5v-6h-2v6H6V11H3z"/>"#),
    ),
    (
        "music.note",
        glyph!(r#"<circle cx="7.5" cy="17.5" r="3.5"/><path d="M9 3h10v4h-8v10.5H9z"/>"#),
    ),
    (
        "person.fill",
        glyph!(
            r#"<circle cx="12" cy="7" r="4.5"/><path d="M3 21c0-4.4 4-7.5 9-7.5s9 3.1 9 7.5z"/>"#
        ),
    ),
    (
        "sparkles",
        glyph!(
            r#"<path d="M10 3l1.8 5.2L17 10l-5.2 1.8L10 17l-1.8-5.2L3 10l5.2-1.8z"/><path d="M18 2l.8 2.2L21 5l-2.2.8L18 8l-.8-2.2L15 5l2.2-.8z"/><path d="M18 15l.7 1.8 1.8.7-1.8.7L18 20l-.7-1.8-1.8-.7 1.8-.7z"/>"#
        ),
    ),
    (
        "square.fill",
        glyph!(r#"<rect x="3" y="3" width="18" height="18" rx="3"/>"#),
    ),
    (
        "star.fill",
        glyph!(
            r#"<path d="M12 2l2.9 6.6 7.1.6-5.4 4.7 1.6 7-6.2-3.7-6.2 3.7 1.6-7L2 9.2l7.1-.6z"/>"#
        ),
    ),
];

/// Returns the SVG markup of a built-in glyph.
pub fn builtin_glyph(name: &str) -> Option<&'static str> {
    BUILTIN_GLYPHS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, svg)| *svg)
}

/// Returns the names of all built-in glyphs in sorted order.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_GLYPHS.iter().map(|(n, _)| *n)
}

// ============================================================================
// GlyphLibrary
// ============================================================================

/// Resolves symbol names to SVG markup.
///
/// # Example
///
/// ```
/// use folder_icon_generator::GlyphLibrary;
///
/// let mut library = GlyphLibrary::new();
/// assert!(library.resolve("person.fill").is_some());
/// assert!(library.resolve("no.such.symbol").is_none());
///
/// library.insert("dot", r#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><circle cx="4" cy="4" r="4"/></svg>"#);
/// assert!(library.resolve("dot").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphLibrary {
    custom: BTreeMap<String, String>,
}

impl GlyphLibrary {
    /// Creates a library containing only the built-in glyphs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a glyph under `name`.
    pub fn insert(&mut self, name: impl Into<String>, svg: impl Into<String>) {
        self.custom.insert(name.into(), svg.into());
    }

    /// Loads every `*.svg` file in `dir`, naming each glyph after its file stem.
    ///
    /// Returns the number of glyphs loaded.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> io::Result<usize> {
        let mut loaded = 0;
        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("svg") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let svg = fs::read_to_string(&path)?;
            debug!("loaded glyph {name:?} from {}", path.display());
            self.custom.insert(name.to_string(), svg);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Names of the glyphs registered on this library (not the built-ins).
    pub fn custom_names(&self) -> impl Iterator<Item = &str> {
        self.custom.keys().map(String::as_str)
    }

    /// Resolves a symbol name to SVG markup.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some(svg) = self.custom.get(name) {
            return Some(svg.as_str());
        }
        if let Some(svg) = builtin_glyph(name) {
            return Some(svg);
        }
        resolve_emoji(name)
    }
}

#[cfg(feature = "twemoji")]
fn resolve_emoji(name: &str) -> Option<&'static str> {
    use twemoji_assets::svg::SvgTwemojiAsset;

    let asset: &'static SvgTwemojiAsset = SvgTwemojiAsset::from_emoji(name)?;
    Some(asset.as_ref())
}

#[cfg(not(feature = "twemoji"))]
fn resolve_emoji(_name: &str) -> Option<&'static str> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::svg::parse_svg;

    #[test]
    fn every_builtin_parses() {
        for (name, svg) in BUILTIN_GLYPHS {
            assert!(parse_svg(svg).is_ok(), "{name} should be valid SVG");
        }
    }

    #[test]
    fn default_symbol_is_builtin() {
        assert!(builtin_glyph(DEFAULT_SYMBOL_NAME).is_some());
    }

    #[test]
    fn builtin_names_sorted() {
        let names: Vec<_> = builtin_names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.contains(&"person.fill"));
    }

    #[test]
    fn custom_glyph_shadows_builtin() {
        let mut library = GlyphLibrary::new();
        library.insert("person.fill", "<svg/>");
        assert_eq!(library.resolve("person.fill"), Some("<svg/>"));
    }

    #[test]
    fn load_dir_reads_svg_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("leaf.svg"), "<svg>leaf</svg>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut library = GlyphLibrary::new();
        let loaded = library.load_dir(dir.path()).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(library.resolve("leaf"), Some("<svg>leaf</svg>"));
        assert_eq!(library.custom_names().collect::<Vec<_>>(), vec!["leaf"]);
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn emoji_resolves_with_twemoji() {
        let library = GlyphLibrary::new();
        let svg = library.resolve("🦆").expect("duck emoji should be supported");
        assert!(svg.contains("<svg"));
    }
}
