//! Process-wide font table.
//!
//! Fonts are registered explicitly (bundled set at startup, or by callers) and live until
//! [`FontRegistry::clear_fonts`]. Text rendering builds a [`FontBook`] from the registry once per
//! composition.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::foundation::error::{PosterError, PosterResult};

/// Family used when a requested font is unregistered and strict mode is off.
pub const DEFAULT_FONT: &str = "sans-serif";

/// Fonts shipped with the package: registry name → file name inside the fonts directory.
pub const BUNDLED_FONTS: &[(&str, &str)] = &[
    ("Montserrat", "Montserrat-Bold.ttf"),
    ("Inter", "Inter-Regular.ttf"),
    ("Bebas Neue", "BebasNeue-Regular.ttf"),
    ("Oswald", "Oswald-Bold.ttf"),
    ("Roboto", "Roboto-Regular.ttf"),
];

/// A registered font face source.
#[derive(Clone, Debug)]
pub struct RegisteredFont {
    /// Registry key.
    pub name: String,
    /// File the bytes were read from.
    pub source_path: PathBuf,
    /// Raw font file bytes.
    pub data: Arc<Vec<u8>>,
}

/// One bundled font that could not be registered.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FontLoadFailure {
    /// Registry name from [`BUNDLED_FONTS`].
    pub name: String,
    /// Human-readable cause.
    pub reason: String,
}

/// Outcome of [`FontRegistry::init_bundled_fonts`].
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct FontInitReport {
    /// Names registered successfully.
    pub loaded: Vec<String>,
    /// Names that failed, with causes.
    pub failed: Vec<FontLoadFailure>,
}

/// Name → font bytes table guarded for concurrent readers.
#[derive(Debug, Default)]
pub struct FontRegistry {
    fonts: RwLock<HashMap<String, RegisteredFont>>,
}

impl FontRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and register a `.ttf`/`.otf` file under `name`, replacing any previous entry.
    pub fn register_font(&self, name: &str, path: impl AsRef<Path>) -> PosterResult<()> {
        let path = path.as_ref();
        if name.trim().is_empty() {
            return Err(PosterError::invalid_input("font name must be non-empty"));
        }
        if path.as_os_str().is_empty() {
            return Err(PosterError::invalid_input("font path must be non-empty"));
        }
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        if !matches!(ext.as_deref(), Some("ttf") | Some("otf")) {
            return Err(PosterError::invalid_input(format!(
                "font '{}' must be a .ttf or .otf file",
                path.display()
            )));
        }

        let bytes = std::fs::read(path).map_err(|e| {
            PosterError::font_load(format!("read font '{}': {e}", path.display()))
        })?;
        ensure_parsable(&bytes, path)?;

        let font = RegisteredFont {
            name: name.to_owned(),
            source_path: path.to_path_buf(),
            data: Arc::new(bytes),
        };
        self.write_map().insert(name.to_owned(), font);
        tracing::debug!(font = name, path = %path.display(), "registered font");
        Ok(())
    }

    /// Bytes of a registered font.
    pub fn get_font(&self, name: &str) -> Option<Arc<Vec<u8>>> {
        self.read_map().get(name).map(|f| Arc::clone(&f.data))
    }

    /// Whether `name` is registered.
    pub fn is_font_registered(&self, name: &str) -> bool {
        self.read_map().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list_fonts(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read_map().keys().cloned().collect();
        names.sort();
        names
    }

    /// Fallback family name.
    pub fn default_font(&self) -> &'static str {
        DEFAULT_FONT
    }

    /// Register every entry of [`BUNDLED_FONTS`] found in `dir`.
    ///
    /// Never fails: each font that cannot be registered is reported in
    /// [`FontInitReport::failed`].
    pub fn init_bundled_fonts(&self, dir: impl AsRef<Path>) -> FontInitReport {
        let dir = dir.as_ref();
        let mut report = FontInitReport::default();
        for (name, file) in BUNDLED_FONTS {
            let path = dir.join(file);
            let outcome = if path.is_file() {
                self.register_font(name, &path)
            } else {
                Err(PosterError::font_load(format!(
                    "bundled font file not found: {}",
                    path.display()
                )))
            };
            match outcome {
                Ok(()) => report.loaded.push((*name).to_owned()),
                Err(e) => {
                    tracing::warn!(font = *name, error = %e, "bundled font unavailable");
                    report.failed.push(FontLoadFailure {
                        name: (*name).to_owned(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        tracing::info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "bundled fonts initialized"
        );
        report
    }

    /// Remove every registered font.
    pub fn clear_fonts(&self) {
        self.write_map().clear();
        tracing::debug!("cleared font registry");
    }

    /// Snapshot the registry into a font database usable by `usvg`.
    ///
    /// With `include_system` the host's fonts are loaded as well and serve as a last resort.
    pub fn font_book(&self, include_system: bool) -> FontBook {
        let mut db = usvg::fontdb::Database::new();
        if include_system {
            db.load_system_fonts();
        }

        let mut families = HashMap::new();
        let fonts = self.read_map();
        let mut names: Vec<&String> = fonts.keys().collect();
        names.sort();
        for name in names {
            let font = &fonts[name];
            let blob: Arc<dyn AsRef<[u8]> + Send + Sync> = font.data.clone();
            let ids = db.load_font_source(usvg::fontdb::Source::Binary(blob));
            let family = ids.iter().find_map(|id| {
                db.face(*id)
                    .and_then(|face| face.families.first().map(|(f, _)| f.clone()))
            });
            if let Some(family) = family {
                families.insert(name.clone(), family);
            }
        }
        drop(fonts);

        // Generic sans-serif resolves to a registered face when one exists.
        let mut preferred: Vec<&String> = families.values().collect();
        preferred.sort();
        if let Some(first) = preferred.first() {
            db.set_sans_serif_family(first.as_str());
        }

        FontBook {
            db: Arc::new(db),
            families,
        }
    }

    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<String, RegisteredFont>> {
        self.fonts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, HashMap<String, RegisteredFont>> {
        self.fonts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn ensure_parsable(bytes: &[u8], path: &Path) -> PosterResult<()> {
    let mut scratch = usvg::fontdb::Database::new();
    scratch.load_font_data(bytes.to_vec());
    if scratch.len() == 0 {
        return Err(PosterError::font_load(format!(
            "'{}' contains no parsable font face",
            path.display()
        )));
    }
    Ok(())
}

/// Immutable font database snapshot plus the registry-name → family-name mapping.
#[derive(Clone)]
pub struct FontBook {
    db: Arc<usvg::fontdb::Database>,
    families: HashMap<String, String>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .field("families", &self.families)
            .finish()
    }
}

impl FontBook {
    /// Underlying database.
    pub fn database(&self) -> Arc<usvg::fontdb::Database> {
        Arc::clone(&self.db)
    }

    /// Resolve the family name to emit for a requested registry name.
    ///
    /// Unregistered names fall back to [`DEFAULT_FONT`], or fail with `InvalidInput` in strict
    /// mode.
    pub fn resolve_family(&self, requested: &str, strict: bool) -> PosterResult<String> {
        if let Some(family) = self.families.get(requested) {
            return Ok(family.clone());
        }
        if strict {
            return Err(PosterError::invalid_input(format!(
                "font family \"{requested}\" is not registered"
            )));
        }
        tracing::debug!(
            requested,
            fallback = DEFAULT_FONT,
            "font not registered, using fallback"
        );
        Ok(DEFAULT_FONT.to_owned())
    }

    /// `usvg` options resolving fonts against this book.
    pub(crate) fn svg_options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: self.database(),
            font_resolver: make_svg_font_resolver(),
            ..Default::default()
        }
    }
}

fn make_svg_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            // Any face beats dropping the text entirely.
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
