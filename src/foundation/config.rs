//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default ceiling for fetched or uploaded image bytes (10 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Default hard timeout for URL image fetches.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Engine-wide options.
///
/// Built with [`EngineOpts::default`] plus `with_*` setters, or from the process environment via
/// [`EngineOpts::from_env`].
#[derive(Debug, Clone)]
pub struct EngineOpts {
    pub(crate) fonts_dir: PathBuf,
    pub(crate) system_fonts: bool,
    pub(crate) strict_fonts: bool,
    pub(crate) fetch_timeout: Duration,
    pub(crate) max_image_bytes: u64,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            fonts_dir: default_fonts_dir(),
            system_fonts: true,
            strict_fonts: false,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl EngineOpts {
    /// Defaults overridden by `PODIUM_*` environment variables.
    ///
    /// - `PODIUM_FONTS_DIR`: directory holding the bundled `.ttf` files
    /// - `PODIUM_STRICT_FONTS`: `1`/`true` makes unregistered font families an error
    /// - `PODIUM_FETCH_TIMEOUT_SECS`: URL fetch timeout in seconds (> 0)
    /// - `PODIUM_MAX_IMAGE_BYTES`: image byte ceiling (> 0)
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(dir) = std::env::var_os("PODIUM_FONTS_DIR").filter(|v| !v.is_empty()) {
            opts.fonts_dir = PathBuf::from(dir);
        }
        if let Ok(v) = std::env::var("PODIUM_STRICT_FONTS") {
            opts.strict_fonts = matches!(v.trim(), "1" | "true" | "yes");
        }
        if let Some(secs) = env_u64("PODIUM_FETCH_TIMEOUT_SECS") {
            opts.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = env_u64("PODIUM_MAX_IMAGE_BYTES") {
            opts.max_image_bytes = bytes;
        }
        opts
    }

    /// Directory containing the bundled font files.
    pub fn with_fonts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fonts_dir = dir.into();
        self
    }

    /// Whether system fonts are available as a text-rendering fallback.
    pub fn with_system_fonts(mut self, enabled: bool) -> Self {
        self.system_fonts = enabled;
        self
    }

    /// Default strict-font mode for requests that do not set it.
    pub fn with_strict_fonts(mut self, strict: bool) -> Self {
        self.strict_fonts = strict;
        self
    }

    /// Hard timeout for URL image fetches.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Ceiling for image bytes accepted from any source.
    pub fn with_max_image_bytes(mut self, bytes: u64) -> Self {
        self.max_image_bytes = bytes;
        self
    }

    /// Configured fonts directory.
    pub fn fonts_dir(&self) -> &std::path::Path {
        &self.fonts_dir
    }

    /// Configured default strict-font mode.
    pub fn strict_fonts(&self) -> bool {
        self.strict_fonts
    }
}

fn default_fonts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join("fonts")
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&n| n > 0)
}
