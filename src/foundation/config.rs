use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::error::{CarouselError, CarouselResult};
use crate::render::style::RenderStyle;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Editor-wide tunables.
///
/// Every constant the editor, renderer and exporter depend on is read from here, so a host can
/// adjust caps and styling without touching code. Missing JSON fields take their defaults.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of slides a document may hold.
    pub max_slides: usize,
    /// Maximum number of retained undo snapshots.
    pub history_capacity: usize,
    /// JPEG quality (1..=100) for raster and PDF page encoding.
    pub jpeg_quality: u8,
    /// Autosaved documents older than this are ignored on restore.
    pub autosave_max_age_ms: i64,
    /// Lifetime of freshly created share payloads.
    pub share_ttl_ms: i64,
    /// Directory that relative image paths resolve against.
    pub assets_root: PathBuf,
    /// Font resolution settings.
    pub fonts: FontConfig,
    /// Typography and decoration constants at the reference width.
    pub style: RenderStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_slides: 15,
            history_capacity: 100,
            jpeg_quality: 92,
            autosave_max_age_ms: DAY_MS,
            share_ttl_ms: DAY_MS,
            assets_root: PathBuf::from("."),
            fonts: FontConfig::default(),
            style: RenderStyle::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CarouselResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| CarouselError::validation(format!("parse editor config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CarouselResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CarouselError::validation(format!("open editor config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check that caps and qualities are usable.
    pub fn validate(&self) -> CarouselResult<()> {
        if self.max_slides == 0 {
            return Err(CarouselError::validation("max_slides must be > 0"));
        }
        if self.history_capacity < 2 {
            return Err(CarouselError::validation("history_capacity must be >= 2"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CarouselError::validation("jpeg_quality must be in 1..=100"));
        }
        self.style.validate()
    }

    /// Return a copy with a different slide cap.
    pub fn with_max_slides(mut self, max_slides: usize) -> Self {
        self.max_slides = max_slides;
        self
    }

    /// Return a copy with a different history capacity.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Return a copy with a different assets root.
    pub fn with_assets_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets_root = root.into();
        self
    }
}

/// Where text faces come from.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Regular-weight font file (TTF/OTF).
    pub regular: Option<PathBuf>,
    /// Bold-weight font file; falls back to `regular` when absent.
    pub bold: Option<PathBuf>,
    /// Query installed system fonts when no explicit file is configured.
    pub use_system_fonts: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            regular: None,
            bold: None,
            use_system_fonts: true,
        }
    }
}

impl FontConfig {
    /// Fonts disabled entirely: text is measured by estimate and not drawn.
    pub fn none() -> Self {
        Self {
            regular: None,
            bold: None,
            use_system_fonts: false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
