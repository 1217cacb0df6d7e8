use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use xxhash_rust::xxh3::xxh3_128;

use crate::assets::decode::{DecodedImage, decode_image, svg_options};
use crate::assets::source::ImageSource;
use crate::foundation::error::CarouselResult;

/// Resolves and decodes [`ImageSource`]s, memoizing successful decodes.
///
/// `load` returns only once the image is fully decoded, so callers sequence layers simply by
/// calling it before drawing. Failed decodes are not cached. Safe to share across threads.
pub struct ImageLoader {
    root: PathBuf,
    fontdb: OnceLock<Arc<usvg::fontdb::Database>>,
    cache: Mutex<HashMap<u128, Arc<DecodedImage>>>,
}

impl ImageLoader {
    /// Loader resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fontdb: OnceLock::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Directory relative paths resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decode `source`, or return the cached handle.
    #[tracing::instrument(level = "debug", skip_all, fields(source = %preview(source.as_str())))]
    pub fn load(&self, source: &ImageSource) -> CarouselResult<Arc<DecodedImage>> {
        let key = xxh3_128(source.as_str().as_bytes());
        if let Some(hit) = self.lock().get(&key) {
            return Ok(hit.clone());
        }

        let bytes = source.read_bytes(&self.root)?;
        let resources_dir = source
            .resolve_path(&self.root)?
            .and_then(|p| p.parent().map(Path::to_path_buf));
        let decoded = Arc::new(decode_image(&bytes, source.looks_like_svg(), || {
            svg_options(self.svg_fontdb(), resources_dir.as_deref())
        })?);
        tracing::debug!(bytes = bytes.len(), "decoded image");

        self.lock().insert(key, decoded.clone());
        Ok(decoded)
    }

    /// Number of cached decodes.
    pub fn cached_len(&self) -> usize {
        self.lock().len()
    }

    /// Drop every cached decode.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u128, Arc<DecodedImage>>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn svg_fontdb(&self) -> Arc<usvg::fontdb::Database> {
        self.fontdb
            .get_or_init(|| {
                let mut db = usvg::fontdb::Database::new();
                db.load_system_fonts();
                Arc::new(db)
            })
            .clone()
    }
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("root", &self.root)
            .field("cached", &self.cached_len())
            .finish()
    }
}

fn preview(s: &str) -> &str {
    match s.char_indices().nth(48) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
