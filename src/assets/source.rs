use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{CarouselError, CarouselResult};

/// Reference to image bytes: a `data:` URL, a remote URL, or a file path.
///
/// Stored as the raw string so documents round-trip unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ImageSource(String);

/// Parsed form of an [`ImageSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind<'a> {
    /// Inline `data:<mime>[;base64],<payload>` URL.
    DataUrl {
        /// Declared media type, possibly empty.
        mime: &'a str,
        /// Whether the payload is base64.
        base64: bool,
        /// Text after the first comma.
        payload: &'a str,
    },
    /// `http(s)://` URL; never fetched.
    Remote(&'a str),
    /// Local file, relative paths resolve against the assets root.
    Path(&'a Path),
}

impl ImageSource {
    /// Wrap a raw source string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Inline `bytes` as a base64 `data:` URL.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{mime};base64,{b64}"))
    }

    /// Raw source string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the source.
    pub fn kind(&self) -> SourceKind<'_> {
        let s = self.0.trim();
        if let Some(rest) = strip_prefix_ignore_case(s, "data:") {
            let (meta, payload) = rest.split_once(',').unwrap_or((rest, ""));
            let (mime, base64) = match meta.strip_suffix(";base64") {
                Some(m) => (m, true),
                None => (meta, false),
            };
            let mime = mime.split(';').next().unwrap_or("");
            return SourceKind::DataUrl {
                mime,
                base64,
                payload,
            };
        }
        if strip_prefix_ignore_case(s, "http://").is_some()
            || strip_prefix_ignore_case(s, "https://").is_some()
        {
            return SourceKind::Remote(s);
        }
        SourceKind::Path(Path::new(s))
    }

    /// Whether the source announces SVG content by media type or file extension.
    pub fn looks_like_svg(&self) -> bool {
        match self.kind() {
            SourceKind::DataUrl { mime, .. } => mime.eq_ignore_ascii_case("image/svg+xml"),
            SourceKind::Remote(url) => url.to_ascii_lowercase().ends_with(".svg"),
            SourceKind::Path(p) => p
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("svg")),
        }
    }

    /// Path a file source resolves to under `root`; `None` for other kinds.
    ///
    /// File sources must stay inside `root`: absolute paths and `..` segments are rejected.
    pub fn resolve_path(&self, root: &Path) -> CarouselResult<Option<PathBuf>> {
        match self.kind() {
            SourceKind::Path(p) => {
                if p.is_absolute() {
                    return Err(CarouselError::validation("image paths must be relative"));
                }
                let rel = normalize_rel_path(self.0.trim())?;
                Ok(Some(root.join(rel)))
            }
            _ => Ok(None),
        }
    }

    /// Fetch the encoded bytes behind this source.
    pub fn read_bytes(&self, root: &Path) -> CarouselResult<Vec<u8>> {
        match self.kind() {
            SourceKind::DataUrl {
                base64: true,
                payload,
                ..
            } => base64::engine::general_purpose::STANDARD
                .decode(payload.trim())
                .map_err(|e| CarouselError::decode(format!("data url payload: {e}"))),
            SourceKind::DataUrl { payload, .. } => {
                Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
            }
            SourceKind::Remote(url) => Err(CarouselError::decode(format!(
                "remote image sources are not fetched: {url}"
            ))),
            SourceKind::Path(_) => {
                let path = self
                    .resolve_path(root)?
                    .ok_or_else(|| CarouselError::decode("source is not a file path"))?;
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("read image '{}'", path.display()))?;
                Ok(bytes)
            }
        }
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

/// Backslashes become `/`; empty and `.` segments are dropped.
fn normalize_rel_path(source: &str) -> CarouselResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CarouselError::validation("image paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CarouselError::validation("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CarouselError::validation("image path must contain a file name"));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
