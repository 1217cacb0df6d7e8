use base64::Engine as _;

use crate::foundation::error::{CarouselError, CarouselResult};
use crate::model::document::Document;
use crate::model::platform::Platform;
use crate::model::slide::Slide;

/// Persisted document shape: `{slides, currentPlatform, currentSlideIndex, timestamp?}`.
///
/// Missing fields default to no slides, `instagram` and index 0.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentFile {
    /// Slides in order.
    pub slides: Vec<Slide>,
    /// Active platform identifier.
    pub current_platform: Platform,
    /// Selected slide.
    pub current_slide_index: usize,
    /// Save time in milliseconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl DocumentFile {
    /// Capture `doc`, stamped with `timestamp`.
    pub fn capture(doc: &Document, timestamp: Option<i64>) -> Self {
        Self {
            slides: doc.slides.clone(),
            current_platform: doc.platform,
            current_slide_index: doc.current_index,
            timestamp,
        }
    }

    /// Parse from JSON text.
    pub fn from_json(json: &str) -> CarouselResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON text.
    pub fn to_json(&self) -> CarouselResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether an autosave stamped with this file's timestamp is still usable at `now_ms`.
    /// Files without a timestamp are always fresh.
    pub fn is_fresh(&self, now_ms: i64, max_age_ms: i64) -> bool {
        match self.timestamp {
            Some(ts) => now_ms.saturating_sub(ts) <= max_age_ms,
            None => true,
        }
    }

    /// Load into `doc`, truncating to its slide cap and clamping the selection.
    pub fn apply_to(self, doc: &mut Document) {
        doc.replace_slides(self.slides);
        doc.platform = self.current_platform;
        doc.current_index = self.current_slide_index;
        doc.clamp_selection();
    }
}

/// Share-link payload: a [`DocumentFile`] plus an absolute expiry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SharePayload {
    /// Shared document.
    #[serde(flatten)]
    pub document: DocumentFile,
    /// Expiry in milliseconds since the Unix epoch.
    pub expires: i64,
}

impl SharePayload {
    /// Payload for `doc` created at `now_ms` that expires `ttl_ms` later.
    pub fn create(doc: &Document, now_ms: i64, ttl_ms: i64) -> Self {
        Self {
            document: DocumentFile::capture(doc, Some(now_ms)),
            expires: now_ms.saturating_add(ttl_ms),
        }
    }

    /// Fail with [`CarouselError::Expired`] when `expires` is in the past relative to `now_ms`.
    pub fn check_fresh(&self, now_ms: i64) -> CarouselResult<()> {
        if self.expires < now_ms {
            return Err(CarouselError::expired(self.expires));
        }
        Ok(())
    }

    /// Encode as a URL-embeddable token (standard base64 of the JSON).
    pub fn to_token(&self) -> CarouselResult<String> {
        let json = serde_json::to_vec(self)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(json))
    }

    /// Decode a token produced by [`SharePayload::to_token`]. Does not check expiry.
    pub fn from_token(token: &str) -> CarouselResult<Self> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(token.trim())
            .map_err(|e| CarouselError::decode(format!("share token is not base64: {e}")))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/persist.rs"]
mod tests;
