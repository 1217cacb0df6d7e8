/// Convenience result type used across the crate.
pub type CarouselResult<T> = Result<T, CarouselError>;

/// Top-level error taxonomy used by editor, render and export APIs.
///
/// Every variant is recoverable: callers surface it to the user and keep their document.
#[derive(thiserror::Error, Debug)]
pub enum CarouselError {
    /// Invalid user-provided input (command text, hex colors, indices, dimensions).
    #[error("validation error: {0}")]
    Validation(String),

    /// A mutation would push the document past its slide cap.
    #[error("capacity error: document is limited to {max} slides")]
    Capacity {
        /// Configured slide cap.
        max: usize,
    },

    /// A shared or persisted document whose expiry lies in the past.
    #[error("expired state: payload expired at {expired_at_ms} ms since epoch")]
    Expired {
        /// Expiry timestamp carried by the payload.
        expired_at_ms: i64,
    },

    /// An image or SVG source could not be resolved or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Raster encoding or packaging failed.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CarouselError {
    /// Build a [`CarouselError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CarouselError::Capacity`] value.
    pub fn capacity(max: usize) -> Self {
        Self::Capacity { max }
    }

    /// Build a [`CarouselError::Expired`] value.
    pub fn expired(expired_at_ms: i64) -> Self {
        Self::Expired { expired_at_ms }
    }

    /// Build a [`CarouselError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CarouselError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`CarouselError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CarouselError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
