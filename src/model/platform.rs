use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Size;
use crate::foundation::error::{CarouselError, CarouselResult};

/// Named social-media target surface.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Square feed post.
    #[default]
    Instagram,
    /// Landscape share card.
    Linkedin,
    /// Landscape link card.
    Facebook,
    /// Tall pin.
    Pinterest,
    /// Full-screen vertical.
    Tiktok,
    /// Landscape summary card.
    Twitter,
    /// Portrait post.
    Threads,
    /// Video thumbnail.
    Youtube,
    /// Catch-all with no fixed ratio.
    Custom,
}

impl Platform {
    /// Every platform, in preset-table order.
    pub const ALL: [Self; 9] = [
        Self::Instagram,
        Self::Linkedin,
        Self::Facebook,
        Self::Pinterest,
        Self::Tiktok,
        Self::Twitter,
        Self::Threads,
        Self::Youtube,
        Self::Custom,
    ];

    /// Lower-case identifier used in file names and persisted documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Linkedin => "linkedin",
            Self::Facebook => "facebook",
            Self::Pinterest => "pinterest",
            Self::Tiktok => "tiktok",
            Self::Twitter => "twitter",
            Self::Threads => "threads",
            Self::Youtube => "youtube",
            Self::Custom => "custom",
        }
    }

    /// Factory dimensions.
    pub fn default_size(self) -> Size {
        let (width, height) = match self {
            Self::Instagram => (1080, 1080),
            Self::Linkedin => (1200, 627),
            Self::Facebook => (1200, 630),
            Self::Pinterest => (1000, 1500),
            Self::Tiktok => (1080, 1920),
            Self::Twitter => (1200, 675),
            Self::Threads => (1080, 1350),
            Self::Youtube => (1280, 720),
            Self::Custom => (1080, 1080),
        };
        Size { width, height }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = CarouselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == needle)
            .ok_or_else(|| CarouselError::validation(format!("unknown platform \"{s}\"")))
    }
}

/// Runtime-mutable preset table, one size per [`Platform`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlatformPresets {
    sizes: [Size; 9],
}

impl Default for PlatformPresets {
    fn default() -> Self {
        Self {
            sizes: Platform::ALL.map(Platform::default_size),
        }
    }
}

impl PlatformPresets {
    /// Current size of `platform`.
    pub fn get(&self, platform: Platform) -> Size {
        self.sizes[platform.slot()]
    }

    /// Override the size of `platform`.
    pub fn set(&mut self, platform: Platform, size: Size) -> CarouselResult<()> {
        let size = Size::new(size.width, size.height)?;
        self.sizes[platform.slot()] = size;
        Ok(())
    }

    /// Restore factory dimensions for `platform`.
    pub fn reset(&mut self, platform: Platform) {
        self.sizes[platform.slot()] = platform.default_size();
    }
}

/// Aspect shortcut that writes a fixed size onto the active platform slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// 1080x1080.
    Square,
    /// 1080x1350.
    Portrait,
    /// 1080x1920.
    Story,
    /// Keeps the current size; unlocks manual editing.
    Custom,
}

impl Orientation {
    /// Size written by this shortcut; `None` for [`Orientation::Custom`].
    pub fn size(self) -> Option<Size> {
        let (width, height) = match self {
            Self::Square => (1080, 1080),
            Self::Portrait => (1080, 1350),
            Self::Story => (1080, 1920),
            Self::Custom => return None,
        };
        Some(Size { width, height })
    }
}

impl FromStr for Orientation {
    type Err = CarouselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1:1" => Ok(Self::Square),
            "4:5" => Ok(Self::Portrait),
            "9:16" => Ok(Self::Story),
            "custom" => Ok(Self::Custom),
            other => Err(CarouselError::validation(format!(
                "unknown orientation \"{other}\""
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/platform.rs"]
mod tests;
