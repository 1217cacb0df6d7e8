use std::fmt;
use std::str::FromStr;

use xxhash_rust::xxh3::xxh3_64;

use crate::assets::source::ImageSource;
use crate::foundation::core::{Rgba8, Size, now_millis};
use crate::foundation::error::{CarouselError, CarouselResult};

/// Gradient pairs a freshly added slide picks its accent from.
pub(crate) const ACCENT_GRADIENTS: [(Rgba8, Rgba8); 5] = [
    (Rgba8::rgb(0x66, 0x7e, 0xea), Rgba8::rgb(0x76, 0x4b, 0xa2)),
    (Rgba8::rgb(0xf0, 0x93, 0xfb), Rgba8::rgb(0xf5, 0x57, 0x6c)),
    (Rgba8::rgb(0x4f, 0xac, 0xfe), Rgba8::rgb(0x00, 0xf2, 0xfe)),
    (Rgba8::rgb(0x43, 0xe9, 0x7b), Rgba8::rgb(0x38, 0xf9, 0xd7)),
    (Rgba8::rgb(0xfa, 0x70, 0x9a), Rgba8::rgb(0xfe, 0xe1, 0x40)),
];

/// Gradient pairs assigned cyclically by position to slides parsed from command text.
pub(crate) const SEQUENCE_GRADIENTS: [(Rgba8, Rgba8); 10] = [
    (Rgba8::rgb(0x66, 0x7e, 0xea), Rgba8::rgb(0x76, 0x4b, 0xa2)),
    (Rgba8::rgb(0xf0, 0x93, 0xfb), Rgba8::rgb(0xf5, 0x57, 0x6c)),
    (Rgba8::rgb(0x4f, 0xac, 0xfe), Rgba8::rgb(0x00, 0xf2, 0xfe)),
    (Rgba8::rgb(0x43, 0xe9, 0x7b), Rgba8::rgb(0x38, 0xf9, 0xd7)),
    (Rgba8::rgb(0xfa, 0x70, 0x9a), Rgba8::rgb(0xfe, 0xe1, 0x40)),
    (Rgba8::rgb(0xa8, 0xed, 0xea), Rgba8::rgb(0xfe, 0xd6, 0xe3)),
    (Rgba8::rgb(0xff, 0xec, 0xd2), Rgba8::rgb(0xfc, 0xb6, 0x9f)),
    (Rgba8::rgb(0xff, 0x9a, 0x9e), Rgba8::rgb(0xfe, 0xcf, 0xef)),
    (Rgba8::rgb(0xa1, 0xc4, 0xfd), Rgba8::rgb(0xc2, 0xe9, 0xfb)),
    (Rgba8::rgb(0xd4, 0xfc, 0x79), Rgba8::rgb(0x96, 0xe6, 0xa1)),
];

/// Creation-time identifier of a slide, in milliseconds since the Unix epoch.
///
/// Uniqueness is advisory: [`SlideId::fresh`] bumps past existing ids so a document never holds
/// duplicates, but ids are not used as hard keys.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SlideId(pub i64);

impl SlideId {
    /// Id for the current instant.
    pub fn now() -> Self {
        Self(now_millis())
    }

    /// Id for the current instant, bumped past every id in `existing`.
    pub fn fresh<'a>(existing: impl IntoIterator<Item = &'a Slide>) -> Self {
        let floor = existing
            .into_iter()
            .map(|s| s.id.0.saturating_add(1))
            .max()
            .unwrap_or(i64::MIN);
        Self(now_millis().max(floor))
    }
}

/// Which background variant is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    /// Flat fill.
    Color,
    /// Two-stop linear gradient.
    #[default]
    Gradient,
    /// Decoded image drawn with cover fit.
    Image,
}

impl FromStr for BackgroundKind {
    type Err = CarouselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "color" | "colour" | "solid" => Ok(Self::Color),
            "gradient" => Ok(Self::Gradient),
            "image" => Ok(Self::Image),
            other => Err(CarouselError::validation(format!(
                "unknown background type \"{other}\""
            ))),
        }
    }
}

/// Direction of a linear gradient.
///
/// Serialized as CSS-like text: `"to right"`, `"to bottom"`, `"135deg"`. Unknown text parses to
/// [`GradientDirection::ToRight`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GradientDirection {
    /// Left edge to right edge.
    #[default]
    ToRight,
    /// Top edge to bottom edge.
    ToBottom,
    /// CSS angle in degrees, clockwise from "to top".
    Angle(f64),
}

impl GradientDirection {
    /// Lenient parse; anything unrecognized becomes `ToRight`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim().to_ascii_lowercase();
        let compact: String = s.split(|c: char| c.is_whitespace() || c == '-').collect();
        match compact.as_str() {
            "toright" => return Self::ToRight,
            "tobottom" => return Self::ToBottom,
            _ => {}
        }
        let number = compact.strip_suffix("deg").unwrap_or(&compact);
        match number.parse::<f64>() {
            Ok(deg) if deg.is_finite() => Self::Angle(deg),
            _ => Self::ToRight,
        }
    }
}

impl fmt::Display for GradientDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToRight => f.write_str("to right"),
            Self::ToBottom => f.write_str("to bottom"),
            Self::Angle(deg) => write!(f, "{deg}deg"),
        }
    }
}

impl serde::Serialize for GradientDirection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for GradientDirection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// Two-stop gradient settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientSpec {
    /// Color at stop 0.
    pub color1: Rgba8,
    /// Color at stop 1.
    pub color2: Rgba8,
    /// Gradient axis.
    #[serde(default)]
    pub direction: GradientDirection,
}

impl GradientSpec {
    /// Gradient running left to right.
    pub fn to_right(color1: Rgba8, color2: Rgba8) -> Self {
        Self {
            color1,
            color2,
            direction: GradientDirection::ToRight,
        }
    }
}

impl Default for GradientSpec {
    fn default() -> Self {
        let (a, b) = ACCENT_GRADIENTS[0];
        Self::to_right(a, b)
    }
}

/// Slide background.
///
/// All three variants keep their settings; `kind` selects the one that is drawn, so toggling the
/// type back restores what was there before.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Background {
    /// Active variant.
    #[serde(rename = "type", default)]
    pub kind: BackgroundKind,
    /// Flat fill color.
    #[serde(default = "default_background_color")]
    pub color: Rgba8,
    /// Gradient settings.
    #[serde(default)]
    pub gradient: GradientSpec,
    /// Image source, if one was ever set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSource>,
}

fn default_background_color() -> Rgba8 {
    Rgba8::WHITE
}

impl Default for Background {
    fn default() -> Self {
        Self {
            color: default_background_color(),
            ..Self::gradient(GradientSpec::default())
        }
    }
}

/// Borrowed view of the active background variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BackgroundFill<'a> {
    /// Flat fill.
    Color(Rgba8),
    /// Linear gradient.
    Gradient(&'a GradientSpec),
    /// Image; `None` when the image variant is active but nothing was set.
    Image(Option<&'a ImageSource>),
}

impl Background {
    /// Gradient background with a white color slot.
    pub fn gradient(spec: GradientSpec) -> Self {
        Self {
            kind: BackgroundKind::Gradient,
            color: Rgba8::WHITE,
            gradient: spec,
            image: None,
        }
    }

    /// Flat color background.
    pub fn color(color: Rgba8) -> Self {
        Self {
            kind: BackgroundKind::Color,
            color,
            gradient: GradientSpec::default(),
            image: None,
        }
    }

    /// The variant that will be drawn.
    pub fn active(&self) -> BackgroundFill<'_> {
        match self.kind {
            BackgroundKind::Color => BackgroundFill::Color(self.color),
            BackgroundKind::Gradient => BackgroundFill::Gradient(&self.gradient),
            BackgroundKind::Image => BackgroundFill::Image(self.image.as_ref()),
        }
    }
}

/// One of the four text layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextField {
    /// Large wrapped title.
    Headline,
    /// Smaller wrapped body line.
    Subtext,
    /// Call-to-action button label.
    Cta,
    /// Single-line corner mark.
    Watermark,
}

impl TextField {
    /// Draw order.
    pub const ALL: [Self; 4] = [Self::Headline, Self::Subtext, Self::Cta, Self::Watermark];
}

impl FromStr for TextField {
    type Err = CarouselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "headline" | "title" => Ok(Self::Headline),
            "subtext" | "description" | "caption" => Ok(Self::Subtext),
            "cta" => Ok(Self::Cta),
            "watermark" | "brand" => Ok(Self::Watermark),
            other => Err(CarouselError::validation(format!(
                "unknown text field \"{other}\""
            ))),
        }
    }
}

/// Text content of a slide. Empty strings are not drawn.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextSet {
    /// Headline text.
    pub headline: String,
    /// Subtext.
    pub subtext: String,
    /// Call-to-action label.
    pub cta: String,
    /// Watermark.
    pub watermark: String,
}

impl TextSet {
    /// Borrow one field.
    pub fn get(&self, field: TextField) -> &str {
        match field {
            TextField::Headline => &self.headline,
            TextField::Subtext => &self.subtext,
            TextField::Cta => &self.cta,
            TextField::Watermark => &self.watermark,
        }
    }

    /// Mutably borrow one field.
    pub fn get_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Headline => &mut self.headline,
            TextField::Subtext => &mut self.subtext,
            TextField::Cta => &mut self.cta,
            TextField::Watermark => &mut self.watermark,
        }
    }
}

/// Normalized anchor, as fractions of canvas width and height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    /// Horizontal fraction.
    pub x: f64,
    /// Vertical fraction.
    pub y: f64,
}

/// Anchors of the positioned text layers for one layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutAnchors {
    /// Headline block centre.
    pub headline: Anchor,
    /// Subtext block centre.
    pub subtext: Anchor,
    /// CTA button centre.
    pub cta: Anchor,
}

/// Named anchor preset. Unknown names fall back to `center`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Stack centred slightly above the middle.
    #[default]
    Center,
    /// Stack in the upper half.
    Top,
    /// Stack in the lower half.
    Bottom,
}

impl Layout {
    /// Lenient parse; unknown names become `Center`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            _ => Self::Center,
        }
    }

    /// Preset name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    /// Anchor fractions for each positioned field.
    pub fn anchors(self) -> LayoutAnchors {
        let at = |x: f64, y: f64| Anchor { x, y };
        match self {
            Self::Center => LayoutAnchors {
                headline: at(0.5, 0.4),
                subtext: at(0.5, 0.55),
                cta: at(0.5, 0.7),
            },
            Self::Top => LayoutAnchors {
                headline: at(0.5, 0.25),
                subtext: at(0.5, 0.4),
                cta: at(0.5, 0.55),
            },
            Self::Bottom => LayoutAnchors {
                headline: at(0.5, 0.6),
                subtext: at(0.5, 0.75),
                cta: at(0.5, 0.85),
            },
        }
    }
}

impl serde::Serialize for Layout {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> serde::Deserialize<'de> for Layout {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_name(&s))
    }
}

/// Logo overlay drawn between background and text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogoLayer {
    /// Image source; no source means no logo.
    pub src: Option<ImageSource>,
    /// Left edge in pixels.
    pub x: f64,
    /// Top edge in pixels.
    pub y: f64,
    /// Drawn width in pixels.
    pub width: f64,
    /// Drawn height in pixels.
    pub height: f64,
    /// Opacity in `0..=1`.
    pub opacity: f32,
}

impl Default for LogoLayer {
    fn default() -> Self {
        Self {
            src: None,
            x: 40.0,
            y: 40.0,
            width: 160.0,
            height: 60.0,
            opacity: 0.9,
        }
    }
}

impl LogoLayer {
    /// Default placement with the given source.
    pub fn with_source(src: ImageSource) -> Self {
        Self {
            src: Some(src),
            ..Self::default()
        }
    }

    /// Reject non-finite geometry and out-of-range opacity.
    pub fn validate(&self) -> CarouselResult<()> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.width < 0.0 || self.height < 0.0 {
            return Err(CarouselError::validation(
                "logo position/size must be finite and non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(CarouselError::validation("logo opacity must be in 0..=1"));
        }
        Ok(())
    }
}

/// One slide of the carousel.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Slide {
    /// Creation-time id.
    pub id: SlideId,
    /// Pixel width override; `None` inherits the platform preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixel height override; `None` inherits the platform preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Background settings.
    #[serde(default)]
    pub background: Background,
    /// Text layers.
    #[serde(default)]
    pub text: TextSet,
    /// Anchor preset.
    #[serde(default)]
    pub layout: Layout,
    /// Per-slide logo replacing the document logo.
    ///
    /// Also accepts a bare source string, which gets the default placement.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "logo_layer_or_source"
    )]
    pub logo: Option<LogoLayer>,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum LogoRepr {
    Source(ImageSource),
    Layer(LogoLayer),
}

fn logo_layer_or_source<'de, D>(de: D) -> Result<Option<LogoLayer>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let repr = <Option<LogoRepr> as serde::Deserialize>::deserialize(de)?;
    Ok(repr.and_then(|r| match r {
        LogoRepr::Source(src) if src.as_str().trim().is_empty() => None,
        LogoRepr::Source(src) => Some(LogoLayer::with_source(src)),
        LogoRepr::Layer(layer) => Some(layer),
    }))
}

impl Slide {
    /// A slide with empty text and a plain gradient background.
    pub fn blank(id: SlideId) -> Self {
        Self {
            id,
            width: None,
            height: None,
            background: Background::default(),
            text: TextSet::default(),
            layout: Layout::Center,
            logo: None,
        }
    }

    /// The slide produced by "add": placeholder copy and an accent gradient picked from the id.
    pub fn starter(id: SlideId) -> Self {
        let pick = (xxh3_64(&id.0.to_le_bytes()) % ACCENT_GRADIENTS.len() as u64) as usize;
        let (a, b) = ACCENT_GRADIENTS[pick];
        Self {
            background: Background::gradient(GradientSpec::to_right(a, b)),
            text: TextSet {
                headline: "New Slide".to_owned(),
                subtext: "Add your content here".to_owned(),
                cta: "Learn More".to_owned(),
                watermark: String::new(),
            },
            ..Self::blank(id)
        }
    }

    /// The gradient a slide at `position` gets when nothing else was specified.
    pub fn sequence_gradient(position: usize) -> GradientSpec {
        let (a, b) = SEQUENCE_GRADIENTS[position % SEQUENCE_GRADIENTS.len()];
        GradientSpec::to_right(a, b)
    }

    /// Size this slide renders at: its own override where set, otherwise `platform`.
    pub fn effective_size(&self, platform: Size) -> Size {
        Size {
            width: self.width.filter(|&w| w > 0).unwrap_or(platform.width),
            height: self.height.filter(|&h| h > 0).unwrap_or(platform.height),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/slide.rs"]
mod tests;
