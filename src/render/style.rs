use crate::foundation::core::Rgba8;
use crate::foundation::error::{CarouselError, CarouselResult};
use crate::model::slide::TextField;

/// Font metrics for one text layer, in pixels at the reference width.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldStyle {
    /// Font size.
    pub size: f64,
    /// Bold face.
    pub bold: bool,
    /// Fill color.
    pub color: Rgba8,
    /// Extra leading added to `size` to get the line height.
    pub line_gap: f64,
}

impl FieldStyle {
    const fn new(size: f64, bold: bool, color: Rgba8, line_gap: f64) -> Self {
        Self {
            size,
            bold,
            color,
            line_gap,
        }
    }

    /// Line height at scale 1.
    pub fn line_height(&self) -> f64 {
        self.size + self.line_gap
    }

    fn validate(&self, name: &str) -> CarouselResult<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(CarouselError::validation(format!(
                "{name} font size must be finite and > 0"
            )));
        }
        if !self.line_gap.is_finite() {
            return Err(CarouselError::validation(format!(
                "{name} line gap must be finite"
            )));
        }
        Ok(())
    }
}

/// Typography of the four text layers.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Typography {
    /// Headline.
    pub headline: FieldStyle,
    /// Subtext.
    pub subtext: FieldStyle,
    /// CTA label.
    pub cta: FieldStyle,
    /// Watermark.
    pub watermark: FieldStyle,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            headline: FieldStyle::new(72.0, true, Rgba8::rgb(0x1e, 0x29, 0x3b), 8.0),
            subtext: FieldStyle::new(32.0, false, Rgba8::rgb(0x64, 0x74, 0x8b), 6.0),
            cta: FieldStyle::new(42.0, true, Rgba8::WHITE, 0.0),
            watermark: FieldStyle::new(18.0, false, Rgba8::rgba(0, 0, 0, 77), 0.0),
        }
    }
}

impl Typography {
    /// Metrics of one layer.
    pub fn get(&self, field: TextField) -> &FieldStyle {
        match field {
            TextField::Headline => &self.headline,
            TextField::Subtext => &self.subtext,
            TextField::Cta => &self.cta,
            TextField::Watermark => &self.watermark,
        }
    }

    /// Mutable metrics of one layer.
    pub fn get_mut(&mut self, field: TextField) -> &mut FieldStyle {
        match field {
            TextField::Headline => &mut self.headline,
            TextField::Subtext => &mut self.subtext,
            TextField::Cta => &mut self.cta,
            TextField::Watermark => &mut self.watermark,
        }
    }
}

/// Placeholder drawn when the document has no slides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EmptyStateStyle {
    /// Canvas fill.
    pub background: Rgba8,
    /// Title line.
    pub title: String,
    /// Title metrics.
    pub title_style: FieldStyle,
    /// Title offset from the vertical centre.
    pub title_offset: f64,
    /// Hint line.
    pub hint: String,
    /// Hint metrics.
    pub hint_style: FieldStyle,
    /// Hint offset from the vertical centre.
    pub hint_offset: f64,
}

impl Default for EmptyStateStyle {
    fn default() -> Self {
        Self {
            background: Rgba8::rgb(0xf8, 0xfa, 0xfc),
            title: "Create Your First Slide".to_owned(),
            title_style: FieldStyle::new(48.0, true, Rgba8::rgb(0xcb, 0xd5, 0xe1), 0.0),
            title_offset: -40.0,
            hint: "Use the command box or add a slide to get started".to_owned(),
            hint_style: FieldStyle::new(24.0, false, Rgba8::rgb(0x94, 0xa3, 0xb8), 0.0),
            hint_offset: 20.0,
        }
    }
}

/// Drawing constants, all expressed at `reference_width` and scaled by `canvas_width /
/// reference_width` at render time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Canvas width the other metrics are authored for.
    pub reference_width: f64,
    /// Text layer metrics.
    pub typography: Typography,
    /// Horizontal padding on each side of wrapped text.
    pub side_padding: f64,
    /// Total horizontal padding added to the CTA label width.
    pub cta_padding: f64,
    /// CTA button height.
    pub cta_height: f64,
    /// CTA corner radius.
    pub cta_radius: f64,
    /// CTA fill, top stop.
    pub cta_top: Rgba8,
    /// CTA fill, bottom stop.
    pub cta_bottom: Rgba8,
    /// Distance of the watermark from the right and bottom edges.
    pub watermark_inset: f64,
    /// Fill used when a background image fails to decode.
    pub image_fallback: Rgba8,
    /// Empty-document placeholder.
    pub empty_state: EmptyStateStyle,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            reference_width: 1080.0,
            typography: Typography::default(),
            side_padding: 80.0,
            cta_padding: 80.0,
            cta_height: 64.0,
            cta_radius: 16.0,
            cta_top: Rgba8::rgb(0x00, 0xa3, 0xff),
            cta_bottom: Rgba8::rgb(0x00, 0x77, 0xcc),
            watermark_inset: 28.0,
            image_fallback: Rgba8::rgb(0xdd, 0xdd, 0xdd),
            empty_state: EmptyStateStyle::default(),
        }
    }
}

impl RenderStyle {
    /// Multiplier applied to every metric for a canvas `width` pixels wide.
    pub fn scale_for(&self, width: f64) -> f64 {
        width / self.reference_width
    }

    /// Reject non-positive or non-finite metrics.
    pub fn validate(&self) -> CarouselResult<()> {
        if !self.reference_width.is_finite() || self.reference_width <= 0.0 {
            return Err(CarouselError::validation(
                "style reference_width must be finite and > 0",
            ));
        }
        let t = &self.typography;
        t.headline.validate("headline")?;
        t.subtext.validate("subtext")?;
        t.cta.validate("cta")?;
        t.watermark.validate("watermark")?;
        self.empty_state.title_style.validate("empty-state title")?;
        self.empty_state.hint_style.validate("empty-state hint")?;

        for (name, v) in [
            ("side_padding", self.side_padding),
            ("cta_padding", self.cta_padding),
            ("cta_height", self.cta_height),
            ("cta_radius", self.cta_radius),
            ("watermark_inset", self.watermark_inset),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(CarouselError::validation(format!(
                    "style {name} must be finite and >= 0"
                )));
            }
        }
        if self.side_padding * 2.0 >= self.reference_width {
            return Err(CarouselError::validation(
                "style side_padding leaves no room for text",
            ));
        }
        Ok(())
    }
}
