use std::sync::Arc;

use crate::assets::decode::DecodedImage;
use crate::foundation::core::{Point, Rect, RoundedRect, Rgba8, Size};
use crate::foundation::error::CarouselResult;
use crate::layout::geometry::GradientLine;

/// Paint for shape fills.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    /// Single color.
    Solid(Rgba8),
    /// Two-stop linear gradient along `line`.
    Linear {
        /// Gradient axis.
        line: GradientLine,
        /// Color at the start of the axis.
        from: Rgba8,
        /// Color at the end of the axis.
        to: Rgba8,
    },
}

impl Paint {
    /// Color of this paint at canvas point `p`.
    pub fn sample(&self, p: Point) -> Rgba8 {
        match *self {
            Self::Solid(c) => c,
            Self::Linear { line, from, to } => from.lerp(to, line.t_at(p) as f32),
        }
    }
}

/// Fillable shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FillShape {
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Rectangle with rounded corners.
    RoundedRect(RoundedRect),
}

/// Horizontal anchoring of a text run relative to its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// Position is the horizontal centre.
    Center,
    /// Position is the right edge.
    Right,
}

/// Vertical anchoring of a text run relative to its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    /// Position is the vertical middle of the line box.
    Middle,
    /// Position is the bottom of the line box.
    Bottom,
}

/// Resolved font settings for one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size: f64,
    /// Bold face.
    pub bold: bool,
    /// Fill color.
    pub color: Rgba8,
}

/// Single-line text placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextPlacement {
    /// Anchor point.
    pub at: Point,
    /// Horizontal anchoring.
    pub align: TextAlign,
    /// Vertical anchoring.
    pub baseline: TextBaseline,
}

/// 2D drawing target used by the compositor.
///
/// Calls are applied in order; later draws paint over earlier ones. Drawing outside the canvas is
/// clipped.
pub trait Surface {
    /// Canvas size in pixels.
    fn size(&self) -> Size;

    /// Reset the canvas to fully transparent.
    fn clear(&mut self);

    /// Fill `shape` with `paint`.
    fn fill(&mut self, shape: &FillShape, paint: &Paint);

    /// Draw the `src` region of `image` (in image pixels) stretched onto `dst`.
    fn draw_image(
        &mut self,
        image: &DecodedImage,
        src: Rect,
        dst: Rect,
        opacity: f32,
    ) -> CarouselResult<()>;

    /// Advance width of `text` set in `style`.
    fn measure_text(&mut self, text: &str, style: &TextStyle) -> f64;

    /// Draw one line of `text`.
    fn fill_text(&mut self, text: &str, placement: TextPlacement, style: &TextStyle);
}

/// Rendered frame in RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major pixel bytes.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha RGBA8 pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let mut px = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        if self.premultiplied {
            crate::foundation::math::unpremultiply_rgba8_in_place(&mut px);
        }
        Some(Rgba8::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Convert in place to straight alpha.
    pub fn into_straight(mut self) -> Self {
        if self.premultiplied {
            crate::foundation::math::unpremultiply_rgba8_in_place(&mut self.data);
            self.premultiplied = false;
        }
        self
    }
}

/// One call recorded by [`RecordingSurface`].
#[derive(Clone, Debug)]
pub enum DrawCall {
    /// [`Surface::clear`].
    Clear,
    /// [`Surface::fill`].
    Fill {
        /// Shape filled.
        shape: FillShape,
        /// Paint used.
        paint: Paint,
    },
    /// [`Surface::draw_image`].
    Image {
        /// Image drawn.
        image: Arc<DecodedImage>,
        /// Source crop.
        src: Rect,
        /// Destination box.
        dst: Rect,
        /// Layer opacity.
        opacity: f32,
    },
    /// [`Surface::fill_text`].
    Text {
        /// Line drawn.
        text: String,
        /// Placement.
        placement: TextPlacement,
        /// Style.
        style: TextStyle,
    },
}

/// Surface that records calls instead of rasterizing.
///
/// Text is measured at a fixed advance per character (`advance_em * size`), which makes layout
/// deterministic without fonts.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    size: Size,
    advance_em: f64,
    /// Recorded calls, oldest first.
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    /// Recorder for a canvas of `size` with an advance of `0.5em` per character.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            advance_em: 0.5,
            calls: Vec::new(),
        }
    }

    /// Return a copy with a different per-character advance.
    pub fn with_advance_em(mut self, advance_em: f64) -> Self {
        self.advance_em = advance_em;
        self
    }

    /// Text lines drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn fill(&mut self, shape: &FillShape, paint: &Paint) {
        self.calls.push(DrawCall::Fill {
            shape: *shape,
            paint: *paint,
        });
    }

    fn draw_image(
        &mut self,
        image: &DecodedImage,
        src: Rect,
        dst: Rect,
        opacity: f32,
    ) -> CarouselResult<()> {
        self.calls.push(DrawCall::Image {
            image: Arc::new(image.clone()),
            src,
            dst,
            opacity,
        });
        Ok(())
    }

    fn measure_text(&mut self, text: &str, style: &TextStyle) -> f64 {
        text.chars().count() as f64 * style.size * self.advance_em
    }

    fn fill_text(&mut self, text: &str, placement: TextPlacement, style: &TextStyle) {
        self.calls.push(DrawCall::Text {
            text: text.to_owned(),
            placement,
            style: *style,
        });
    }
}
