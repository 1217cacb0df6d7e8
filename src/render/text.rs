use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::config::FontConfig;
use crate::foundation::error::{CarouselError, CarouselResult};
use crate::render::surface::TextStyle;

/// Advance per character, in em, used when no font is available.
const FALLBACK_ADVANCE_EM: f64 = 0.55;

/// Families tried, in order, when looking up a system sans-serif face.
const SANS_FAMILIES: [&str; 6] = [
    "Inter",
    "Helvetica Neue",
    "Arial",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
];

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Raw font file plus face index within it.
#[derive(Clone, Debug)]
pub struct FontBytes {
    /// File contents.
    pub bytes: Arc<Vec<u8>>,
    /// Face index for collections.
    pub index: u32,
}

/// Resolved regular and bold faces, shared by every surface.
///
/// Either face stands in for the other when only one is available. A book without faces is valid:
/// text is then measured by estimate and not drawn.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    regular: Option<FontBytes>,
    bold: Option<FontBytes>,
}

impl FontBook {
    /// Book without faces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Book from explicit faces.
    pub fn new(regular: Option<FontBytes>, bold: Option<FontBytes>) -> Self {
        Self { regular, bold }
    }

    /// Resolve faces per `config`: explicit files first, then installed sans-serif faces.
    #[tracing::instrument(skip_all)]
    pub fn from_config(config: &FontConfig) -> CarouselResult<Self> {
        let mut regular = config.regular.as_deref().map(read_font).transpose()?;
        let mut bold = config.bold.as_deref().map(read_font).transpose()?;

        if config.use_system_fonts && (regular.is_none() || bold.is_none()) {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            if regular.is_none() {
                regular = query_system_face(&db, usvg::fontdb::Weight::NORMAL);
            }
            if bold.is_none() {
                bold = query_system_face(&db, usvg::fontdb::Weight::BOLD);
            }
        }

        let book = Self { regular, bold };
        if !book.has_fonts() {
            tracing::warn!("no usable font found; text will be measured by estimate and not drawn");
        }
        Ok(book)
    }

    /// Whether at least one face is available.
    pub fn has_fonts(&self) -> bool {
        self.regular.is_some() || self.bold.is_some()
    }

    fn face(&self, bold: bool) -> Option<&FontBytes> {
        if bold {
            self.bold.as_ref().or(self.regular.as_ref())
        } else {
            self.regular.as_ref().or(self.bold.as_ref())
        }
    }
}

fn read_font(path: &Path) -> CarouselResult<FontBytes> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read font file '{}'", path.display()))?;
    if bytes.is_empty() {
        return Err(CarouselError::validation(format!(
            "font file '{}' is empty",
            path.display()
        )));
    }
    Ok(FontBytes {
        bytes: Arc::new(bytes),
        index: 0,
    })
}

fn query_system_face(db: &usvg::fontdb::Database, weight: usvg::fontdb::Weight) -> Option<FontBytes> {
    let mut families: Vec<usvg::fontdb::Family<'_>> =
        SANS_FAMILIES.iter().map(|f| usvg::fontdb::Family::Name(*f)).collect();
    families.push(usvg::fontdb::Family::SansSerif);

    let id = db
        .query(&usvg::fontdb::Query {
            families: &families,
            weight,
            ..Default::default()
        })
        .or_else(|| db.faces().next().map(|f| f.id))?;

    db.with_face_data(id, |data, index| FontBytes {
        bytes: Arc::new(data.to_vec()),
        index,
    })
}

/// A font face registered with Parley, plus the matching renderer handle.
#[derive(Clone)]
struct RegisteredFace {
    family: String,
    font: vello_cpu::peniko::FontData,
}

/// Single-line text shaped by Parley, ready to draw.
pub struct ShapedLine {
    /// Laid-out glyphs.
    pub layout: parley::Layout<TextBrushRgba8>,
    /// Face the glyph ids refer to.
    pub font: vello_cpu::peniko::FontData,
}

impl ShapedLine {
    /// Advance width.
    pub fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }

    /// Line box height.
    pub fn height(&self) -> f64 {
        f64::from(self.layout.height())
    }
}

/// Parley contexts with the faces of a [`FontBook`] registered.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    regular: Option<RegisteredFace>,
    bold: Option<RegisteredFace>,
}

impl TextShaper {
    /// Register the faces of `book` with fresh Parley contexts.
    pub fn new(book: &FontBook) -> CarouselResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let regular = book
            .face(false)
            .map(|f| register_face(&mut font_ctx, f))
            .transpose()?;
        let bold = book
            .face(true)
            .map(|f| register_face(&mut font_ctx, f))
            .transpose()?;
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            regular,
            bold,
        })
    }

    /// Whether glyphs can be produced.
    pub fn has_fonts(&self) -> bool {
        self.regular.is_some()
    }

    /// Lay out `text` on one line; `None` when no face is registered.
    pub fn shape(&mut self, text: &str, style: &TextStyle) -> Option<ShapedLine> {
        let face = if style.bold {
            self.bold.as_ref()
        } else {
            self.regular.as_ref()
        }?
        .clone();

        let brush = TextBrushRgba8 {
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
            a: style.color.a,
        };
        let weight = if style.bold {
            parley::style::FontWeight::BOLD
        } else {
            parley::style::FontWeight::NORMAL
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size as f32));
        builder.push_default(parley::style::StyleProperty::FontWeight(weight));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        Some(ShapedLine {
            layout,
            font: face.font,
        })
    }

    /// Advance width of `text`, estimated from the character count when no face is registered.
    pub fn measure(&mut self, text: &str, style: &TextStyle) -> f64 {
        match self.shape(text, style) {
            Some(line) => line.width(),
            None => text.chars().count() as f64 * style.size * FALLBACK_ADVANCE_EM,
        }
    }
}

fn register_face(
    font_ctx: &mut parley::FontContext,
    face: &FontBytes,
) -> CarouselResult<RegisteredFace> {
    let bytes = face.bytes.as_ref().clone();
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| CarouselError::validation("no font families registered from font bytes"))?;
    let family = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| CarouselError::validation("registered font family has no name"))?
        .to_string();

    Ok(RegisteredFace {
        family,
        font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), face.index),
    })
}
