#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! Carousel slide composition, rendering and export.
//!
//! An [`EditorSession`] owns a [`Document`] of ordered [`Slide`]s plus undo/redo [`History`].
//! Slides are drawn by the [`SlideRenderer`] onto any [`Surface`]; the CPU [`PixmapSurface`]
//! produces [`FrameRGBA`] pixels that the [`Exporter`] encodes as PNG, JPEG, a zip bundle or a
//! multi-page PDF. Decks can also be scripted with the line-oriented command language read by
//! [`CommandParser`].

mod assets;
mod command;
mod export;
mod foundation;
mod history;
mod layout;
mod model;
mod render;
mod session;

pub use assets::decode::{
    DecodedImage, RasterImage, SvgImage, decode_image, decode_raster, parse_svg, rasterize_svg,
    svg_options,
};
pub use assets::loader::ImageLoader;
pub use assets::source::{ImageSource, SourceKind};
pub use command::parser::{CommandParser, CommandScript, TypographyOverride, parse_commands};
pub use export::archive::ZipBundle;
pub use export::encode::{JPEG_MATTE, encode_jpeg, encode_png, write_file};
#[cfg(feature = "pdf")]
pub use export::pdf::ImagePdf;
pub use export::pdf::{PdfBackend, PdfPage};
pub use export::pipeline::{
    Artifact, ExportFormat, ExportNotice, ExportReport, Exporter, bundle_file_name,
    default_pdf_backend, slide_file_name,
};
pub use foundation::config::{EditorConfig, FontConfig};
pub use foundation::core::{Point, Rect, Rgba8, RoundedRect, Size, Vec2, now_millis};
pub use foundation::error::{CarouselError, CarouselResult};
pub use history::manager::History;
pub use history::snapshot::{Snapshot, StateFingerprint, fingerprint_document};
pub use layout::geometry::{CoverFit, GradientLine, anchor_point, cover_fit, cta_box};
pub use layout::text::{block_line_centers, centered_block_start, wrap_text};
pub use model::document::Document;
pub use model::persist::{DocumentFile, SharePayload};
pub use model::platform::{Orientation, Platform, PlatformPresets};
pub use model::slide::{
    Anchor, Background, BackgroundFill, BackgroundKind, GradientDirection, GradientSpec, Layout,
    LayoutAnchors, LogoLayer, Slide, SlideId, TextField, TextSet,
};
pub use render::compositor::{RenderReport, SlideRenderer};
pub use render::cpu::PixmapSurface;
pub use render::style::{EmptyStateStyle, FieldStyle, RenderStyle, Typography};
pub use render::surface::{
    DrawCall, FillShape, FrameRGBA, Paint, RecordingSurface, Surface, TextAlign, TextBaseline,
    TextPlacement, TextStyle,
};
pub use render::text::{FontBook, FontBytes, ShapedLine, TextBrushRgba8, TextShaper};
pub use session::editor::{ApplyMode, ApplyOutcome, EditorSession, RenderTicket};
