use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use rayon::prelude::*;

use crate::assets::loader::ImageLoader;
use crate::export::archive::ZipBundle;
use crate::export::encode::{encode_jpeg, encode_png, write_file};
use crate::export::pdf::{PdfBackend, PdfPage};
use crate::foundation::core::{Size, now_millis};
use crate::foundation::error::{CarouselError, CarouselResult};
use crate::model::platform::Platform;
use crate::model::slide::{LogoLayer, Slide};
use crate::render::compositor::SlideRenderer;
use crate::render::cpu::PixmapSurface;
use crate::render::style::RenderStyle;
use crate::render::surface::FrameRGBA;
use crate::render::text::FontBook;

/// Output encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless PNG with alpha.
    #[default]
    Png,
    /// JPEG flattened onto white.
    Jpeg,
    /// One PDF page per slide.
    Pdf,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = CarouselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            other => Err(CarouselError::validation(format!(
                "unknown export format \"{other}\" (expected png, jpeg or pdf)"
            ))),
        }
    }
}

/// One produced file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested file name.
    pub name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Write into `dir` under [`Artifact::name`].
    pub fn write_into(&self, dir: &Path) -> CarouselResult<PathBuf> {
        write_file(dir.join(&self.name), &self.bytes)
    }
}

/// Substitutions made while exporting. The export itself still succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportNotice {
    /// PDF was requested without a PDF backend; PNG output was produced instead.
    PdfUnavailable,
}

impl fmt::Display for ExportNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PdfUnavailable => {
                f.write_str("PDF export is unavailable; exported PNG images instead")
            }
        }
    }
}

/// Outcome of an export.
#[derive(Clone, Debug)]
pub struct ExportReport {
    /// The file to hand to the user.
    pub artifact: Artifact,
    /// Slides rendered into it.
    pub pages: usize,
    /// Set when the requested format was substituted.
    pub notice: Option<ExportNotice>,
}

/// File name of slide `position` (0-based) exported for `platform`.
pub fn slide_file_name(position: usize, platform: Platform, format: ExportFormat) -> String {
    format!(
        "slide-{}-{}.{}",
        position + 1,
        platform.name(),
        format.extension()
    )
}

/// File name of a bundle exported for `platform` at `epoch_ms`.
pub fn bundle_file_name(platform: Platform, epoch_ms: i64, ext: &str) -> String {
    format!("carousel-{}-{epoch_ms}.{ext}", platform.name())
}

/// The PDF writer compiled into this build, if any.
pub fn default_pdf_backend() -> Option<Arc<dyn PdfBackend>> {
    #[cfg(feature = "pdf")]
    {
        Some(Arc::new(crate::export::pdf::ImagePdf))
    }
    #[cfg(not(feature = "pdf"))]
    {
        None
    }
}

/// Renders slides offscreen at their export size and packages the encoded results.
///
/// Every slide gets a fresh surface. Slides are rendered concurrently but results are assembled
/// in input order, so names and page order do not depend on scheduling. Export only borrows
/// slides; it never touches a document or its history.
pub struct Exporter<'a> {
    loader: &'a ImageLoader,
    fonts: &'a FontBook,
    style: &'a RenderStyle,
    logo: LogoLayer,
    jpeg_quality: u8,
    pdf: Option<Arc<dyn PdfBackend>>,
    threads: Option<usize>,
}

impl fmt::Debug for Exporter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exporter")
            .field("jpeg_quality", &self.jpeg_quality)
            .field("pdf", &self.pdf.is_some())
            .field("threads", &self.threads)
            .finish_non_exhaustive()
    }
}

impl<'a> Exporter<'a> {
    /// Exporter drawing with `loader`, `fonts` and `style`, no shared logo, JPEG quality 92.
    pub fn new(loader: &'a ImageLoader, fonts: &'a FontBook, style: &'a RenderStyle) -> Self {
        Self {
            loader,
            fonts,
            style,
            logo: LogoLayer::default(),
            jpeg_quality: 92,
            pdf: default_pdf_backend(),
            threads: None,
        }
    }

    /// Logo for slides without their own override.
    pub fn with_logo(mut self, logo: LogoLayer) -> Self {
        self.logo = logo;
        self
    }

    /// JPEG quality, `1..=100`.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Replace the PDF backend; `None` forces the PNG fallback.
    pub fn with_pdf_backend(mut self, pdf: Option<Arc<dyn PdfBackend>>) -> Self {
        self.pdf = pdf;
        self
    }

    /// Worker threads for bulk export; `None` uses the global rayon pool.
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Render `slide` at its effective size for a `platform_size` canvas.
    pub fn render_frame(&self, slide: &Slide, platform_size: Size) -> CarouselResult<FrameRGBA> {
        let size = slide.effective_size(platform_size);
        let mut surface = PixmapSurface::new(size, self.fonts)?;
        let logo = slide.logo.as_ref().unwrap_or(&self.logo);
        let report =
            SlideRenderer::new(self.loader, self.style).render_slide(&mut surface, slide, logo);
        if report != Default::default() {
            tracing::debug!(slide = slide.id.0, ?report, "slide rendered with fallbacks");
        }
        Ok(surface.frame())
    }

    /// Export the slide at `position` (0-based) as a single file.
    #[tracing::instrument(level = "debug", skip(self, slide), fields(slide = slide.id.0))]
    pub fn export_one(
        &self,
        slide: &Slide,
        position: usize,
        platform: Platform,
        platform_size: Size,
        format: ExportFormat,
    ) -> CarouselResult<ExportReport> {
        let frame = self.render_frame(slide, platform_size)?;
        let (format, notice) = self.resolve(format);
        let bytes = match (format, &self.pdf) {
            (ExportFormat::Png, _) => encode_png(&frame)?,
            (ExportFormat::Jpeg, _) => encode_jpeg(&frame, self.jpeg_quality)?,
            (ExportFormat::Pdf, Some(pdf)) => pdf.build(&[self.pdf_page(&frame)?])?,
            (ExportFormat::Pdf, None) => encode_png(&frame)?,
        };
        Ok(ExportReport {
            artifact: Artifact {
                name: slide_file_name(position, platform, format),
                bytes,
            },
            pages: 1,
            notice,
        })
    }

    /// Export every slide into one archive (raster formats) or one multi-page PDF.
    #[tracing::instrument(level = "debug", skip(self, slides), fields(slides = slides.len()))]
    pub fn export_all(
        &self,
        slides: &[Slide],
        platform: Platform,
        platform_size: Size,
        format: ExportFormat,
    ) -> CarouselResult<ExportReport> {
        if slides.is_empty() {
            return Err(CarouselError::validation("no slides to export"));
        }
        let (format, notice) = self.resolve(format);
        if let Some(n) = notice {
            tracing::warn!(notice = %n, "export format substituted");
        }

        let encoded = self.in_pool(|| {
            slides
                .par_iter()
                .map(|slide| self.encode_slide(slide, platform_size, format))
                .collect::<Vec<_>>()
        })?;
        let encoded = encoded.into_iter().collect::<CarouselResult<Vec<_>>>()?;
        let epoch = now_millis();

        let artifact = match (format, &self.pdf) {
            (ExportFormat::Pdf, Some(pdf)) => {
                let pages: Vec<PdfPage> = encoded
                    .into_iter()
                    .filter_map(|e| match e {
                        Encoded::Page(page) => Some(page),
                        Encoded::Raster(_) => None,
                    })
                    .collect();
                Artifact {
                    name: bundle_file_name(platform, epoch, "pdf"),
                    bytes: pdf.build(&pages)?,
                }
            }
            _ => {
                let mut bundle = ZipBundle::new();
                for (i, e) in encoded.iter().enumerate() {
                    if let Encoded::Raster(bytes) = e {
                        bundle.add(&slide_file_name(i, platform, format), bytes)?;
                    }
                }
                Artifact {
                    name: bundle_file_name(platform, epoch, "zip"),
                    bytes: bundle.finish()?,
                }
            }
        };
        tracing::debug!(name = %artifact.name, bytes = artifact.bytes.len(), "export assembled");

        Ok(ExportReport {
            artifact,
            pages: slides.len(),
            notice,
        })
    }

    fn resolve(&self, format: ExportFormat) -> (ExportFormat, Option<ExportNotice>) {
        match (format, &self.pdf) {
            (ExportFormat::Pdf, None) => (ExportFormat::Png, Some(ExportNotice::PdfUnavailable)),
            _ => (format, None),
        }
    }

    fn encode_slide(
        &self,
        slide: &Slide,
        platform_size: Size,
        format: ExportFormat,
    ) -> CarouselResult<Encoded> {
        let frame = self.render_frame(slide, platform_size)?;
        Ok(match format {
            ExportFormat::Pdf => Encoded::Page(self.pdf_page(&frame)?),
            ExportFormat::Jpeg => Encoded::Raster(encode_jpeg(&frame, self.jpeg_quality)?),
            ExportFormat::Png => Encoded::Raster(encode_png(&frame)?),
        })
    }

    fn pdf_page(&self, frame: &FrameRGBA) -> CarouselResult<PdfPage> {
        Ok(PdfPage {
            width: frame.width,
            height: frame.height,
            jpeg: encode_jpeg(frame, self.jpeg_quality)?,
        })
    }

    fn in_pool<T: Send>(&self, job: impl FnOnce() -> T + Send) -> CarouselResult<T> {
        match self.threads {
            None => Ok(job()),
            Some(0) => Err(CarouselError::validation(
                "export threads must be >= 1 when set",
            )),
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| {
                        CarouselError::export(format!("failed to build rayon thread pool: {e}"))
                    })?;
                Ok(pool.install(job))
            }
        }
    }
}

enum Encoded {
    Page(PdfPage),
    Raster(Vec<u8>),
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
