use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{CarouselError, CarouselResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Largest raster edge produced from an SVG.
const MAX_SVG_DIM: u32 = 16_384;

/// Decoded raster with premultiplied RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Parsed SVG, rasterized on demand at the size it is drawn.
#[derive(Clone, Debug)]
pub struct SvgImage {
    /// Parsed tree.
    pub tree: Arc<usvg::Tree>,
}

/// Decoded image handle shared between renders.
#[derive(Clone, Debug)]
pub enum DecodedImage {
    /// Bitmap formats (PNG, JPEG, GIF, WebP, ...).
    Raster(RasterImage),
    /// Vector image.
    Svg(SvgImage),
}

impl DecodedImage {
    /// Natural size in pixels.
    pub fn intrinsic_size(&self) -> (f64, f64) {
        match self {
            Self::Raster(r) => (f64::from(r.width), f64::from(r.height)),
            Self::Svg(s) => {
                let size = s.tree.size();
                (f64::from(size.width()), f64::from(size.height()))
            }
        }
    }
}

/// Decode a bitmap from memory and premultiply it.
pub fn decode_raster(bytes: &[u8]) -> CarouselResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CarouselError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(RasterImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parser options sharing `fontdb` for `<text>` elements and resolving relative hrefs against
/// `resources_dir`.
pub fn svg_options(
    fontdb: Arc<usvg::fontdb::Database>,
    resources_dir: Option<&Path>,
) -> usvg::Options<'static> {
    usvg::Options {
        resources_dir: resources_dir.map(Path::to_path_buf),
        fontdb,
        ..Default::default()
    }
}

/// Parse an SVG document.
pub fn parse_svg(bytes: &[u8], opts: &usvg::Options<'_>) -> CarouselResult<SvgImage> {
    let tree = usvg::Tree::from_data(bytes, opts)
        .map_err(|e| CarouselError::decode(format!("parse svg tree: {e}")))?;
    Ok(SvgImage {
        tree: Arc::new(tree),
    })
}

/// Decode `bytes` as SVG when hinted or sniffed, else as a bitmap. `svg_opts` is only invoked
/// for SVG input.
pub fn decode_image(
    bytes: &[u8],
    svg_hint: bool,
    svg_opts: impl FnOnce() -> usvg::Options<'static>,
) -> CarouselResult<DecodedImage> {
    if svg_hint || sniff_svg(bytes) {
        return parse_svg(bytes, &svg_opts()).map(DecodedImage::Svg);
    }
    decode_raster(bytes).map(DecodedImage::Raster)
}

fn sniff_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Rasterize `svg` scaled so its intrinsic size becomes `width` x `height`.
pub fn rasterize_svg(svg: &SvgImage, width: u32, height: u32) -> CarouselResult<RasterImage> {
    if width == 0 || height == 0 {
        return Err(CarouselError::decode("svg raster size must be > 0"));
    }
    if width > MAX_SVG_DIM || height > MAX_SVG_DIM {
        return Err(CarouselError::decode(format!(
            "svg raster size too large: {width}x{height} (max {MAX_SVG_DIM}x{MAX_SVG_DIM})"
        )));
    }
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .context("failed to allocate svg pixmap")?;

    let size = svg.tree.size();
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &svg.tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    Ok(RasterImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
    })
}
