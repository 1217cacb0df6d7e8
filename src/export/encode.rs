use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{CarouselError, CarouselResult};
use crate::foundation::math::{flatten_premul_to_rgb8, premultiply_rgba8_in_place};
use crate::render::surface::FrameRGBA;

/// Background JPEG pages are flattened onto.
pub const JPEG_MATTE: [u8; 3] = [255, 255, 255];

fn check_frame(frame: &FrameRGBA) -> CarouselResult<()> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.width == 0 || frame.height == 0 || frame.data.len() != expected {
        return Err(CarouselError::export(format!(
            "frame buffer does not match {}x{} rgba8",
            frame.width, frame.height
        )));
    }
    Ok(())
}

/// Encode `frame` as PNG with straight alpha.
pub fn encode_png(frame: &FrameRGBA) -> CarouselResult<Vec<u8>> {
    check_frame(frame)?;
    let straight = frame.clone().into_straight();
    let img = image::RgbaImage::from_raw(straight.width, straight.height, straight.data)
        .ok_or_else(|| CarouselError::export("png buffer size mismatch"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("png encode failed")?;
    Ok(buf)
}

/// Encode `frame` as baseline JPEG, compositing transparency over [`JPEG_MATTE`].
pub fn encode_jpeg(frame: &FrameRGBA, quality: u8) -> CarouselResult<Vec<u8>> {
    check_frame(frame)?;
    let rgb = if frame.premultiplied {
        flatten_premul_to_rgb8(&frame.data, JPEG_MATTE)
    } else {
        let mut premul = frame.data.clone();
        premultiply_rgba8_in_place(&mut premul);
        flatten_premul_to_rgb8(&premul, JPEG_MATTE)
    };

    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode(
            &rgb,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgb8,
        )
        .context("jpeg encode failed")?;
    Ok(buf)
}

pub(crate) fn ensure_parent_dir(path: &Path) -> CarouselResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write `bytes` to `path`, creating missing parent directories.
pub fn write_file(path: impl Into<PathBuf>, bytes: &[u8]) -> CarouselResult<PathBuf> {
    let path = path.into();
    ensure_parent_dir(&path)?;
    std::fs::write(&path, bytes)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote export artifact");
    Ok(path)
}
