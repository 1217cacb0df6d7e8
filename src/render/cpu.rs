use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::{DecodedImage, RasterImage, rasterize_svg};
use crate::foundation::core::{Point, Rect, Rgba8, Size};
use crate::foundation::error::{CarouselError, CarouselResult};
use crate::layout::geometry::GradientLine;
use crate::render::surface::{
    FillShape, FrameRGBA, Paint, Surface, TextAlign, TextBaseline, TextPlacement, TextStyle,
};
use crate::render::text::{FontBook, TextShaper};

/// Curve flattening tolerance for rounded shapes, in pixels.
const PATH_TOLERANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    from: [u8; 4],
    to: [u8; 4],
    line_bits: [u64; 4],
    bounds: [i64; 4],
}

/// CPU raster surface backed by `vello_cpu`, with Parley text.
///
/// Draw calls are recorded into a render context and rasterized by [`PixmapSurface::frame`].
pub struct PixmapSurface {
    size: Size,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    shaper: TextShaper,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
    warned_missing_font: bool,
}

impl PixmapSurface {
    /// Surface of `size` drawing text with faces from `fonts`.
    pub fn new(size: Size, fonts: &FontBook) -> CarouselResult<Self> {
        let width: u16 = size
            .width
            .try_into()
            .map_err(|_| CarouselError::validation("surface width exceeds u16"))?;
        let height: u16 = size
            .height
            .try_into()
            .map_err(|_| CarouselError::validation("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(CarouselError::validation("surface width/height must be > 0"));
        }
        Ok(Self {
            size,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            shaper: TextShaper::new(fonts)?,
            gradient_cache: HashMap::new(),
            warned_missing_font: false,
        })
    }

    /// Rasterize everything drawn since the last clear into a premultiplied frame.
    pub fn frame(&mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: self.size.width,
            height: self.size.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn reset_state(&mut self) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    fn gradient_paint(
        &mut self,
        line: GradientLine,
        from: Rgba8,
        to: Rgba8,
        bounds: Rect,
    ) -> CarouselResult<vello_cpu::Image> {
        let key = GradientKey {
            from: [from.r, from.g, from.b, from.a],
            to: [to.r, to.g, to.b, to.a],
            line_bits: [
                line.start.x.to_bits(),
                line.start.y.to_bits(),
                line.end.x.to_bits(),
                line.end.y.to_bits(),
            ],
            bounds: [
                bounds.x0 as i64,
                bounds.y0 as i64,
                bounds.x1 as i64,
                bounds.y1 as i64,
            ],
        };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }

        let w = bounds.width().max(1.0) as u32;
        let h = bounds.height().max(1.0) as u32;
        let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
        for y in 0..h {
            for x in 0..w {
                let p = Point::new(
                    bounds.x0 + f64::from(x) + 0.5,
                    bounds.y0 + f64::from(y) + 0.5,
                );
                let c = from.lerp(to, line.t_at(p) as f32).to_premul();
                let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
                bytes[idx..idx + 4].copy_from_slice(&c);
            }
        }
        let img = image_from_premul(&bytes, w, h)?;
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }
}

impl Surface for PixmapSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.ctx.reset();
    }

    fn fill(&mut self, shape: &FillShape, paint: &Paint) {
        self.reset_state();
        let bounds = match shape {
            FillShape::Rect(r) => *r,
            FillShape::RoundedRect(rr) => rr.rect(),
        }
        .intersect(self.size.rect());
        if bounds.is_zero_area() {
            return;
        }

        // Gradients are painted as images anchored at the shape's bounding box origin.
        let origin = match *paint {
            Paint::Solid(c) => {
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
                Point::ZERO
            }
            Paint::Linear { line, from, to } => {
                let snapped = bounds.expand();
                match self.gradient_paint(line, from, to, snapped) {
                    Ok(img) => {
                        self.ctx.set_paint(img);
                        snapped.origin()
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "gradient fill failed; using start color");
                        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                            from.r, from.g, from.b, from.a,
                        ));
                        Point::ZERO
                    }
                }
            }
        };
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));

        match shape {
            FillShape::Rect(r) => {
                self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    r.x0 - origin.x,
                    r.y0 - origin.y,
                    r.x1 - origin.x,
                    r.y1 - origin.y,
                ));
            }
            FillShape::RoundedRect(rr) => {
                use vello_cpu::kurbo::Shape as _;

                let r = rr.rect();
                let path = vello_cpu::kurbo::RoundedRect::new(
                    r.x0 - origin.x,
                    r.y0 - origin.y,
                    r.x1 - origin.x,
                    r.y1 - origin.y,
                    rr.radii().top_left,
                )
                .to_path(PATH_TOLERANCE);
                self.ctx.fill_path(&path);
            }
        }
    }

    fn draw_image(
        &mut self,
        image: &DecodedImage,
        src: Rect,
        dst: Rect,
        opacity: f32,
    ) -> CarouselResult<()> {
        if src.is_zero_area() || dst.is_zero_area() || opacity <= 0.0 {
            return Ok(());
        }

        let (raster, src) = match image {
            DecodedImage::Raster(r) => (r.clone(), src),
            DecodedImage::Svg(svg) => {
                let (iw, ih) = image.intrinsic_size();
                let sx = dst.width() / src.width();
                let sy = dst.height() / src.height();
                let rw = (iw * sx).ceil().max(1.0) as u32;
                let rh = (ih * sy).ceil().max(1.0) as u32;
                let raster = rasterize_svg(svg, rw, rh)?;
                let kx = f64::from(rw) / iw;
                let ky = f64::from(rh) / ih;
                let scaled = Rect::new(src.x0 * kx, src.y0 * ky, src.x1 * kx, src.y1 * ky);
                (raster, scaled)
            }
        };
        let paint = image_from_raster(&raster)?;

        let tr = vello_cpu::kurbo::Affine::translate((dst.x0, dst.y0))
            * vello_cpu::kurbo::Affine::scale_non_uniform(
                dst.width() / src.width(),
                dst.height() / src.height(),
            )
            * vello_cpu::kurbo::Affine::translate((-src.x0, -src.y0));

        self.reset_state();
        self.ctx.set_transform(tr);
        self.ctx.set_paint(paint);
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            src.x0, src.y0, src.x1, src.y1,
        ));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
        Ok(())
    }

    fn measure_text(&mut self, text: &str, style: &TextStyle) -> f64 {
        self.shaper.measure(text, style)
    }

    fn fill_text(&mut self, text: &str, placement: TextPlacement, style: &TextStyle) {
        let Some(line) = self.shaper.shape(text, style) else {
            if !self.warned_missing_font {
                tracing::warn!("no font available; skipping text");
                self.warned_missing_font = true;
            }
            return;
        };

        let (w, h) = (line.width(), line.height());
        let x0 = match placement.align {
            TextAlign::Center => placement.at.x - w / 2.0,
            TextAlign::Right => placement.at.x - w,
        };
        let y0 = match placement.baseline {
            TextBaseline::Middle => placement.at.y - h / 2.0,
            TextBaseline::Bottom => placement.at.y - h,
        };

        self.reset_state();
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((x0, y0)));

        for layout_line in line.layout.lines() {
            for item in layout_line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let mut x = run.offset();
                let y = run.baseline();
                let glyphs = run.glyphs().map(|g| {
                    let glyph = vello_cpu::Glyph {
                        id: g.id,
                        x: x + g.x,
                        y: y - g.y,
                    };
                    x += g.advance;
                    glyph
                });
                self.ctx
                    .glyph_run(&line.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

fn image_from_raster(raster: &RasterImage) -> CarouselResult<vello_cpu::Image> {
    image_from_premul(raster.rgba8_premul.as_slice(), raster.width, raster.height)
}

fn image_from_premul(rgba8_premul: &[u8], width: u32, height: u32) -> CarouselResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CarouselError::decode("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CarouselError::decode("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CarouselError::decode("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
