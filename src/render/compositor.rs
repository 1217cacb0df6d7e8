use crate::assets::loader::ImageLoader;
use crate::foundation::core::{Point, Rect, RoundedRect, Size};
use crate::layout::geometry::{GradientLine, anchor_point, cover_fit, cta_box};
use crate::layout::text::{block_line_centers, wrap_text};
use crate::model::slide::{Anchor, BackgroundFill, LogoLayer, Slide};
use crate::render::style::{FieldStyle, RenderStyle};
use crate::render::surface::{
    FillShape, Paint, Surface, TextAlign, TextBaseline, TextPlacement, TextStyle,
};

/// What degraded while drawing a slide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Background image was missing or failed to decode; the fallback fill was used.
    pub background_fallback: bool,
    /// Logo was configured but could not be drawn.
    pub logo_skipped: bool,
}

/// Draws slides onto a [`Surface`].
///
/// Layers are drawn strictly in order: background, logo, headline, subtext, CTA, watermark. Image
/// decodes complete before the next layer starts. Decode failures degrade the affected layer and
/// never abort the render.
#[derive(Clone, Copy, Debug)]
pub struct SlideRenderer<'a> {
    loader: &'a ImageLoader,
    style: &'a RenderStyle,
}

impl<'a> SlideRenderer<'a> {
    /// Renderer using `loader` for images and `style` for metrics.
    pub fn new(loader: &'a ImageLoader, style: &'a RenderStyle) -> Self {
        Self { loader, style }
    }

    /// Draw `slide` with `logo` over the whole surface.
    #[tracing::instrument(level = "debug", skip_all, fields(slide = slide.id.0))]
    pub fn render_slide(
        &self,
        surface: &mut dyn Surface,
        slide: &Slide,
        logo: &LogoLayer,
    ) -> RenderReport {
        let size = surface.size();
        let mut report = RenderReport::default();

        surface.clear();
        report.background_fallback = !self.draw_background(surface, slide, size);
        if logo.src.is_some() {
            report.logo_skipped = !self.draw_logo(surface, logo);
        }

        let scale = self.style.scale_for(size.w());
        let anchors = slide.layout.anchors();
        let typo = &self.style.typography;

        if !slide.text.headline.is_empty() {
            self.draw_wrapped(
                surface,
                &slide.text.headline,
                anchors.headline,
                &typo.headline,
                scale,
            );
        }
        if !slide.text.subtext.is_empty() {
            self.draw_wrapped(
                surface,
                &slide.text.subtext,
                anchors.subtext,
                &typo.subtext,
                scale,
            );
        }
        if !slide.text.cta.is_empty() {
            self.draw_cta(surface, &slide.text.cta, anchors.cta, scale);
        }
        if !slide.text.watermark.is_empty() {
            let inset = self.style.watermark_inset * scale;
            surface.fill_text(
                &slide.text.watermark,
                TextPlacement {
                    at: Point::new(size.w() - inset, size.h() - inset),
                    align: TextAlign::Right,
                    baseline: TextBaseline::Bottom,
                },
                &text_style(&typo.watermark, scale),
            );
        }
        report
    }

    /// Draw the placeholder shown when the document has no slides.
    pub fn render_empty_state(&self, surface: &mut dyn Surface) {
        let size = surface.size();
        let scale = self.style.scale_for(size.w());
        let empty = &self.style.empty_state;

        surface.clear();
        surface.fill(&FillShape::Rect(size.rect()), &Paint::Solid(empty.background));
        for (text, style, offset) in [
            (&empty.title, &empty.title_style, empty.title_offset),
            (&empty.hint, &empty.hint_style, empty.hint_offset),
        ] {
            surface.fill_text(
                text,
                TextPlacement {
                    at: Point::new(size.w() / 2.0, size.h() / 2.0 + offset * scale),
                    align: TextAlign::Center,
                    baseline: TextBaseline::Middle,
                },
                &text_style(style, scale),
            );
        }
    }

    /// Returns `false` when the fallback fill replaced a missing or broken image.
    fn draw_background(&self, surface: &mut dyn Surface, slide: &Slide, size: Size) -> bool {
        let canvas = size.rect();
        match slide.background.active() {
            BackgroundFill::Color(c) => {
                surface.fill(&FillShape::Rect(canvas), &Paint::Solid(c));
                true
            }
            BackgroundFill::Gradient(g) => {
                let paint = Paint::Linear {
                    line: GradientLine::for_direction(g.direction, size),
                    from: g.color1,
                    to: g.color2,
                };
                surface.fill(&FillShape::Rect(canvas), &paint);
                true
            }
            BackgroundFill::Image(source) => {
                let drawn = source.is_some_and(|src| {
                    let result = self.loader.load(src).and_then(|img| {
                        let (iw, ih) = img.intrinsic_size();
                        match cover_fit(iw, ih, canvas) {
                            Some(fit) => surface.draw_image(&img, fit.src, fit.dst, 1.0),
                            None => Err(crate::foundation::error::CarouselError::decode(
                                "background image has no pixels",
                            )),
                        }
                    });
                    if let Err(e) = &result {
                        tracing::warn!(error = %e, "background image unavailable; using fallback fill");
                    }
                    result.is_ok()
                });
                if !drawn {
                    surface.fill(
                        &FillShape::Rect(canvas),
                        &Paint::Solid(self.style.image_fallback),
                    );
                }
                drawn
            }
        }
    }

    /// Returns `false` when the logo could not be drawn.
    fn draw_logo(&self, surface: &mut dyn Surface, logo: &LogoLayer) -> bool {
        let Some(src) = &logo.src else {
            return false;
        };
        if logo.width <= 0.0 || logo.height <= 0.0 {
            return false;
        }
        let dst = Rect::new(logo.x, logo.y, logo.x + logo.width, logo.y + logo.height);
        let result = self.loader.load(src).and_then(|img| {
            let (iw, ih) = img.intrinsic_size();
            surface.draw_image(
                &img,
                Rect::new(0.0, 0.0, iw, ih),
                dst,
                logo.opacity.clamp(0.0, 1.0),
            )
        });
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "logo unavailable; skipping");
                false
            }
        }
    }

    fn draw_wrapped(
        &self,
        surface: &mut dyn Surface,
        text: &str,
        anchor: Anchor,
        field: &FieldStyle,
        scale: f64,
    ) {
        let size = surface.size();
        let style = text_style(field, scale);
        let max_width = size.w() - 2.0 * self.style.side_padding * scale;
        let lines = wrap_text(text, max_width, |s| surface.measure_text(s, &style));

        let at = anchor_point(size, anchor.x, anchor.y);
        let centers = block_line_centers(at.y, lines.len(), field.line_height() * scale);
        for (line, y) in lines.iter().zip(centers) {
            surface.fill_text(
                line,
                TextPlacement {
                    at: Point::new(at.x, y),
                    align: TextAlign::Center,
                    baseline: TextBaseline::Middle,
                },
                &style,
            );
        }
    }

    fn draw_cta(&self, surface: &mut dyn Surface, label: &str, anchor: Anchor, scale: f64) {
        let size = surface.size();
        let style = text_style(&self.style.typography.cta, scale);
        let label_width = surface.measure_text(label, &style);
        let at = anchor_point(size, anchor.x, anchor.y);
        let button: RoundedRect = cta_box(
            at,
            label_width,
            scale,
            self.style.cta_padding,
            self.style.cta_height,
            self.style.cta_radius,
        );

        let r = button.rect();
        let paint = Paint::Linear {
            line: GradientLine {
                start: Point::new(r.x0, r.y0),
                end: Point::new(r.x0, r.y1),
            },
            from: self.style.cta_top,
            to: self.style.cta_bottom,
        };
        surface.fill(&FillShape::RoundedRect(button), &paint);
        surface.fill_text(
            label,
            TextPlacement {
                at: r.center(),
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
            },
            &style,
        );
    }
}

fn text_style(field: &FieldStyle, scale: f64) -> TextStyle {
    TextStyle {
        size: field.size * scale,
        bold: field.bold,
        color: field.color,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
