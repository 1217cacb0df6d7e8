use crate::foundation::core::{Point, Rect, RoundedRect, Size, Vec2};
use crate::model::slide::GradientDirection;

/// Source crop and destination box of a cover-fitted image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    /// Region of the image, in image pixels, that remains visible.
    pub src: Rect,
    /// Box the visible region is stretched onto.
    pub dst: Rect,
}

/// Scale an `image_w` x `image_h` image uniformly so it fully covers `target`, cropping the
/// overflow equally on both sides of the long axis.
///
/// Returns `None` for empty images or targets.
pub fn cover_fit(image_w: f64, image_h: f64, target: Rect) -> Option<CoverFit> {
    let (tw, th) = (target.width(), target.height());
    if !(image_w > 0.0 && image_h > 0.0 && tw > 0.0 && th > 0.0) {
        return None;
    }
    let scale = (tw / image_w).max(th / image_h);
    let visible_w = tw / scale;
    let visible_h = th / scale;
    let x0 = (image_w - visible_w) / 2.0;
    let y0 = (image_h - visible_h) / 2.0;
    Some(CoverFit {
        src: Rect::new(x0, y0, x0 + visible_w, y0 + visible_h),
        dst: target,
    })
}

/// Axis of a linear gradient in canvas coordinates; stop 0 sits at `start`, stop 1 at `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientLine {
    /// Point of stop 0.
    pub start: Point,
    /// Point of stop 1.
    pub end: Point,
}

impl GradientLine {
    /// Gradient axis for `direction` over a canvas of `size`.
    ///
    /// Angles follow CSS: 0deg points up, 90deg right, clockwise. The axis passes through the
    /// canvas centre and its length is `|w sin a| + |h cos a|`, so the corners farthest along the
    /// axis land exactly on the two stops.
    pub fn for_direction(direction: GradientDirection, size: Size) -> Self {
        let (w, h) = (size.w(), size.h());
        match direction {
            GradientDirection::ToRight => Self {
                start: Point::new(0.0, h / 2.0),
                end: Point::new(w, h / 2.0),
            },
            GradientDirection::ToBottom => Self {
                start: Point::new(w / 2.0, 0.0),
                end: Point::new(w / 2.0, h),
            },
            GradientDirection::Angle(deg) => {
                let a = deg.to_radians();
                let dir = Vec2::new(a.sin(), -a.cos());
                let half = (w * a.sin().abs() + h * a.cos().abs()) / 2.0;
                let c = Point::new(w / 2.0, h / 2.0);
                Self {
                    start: c - dir * half,
                    end: c + dir * half,
                }
            }
        }
    }

    /// Gradient parameter at `p`, clamped to `0..=1`.
    pub fn t_at(&self, p: Point) -> f64 {
        let axis = self.end - self.start;
        let len2 = axis.hypot2();
        if len2 <= f64::EPSILON {
            return 0.0;
        }
        ((p - self.start).dot(axis) / len2).clamp(0.0, 1.0)
    }
}

/// Rounded CTA button centred on `anchor` around a label `label_width` pixels wide.
///
/// Padding, height and radius are reference-width metrics multiplied by `scale`.
pub fn cta_box(
    anchor: Point,
    label_width: f64,
    scale: f64,
    padding: f64,
    height: f64,
    radius: f64,
) -> RoundedRect {
    let w = label_width + padding * scale;
    let h = height * scale;
    let rect = Rect::new(
        anchor.x - w / 2.0,
        anchor.y - h / 2.0,
        anchor.x + w / 2.0,
        anchor.y + h / 2.0,
    );
    RoundedRect::from_rect(rect, radius * scale)
}

/// Canvas position of a normalized anchor.
pub fn anchor_point(size: Size, fx: f64, fy: f64) -> Point {
    Point::new(size.w() * fx, size.h() * fy)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
