use super::*;

fn surface(w: u32, h: u32) -> PixmapSurface {
    PixmapSurface::new(Size { width: w, height: h }, &FontBook::empty()).unwrap()
}

fn near(a: Rgba8, b: Rgba8, tol: u8) -> bool {
    a.r.abs_diff(b.r) <= tol && a.g.abs_diff(b.g) <= tol && a.b.abs_diff(b.b) <= tol && a.a.abs_diff(b.a) <= tol
}

#[test]
fn rejects_oversized_or_empty_surfaces() {
    assert!(PixmapSurface::new(Size { width: 70_000, height: 10 }, &FontBook::empty()).is_err());
    assert!(PixmapSurface::new(Size { width: 0, height: 10 }, &FontBook::empty()).is_err());
}

#[test]
fn solid_fill_covers_canvas() {
    let mut s = surface(8, 6);
    s.clear();
    s.fill(&FillShape::Rect(s.size().rect()), &Paint::Solid(Rgba8::rgb(10, 200, 30)));
    let frame = s.frame();
    assert_eq!(frame.data.len(), 8 * 6 * 4);
    assert_eq!(frame.pixel(0, 0), Some(Rgba8::rgb(10, 200, 30)));
    assert_eq!(frame.pixel(7, 5), Some(Rgba8::rgb(10, 200, 30)));
}

#[test]
fn clear_discards_previous_draws() {
    let mut s = surface(4, 4);
    s.fill(&FillShape::Rect(s.size().rect()), &Paint::Solid(Rgba8::WHITE));
    s.clear();
    let frame = s.frame();
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn horizontal_gradient_runs_left_to_right() {
    let size = Size { width: 100, height: 4 };
    let mut s = surface(100, 4);
    let from = Rgba8::rgb(0x66, 0x7e, 0xea);
    let to = Rgba8::rgb(0x76, 0x4b, 0xa2);
    let line = GradientLine::for_direction(crate::model::slide::GradientDirection::ToRight, size);
    s.fill(&FillShape::Rect(size.rect()), &Paint::Linear { line, from, to });
    let frame = s.frame();
    assert!(near(frame.pixel(0, 2).unwrap(), from, 2));
    assert!(near(frame.pixel(99, 2).unwrap(), to, 2));
}

#[test]
fn image_is_stretched_onto_destination() {
    let raster = RasterImage {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new([255, 0, 0, 255].repeat(4)),
    };
    let mut s = surface(10, 10);
    s.draw_image(
        &DecodedImage::Raster(raster),
        Rect::new(0.0, 0.0, 2.0, 2.0),
        Rect::new(0.0, 0.0, 10.0, 5.0),
        1.0,
    )
    .unwrap();
    let frame = s.frame();
    assert_eq!(frame.pixel(5, 2), Some(Rgba8::rgb(255, 0, 0)));
    assert_eq!(frame.pixel(5, 8).unwrap().a, 0);
}

#[test]
fn text_without_fonts_is_skipped_but_measured() {
    let mut s = surface(50, 20);
    let style = TextStyle {
        size: 10.0,
        bold: true,
        color: Rgba8::WHITE,
    };
    assert!(s.measure_text("abcd", &style) > 0.0);
    s.fill_text(
        "abcd",
        TextPlacement {
            at: Point::new(25.0, 10.0),
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
        },
        &style,
    );
    assert!(s.frame().data.iter().all(|&b| b == 0));
}
