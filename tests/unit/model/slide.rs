use super::*;

#[test]
fn gradient_direction_parses_leniently() {
    assert_eq!(GradientDirection::parse("to right"), GradientDirection::ToRight);
    assert_eq!(GradientDirection::parse("to-bottom"), GradientDirection::ToBottom);
    assert_eq!(GradientDirection::parse("TO BOTTOM"), GradientDirection::ToBottom);
    assert_eq!(GradientDirection::parse("135deg"), GradientDirection::Angle(135.0));
    assert_eq!(GradientDirection::parse("45"), GradientDirection::Angle(45.0));
    assert_eq!(GradientDirection::parse("diagonal"), GradientDirection::ToRight);
    assert_eq!(GradientDirection::parse(""), GradientDirection::ToRight);
}

#[test]
fn switching_background_kind_keeps_other_variants() {
    let mut bg = Background::color(Rgba8::rgb(1, 2, 3));
    bg.gradient = GradientSpec::to_right(Rgba8::rgb(9, 9, 9), Rgba8::WHITE);
    bg.kind = BackgroundKind::Gradient;
    assert!(matches!(bg.active(), BackgroundFill::Gradient(g) if g.color1 == Rgba8::rgb(9, 9, 9)));
    bg.kind = BackgroundKind::Color;
    assert_eq!(bg.active(), BackgroundFill::Color(Rgba8::rgb(1, 2, 3)));
    bg.kind = BackgroundKind::Image;
    assert_eq!(bg.active(), BackgroundFill::Image(None));
}

#[test]
fn unknown_layout_falls_back_to_center() {
    assert_eq!(Layout::from_name("TOP"), Layout::Top);
    assert_eq!(Layout::from_name("sideways"), Layout::Center);
    let l: Layout = serde_json::from_str("\"diagonal\"").unwrap();
    assert_eq!(l, Layout::Center);
    assert_eq!(Layout::Bottom.anchors().cta.y, 0.85);
}

#[test]
fn slide_json_uses_persisted_field_names() {
    let slide = Slide::starter(SlideId(1_700_000_000_000));
    let v = serde_json::to_value(&slide).unwrap();
    assert_eq!(v["id"], 1_700_000_000_000i64);
    assert_eq!(v["background"]["type"], "gradient");
    assert_eq!(v["background"]["gradient"]["direction"], "to right");
    assert_eq!(v["text"]["headline"], "New Slide");
    assert_eq!(v["layout"], "center");
    assert!(v.get("width").is_none());

    let back: Slide = serde_json::from_value(v).unwrap();
    assert_eq!(back, slide);
}

#[test]
fn sparse_slide_json_fills_defaults() {
    let slide: Slide = serde_json::from_str(r#"{ "id": 5, "text": { "headline": "Hi" } }"#).unwrap();
    assert_eq!(slide.text.headline, "Hi");
    assert!(slide.text.cta.is_empty());
    assert_eq!(slide.layout, Layout::Center);
    assert_eq!(slide.background.kind, BackgroundKind::Gradient);
}

#[test]
fn starter_gradient_comes_from_accent_pool() {
    for id in 0..20 {
        let slide = Slide::starter(SlideId(id));
        let g = slide.background.gradient;
        assert!(ACCENT_GRADIENTS.contains(&(g.color1, g.color2)));
    }
}

#[test]
fn sequence_gradient_cycles() {
    assert_eq!(Slide::sequence_gradient(0), Slide::sequence_gradient(10));
    assert_ne!(Slide::sequence_gradient(0), Slide::sequence_gradient(1));
}

#[test]
fn fresh_id_never_collides() {
    let far_future = SlideId(i64::MAX / 2);
    let slides = vec![Slide::blank(far_future)];
    let id = SlideId::fresh(&slides);
    assert!(id > far_future);
}

#[test]
fn effective_size_prefers_override() {
    let mut slide = Slide::blank(SlideId(1));
    let preset = Size { width: 1080, height: 1080 };
    assert_eq!(slide.effective_size(preset), preset);
    slide.height = Some(1350);
    assert_eq!(slide.effective_size(preset), Size { width: 1080, height: 1350 });
}

#[test]
fn logo_validation() {
    LogoLayer::default().validate().unwrap();
    let bad = LogoLayer {
        opacity: 1.5,
        ..LogoLayer::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn default_background_matches_sparse_json() {
    let parsed: Background = serde_json::from_str("{}").unwrap();
    assert_eq!(Background::default(), parsed);
    assert_eq!(Background::default().kind, BackgroundKind::Gradient);
    assert_eq!(Background::default().color, Rgba8::WHITE);
    assert_eq!(Slide::blank(SlideId(1)).background, parsed);
}

#[test]
fn logo_accepts_bare_source_string() {
    let slide: Slide = serde_json::from_str(r#"{ "id": 1, "logo": "brand/logo.png" }"#).unwrap();
    let logo = slide.logo.unwrap();
    assert_eq!(logo.src, Some(ImageSource::new("brand/logo.png")));
    assert_eq!(logo.opacity, LogoLayer::default().opacity);

    let slide: Slide =
        serde_json::from_str(r#"{ "id": 2, "logo": { "src": "a.png", "x": 5, "opacity": 0.5 } }"#)
            .unwrap();
    let logo = slide.logo.unwrap();
    assert_eq!((logo.x, logo.opacity), (5.0, 0.5));

    for raw in [r#"{ "id": 3, "logo": null }"#, r#"{ "id": 3, "logo": "  " }"#] {
        let slide: Slide = serde_json::from_str(raw).unwrap();
        assert_eq!(slide.logo, None);
    }
    assert!(serde_json::from_str::<Slide>(r#"{ "id": 4, "logo": 7 }"#).is_err());
}
