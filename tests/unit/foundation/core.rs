use super::*;

#[test]
fn parses_hex_forms() {
    assert_eq!(Rgba8::parse("#ff0000").unwrap(), Rgba8::rgb(255, 0, 0));
    assert_eq!(Rgba8::parse("667EEA").unwrap(), Rgba8::rgb(0x66, 0x7e, 0xea));
    assert_eq!(Rgba8::parse("#fff").unwrap(), Rgba8::WHITE);
    assert_eq!(
        Rgba8::parse("#0000004d").unwrap(),
        Rgba8::rgba(0, 0, 0, 0x4d)
    );
}

#[test]
fn parses_css_rgba() {
    let c = Rgba8::parse("rgba(0,0,0,0.3)").unwrap();
    assert_eq!(c, Rgba8::rgba(0, 0, 0, 77));
    assert_eq!(Rgba8::parse("rgb(1, 2, 3)").unwrap(), Rgba8::rgb(1, 2, 3));
}

#[test]
fn rejects_malformed_colors() {
    assert!(Rgba8::parse("#12345").is_err());
    assert!(Rgba8::parse("#gg0000").is_err());
    assert!(Rgba8::parse("rgb(1,2)").is_err());
    assert!(Rgba8::parse("#ééé").is_err());
}

#[test]
fn display_roundtrips_through_serde() {
    let c = Rgba8::rgba(16, 32, 48, 128);
    let s = serde_json::to_string(&c).unwrap();
    assert_eq!(s, "\"#10203080\"");
    let back: Rgba8 = serde_json::from_str(&s).unwrap();
    assert_eq!(back, c);
    assert_eq!(Rgba8::rgb(0x66, 0x7e, 0xea).to_string(), "#667eea");
}

#[test]
fn lerp_endpoints() {
    let a = Rgba8::rgb(0, 0, 0);
    let b = Rgba8::rgb(200, 100, 50);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgba8::rgb(100, 50, 25));
}

#[test]
fn size_rejects_zero() {
    assert!(Size::new(0, 10).is_err());
    let s = Size::new(1080, 1350).unwrap();
    assert_eq!(s.rect(), Rect::new(0.0, 0.0, 1080.0, 1350.0));
}
