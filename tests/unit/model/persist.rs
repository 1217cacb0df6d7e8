use super::*;
use crate::model::slide::SlideId;

#[test]
fn document_file_uses_camel_case_shape() {
    let mut doc = Document::new(15);
    doc.add_slide().unwrap();
    doc.add_slide().unwrap();
    doc.platform = Platform::Tiktok;

    let file = DocumentFile::capture(&doc, Some(42));
    let v: serde_json::Value = serde_json::from_str(&file.to_json().unwrap()).unwrap();
    assert_eq!(v["currentPlatform"], "tiktok");
    assert_eq!(v["currentSlideIndex"], 1);
    assert_eq!(v["timestamp"], 42);
    assert_eq!(v["slides"].as_array().unwrap().len(), 2);
}

#[test]
fn missing_fields_take_defaults() {
    let file = DocumentFile::from_json("{}").unwrap();
    assert!(file.slides.is_empty());
    assert_eq!(file.current_platform, Platform::Instagram);
    assert_eq!(file.current_slide_index, 0);
    assert_eq!(file.timestamp, None);
}

#[test]
fn apply_clamps_and_truncates() {
    let file = DocumentFile {
        slides: (0..20).map(|i| Slide::blank(SlideId(i))).collect(),
        current_platform: Platform::Youtube,
        current_slide_index: 99,
        timestamp: None,
    };
    let mut doc = Document::new(15);
    file.apply_to(&mut doc);
    assert_eq!(doc.len(), 15);
    assert_eq!(doc.current_index, 14);
    assert_eq!(doc.platform, Platform::Youtube);
}

#[test]
fn autosave_freshness() {
    let file = DocumentFile {
        timestamp: Some(1_000),
        ..DocumentFile::default()
    };
    assert!(file.is_fresh(1_000 + 500, 1_000));
    assert!(!file.is_fresh(1_000 + 1_001, 1_000));
    assert!(DocumentFile::default().is_fresh(i64::MAX, 0));
}

#[test]
fn share_token_roundtrip_and_expiry() {
    let mut doc = Document::new(15);
    doc.add_slide().unwrap();
    let payload = SharePayload::create(&doc, 10_000, 5_000);
    assert_eq!(payload.expires, 15_000);

    let token = payload.to_token().unwrap();
    let back = SharePayload::from_token(&token).unwrap();
    assert_eq!(back, payload);

    back.check_fresh(14_000).unwrap();
    let err = back.check_fresh(16_000).unwrap_err();
    assert!(matches!(err, CarouselError::Expired { expired_at_ms: 15_000 }));
}

#[test]
fn share_json_is_flat() {
    let payload = SharePayload::create(&Document::new(15), 0, 1);
    let v = serde_json::to_value(&payload).unwrap();
    assert_eq!(v["expires"], 1);
    assert_eq!(v["currentPlatform"], "instagram");
}

#[test]
fn garbage_token_is_decode_error() {
    assert!(matches!(
        SharePayload::from_token("***").unwrap_err(),
        CarouselError::Decode(_)
    ));
}

#[test]
fn documents_with_string_logos_still_load() {
    let json = r#"{
        "slides": [
            { "id": 1, "logo": "logo.png" },
            { "id": 2 }
        ],
        "currentSlideIndex": 1
    }"#;
    let file = DocumentFile::from_json(json).unwrap();
    assert_eq!(file.slides.len(), 2);
    assert_eq!(file.slides[0].id, SlideId(1));
    assert!(file.slides[0].logo.is_some());
    assert!(file.slides[1].logo.is_none());
}
