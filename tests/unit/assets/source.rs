use super::*;

#[test]
fn classifies_sources() {
    let data = ImageSource::new("data:image/png;base64,AAAA");
    assert_eq!(
        data.kind(),
        SourceKind::DataUrl {
            mime: "image/png",
            base64: true,
            payload: "AAAA"
        }
    );
    assert!(matches!(
        ImageSource::new("HTTPS://cdn.example/logo.png").kind(),
        SourceKind::Remote(_)
    ));
    assert_eq!(
        ImageSource::new("logos/brand.png").kind(),
        SourceKind::Path(Path::new("logos/brand.png"))
    );
}

#[test]
fn data_url_roundtrips_bytes() {
    let src = ImageSource::from_bytes("image/png", &[1, 2, 3, 250]);
    assert!(src.as_str().starts_with("data:image/png;base64,"));
    assert_eq!(src.read_bytes(Path::new(".")).unwrap(), vec![1, 2, 3, 250]);
}

#[test]
fn plain_data_url_is_percent_decoded() {
    let src = ImageSource::new("data:image/svg+xml;charset=utf-8,%3Csvg%3E");
    assert!(src.looks_like_svg());
    assert_eq!(src.read_bytes(Path::new(".")).unwrap(), b"<svg>".to_vec());
}

#[test]
fn remote_and_missing_sources_fail() {
    assert!(matches!(
        ImageSource::new("http://example.com/a.png").read_bytes(Path::new(".")),
        Err(CarouselError::Decode(_))
    ));
    assert!(
        ImageSource::new("definitely/not/here.png")
            .read_bytes(Path::new("/nonexistent-root"))
            .is_err()
    );
}

#[test]
fn relative_paths_resolve_against_root() {
    let src = ImageSource::new("img/a.svg");
    assert_eq!(
        src.resolve_path(Path::new("/assets")).unwrap(),
        Some(PathBuf::from("/assets/img/a.svg"))
    );
    assert_eq!(
        ImageSource::new("./img//b.png")
            .resolve_path(Path::new("/assets"))
            .unwrap(),
        Some(PathBuf::from("/assets/img/b.png"))
    );
    assert!(src.looks_like_svg());
    assert_eq!(
        ImageSource::new("data:,x").resolve_path(Path::new("/")).unwrap(),
        None
    );
}

#[test]
fn paths_outside_the_root_are_rejected() {
    let root = std::env::temp_dir().join(format!("carousel-source-{}", std::process::id()));
    let assets = root.join("assets");
    std::fs::create_dir_all(&assets).unwrap();
    let outside = root.join("outside.png");
    std::fs::write(&outside, b"not really a png").unwrap();

    for raw in [
        "../outside.png".to_owned(),
        "img/../../outside.png".to_owned(),
        "..\\outside.png".to_owned(),
        outside.to_str().unwrap().to_owned(),
    ] {
        let src = ImageSource::new(raw.as_str());
        assert!(
            matches!(src.resolve_path(&assets), Err(CarouselError::Validation(_))),
            "{raw} resolved"
        );
        assert!(
            matches!(src.read_bytes(&assets), Err(CarouselError::Validation(_))),
            "{raw} was read"
        );
    }

    std::fs::remove_dir_all(&root).ok();
}
