use std::io::Cursor;

use super::*;

fn png_data_url(w: u32, h: u32) -> ImageSource {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    ImageSource::from_bytes("image/png", &buf)
}

#[test]
fn caches_successful_decodes() {
    let loader = ImageLoader::new(".");
    let src = png_data_url(3, 2);
    let a = loader.load(&src).unwrap();
    let b = loader.load(&src).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.intrinsic_size(), (3.0, 2.0));
    assert_eq!(loader.cached_len(), 1);

    loader.clear();
    assert_eq!(loader.cached_len(), 0);
}

#[test]
fn failures_are_not_cached() {
    let loader = ImageLoader::new("/nonexistent-root");
    assert!(loader.load(&ImageSource::new("missing.png")).is_err());
    assert!(loader.load(&ImageSource::new("data:image/png;base64,@@@")).is_err());
    assert_eq!(loader.cached_len(), 0);
}

#[test]
fn loads_files_relative_to_root() {
    let dir = std::env::temp_dir().join(format!("carousel-loader-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("mark.svg"),
        br#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="4"></svg>"#,
    )
    .unwrap();

    let loader = ImageLoader::new(&dir);
    let img = loader.load(&ImageSource::new("mark.svg")).unwrap();
    assert!(matches!(img.as_ref(), DecodedImage::Svg(_)));
    assert_eq!(img.intrinsic_size(), (8.0, 4.0));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn refuses_files_outside_root() {
    let dir = std::env::temp_dir().join(format!("carousel-loader-escape-{}", std::process::id()));
    let root = dir.join("assets");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(
        dir.join("secret.svg"),
        br#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="4"></svg>"#,
    )
    .unwrap();

    let loader = ImageLoader::new(&root);
    assert!(loader.load(&ImageSource::new("../secret.svg")).is_err());
    let absolute = dir.join("secret.svg");
    assert!(
        loader
            .load(&ImageSource::new(absolute.to_str().unwrap()))
            .is_err()
    );
    assert_eq!(loader.cached_len(), 0);

    std::fs::remove_dir_all(&dir).ok();
}
