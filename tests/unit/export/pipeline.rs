use std::io::{Cursor, Read as _};

use super::*;
use crate::foundation::core::Rgba8;
use crate::model::slide::{Background, SlideId};

struct Fixture {
    loader: ImageLoader,
    fonts: FontBook,
    style: RenderStyle,
}

impl Fixture {
    fn new() -> Self {
        Self {
            loader: ImageLoader::new("."),
            fonts: FontBook::empty(),
            style: RenderStyle::default(),
        }
    }

    fn exporter(&self) -> Exporter<'_> {
        Exporter::new(&self.loader, &self.fonts, &self.style)
    }
}

fn colored(id: i64, color: Rgba8) -> Slide {
    Slide {
        background: Background::color(color),
        ..Slide::blank(SlideId(id))
    }
}

fn small() -> Size {
    Size {
        width: 40,
        height: 30,
    }
}

#[test]
fn names_encode_position_and_platform() {
    assert_eq!(
        slide_file_name(0, Platform::Instagram, ExportFormat::Png),
        "slide-1-instagram.png"
    );
    assert_eq!(
        slide_file_name(4, Platform::Linkedin, ExportFormat::Jpeg),
        "slide-5-linkedin.jpg"
    );
    assert_eq!(
        bundle_file_name(Platform::Instagram, 1_700_000_000_000, "zip"),
        "carousel-instagram-1700000000000.zip"
    );
    assert_eq!("JPEG".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
    assert!("gif".parse::<ExportFormat>().is_err());
}

#[test]
fn export_one_renders_at_slide_size() {
    let fx = Fixture::new();
    let mut slide = colored(1, Rgba8::rgb(200, 10, 10));
    slide.width = Some(24);

    let report = fx
        .exporter()
        .export_one(&slide, 2, Platform::Instagram, small(), ExportFormat::Png)
        .unwrap();
    assert_eq!(report.artifact.name, "slide-3-instagram.png");
    assert_eq!(report.pages, 1);
    assert_eq!(report.notice, None);

    let img = image::load_from_memory(&report.artifact.bytes)
        .unwrap()
        .to_rgba8();
    assert_eq!(img.dimensions(), (24, 30));
    assert_eq!(img.get_pixel(5, 5).0, [200, 10, 10, 255]);
}

#[test]
fn export_all_zips_every_slide_in_order() {
    let fx = Fixture::new();
    let slides: Vec<Slide> = (0..4)
        .map(|i| colored(i, Rgba8::rgb(10 * i as u8, 0, 0)))
        .collect();

    let report = fx
        .exporter()
        .with_threads(Some(2))
        .export_all(&slides, Platform::Twitter, small(), ExportFormat::Png)
        .unwrap();
    assert_eq!(report.pages, 4);
    assert!(report.artifact.name.starts_with("carousel-twitter-"));
    assert!(report.artifact.name.ends_with(".zip"));

    let mut archive = zip::ZipArchive::new(Cursor::new(report.artifact.bytes)).unwrap();
    assert_eq!(archive.len(), 4);
    for i in 0..4 {
        let mut entry = archive.by_index(i).unwrap();
        assert_eq!(entry.name(), format!("slide-{}-twitter.png", i + 1));
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf).unwrap();
        let img = image::load_from_memory(&buf).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0[0], 10 * i as u8);
    }
}

#[test]
fn jpeg_bundle_uses_jpg_entries() {
    let fx = Fixture::new();
    let slides = vec![colored(1, Rgba8::WHITE), colored(2, Rgba8::WHITE)];
    let report = fx
        .exporter()
        .with_jpeg_quality(80)
        .export_all(&slides, Platform::Instagram, small(), ExportFormat::Jpeg)
        .unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(report.artifact.bytes)).unwrap();
    let names: Vec<_> = archive.file_names().map(str::to_owned).collect();
    assert!(names.contains(&"slide-1-instagram.jpg".to_owned()));
    assert!(names.contains(&"slide-2-instagram.jpg".to_owned()));
}

#[cfg(feature = "pdf")]
#[test]
fn pdf_has_one_page_per_slide() {
    let fx = Fixture::new();
    let mut tall = colored(2, Rgba8::WHITE);
    tall.height = Some(50);
    let slides = vec![colored(1, Rgba8::WHITE), tall, colored(3, Rgba8::WHITE)];

    let report = fx
        .exporter()
        .export_all(&slides, Platform::Instagram, small(), ExportFormat::Pdf)
        .unwrap();
    assert_eq!(report.notice, None);
    assert!(report.artifact.name.ends_with(".pdf"));
    let bytes = &report.artifact.bytes;
    assert!(bytes.starts_with(b"%PDF-"));
    let count = |needle: &[u8]| bytes.windows(needle.len()).filter(|w| *w == needle).count();
    assert_eq!(count(b"/Type /Page") - count(b"/Type /Pages"), 3);
    assert_eq!(count(b"/DCTDecode"), 3);
    assert_eq!(count(b"/Height 50"), 1);
}

#[test]
fn missing_pdf_backend_falls_back_to_png_zip() {
    let fx = Fixture::new();
    let slides = vec![colored(1, Rgba8::WHITE), colored(2, Rgba8::WHITE)];
    let report = fx
        .exporter()
        .with_pdf_backend(None)
        .export_all(&slides, Platform::Facebook, small(), ExportFormat::Pdf)
        .unwrap();
    assert_eq!(report.notice, Some(ExportNotice::PdfUnavailable));
    assert!(report.artifact.name.ends_with(".zip"));
    let archive = zip::ZipArchive::new(Cursor::new(report.artifact.bytes)).unwrap();
    assert_eq!(archive.len(), 2);
    assert!(archive.file_names().all(|n| n.ends_with(".png")));

    let single = fx
        .exporter()
        .with_pdf_backend(None)
        .export_one(&slides[0], 0, Platform::Facebook, small(), ExportFormat::Pdf)
        .unwrap();
    assert_eq!(single.artifact.name, "slide-1-facebook.png");
    assert_eq!(single.notice, Some(ExportNotice::PdfUnavailable));
}

#[test]
fn empty_input_and_bad_thread_count_are_rejected() {
    let fx = Fixture::new();
    assert!(matches!(
        fx.exporter()
            .export_all(&[], Platform::Instagram, small(), ExportFormat::Png),
        Err(CarouselError::Validation(_))
    ));
    let slides = vec![colored(1, Rgba8::WHITE)];
    assert!(
        fx.exporter()
            .with_threads(Some(0))
            .export_all(&slides, Platform::Instagram, small(), ExportFormat::Png)
            .is_err()
    );
}
