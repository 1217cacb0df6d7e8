use crate::foundation::error::CarouselResult;
#[cfg(feature = "pdf")]
use crate::foundation::error::CarouselError;

/// One page: a baseline JPEG drawn full-bleed on a `width x height` point page.
#[derive(Clone, Debug)]
pub struct PdfPage {
    /// Page width in points (one point per pixel).
    pub width: u32,
    /// Page height in points.
    pub height: u32,
    /// JPEG stream embedded with `DCTDecode`.
    pub jpeg: Vec<u8>,
}

/// Something that can assemble a multi-page PDF from rendered pages.
pub trait PdfBackend: Send + Sync {
    /// Build the document bytes.
    fn build(&self, pages: &[PdfPage]) -> CarouselResult<Vec<u8>>;
}

/// [`PdfBackend`] on top of `pdf-writer`.
///
/// Refs per page `k` (0-based): page `3 + 3k`, content stream `4 + 3k`, image XObject `5 + 3k`.
/// Refs 1 and 2 are the catalog and page tree.
#[cfg(feature = "pdf")]
#[derive(Clone, Copy, Debug, Default)]
pub struct ImagePdf;

#[cfg(feature = "pdf")]
impl PdfBackend for ImagePdf {
    fn build(&self, pages: &[PdfPage]) -> CarouselResult<Vec<u8>> {
        use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};

        if pages.is_empty() {
            return Err(CarouselError::export("pdf needs at least one page"));
        }
        let count = i32::try_from(pages.len())
            .map_err(|_| CarouselError::export("too many pdf pages"))?;

        let catalog_id = Ref::new(1);
        let tree_id = Ref::new(2);
        let page_ref = |k: i32, slot: i32| Ref::new(3 + 3 * k + slot);

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids((0..count).map(|k| page_ref(k, 0)))
            .count(count);

        for (k, page) in (0..count).zip(pages) {
            if page.width == 0 || page.height == 0 || page.jpeg.is_empty() {
                return Err(CarouselError::export(format!("pdf page {} is empty", k + 1)));
            }
            let (page_id, content_id, image_id) = (page_ref(k, 0), page_ref(k, 1), page_ref(k, 2));
            let (w, h) = (page.width as f32, page.height as f32);
            let image_name = Name(b"Im0");

            let mut writer = pdf.page(page_id);
            writer.media_box(Rect::new(0.0, 0.0, w, h));
            writer.parent(tree_id);
            writer.contents(content_id);
            writer.resources().x_objects().pair(image_name, image_id);
            writer.finish();

            let mut image = pdf.image_xobject(image_id, &page.jpeg);
            image.filter(Filter::DctDecode);
            image.width(dim(page.width)?);
            image.height(dim(page.height)?);
            image.color_space().device_rgb();
            image.bits_per_component(8);
            image.finish();

            let mut content = Content::new();
            content.save_state();
            content.transform([w, 0.0, 0.0, h, 0.0, 0.0]);
            content.x_object(image_name);
            content.restore_state();
            pdf.stream(content_id, &content.finish());
        }
        Ok(pdf.finish())
    }
}

#[cfg(feature = "pdf")]
fn dim(v: u32) -> CarouselResult<i32> {
    i32::try_from(v).map_err(|_| CarouselError::export(format!("pdf page dimension {v} too large")))
}
