//! Page renderer: decode one image and append it as one page

use crate::compress::flatten_onto_white;
use crate::options::{A4_HEIGHT_MM, ConvertOptions, DEFAULT_PAGE_WIDTH_MM, PageSizing};
use crate::types::{ConvertError, GeneratedDocument, PageLayout, Result, SelectedFile};
use image::GenericImageView;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Pt, RawImage, RawImageData, RawImageFormat,
    XObjectTransform,
};

/// Pixel data of one decoded file, alive only for one page append
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    rgb: Vec<u8>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Decode the file at `index` of the selection
pub fn decode_image(index: usize, file: &SelectedFile) -> Result<DecodedImage> {
    let fail = |reason: String| ConvertError::Decode {
        index,
        name: file.name.clone(),
        reason,
    };

    let img = image::load_from_memory_with_format(&file.bytes, file.format.to_image_format())
        .map_err(|e| fail(e.to_string()))?;
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(fail("image has no pixels".to_string()));
    }

    Ok(DecodedImage {
        width,
        height,
        rgb: flatten_onto_white(&img).into_raw(),
    })
}

/// Height of an image scaled to `page_width`, preserving aspect ratio
pub fn page_height(width_px: u32, height_px: u32, page_width: f32) -> f32 {
    (height_px as f64 * page_width as f64 / width_px as f64) as f32
}

/// Accumulates pages for one generation call.
///
/// Appending needs `&mut self`, so a builder can only be driven by the single
/// loop that owns it. Pages stay plain pixel data until
/// [`DocumentBuilder::finish`] builds the PDF document, so the builder is `Send`.
pub struct DocumentBuilder {
    title: String,
    page_width_mm: f32,
    sizing: PageSizing,
    pending: Vec<DecodedImage>,
    pages: Vec<PageLayout>,
}

impl DocumentBuilder {
    pub fn new(title: &str, options: &ConvertOptions) -> Self {
        Self {
            title: title.to_string(),
            page_width_mm: options.page_width_mm,
            sizing: options.page_sizing,
            pending: Vec::new(),
            pages: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[PageLayout] {
        &self.pages
    }

    /// Add `image` as a new page, placed at the top-left corner and spanning
    /// the full page width.
    pub fn append_page(&mut self, source_name: &str, image: DecodedImage) -> &PageLayout {
        let image_width_mm = self.page_width_mm;
        let image_height_mm = page_height(image.width, image.height, image_width_mm);

        let (page_width_mm, page_height_mm) = match self.sizing {
            PageSizing::FitImage => (image_width_mm, image_height_mm),
            PageSizing::A4 => (DEFAULT_PAGE_WIDTH_MM, A4_HEIGHT_MM),
        };

        log::debug!(
            "Page {}: {} {}x{}px -> {:.1}x{:.1}mm",
            self.pages.len() + 1,
            source_name,
            image.width,
            image.height,
            image_width_mm,
            image_height_mm
        );

        self.pending.push(image);
        self.pages.push(PageLayout {
            source_name: source_name.to_string(),
            page_width_mm,
            page_height_mm,
            image_width_mm,
            image_height_mm,
        });
        &self.pages[self.pages.len() - 1]
    }

    /// Build and serialize the document. CPU-bound; run it off the async
    /// executor.
    pub fn finish(self, file_name: &str) -> GeneratedDocument {
        let mut doc = PdfDocument::new(&self.title);

        for (image, layout) in self.pending.into_iter().zip(&self.pages) {
            let page = image_page(&mut doc, image, layout);
            doc.pages.push(page);
        }

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            log::debug!("PDF serialization produced {} warnings", warnings.len());
        }

        GeneratedDocument {
            file_name: file_name.to_string(),
            bytes,
            pages: self.pages,
        }
    }
}

fn image_page(doc: &mut PdfDocument, image: DecodedImage, layout: &PageLayout) -> PdfPage {
    let (width, height) = (image.width, image.height);
    let raw = RawImage {
        pixels: RawImageData::U8(image.rgb),
        width: width as usize,
        height: height as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };
    let image_id = doc.add_image(&raw);

    // At 72 dpi one pixel maps to one point
    let scale_x = Mm(layout.image_width_mm).into_pt().0 / width as f32;
    let scale_y = Mm(layout.image_height_mm).into_pt().0 / height as f32;

    // PDF origin is bottom-left
    let ops = vec![Op::UseXobject {
        id: image_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(0.0)),
            translate_y: Some(Mm(layout.page_height_mm - layout.image_height_mm).into_pt()),
            rotate: None,
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            dpi: Some(72.0),
        },
    }];

    PdfPage::new(Mm(layout.page_width_mm), Mm(layout.page_height_mm), ops)
}
