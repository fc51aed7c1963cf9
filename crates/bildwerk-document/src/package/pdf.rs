// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — a single page with the image drawn into a fixed box, using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use bildwerk_core::config::PackagingConfig;
use bildwerk_core::error::{BildwerkError, Result};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use super::SourceImage;

/// At 72 DPI one image pixel is one PDF point, so box scaling is a plain
/// ratio of points to pixels.
const PLACEMENT_DPI: f32 = 72.0;

/// Writes a one-page PDF with the image stretched into a fixed box.
///
/// Offsets are measured from the top-left page corner and flipped to PDF's
/// bottom-left origin when the page is built.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    page_mm: (f32, f32),
    offset_mm: (f32, f32),
    box_mm: (f32, f32),
    title: String,
}

impl PdfWriter {
    pub fn from_config(config: &PackagingConfig) -> Self {
        Self {
            page_mm: config.pdf_page_mm,
            offset_mm: config.pdf_offset_mm,
            box_mm: config.pdf_box_mm,
            title: config.pdf_title.clone(),
        }
    }

    /// Bottom-left corner of the image box in points, PDF coordinates.
    pub fn box_origin_pt(&self) -> (f32, f32) {
        let page_h_pt = Mm(self.page_mm.1).into_pt().0;
        let x = Mm(self.offset_mm.0).into_pt().0;
        let y = page_h_pt - Mm(self.offset_mm.1).into_pt().0 - Mm(self.box_mm.1).into_pt().0;
        (x, y)
    }

    /// Create a single-page PDF containing the source image.
    ///
    /// The image is decoded and embedded as RGB8; it is stretched to the
    /// configured box regardless of its aspect ratio.
    #[instrument(skip(self, source), fields(bytes_len = source.data().len()))]
    pub fn create_from_image(&self, source: &SourceImage) -> Result<Vec<u8>> {
        // Same readability check as the other containers.
        source.data_url()?;

        info!(title = %self.title, "Creating image PDF");

        let dynamic_image = ::image::load_from_memory(source.data()).map_err(|err| {
            BildwerkError::Package(format!("failed to decode image for PDF: {err}"))
        })?;

        let img_width = dynamic_image.width() as usize;
        let img_height = dynamic_image.height() as usize;

        // Convert to RGB8 for printpdf.
        let rgb_image = dynamic_image.to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb_image.into_raw()),
            width: img_width,
            height: img_height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(&self.title);
        let xobject_id = doc.add_image(&raw);

        let box_w_pt = Mm(self.box_mm.0).into_pt().0;
        let box_h_pt = Mm(self.box_mm.1).into_pt().0;
        let scale_x = box_w_pt / img_width as f32;
        let scale_y = box_h_pt / img_height as f32;
        let (x_offset, y_offset) = self.box_origin_pt();

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x_offset)),
                translate_y: Some(Pt(y_offset)),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                dpi: Some(PLACEMENT_DPI),
                rotate: None,
            },
        }];

        let page = PdfPage::new(Mm(self.page_mm.0), Mm(self.page_mm.1), ops);
        doc.with_pages(vec![page]);

        debug!(x_offset, y_offset, scale_x, scale_y, "Image placed on page");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::sample_png;
    use super::*;

    #[test]
    fn produces_a_single_page_pdf() {
        let writer = PdfWriter::from_config(&PackagingConfig::default());
        let source = SourceImage::sniff(sample_png()).unwrap();
        let bytes = writer.create_from_image(&source).unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn box_is_measured_from_the_top_left() {
        let writer = PdfWriter::from_config(&PackagingConfig::default());
        let (x, y) = writer.box_origin_pt();
        // 10 mm from the left; 297 - 10 - 160 = 127 mm from the bottom.
        assert!((x - Mm(10.0).into_pt().0).abs() < 0.01);
        assert!((y - Mm(127.0).into_pt().0).abs() < 0.01);
    }

    #[test]
    fn undecodable_source_is_a_package_error() {
        let writer = PdfWriter::from_config(&PackagingConfig::default());
        let source = SourceImage::new(b"not really a png".to_vec(), "image/png");
        let err = writer.create_from_image(&source).unwrap_err();
        assert!(matches!(err, BildwerkError::Package(_)));
    }
}
