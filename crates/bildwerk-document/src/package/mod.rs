// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Package module — wrap a single image into a PDF page, a legacy Word HTML
// document, or a one-sheet XLSX workbook. No branch compresses the image.

pub mod excel;
pub mod pdf;
pub mod word;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bildwerk_core::config::PackagingConfig;
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::{DocumentFormatKind, PackagedDocument};
use tracing::{info, instrument};

pub use excel::build_workbook;
pub use pdf::PdfWriter;
pub use word::build_word_document;

/// A raw image blob together with its declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    data: Vec<u8>,
    mime_type: String,
}

impl SourceImage {
    /// Wrap bytes with a caller-declared MIME type such as `image/png`.
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Wrap bytes, deriving the MIME type from their magic bytes.
    pub fn sniff(data: Vec<u8>) -> Result<Self> {
        let format = ::image::guess_format(&data).map_err(|err| {
            BildwerkError::Package(format!("cannot determine image type: {err}"))
        })?;
        Ok(Self::new(data, format.to_mime_type()))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 of the raw bytes (standard alphabet, padded).
    pub fn base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// The blob as a `data:<mime>;base64,<payload>` URL.
    pub fn data_url(&self) -> Result<String> {
        self.validate()?;
        Ok(format!("data:{};base64,{}", self.mime_type, self.base64()))
    }

    fn validate(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(BildwerkError::Package("source image is empty".into()));
        }
        let mime = self.mime_type.as_str();
        let valid_subtype = mime
            .strip_prefix("image/")
            .is_some_and(|sub| !sub.is_empty() && sub.chars().all(is_mime_char));
        if !valid_subtype {
            return Err(BildwerkError::Package(format!(
                "{mime:?} is not an image MIME type"
            )));
        }
        Ok(())
    }
}

fn is_mime_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-' | '_')
}

/// Dispatches a source image to the container writer for a format.
#[derive(Debug, Clone, Default)]
pub struct ContainerPackager {
    config: PackagingConfig,
}

impl ContainerPackager {
    pub fn new(config: PackagingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PackagingConfig {
        &self.config
    }

    /// Package `source` as a single-page document of `kind`.
    #[instrument(skip(self, source), fields(bytes = source.data().len(), mime = source.mime_type()))]
    pub fn package(&self, source: &SourceImage, kind: DocumentFormatKind) -> Result<PackagedDocument> {
        self.config.validate()?;

        let data = match kind {
            DocumentFormatKind::Pdf => PdfWriter::from_config(&self.config).create_from_image(source)?,
            DocumentFormatKind::Word => build_word_document(source, &self.config.word_title)?,
            DocumentFormatKind::Excel => {
                build_workbook(source, &self.config.sheet_name, &self.config.header_label)?
            }
        };

        info!(%kind, output_bytes = data.len(), "Packaged image");

        Ok(PackagedDocument {
            data,
            suggested_file_name: kind.default_file_name(),
            mime_type: kind.mime_type().to_string(),
        })
    }
}

/// Escape text for inclusion in XML or HTML content and attribute values.
pub(crate) fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;

    use ::image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    /// A small PNG with some structure in it.
    pub fn sample_png() -> Vec<u8> {
        let img = RgbImage::from_fn(48, 32, |x, y| Rgb([(x * 5) as u8, (y * 7) as u8, 90]));
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::sample_png;
    use super::*;

    #[test]
    fn data_url_uses_declared_mime_and_base64() {
        let source = SourceImage::new(vec![1, 2, 3], "image/png");
        assert_eq!(source.data_url().unwrap(), "data:image/png;base64,AQID");
    }

    #[test]
    fn sniff_detects_png() {
        let source = SourceImage::sniff(sample_png()).unwrap();
        assert_eq!(source.mime_type(), "image/png");
    }

    #[test]
    fn sniff_rejects_unknown_bytes() {
        let err = SourceImage::sniff(b"plain text".to_vec()).unwrap_err();
        assert!(matches!(err, BildwerkError::Package(_)));
    }

    #[test]
    fn empty_or_non_image_sources_cannot_be_packaged() {
        assert!(SourceImage::new(Vec::new(), "image/png").data_url().is_err());
        assert!(SourceImage::new(vec![1], "text/html").data_url().is_err());
        assert!(SourceImage::new(vec![1], "image/").data_url().is_err());
        assert!(SourceImage::new(vec![1], "image/png;x=\"y\"").data_url().is_err());
    }

    #[test]
    fn every_format_packages_a_valid_image() {
        let packager = ContainerPackager::default();
        let source = SourceImage::sniff(sample_png()).unwrap();
        for kind in DocumentFormatKind::ALL {
            let doc = packager.package(&source, kind).unwrap();
            assert!(!doc.data.is_empty());
            assert_eq!(doc.suggested_file_name, kind.default_file_name());
            assert_eq!(doc.mime_type, kind.mime_type());
        }
    }

    #[test]
    fn escape_markup_handles_specials() {
        assert_eq!(escape_markup(r#"a<b>&"c"'"#), "a&lt;b&gt;&amp;&quot;c&quot;&apos;");
    }
}
