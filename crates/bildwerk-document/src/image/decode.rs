// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image decoder — turns an opaque source blob into an `ImageAsset`.
//
// The format is sniffed from magic bytes rather than trusted from a file name
// or declared MIME type. EXIF orientation is applied so that the asset's
// dimensions match what the user sees.

use std::io::Cursor;

use ::image::metadata::Orientation;
use ::image::{DynamicImage, ImageDecoder as _, ImageFormat, ImageReader};
use bildwerk_core::error::{BildwerkError, EMPTY_INPUT, Result};
use tracing::{debug, instrument};

/// A decoded source image.
///
/// Holds both the decoded pixels and the original encoded bytes, so the
/// compressor can hand the original back untouched when re-encoding would
/// only make it bigger. Immutable once built.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    image: DynamicImage,
    format: ImageFormat,
    source: Vec<u8>,
}

impl ImageAsset {
    /// Assemble an asset from already-decoded parts.
    #[cfg(test)]
    pub(crate) fn from_parts(image: DynamicImage, format: ImageFormat, source: Vec<u8>) -> Self {
        Self {
            image,
            format,
            source,
        }
    }

    /// Width in pixels, after orientation.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels, after orientation.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The larger of width and height.
    pub fn long_edge(&self) -> u32 {
        self.width().max(self.height())
    }

    /// Size of the original encoded blob.
    pub fn byte_size(&self) -> u64 {
        self.source.len() as u64
    }

    /// Container format the source was sniffed as.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// MIME type of the source blob, e.g. `image/png`.
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// The original encoded bytes.
    pub fn source_bytes(&self) -> &[u8] {
        &self.source
    }

    /// Borrow the decoded pixels.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }
}

/// Decode raw bytes (JPEG, PNG, GIF, WebP, BMP, TIFF, ...) into an asset.
///
/// Fails with [`BildwerkError::Decode`] when the input is empty, not a
/// recognised raster format, or truncated/corrupt.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode(data: &[u8]) -> Result<ImageAsset> {
    if data.is_empty() {
        return Err(BildwerkError::Decode(EMPTY_INPUT.into()));
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|err| BildwerkError::Decode(format!("failed to sniff format: {err}")))?;
    let format = reader
        .format()
        .ok_or_else(|| BildwerkError::Decode("unrecognised image format".into()))?;

    let mut decoder = reader
        .into_decoder()
        .map_err(|err| BildwerkError::Decode(format!("failed to read {format:?} header: {err}")))?;
    // A broken EXIF block is not worth rejecting the image over.
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

    let mut image = DynamicImage::from_decoder(decoder)
        .map_err(|err| BildwerkError::Decode(format!("failed to decode {format:?}: {err}")))?;
    image.apply_orientation(orientation);

    if image.width() == 0 || image.height() == 0 {
        return Err(BildwerkError::Decode(format!(
            "image has zero width or height ({}x{})",
            image.width(),
            image.height()
        )));
    }

    debug!(
        width = image.width(),
        height = image.height(),
        ?format,
        ?orientation,
        "Image decoded from bytes"
    );

    Ok(ImageAsset {
        image,
        format,
        source: data.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]));
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn decodes_png_dimensions_and_size() {
        let bytes = png_bytes(40, 30);
        let asset = decode(&bytes).unwrap();
        assert_eq!(asset.width(), 40);
        assert_eq!(asset.height(), 30);
        assert_eq!(asset.long_edge(), 40);
        assert_eq!(asset.byte_size(), bytes.len() as u64);
        assert_eq!(asset.format(), ImageFormat::Png);
        assert_eq!(asset.mime_type(), "image/png");
        assert_eq!(asset.source_bytes(), bytes.as_slice());
    }

    #[test]
    fn non_image_bytes_fail_to_decode() {
        let err = decode(b"this is definitely not an image").unwrap_err();
        assert!(matches!(err, BildwerkError::Decode(_)));
    }

    #[test]
    fn empty_input_fails_to_decode() {
        let err = decode(&[]).unwrap_err();
        match err {
            BildwerkError::Decode(detail) => assert_eq!(detail, EMPTY_INPUT),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn truncated_png_fails_to_decode() {
        let bytes = png_bytes(64, 64);
        let err = decode(&bytes[..24]).unwrap_err();
        assert!(matches!(err, BildwerkError::Decode(_)));
    }
}
