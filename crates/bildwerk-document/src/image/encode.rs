// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encoder — resize and re-encode decoded pixels at a given scale and quality.
//
// Output is a pure function of (pixels, scale, quality, format): resampling is
// always bilinear and the PNG settings are fixed.

use std::io::Cursor;

use ::image::DynamicImage;
use ::image::codecs::jpeg::JpegEncoder;
use ::image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use ::image::imageops::FilterType;
use bildwerk_core::OutputFormat;
use bildwerk_core::error::{BildwerkError, Result};
use tracing::{debug, instrument};

use super::decode::ImageAsset;

/// Resampling filter used for every resize. `Triangle` is bilinear.
pub const RESAMPLING: FilterType = FilterType::Triangle;

/// Re-encode `asset` scaled by `scale` at `quality` into `format`.
///
/// Both `scale` and `quality` must lie in `(0, 1]`. Quality is ignored by
/// formats without a lossy setting (PNG).
#[instrument(skip(asset), fields(width = asset.width(), height = asset.height()))]
pub fn encode(asset: &ImageAsset, scale: f32, quality: f32, format: OutputFormat) -> Result<Vec<u8>> {
    check_unit("scale", scale)?;
    let (width, height) = scaled_dimensions(asset.width(), asset.height(), scale);
    let resized = resize_to(asset.as_dynamic(), width, height);
    encode_image(&resized, quality, format)
}

/// Target dimensions for `scale`: each edge rounded, never below one pixel.
pub fn scaled_dimensions(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let apply = |edge: u32| -> u32 {
        let scaled = (edge as f64 * scale as f64).round();
        (scaled as u32).clamp(1, edge.max(1))
    };
    (apply(width), apply(height))
}

/// Resize to exactly `width` x `height`. Returns a copy when the size is
/// unchanged.
pub fn resize_to(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() == width && image.height() == height {
        return image.clone();
    }
    debug!(
        from_w = image.width(),
        from_h = image.height(),
        to_w = width,
        to_h = height,
        "Resizing image"
    );
    image.resize_exact(width, height, RESAMPLING)
}

/// Encode already-resized pixels.
pub fn encode_image(image: &DynamicImage, quality: f32, format: OutputFormat) -> Result<Vec<u8>> {
    check_unit("quality", quality)?;

    let mut buffer = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel; it is dropped rather than composited.
            let rgb = image.to_rgb8();
            let encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality));
            rgb.write_with_encoder(encoder).map_err(|err| {
                BildwerkError::Encode(format!("JPEG encoding failed: {err}"))
            })?;
        }
        OutputFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                Cursor::new(&mut buffer),
                CompressionType::Best,
                PngFilter::Adaptive,
            );
            let result = if image.color().has_alpha() {
                image.to_rgba8().write_with_encoder(encoder)
            } else {
                image.to_rgb8().write_with_encoder(encoder)
            };
            result.map_err(|err| BildwerkError::Encode(format!("PNG encoding failed: {err}")))?;
        }
    }

    debug!(
        width = image.width(),
        height = image.height(),
        quality,
        ?format,
        bytes = buffer.len(),
        "Encoded"
    );
    Ok(buffer)
}

/// Map a 0..=1 quality onto the JPEG encoder's 1..=100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

fn check_unit(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(BildwerkError::Encode(format!("{name} must be in (0, 1], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7) as u8, (y * 5) as u8, ((x ^ y) * 3) as u8])
        }))
    }

    fn asset(width: u32, height: u32) -> ImageAsset {
        ImageAsset::from_parts(gradient(width, height), ImageFormat::Png, Vec::new())
    }

    #[test]
    fn jpeg_output_has_magic_and_scaled_size() {
        let bytes = encode(&asset(200, 100), 0.5, 0.8, OutputFormat::Jpeg).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        let decoded = ::image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 50));
    }

    #[test]
    fn png_output_keeps_alpha() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 40])));
        let bytes = encode_image(&rgba, 1.0, OutputFormat::Png).unwrap();
        let decoded = ::image::load_from_memory(&bytes).unwrap();
        assert!(decoded.color().has_alpha());
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = asset(120, 90);
        let first = encode(&a, 0.7, 0.6, OutputFormat::Jpeg).unwrap();
        let second = encode(&a, 0.7, 0.6, OutputFormat::Jpeg).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn lower_quality_is_not_larger() {
        let a = asset(160, 160);
        let high = encode(&a, 1.0, 0.95, OutputFormat::Jpeg).unwrap();
        let low = encode(&a, 1.0, 0.3, OutputFormat::Jpeg).unwrap();
        assert!(low.len() <= high.len());
    }

    #[test]
    fn out_of_range_parameters_are_rejected() {
        let a = asset(10, 10);
        assert!(matches!(
            encode(&a, 0.0, 0.5, OutputFormat::Jpeg),
            Err(BildwerkError::Encode(_))
        ));
        assert!(encode(&a, 1.5, 0.5, OutputFormat::Jpeg).is_err());
        assert!(encode(&a, 0.5, f32::NAN, OutputFormat::Jpeg).is_err());
    }

    #[test]
    fn scaled_dimensions_never_collapse_or_grow() {
        assert_eq!(scaled_dimensions(5000, 4000, 0.16), (800, 640));
        assert_eq!(scaled_dimensions(3, 1000, 0.001), (1, 1));
        assert_eq!(scaled_dimensions(640, 480, 1.0), (640, 480));
    }

    #[test]
    fn quality_mapping_is_clamped() {
        assert_eq!(jpeg_quality(0.92), 92);
        assert_eq!(jpeg_quality(0.001), 1);
        assert_eq!(jpeg_quality(1.0), 100);
    }
}
