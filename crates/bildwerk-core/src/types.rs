// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Bildwerk.

use serde::{Deserialize, Serialize};

use crate::error::{BildwerkError, Result};

/// Bytes per megabyte as used by the size budget (decimal, not MiB).
pub const BYTES_PER_MB: f64 = 1_000_000.0;

/// User-supplied bounds for a compression run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionConstraints {
    /// Maximum encoded size in megabytes.
    pub max_size_mb: f64,
    /// Maximum length of the longest edge, in pixels.
    pub max_dimension_px: u32,
}

impl CompressionConstraints {
    /// Build validated constraints. Non-finite, zero and negative budgets are
    /// rejected, as is a zero dimension bound.
    pub fn new(max_size_mb: f64, max_dimension_px: u32) -> Result<Self> {
        let constraints = Self {
            max_size_mb,
            max_dimension_px,
        };
        constraints.validate()?;
        Ok(constraints)
    }

    /// Re-check constraints that may have been built field-by-field or
    /// deserialised.
    pub fn validate(&self) -> Result<()> {
        if !self.max_size_mb.is_finite() || self.max_size_mb <= 0.0 {
            return Err(BildwerkError::InvalidConstraints(format!(
                "maximum size must be a positive number of MB, got {}",
                self.max_size_mb
            )));
        }
        if self.max_dimension_px == 0 {
            return Err(BildwerkError::InvalidConstraints(
                "maximum dimension must be at least 1 pixel".into(),
            ));
        }
        if self.max_bytes() == 0 {
            return Err(BildwerkError::InvalidConstraints(format!(
                "maximum size of {} MB is below one byte",
                self.max_size_mb
            )));
        }
        Ok(())
    }

    /// The byte budget: `max_size_mb × 1e6`, rounded down.
    pub fn max_bytes(&self) -> u64 {
        (self.max_size_mb * BYTES_PER_MB).floor() as u64
    }
}

impl Default for CompressionConstraints {
    /// The values the original compressor shipped with: 1 MB, 800 px.
    fn default() -> Self {
        Self {
            max_size_mb: 1.0,
            max_dimension_px: 800,
        }
    }
}

/// Raster formats the encoder can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// MIME type of the encoded output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// File extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// Whether the encoder honours a lossy quality setting for this format.
    pub fn supports_quality(&self) -> bool {
        matches!(self, Self::Jpeg)
    }

    /// Download name for a compressed image in this format.
    pub fn default_file_name(&self) -> String {
        format!("compressed-image.{}", self.extension())
    }

    /// Map a MIME type back to an output format, if the encoder supports it.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Target container for the document packager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormatKind {
    Pdf,
    Word,
    Excel,
}

impl DocumentFormatKind {
    pub const ALL: [Self; 3] = [Self::Pdf, Self::Word, Self::Excel];

    /// MIME type of the packaged document.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Word => "application/msword",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// File extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "doc",
            Self::Excel => "xlsx",
        }
    }

    /// Default download name, e.g. `converted-image.pdf`.
    pub fn default_file_name(&self) -> String {
        format!("converted-image.{}", self.extension())
    }
}

impl std::fmt::Display for DocumentFormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pdf => "PDF",
            Self::Word => "Word",
            Self::Excel => "Excel",
        };
        f.write_str(name)
    }
}

/// Outcome of a compression search.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionResult {
    /// Encoded image bytes.
    pub data: Vec<u8>,
    /// Length of `data` in bytes.
    pub byte_size: u64,
    pub width: u32,
    pub height: u32,
    /// MIME type of `data`.
    pub mime_type: String,
    /// Encoder quality of the winning attempt (1.0 for passthrough).
    pub quality: f32,
    /// Scale factor relative to the original dimensions.
    pub scale: f32,
    /// Number of encode attempts evaluated.
    pub attempts: u32,
    /// `false` when the attempt budget ran out and this is the smallest
    /// attempt found rather than one within `max_bytes`.
    pub within_budget: bool,
    /// The original bytes were returned because no attempt beat them.
    pub passthrough: bool,
}

impl CompressionResult {
    /// Suggested download name derived from the result's MIME type.
    pub fn suggested_file_name(&self) -> String {
        match OutputFormat::from_mime_type(&self.mime_type) {
            Some(format) => format.default_file_name(),
            None => "compressed-image".to_string(),
        }
    }
}

/// A single-image document ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedDocument {
    pub data: Vec<u8>,
    pub suggested_file_name: String,
    pub mime_type: String,
}

/// Before/after sizes shown to the user once compression finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeReport {
    pub original_bytes: u64,
    pub compressed_bytes: u64,
}

impl SizeReport {
    pub fn new(original_bytes: u64, compressed_bytes: u64) -> Self {
        Self {
            original_bytes,
            compressed_bytes,
        }
    }

    /// Size in KB (bytes / 1024) formatted with two decimals.
    pub fn format_kb(bytes: u64) -> String {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    }

    /// Fraction of the original size saved, in 0.0..=1.0. Zero when the
    /// output is not smaller or the original was empty.
    pub fn savings_ratio(&self) -> f64 {
        if self.original_bytes == 0 || self.compressed_bytes >= self.original_bytes {
            return 0.0;
        }
        1.0 - self.compressed_bytes as f64 / self.original_bytes as f64
    }
}

impl std::fmt::Display for SizeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Original Size: {}, Compressed Size: {}",
            Self::format_kb(self.original_bytes),
            Self::format_kb(self.compressed_bytes)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraints_reject_non_positive_budget() {
        assert!(CompressionConstraints::new(0.0, 800).is_err());
        assert!(CompressionConstraints::new(-1.0, 800).is_err());
        assert!(CompressionConstraints::new(f64::NAN, 800).is_err());
        assert!(CompressionConstraints::new(f64::INFINITY, 800).is_err());
    }

    #[test]
    fn constraints_reject_zero_dimension() {
        let err = CompressionConstraints::new(1.0, 0).unwrap_err();
        assert!(matches!(err, BildwerkError::InvalidConstraints(_)));
    }

    #[test]
    fn max_bytes_is_decimal_megabytes() {
        let c = CompressionConstraints::new(1.0, 800).unwrap();
        assert_eq!(c.max_bytes(), 1_000_000);
        let c = CompressionConstraints::new(0.25, 800).unwrap();
        assert_eq!(c.max_bytes(), 250_000);
    }

    #[test]
    fn document_defaults() {
        assert_eq!(DocumentFormatKind::Pdf.default_file_name(), "converted-image.pdf");
        assert_eq!(DocumentFormatKind::Word.default_file_name(), "converted-image.doc");
        assert_eq!(DocumentFormatKind::Excel.default_file_name(), "converted-image.xlsx");
        assert_eq!(DocumentFormatKind::Word.mime_type(), "application/msword");
    }

    #[test]
    fn output_format_round_trips_mime() {
        for format in [OutputFormat::Jpeg, OutputFormat::Png] {
            assert_eq!(OutputFormat::from_mime_type(format.mime_type()), Some(format));
        }
        assert_eq!(OutputFormat::from_mime_type("image/gif"), None);
        assert_eq!(OutputFormat::Jpeg.default_file_name(), "compressed-image.jpg");
    }

    #[test]
    fn size_report_formats_kilobytes() {
        let report = SizeReport::new(51_200, 25_600);
        assert_eq!(SizeReport::format_kb(51_200), "50.00 KB");
        assert!((report.savings_ratio() - 0.5).abs() < 1e-9);
        assert_eq!(
            report.to_string(),
            "Original Size: 50.00 KB, Compressed Size: 25.00 KB"
        );
    }

    #[test]
    fn size_report_never_reports_negative_savings() {
        assert_eq!(SizeReport::new(100, 200).savings_ratio(), 0.0);
        assert_eq!(SizeReport::new(0, 0).savings_ratio(), 0.0);
    }
}
