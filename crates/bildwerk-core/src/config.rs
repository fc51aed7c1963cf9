// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration. Supplied by the embedder per session; never persisted.

use serde::{Deserialize, Serialize};

use crate::error::{BildwerkError, Result};

/// Settings for the compression engine and the document packager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub compression: CompressionConfig,
    pub packaging: PackagingConfig,
}

impl AppConfig {
    /// Parse a JSON document. Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.compression.validate()?;
        self.packaging.validate()
    }
}

/// Which raster format compressed output is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPolicy {
    /// Always re-encode as JPEG.
    #[default]
    Jpeg,
    /// Keep PNG sources as PNG; everything else becomes JPEG.
    KeepOriginal,
}

/// Search parameters for the size-constrained compressor.
///
/// Quality values are on the encoder's 0..=1 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Quality of the first attempt.
    pub initial_quality: f32,
    /// Amount subtracted from the quality between attempts.
    pub quality_step: f32,
    /// Lowest acceptable quality; below this the search shrinks the image instead.
    pub quality_floor: f32,
    /// Factor applied to the scale on every resolution step (0 < step < 1).
    pub scale_step: f32,
    /// Upper bound on encode attempts per call.
    pub max_attempts: u32,
    pub output: OutputPolicy,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            initial_quality: 0.92,
            quality_step: 0.1,
            quality_floor: 0.5,
            scale_step: 0.75,
            max_attempts: 10,
            output: OutputPolicy::Jpeg,
        }
    }
}

impl CompressionConfig {
    pub fn validate(&self) -> Result<()> {
        let in_unit = |v: f32| v.is_finite() && v > 0.0 && v <= 1.0;

        if !in_unit(self.initial_quality) {
            return Err(BildwerkError::Config(format!(
                "initial_quality must be in (0, 1], got {}",
                self.initial_quality
            )));
        }
        if !in_unit(self.quality_floor) || self.quality_floor > self.initial_quality {
            return Err(BildwerkError::Config(format!(
                "quality_floor must be in (0, initial_quality], got {}",
                self.quality_floor
            )));
        }
        if !in_unit(self.quality_step) {
            return Err(BildwerkError::Config(format!(
                "quality_step must be in (0, 1], got {}",
                self.quality_step
            )));
        }
        if !self.scale_step.is_finite() || self.scale_step <= 0.0 || self.scale_step >= 1.0 {
            return Err(BildwerkError::Config(format!(
                "scale_step must be in (0, 1), got {}",
                self.scale_step
            )));
        }
        if self.max_attempts == 0 {
            return Err(BildwerkError::Config("max_attempts must be at least 1".into()));
        }
        Ok(())
    }
}

/// Layout and labels for the document packager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagingConfig {
    /// Page size in millimetres (width, height). A4 portrait by default.
    pub pdf_page_mm: (f32, f32),
    /// Offset of the image box from the top-left page corner, in millimetres.
    pub pdf_offset_mm: (f32, f32),
    /// Size of the image box, in millimetres. The image is stretched to fill it.
    pub pdf_box_mm: (f32, f32),
    pub pdf_title: String,
    pub sheet_name: String,
    /// Text of the header cell above the image data.
    pub header_label: String,
    /// `<title>` of the Word document shell.
    pub word_title: String,
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            pdf_page_mm: (210.0, 297.0),
            pdf_offset_mm: (10.0, 10.0),
            pdf_box_mm: (180.0, 160.0),
            pdf_title: "Converted Image".into(),
            sheet_name: "Sheet1".into(),
            header_label: "Image".into(),
            word_title: "Converted Image".into(),
        }
    }
}

impl PackagingConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = |(w, h): (f32, f32)| w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0;

        if !positive(self.pdf_page_mm) || !positive(self.pdf_box_mm) {
            return Err(BildwerkError::Config(
                "PDF page and image box must have positive dimensions".into(),
            ));
        }
        let (ox, oy) = self.pdf_offset_mm;
        if !ox.is_finite() || !oy.is_finite() || ox < 0.0 || oy < 0.0 {
            return Err(BildwerkError::Config(
                "PDF image offset must be non-negative".into(),
            ));
        }
        // Excel limits sheet names to 31 characters and forbids a few symbols.
        let name = self.sheet_name.as_str();
        if name.is_empty()
            || name.chars().count() > 31
            || name.contains(['\\', '/', '?', '*', '[', ']', ':'])
        {
            return Err(BildwerkError::Config(format!("invalid sheet name {name:?}")));
        }
        Ok(())
    }
}
