// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compression search — find the highest-fidelity encoding that fits a byte
// budget and a longest-edge bound.
//
// Candidates are tried strictly in plan order (quality first, then
// resolution). The first attempt that fits the budget and is no larger than
// the source wins; if none does, the smallest attempt is returned. A failed encode is
// logged and skipped; only when every attempt fails is an error surfaced.

use ::image::DynamicImage;
use bildwerk_core::config::{CompressionConfig, OutputPolicy};
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::{CompressionConstraints, CompressionResult, OutputFormat};
use tracing::{debug, info, instrument, warn};

use super::plan::{Candidate, CandidatePlan};
use crate::image::decode::ImageAsset;
use crate::image::encode::{encode_image, resize_to, scaled_dimensions};

/// Size-constrained compressor.
///
/// Stateless apart from its configuration; one instance can serve any
/// number of sequential or concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct CompressionSearch {
    config: CompressionConfig,
}

/// An encode that produced bytes.
struct Attempt {
    candidate: Candidate,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl CompressionSearch {
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Output format for `asset` under the configured policy.
    pub fn output_format_for(&self, asset: &ImageAsset) -> OutputFormat {
        match self.config.output {
            OutputPolicy::Jpeg => OutputFormat::Jpeg,
            OutputPolicy::KeepOriginal => {
                OutputFormat::from_mime_type(asset.mime_type()).unwrap_or(OutputFormat::Jpeg)
            }
        }
    }

    /// Starting scale: shrink the long edge to the dimension bound, never
    /// enlarge.
    pub fn base_scale(asset: &ImageAsset, constraints: &CompressionConstraints) -> f32 {
        let long_edge = asset.long_edge();
        if long_edge <= constraints.max_dimension_px {
            1.0
        } else {
            (constraints.max_dimension_px as f64 / long_edge as f64) as f32
        }
    }

    /// Compress `asset` to fit `constraints`.
    ///
    /// The returned dimensions never exceed the original or
    /// `max_dimension_px`, and an attempt only counts when it is no larger
    /// than the source. When the original already fits the dimension bound
    /// and is no larger than the best attempt, the original bytes are
    /// returned unchanged.
    #[instrument(
        skip(self, asset),
        fields(
            width = asset.width(),
            height = asset.height(),
            original_bytes = asset.byte_size(),
            max_bytes = constraints.max_bytes(),
            max_dimension = constraints.max_dimension_px,
        )
    )]
    pub fn compress(
        &self,
        asset: &ImageAsset,
        constraints: &CompressionConstraints,
    ) -> Result<CompressionResult> {
        constraints.validate()?;
        self.config.validate()?;

        let max_bytes = constraints.max_bytes();
        // An attempt bigger than the source is never an improvement, even
        // when it fits the budget.
        let target_bytes = match asset.byte_size() {
            0 => max_bytes,
            source => max_bytes.min(source),
        };
        let format = self.output_format_for(asset);
        let base_scale = Self::base_scale(asset, constraints);
        let plan = CandidatePlan::new(&self.config, base_scale, format.supports_quality());

        info!(?format, base_scale, "Starting compression search");

        // Pixels resized for the current scale, reused across quality steps.
        let mut resized: Option<DynamicImage> = None;
        let mut previous: Option<(u32, u32, f32)> = None;
        let mut smallest: Option<Attempt> = None;
        let mut within: Option<Attempt> = None;
        let mut attempts: u32 = 0;
        let mut last_error: Option<BildwerkError> = None;

        for candidate in plan {
            let (width, height) = scaled_dimensions(asset.width(), asset.height(), candidate.scale);

            // Rounding can map consecutive scales to the same size on tiny
            // images. The repeat still uses up a plan slot.
            if previous == Some((width, height, candidate.quality)) {
                debug!(width, height, "Candidate repeats previous attempt; skipping");
                continue;
            }
            previous = Some((width, height, candidate.quality));

            let pixels = match resized.take() {
                Some(img) if img.width() == width && img.height() == height => img,
                _ => resize_to(asset.as_dynamic(), width, height),
            };

            attempts += 1;
            let encoded = encode_image(&pixels, candidate.quality, format);
            resized = Some(pixels);

            let data = match encoded {
                Ok(data) => data,
                Err(err) => {
                    warn!(
                        attempt = attempts,
                        scale = candidate.scale,
                        quality = candidate.quality,
                        "Encode attempt failed: {err}"
                    );
                    last_error = Some(err);
                    continue;
                }
            };

            let size = data.len() as u64;
            debug!(
                attempt = attempts,
                scale = candidate.scale,
                quality = candidate.quality,
                width,
                height,
                bytes = size,
                "Attempt encoded"
            );

            let attempt = Attempt {
                candidate,
                width,
                height,
                data,
            };

            if size <= target_bytes {
                within = Some(attempt);
                break;
            }
            // Strict comparison keeps the earlier (higher-fidelity) attempt on ties.
            if smallest.as_ref().is_none_or(|best| size < best.data.len() as u64) {
                smallest = Some(attempt);
            }
        }

        let Some(best) = within.or(smallest) else {
            let detail = last_error
                .map(|err| err.to_string())
                .unwrap_or_else(|| "no candidates were tried".into());
            return Err(BildwerkError::Encode(format!(
                "no compression attempt succeeded after {attempts} tries: {detail}"
            )));
        };

        // Never hand back something bigger than what the user started with.
        let original_fits = asset.long_edge() <= constraints.max_dimension_px;
        if original_fits && asset.byte_size() > 0 && asset.byte_size() <= best.data.len() as u64 {
            info!(
                original_bytes = asset.byte_size(),
                best_attempt_bytes = best.data.len(),
                "Original is already smallest; returning it unchanged"
            );
            return Ok(CompressionResult {
                data: asset.source_bytes().to_vec(),
                byte_size: asset.byte_size(),
                width: asset.width(),
                height: asset.height(),
                mime_type: asset.mime_type().to_string(),
                quality: 1.0,
                scale: 1.0,
                attempts,
                within_budget: asset.byte_size() <= max_bytes,
                passthrough: true,
            });
        }

        let within_budget = best.data.len() as u64 <= max_bytes;
        if within_budget {
            info!(
                attempts,
                bytes = best.data.len(),
                width = best.width,
                height = best.height,
                "Compression met budget"
            );
        } else {
            warn!(
                attempts,
                bytes = best.data.len(),
                max_bytes,
                "Attempt budget exhausted; returning smallest attempt"
            );
        }

        Ok(CompressionResult {
            byte_size: best.data.len() as u64,
            data: best.data,
            width: best.width,
            height: best.height,
            mime_type: format.mime_type().to_string(),
            quality: best.candidate.quality,
            scale: best.candidate.scale,
            attempts,
            within_budget,
            passthrough: false,
        })
    }
}
