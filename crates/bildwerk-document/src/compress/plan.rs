// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Candidate plan — the fixed, ordered sequence of (scale, quality) attempts.

use bildwerk_core::config::CompressionConfig;

/// Tolerance for comparing quality values that went through repeated
/// subtraction.
const QUALITY_EPSILON: f32 = 1e-4;

/// One encode attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Scale relative to the original image, in (0, 1].
    pub scale: f32,
    /// Encoder quality, in (0, 1].
    pub quality: f32,
}

/// Finite iterator over encode candidates in decreasing fidelity.
///
/// Quality steps down from the configured initial value until it reaches the
/// floor; every later candidate keeps the floor quality and shrinks the scale
/// by `scale_step`. Formats without a quality setting go straight to
/// resolution steps. The sequence is fully determined by its inputs.
#[derive(Debug, Clone)]
pub struct CandidatePlan {
    scale: f32,
    quality: f32,
    quality_floor: f32,
    quality_step: f32,
    scale_step: f32,
    lossy: bool,
    remaining: u32,
    started: bool,
}

impl CandidatePlan {
    /// Build a plan starting at `base_scale`. `lossy` is false for encoders
    /// that ignore quality.
    pub fn new(config: &CompressionConfig, base_scale: f32, lossy: bool) -> Self {
        let quality = if lossy { config.initial_quality } else { 1.0 };
        Self {
            scale: base_scale.clamp(f32::MIN_POSITIVE, 1.0),
            quality,
            quality_floor: config.quality_floor,
            quality_step: config.quality_step,
            scale_step: config.scale_step,
            lossy,
            remaining: config.max_attempts,
            started: false,
        }
    }
}

impl Iterator for CandidatePlan {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        if self.remaining == 0 {
            return None;
        }

        if self.started {
            if self.lossy && self.quality > self.quality_floor + QUALITY_EPSILON {
                self.quality = (self.quality - self.quality_step).max(self.quality_floor);
            } else {
                self.scale *= self.scale_step;
            }
        }
        self.started = true;
        self.remaining -= 1;

        Some(Candidate {
            scale: self.scale,
            quality: self.quality,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}
