// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-document — Image processing and document packaging for Bildwerk.
//
// Provides image decoding and re-encoding, a size-constrained compression
// search over (scale, quality) candidates, and single-image packaging into
// PDF, legacy Word markup, and XLSX containers.

pub mod compress;
pub mod image;
pub mod package;

// Re-export the primary entry points so callers can use
// `bildwerk_document::CompressionSearch` etc.
pub use compress::CompressionSearch;
pub use image::decode::{ImageAsset, decode};
pub use package::{ContainerPackager, SourceImage};
