// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait for persisting produced blobs.

use std::path::PathBuf;

use bildwerk_core::error::Result;

/// Persist a produced blob as a downloadable file.
pub trait Exporter {
    /// Save `data` under `file_name`. The exporter may adjust the name (to
    /// avoid clobbering an existing download, say) and returns where the
    /// bytes actually went.
    fn save_as(&self, file_name: &str, mime_type: &str, data: &[u8]) -> Result<PathBuf>;
}
