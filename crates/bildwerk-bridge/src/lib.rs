// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — boundary with the host environment.
//
// The core never touches the filesystem itself. Produced blobs leave through
// an `Exporter` ("save bytes as a named file"), and source blobs arrive
// through `read_source`, which suspends until the whole file is read.

pub mod fs;
pub mod traits;

pub use fs::{DirectoryExporter, read_source};
pub use traits::Exporter;

/// Exporter that saves into the given download directory.
pub fn default_exporter(dir: impl Into<std::path::PathBuf>) -> Box<dyn Exporter + Send + Sync> {
    Box::new(DirectoryExporter::new(dir))
}
