// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — Image compression and document conversion, as called from the UI.
//
// The UI owns file picking, form fields and buttons. It hands this crate raw
// bytes plus explicit parameters and gets back blobs ready for download.

pub mod logging;
pub mod services;

pub use services::workbench::{CompressionOutcome, Workbench};
