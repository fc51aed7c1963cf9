// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.

use thiserror::Error;

/// `Decode` detail for a zero-length source blob.
pub const EMPTY_INPUT: &str = "input is empty";

/// Top-level error type for all Bildwerk operations.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Image errors --
    /// Source bytes are not a supported raster format, or are truncated/corrupt.
    #[error("image decoding failed: {0}")]
    Decode(String),

    /// Re-encoding failed, or no compression attempt produced output.
    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("invalid compression constraints: {0}")]
    InvalidConstraints(String),

    // -- Document errors --
    /// Container assembly (PDF, Word, Excel) failed.
    #[error("document packaging failed: {0}")]
    Package(String),

    // -- Runtime --
    #[error("background worker failed: {0}")]
    Worker(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
