// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compression module — ordered (scale, quality) search against a byte budget.

pub mod plan;
pub mod search;

pub use plan::{Candidate, CandidatePlan};
pub use search::CompressionSearch;
