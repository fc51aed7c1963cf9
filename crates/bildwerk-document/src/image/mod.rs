// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decode source blobs, resize and re-encode pixels.

pub mod decode;
pub mod encode;

pub use decode::{ImageAsset, decode};
pub use encode::encode;
