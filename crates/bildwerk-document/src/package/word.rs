// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Legacy Word document — HTML markup served as `application/msword`.
//
// Word opens HTML saved with a `.doc` extension as long as the file starts
// with a UTF-8 byte-order mark. The image is inlined as a base64 data URL.

use bildwerk_core::error::Result;
use tracing::debug;

use super::{SourceImage, escape_markup};

/// U+FEFF, encoded as `EF BB BF` in UTF-8.
pub const BYTE_ORDER_MARK: char = '\u{feff}';

const OFFICE_NAMESPACES: &str = concat!(
    r#"xmlns:o="urn:schemas-microsoft-com:office:office" "#,
    r#"xmlns:w="urn:schemas-microsoft-com:office:word" "#,
    r#"xmlns="http://www.w3.org/TR/REC-html40""#,
);

/// Build the `.doc` bytes: BOM, then a minimal HTML shell around one `<img>`.
pub fn build_word_document(source: &SourceImage, title: &str) -> Result<Vec<u8>> {
    let data_url = source.data_url()?;
    let title = escape_markup(title);

    let mut html = String::with_capacity(data_url.len() + 384);
    html.push(BYTE_ORDER_MARK);
    html.push_str(&format!("<html {OFFICE_NAMESPACES}>"));
    html.push_str(r#"<head><meta charset="utf-8" />"#);
    html.push_str(&format!("<title>{title}</title></head>"));
    html.push_str(&format!(r#"<body><img src="{data_url}" /></body></html>"#));

    let bytes = html.into_bytes();
    debug!(bytes = bytes.len(), "Word document assembled");
    Ok(bytes)
}
