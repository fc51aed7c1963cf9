// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filesystem-backed export and source reading for desktop builds.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use bildwerk_core::error::{BildwerkError, Result};
use tracing::{debug, info, instrument};

use crate::traits::Exporter;

/// Name used when the requested one has no usable final component.
const FALLBACK_NAME: &str = "download";

/// Give up looking for a free `name (n).ext` after this many tries.
const MAX_SUFFIX: u32 = 999;

/// Saves blobs into a download directory, browser-style: an existing file is
/// never overwritten, a ` (1)`, ` (2)`, ... suffix is picked instead.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Exporter for DirectoryExporter {
    #[instrument(skip(self, data), fields(dir = %self.dir.display(), bytes = data.len()))]
    fn save_as(&self, file_name: &str, mime_type: &str, data: &[u8]) -> Result<PathBuf> {
        let name = sanitize_file_name(file_name);
        let (stem, ext) = split_extension(&name);

        for n in 0..=MAX_SUFFIX {
            let candidate = if n == 0 {
                name.clone()
            } else {
                format!("{stem} ({n}){ext}")
            };
            let path = self.dir.join(&candidate);

            // `create_new` makes the existence check and the create one step.
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(data)?;
                    file.flush()?;
                    info!(path = %path.display(), mime_type, "Saved download");
                    return Ok(path);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    debug!(candidate, "Download name taken; trying next suffix");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(BildwerkError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free file name for {name} in {}", self.dir.display()),
        )))
    }
}

/// Read a source blob to completion.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub async fn read_source(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let data = tokio::fs::read(path.as_ref()).await?;
    debug!(bytes = data.len(), "Source read");
    Ok(data)
}

/// Reduce a requested name to a bare file name with no directory parts.
fn sanitize_file_name(file_name: &str) -> String {
    let last = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}

/// Split `photo.tar.gz` into (`photo.tar`, `.gz`); names without a dot, or
/// with only a leading dot, have no extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_under_requested_name() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DirectoryExporter::new(dir.path());
        let path = exporter
            .save_as("converted-image.pdf", "application/pdf", b"%PDF-1.7")
            .unwrap();
        assert_eq!(path, dir.path().join("converted-image.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7");
    }

    #[test]
    fn existing_downloads_are_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DirectoryExporter::new(dir.path());
        let first = exporter.save_as("compressed-image.jpg", "image/jpeg", b"one").unwrap();
        let second = exporter.save_as("compressed-image.jpg", "image/jpeg", b"two").unwrap();
        let third = exporter.save_as("compressed-image.jpg", "image/jpeg", b"three").unwrap();

        assert_eq!(second, dir.path().join("compressed-image (1).jpg"));
        assert_eq!(third, dir.path().join("compressed-image (2).jpg"));
        assert_eq!(std::fs::read(first).unwrap(), b"one");
        assert_eq!(std::fs::read(second).unwrap(), b"two");
    }

    #[test]
    fn directory_parts_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DirectoryExporter::new(dir.path());
        let path = exporter
            .save_as("../../etc/converted-image.doc", "application/msword", b"x")
            .unwrap();
        assert_eq!(path, dir.path().join("converted-image.doc"));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DirectoryExporter::new(dir.path().join("nope"));
        let err = exporter.save_as("a.pdf", "application/pdf", b"x").unwrap_err();
        assert!(matches!(err, BildwerkError::Io(_)));
    }

    #[test]
    fn name_helpers() {
        assert_eq!(sanitize_file_name(""), "download");
        assert_eq!(sanitize_file_name("dir\\..\\"), "download");
        assert_eq!(sanitize_file_name("a\u{0}b.png"), "ab.png");
        assert_eq!(split_extension("photo.tar.gz"), ("photo.tar", ".gz"));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
        assert_eq!(split_extension("README"), ("README", ""));
    }

    #[tokio::test]
    async fn read_source_returns_all_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.bin");
        std::fs::write(&path, vec![7u8; 4096]).unwrap();
        let data = read_source(&path).await.unwrap();
        assert_eq!(data.len(), 4096);
    }

    #[tokio::test]
    async fn read_source_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_source(dir.path().join("missing.jpg")).await.unwrap_err();
        match err {
            BildwerkError::Io(io) => assert_eq!(io.kind(), ErrorKind::NotFound),
            other => panic!("unexpected error variant: {other}"),
        }
    }
}
