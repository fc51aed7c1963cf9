// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Workbench — the calls behind "Compress Image", "Convert to PDF/Word/Excel"
// and the download buttons.
//
// Decoding and encoding are CPU-bound, so each operation runs on tokio's
// blocking pool and the caller only awaits the result. Every call is
// independent: the workbench keeps no per-image state between calls.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bildwerk_bridge::{Exporter, default_exporter, read_source};
use bildwerk_core::AppConfig;
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{
    CompressionConstraints, CompressionResult, DocumentFormatKind, PackagedDocument, SizeReport,
};
use bildwerk_document::{CompressionSearch, ContainerPackager, SourceImage, decode};
use tracing::{info, instrument};

/// A finished compression together with the before/after sizes.
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    pub result: CompressionResult,
    pub report: SizeReport,
}

/// Shared entry point for the UI. Cheap to clone.
#[derive(Clone)]
pub struct Workbench {
    config: Arc<AppConfig>,
    exporter: Arc<dyn Exporter + Send + Sync>,
}

impl Workbench {
    /// Build a workbench with an explicit exporter.
    pub fn new(config: AppConfig, exporter: Arc<dyn Exporter + Send + Sync>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            exporter,
        })
    }

    /// Build a workbench that saves downloads into `dir`.
    pub fn with_download_dir(config: AppConfig, dir: impl Into<PathBuf>) -> Result<Self> {
        Self::new(config, Arc::from(default_exporter(dir)))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // -- Compression -----------------------------------------------------------

    /// Compress `source` to fit `constraints`.
    ///
    /// `source` is only read; on any error the caller still holds the
    /// original untouched.
    #[instrument(skip(self, source), fields(source_bytes = source.len()))]
    pub async fn compress(
        &self,
        source: Arc<[u8]>,
        constraints: CompressionConstraints,
    ) -> Result<CompressionOutcome> {
        constraints.validate()?;
        let search = CompressionSearch::new(self.config.compression.clone());
        let original_bytes = source.len() as u64;

        let result = run_blocking(move || {
            let asset = decode(&source)?;
            search.compress(&asset, &constraints)
        })
        .await?;

        let report = SizeReport::new(original_bytes, result.byte_size);
        info!(%report, within_budget = result.within_budget, "Compression finished");
        Ok(CompressionOutcome { result, report })
    }

    /// Read `path` to completion, then compress it.
    pub async fn compress_file(
        &self,
        path: impl AsRef<Path>,
        constraints: CompressionConstraints,
    ) -> Result<CompressionOutcome> {
        let data = read_source(path).await?;
        self.compress(Arc::from(data), constraints).await
    }

    // -- Conversion ------------------------------------------------------------

    /// Package `source` as a `kind` document. The MIME type is sniffed from
    /// the bytes.
    #[instrument(skip(self, source), fields(source_bytes = source.len()))]
    pub async fn convert(&self, source: Arc<[u8]>, kind: DocumentFormatKind) -> Result<PackagedDocument> {
        let packager = ContainerPackager::new(self.config.packaging.clone());

        run_blocking(move || {
            let image = SourceImage::sniff(source.to_vec())?;
            packager.package(&image, kind)
        })
        .await
    }

    /// Read `path` to completion, then package it.
    pub async fn convert_file(
        &self,
        path: impl AsRef<Path>,
        kind: DocumentFormatKind,
    ) -> Result<PackagedDocument> {
        let data = read_source(path).await?;
        self.convert(Arc::from(data), kind).await
    }

    // -- Downloads -------------------------------------------------------------

    /// Hand a compressed image to the exporter under its default name.
    pub fn export_compressed(&self, outcome: &CompressionOutcome) -> Result<PathBuf> {
        let result = &outcome.result;
        self.exporter
            .save_as(&result.suggested_file_name(), &result.mime_type, &result.data)
    }

    /// Hand a packaged document to the exporter under its suggested name.
    pub fn export_document(&self, document: &PackagedDocument) -> Result<PathBuf> {
        self.exporter
            .save_as(&document.suggested_file_name, &document.mime_type, &document.data)
    }
}

/// Run CPU-bound work on the blocking pool and flatten the join error.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| BildwerkError::Worker(err.to_string()))?
}
