// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! One generation run: build, export, save, close

use crate::builder;
use crate::error::Result;
use crate::exporter::{ExportResult, Exporter, OutputNaming, RenderOutcome};
use crate::kernel::{CadKernel, ExportFormat, ExportOptions, SolidHandle};
use crate::params::{ShapeKind, ShapeParams};
use crate::session::Session;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Everything a run needs after validation
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub params: ShapeParams,
    pub formats: Vec<ExportFormat>,
    pub render: bool,
    pub output_dir: PathBuf,
    pub document_name: String,
    /// Skip creating the output directory
    pub dry_run: bool,
}

/// What a successful run produced
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub shape: ShapeKind,
    pub kernel: String,
    pub solid: SolidHandle,
    pub exports: Vec<ExportResult>,
    pub document: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderOutcome>,
    pub output_dir: PathBuf,
}

/// Run the whole pipeline against `kernel`.
///
/// The document is closed on every path. Artifacts written before a
/// failure are left in place.
pub fn generate(
    kernel: &mut dyn CadKernel,
    request: &GenerateRequest,
    naming: OutputNaming,
) -> Result<GenerationReport> {
    let exporter = Exporter::new(&request.output_dir, naming);
    if !request.dry_run {
        exporter.prepare()?;
    }

    let mut session = Session::open(kernel, &request.document_name)?;
    let kernel_name = session.kernel_name().to_string();

    let solid = builder::build(&mut session, &request.params)?;

    let options = ExportOptions {
        segments: request.params.segments,
    };
    let exports = exporter.export_all(&mut session, &solid, &request.formats, &options)?;
    let document = exporter.save_native(&mut session)?;
    let render = request.render.then(|| exporter.render(&solid));

    session.close()?;

    info!(
        shape = %request.params.kind(),
        base = exporter.naming().base_name(),
        exports = exports.len(),
        "model generated"
    );

    Ok(GenerationReport {
        shape: request.params.kind(),
        kernel: kernel_name,
        solid,
        exports,
        document,
        render,
        output_dir: exporter.output_dir().to_path_buf(),
    })
}
