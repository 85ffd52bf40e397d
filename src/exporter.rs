// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Artifact naming and export requests

use crate::error::Result;
use crate::kernel::{ExportFormat, ExportOptions, SolidHandle};
use crate::params::ShapeKind;
use crate::session::Session;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Timestamp embedded in artifact names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Extension of the kernel's native document format
pub const NATIVE_EXTENSION: &str = "FCStd";

/// Base name shared by every artifact of a run: `<shape>_<YYYYMMDD_HHMMSS>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
    base: String,
}

impl OutputNaming {
    pub fn new(shape: ShapeKind, time: DateTime<Local>) -> Self {
        Self {
            base: format!("{}_{}", shape.as_str(), time.format(TIMESTAMP_FORMAT)),
        }
    }

    pub fn now(shape: ShapeKind) -> Self {
        Self::new(shape, Local::now())
    }

    pub fn base_name(&self) -> &str {
        &self.base
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.base, extension)
    }
}

/// Formats selected on the command line, in export order
pub fn select_formats(output_format: ExportFormat, all_formats: bool) -> Vec<ExportFormat> {
    if all_formats {
        ExportFormat::ALL.to_vec()
    } else {
        vec![output_format]
    }
}

/// One written interchange file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResult {
    pub format: ExportFormat,
    pub path: PathBuf,
}

/// Result of a render request. Rendering needs a scene, camera and
/// lighting setup that the headless kernel does not provide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderOutcome {
    NotSupported { intended_path: PathBuf },
}

impl RenderOutcome {
    pub fn intended_path(&self) -> &Path {
        match self {
            RenderOutcome::NotSupported { intended_path } => intended_path,
        }
    }
}

/// Writes the artifacts of one run into an output directory
pub struct Exporter {
    output_dir: PathBuf,
    naming: OutputNaming,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>, naming: OutputNaming) -> Self {
        Self {
            output_dir: output_dir.into(),
            naming,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn naming(&self) -> &OutputNaming {
        &self.naming
    }

    pub fn path_for(&self, extension: &str) -> PathBuf {
        self.output_dir.join(self.naming.file_name(extension))
    }

    /// Create the output directory if it does not exist yet
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    pub fn export(
        &self,
        session: &mut Session<'_>,
        solid: &SolidHandle,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> Result<ExportResult> {
        let target = self.path_for(format.extension());
        let path = session.export(solid, format, options, &target)?;
        info!(%format, path = %path.display(), "exported");
        Ok(ExportResult { format, path })
    }

    /// Export `solid` in every format, stopping at the first failure
    pub fn export_all(
        &self,
        session: &mut Session<'_>,
        solid: &SolidHandle,
        formats: &[ExportFormat],
        options: &ExportOptions,
    ) -> Result<Vec<ExportResult>> {
        let mut results = Vec::with_capacity(formats.len());
        for format in formats {
            results.push(self.export(session, solid, *format, options)?);
        }
        Ok(results)
    }

    /// Persist the whole document in the kernel's native format
    pub fn save_native(&self, session: &mut Session<'_>) -> Result<PathBuf> {
        let path = session.save(&self.path_for(NATIVE_EXTENSION))?;
        info!(path = %path.display(), "document saved");
        Ok(path)
    }

    /// Rendering is not available; report where the image would have gone
    pub fn render(&self, solid: &SolidHandle) -> RenderOutcome {
        let intended_path = self.path_for("png");
        info!(solid = %solid.name, path = %intended_path.display(), "render not supported");
        RenderOutcome::NotSupported { intended_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 2).unwrap()
    }

    #[test]
    fn test_base_name_format() {
        let naming = OutputNaming::new(ShapeKind::Torus, fixed_time());
        assert_eq!(naming.base_name(), "torus_20260307_090502");
        assert_eq!(naming.file_name("step"), "torus_20260307_090502.step");
    }

    #[test]
    fn test_select_formats() {
        assert_eq!(select_formats(ExportFormat::Dxf, false), vec![ExportFormat::Dxf]);
        assert_eq!(
            select_formats(ExportFormat::Dxf, true),
            vec![ExportFormat::Stl, ExportFormat::Step, ExportFormat::Dxf]
        );
    }

    #[test]
    fn test_render_is_not_supported() {
        let exporter = Exporter::new("/out", OutputNaming::new(ShapeKind::Box, fixed_time()));
        let solid = SolidHandle {
            document: crate::kernel::DocumentId(1),
            name: "Box".into(),
        };
        let outcome = exporter.render(&solid);
        assert_eq!(
            outcome.intended_path(),
            Path::new("/out/box_20260307_090502.png")
        );
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("out");
        let exporter = Exporter::new(&dir, OutputNaming::now(ShapeKind::Sphere));
        exporter.prepare().unwrap();
        exporter.prepare().unwrap();
        assert!(dir.is_dir());
    }
}
