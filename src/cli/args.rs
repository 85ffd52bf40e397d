// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Command-line flags

use crate::config::CadGenConfig;
use crate::error::ValidationError;
use crate::exporter::select_formats;
use crate::generate::GenerateRequest;
use crate::kernel::ExportFormat;
use crate::params::{ShapeArgs, ShapeParams};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "cadgen")]
#[command(version)]
#[command(about = "Generate CAD 3D models using FreeCAD", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub shape: ShapeArgs,

    /// Output format (stl, step, dxf)
    #[arg(long, default_value = "stl")]
    pub output_format: String,

    /// Export in all formats
    #[arg(long)]
    pub all_formats: bool,

    /// Request a render image (not supported; reports the intended path)
    #[arg(long)]
    pub render: bool,

    /// Output directory [default: from config, ~/cad-output]
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Config file [default: ./cadgen.toml if present]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// FreeCAD command-line interpreter
    #[arg(long, value_name = "PATH")]
    pub freecad: Option<PathBuf>,

    /// Print the kernel calls without running FreeCAD or writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON (with the planned kernel calls under --dry-run)
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Command-line values layered over the loaded config
    pub fn apply_to(&self, config: &mut CadGenConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(freecad) = &self.freecad {
            config.freecad_path = freecad.clone();
        }
    }

    /// Validate flags into a run request
    pub fn request(&self, config: &CadGenConfig) -> Result<GenerateRequest, ValidationError> {
        let params = ShapeParams::parse(&self.shape)?;
        let output_format: ExportFormat = self.output_format.parse()?;
        Ok(GenerateRequest {
            params,
            formats: select_formats(output_format, self.all_formats),
            render: self.render,
            output_dir: config.output_dir.clone(),
            document_name: config.document_name.clone(),
            dry_run: self.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Shape;

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from([
            "cadgen",
            "--shape",
            "cone",
            "--diameter-base",
            "10",
            "--diameter-top",
            "4",
            "--height",
            "12",
            "--output-format",
            "step",
        ])
        .unwrap();
        let request = cli.request(&CadGenConfig::default()).unwrap();
        assert_eq!(
            request.params.shape,
            Shape::Cone {
                diameter_base: 10.0,
                diameter_top: 4.0,
                height: 12.0
            }
        );
        assert_eq!(request.formats, vec![ExportFormat::Step]);
        assert_eq!(request.params.segments, Some(50));
    }

    #[test]
    fn test_shape_flag_required() {
        assert!(Cli::try_parse_from(["cadgen", "--diameter", "3"]).is_err());
    }

    #[test]
    fn test_unknown_format() {
        let cli = Cli::try_parse_from([
            "cadgen",
            "--shape",
            "sphere",
            "--diameter",
            "3",
            "--output-format",
            "obj",
        ])
        .unwrap();
        assert_eq!(
            cli.request(&CadGenConfig::default()).unwrap_err(),
            ValidationError::UnknownFormat("obj".into())
        );
    }

    #[test]
    fn test_output_dir_overrides_config() {
        let cli = Cli::try_parse_from([
            "cadgen",
            "--shape",
            "sphere",
            "--diameter",
            "3",
            "--output-dir",
            "/tmp/parts",
        ])
        .unwrap();
        let mut config = CadGenConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/parts"));
        assert_eq!(
            cli.request(&config).unwrap().output_dir,
            PathBuf::from("/tmp/parts")
        );
    }
}
