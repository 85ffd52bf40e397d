// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! cadgen CLI

use anyhow::{Context, Result};
use cadgen::cli::{self, count_stl_triangles, Cli, Reporter};
use cadgen::config::CadGenConfig;
use cadgen::generate::{GenerateRequest, GenerationReport};
use cadgen::kernel::{ExportFormat, FreeCadKernel, KernelCall, RecordingKernel};
use cadgen::CadError;
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::process::ExitCode;
use std::time::{Duration, Instant};

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let default_filter = if verbose { "cadgen=debug" } else { "cadgen=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config =
        CadGenConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_to(&mut config);

    // No kernel exists until the parameters are valid
    let request = match cli.request(&config) {
        Ok(request) => request,
        Err(err) => return Ok(failure(&CadError::from(err))),
    };

    if cli.dry_run {
        dry_run_command(&cli, &request)
    } else {
        generate_command(&cli, &config, &request)
    }
}

/// Print the error and pick the exit status: 2 for usage errors, 1 otherwise
fn failure(err: &CadError) -> ExitCode {
    Reporter::report_error(&err.to_string());
    if err.is_usage_error() {
        eprintln!("\n{}", Cli::command().render_usage());
    }
    ExitCode::from(err.exit_code())
}

fn generate_command(cli: &Cli, config: &CadGenConfig, request: &GenerateRequest) -> Result<ExitCode> {
    let mut kernel =
        FreeCadKernel::new(&config.freecad_path).context("Failed to set up FreeCAD kernel")?;

    let spinner = if cli.json {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        pb.set_message(format!("Running {}", kernel.executable().display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    };

    let start = Instant::now();
    let result = cli::run(request, &mut kernel);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            if matches!(err, CadError::Kernel { .. }) && !kernel.is_available() {
                Reporter::report_warning(&format!(
                    "FreeCAD not found at {}. Install FreeCAD or set FREECAD_PATH.",
                    kernel.executable().display()
                ));
            }
            return Ok(failure(&err));
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    Reporter::report_generation(&report, start.elapsed());
    report_meshes(&report);
    Ok(ExitCode::SUCCESS)
}

fn report_meshes(report: &GenerationReport) {
    for export in report.exports.iter().filter(|e| e.format == ExportFormat::Stl) {
        match count_stl_triangles(&export.path) {
            Ok(triangles) => Reporter::report_mesh(&export.path, triangles),
            Err(e) => Reporter::report_warning(&format!("Could not read back STL: {:#}", e)),
        }
    }
}

/// `--dry-run --json` output: the run report plus the planned kernel calls
#[derive(Serialize)]
struct DryRunReport<'a> {
    #[serde(flatten)]
    report: &'a GenerationReport,
    calls: &'a [KernelCall],
}

fn dry_run_command(cli: &Cli, request: &GenerateRequest) -> Result<ExitCode> {
    let mut kernel = RecordingKernel::dry_run();

    let report = match cli::run(request, &mut kernel) {
        Ok(report) => report,
        Err(err) => return Ok(failure(&err)),
    };

    if cli.json {
        let dry_run = DryRunReport {
            report: &report,
            calls: kernel.calls(),
        };
        println!("{}", serde_json::to_string_pretty(&dry_run)?);
        return Ok(ExitCode::SUCCESS);
    }

    Reporter::report_plan(kernel.calls());
    Reporter::report_info(&format!(
        "Would write {} export(s) and {} to {}",
        report.exports.len(),
        report
            .document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        report.output_dir.display()
    ));
    if let Some(render) = &report.render {
        Reporter::report_warning(&format!(
            "Rendering is not supported; {} would not be written",
            render.intended_path().display()
        ));
    }
    Ok(ExitCode::SUCCESS)
}
