// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! The `cadgen` binary: exit codes, temp-dir cleanup, JSON output

use anyhow::Result;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary with a private temp dir and working directory
fn cadgen(tmp: &Path, cwd: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_cadgen"))
        .args(args)
        .current_dir(cwd)
        .env("TMPDIR", tmp)
        .env_remove("FREECAD_PATH")
        .env_remove("CADGEN_OUTPUT_DIR")
        .env_remove("RUST_LOG")
        .output()?;
    Ok(output)
}

fn entries(dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    names.sort();
    Ok(names)
}

#[test]
fn test_validation_failure_exits_2_without_kernel_files() -> Result<()> {
    let tmp = TempDir::new()?;
    let cwd = TempDir::new()?;
    let output = cadgen(
        tmp.path(),
        cwd.path(),
        &["--shape", "box", "--width", "1", "--height", "1"],
    )?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("box requires --depth"), "{}", stderr);
    assert!(stderr.contains("Usage"), "{}", stderr);
    assert!(entries(tmp.path())?.is_empty());
    Ok(())
}

#[test]
fn test_kernel_failure_exits_1_and_removes_workdir() -> Result<()> {
    let tmp = TempDir::new()?;
    let cwd = TempDir::new()?;
    let out = cwd.path().join("out");
    let out_arg = out.to_string_lossy().into_owned();
    let output = cadgen(
        tmp.path(),
        cwd.path(),
        &[
            "--shape",
            "sphere",
            "--diameter",
            "10",
            "--freecad",
            "/nonexistent/freecadcmd",
            "--output-dir",
            &out_arg,
        ],
    )?;

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FreeCAD not found"), "{}", stdout);
    assert!(entries(tmp.path())?.is_empty(), "kernel workdir left behind");
    Ok(())
}

#[test]
fn test_dry_run_json_prints_report_with_calls() -> Result<()> {
    let tmp = TempDir::new()?;
    let cwd = TempDir::new()?;
    let output = cadgen(
        tmp.path(),
        cwd.path(),
        &["--shape", "sphere", "--diameter", "10", "--dry-run", "--json"],
    )?;

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["shape"], "sphere");
    assert_eq!(report["kernel"], "recording");
    assert_eq!(report["exports"].as_array().map(Vec::len), Some(1));

    let calls = report["calls"].as_array().expect("calls array");
    assert_eq!(calls.first().and_then(|c| c["call"].as_str()), Some("open_document"));
    assert_eq!(calls.last().and_then(|c| c["call"].as_str()), Some("close_document"));
    Ok(())
}
