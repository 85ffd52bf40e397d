// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Read-back checks on written artifacts

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use stl_io::read_stl;

/// Number of triangles in an STL file
pub fn count_stl_triangles(path: &Path) -> Result<usize> {
    let mut file = File::open(path).context(format!("Failed to open STL file: {:?}", path))?;
    let stl = read_stl(&mut file).context("Failed to read STL file")?;
    Ok(stl.faces.len())
}
