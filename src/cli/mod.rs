// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for cadgen

pub mod args;
pub mod inspect;
pub mod reporter;

pub use args::Cli;
pub use inspect::count_stl_triangles;
pub use reporter::Reporter;

use crate::config::CadGenConfig;
use crate::error::Result;
use crate::exporter::OutputNaming;
use crate::generate::{generate, GenerateRequest, GenerationReport};
use crate::kernel::CadKernel;

/// Validate `cli` and run it against `kernel`. Validation errors return
/// before the kernel is touched.
pub fn execute(
    cli: &Cli,
    config: &CadGenConfig,
    kernel: &mut dyn CadKernel,
) -> Result<GenerationReport> {
    let request = cli.request(config)?;
    run(&request, kernel)
}

/// Run an already validated request, naming outputs after the current time
pub fn run(request: &GenerateRequest, kernel: &mut dyn CadKernel) -> Result<GenerationReport> {
    let naming = OutputNaming::now(request.params.kind());
    generate(kernel, request, naming)
}
