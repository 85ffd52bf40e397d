// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! cadgen
//!
//! Generates primitive solids (box, cylinder, sphere, cone, torus) through
//! an external CAD kernel and exports them to STL, STEP, DXF and the
//! kernel's native document format. Geometry is never computed here: the
//! crate validates parameters, maps them onto kernel objects and drives
//! the kernel through [`kernel::CadKernel`].

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod exporter;
pub mod generate;
pub mod kernel;
pub mod params;
pub mod session;

pub use config::CadGenConfig;
pub use error::{CadError, Result, ValidationError};
pub use exporter::{ExportResult, Exporter, OutputNaming, RenderOutcome};
pub use generate::{generate, GenerateRequest, GenerationReport};
pub use kernel::{CadKernel, ExportFormat, FreeCadKernel, RecordingKernel, SolidHandle};
pub use params::{Shape, ShapeArgs, ShapeKind, ShapeParams};
pub use session::Session;
