// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Adapter interface to the external CAD kernel
//!
//! cadgen never builds geometry itself. Everything that produces a shape or
//! a file goes through [`CadKernel`], which is implemented by
//! [`FreeCadKernel`] for real runs and by [`RecordingKernel`] for tests and
//! dry runs.

mod freecad;
mod recording;
pub mod script;

pub use freecad::FreeCadKernel;
pub use recording::{FailPoint, KernelCall, RecordingKernel};

use crate::error::{Result, ValidationError};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Kernel-assigned identifier of an open document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub u32);

/// Reference to a constructed object inside a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolidHandle {
    pub document: DocumentId,
    /// Internal object name as reported by the kernel
    pub name: String,
}

/// Interchange formats the kernel can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Stl,
    Step,
    Dxf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Stl, ExportFormat::Step, ExportFormat::Dxf];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Stl => "stl",
            ExportFormat::Step => "step",
            ExportFormat::Dxf => "dxf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Stl => "STL",
            ExportFormat::Step => "STEP",
            ExportFormat::Dxf => "DXF",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stl" => Ok(ExportFormat::Stl),
            "step" | "stp" => Ok(ExportFormat::Step),
            "dxf" => Ok(ExportFormat::Dxf),
            _ => Err(ValidationError::UnknownFormat(s.to_string())),
        }
    }
}

/// Position and orientation of an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub base: Vector3<f64>,
    /// Rotation axis and angle in degrees
    pub rotation: Option<(Vector3<f64>, f64)>,
}

impl Placement {
    pub fn identity() -> Self {
        Self {
            base: Vector3::zeros(),
            rotation: None,
        }
    }

    pub fn lifted(z: f64) -> Self {
        Self {
            base: Vector3::new(0.0, 0.0, z),
            rotation: None,
        }
    }

    pub fn with_rotation(mut self, axis: Vector3<f64>, angle_deg: f64) -> Self {
        self.rotation = Some((axis, angle_deg));
        self
    }

    pub fn is_identity(&self) -> bool {
        self.base == Vector3::zeros() && self.rotation.is_none()
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

/// A construction request for one kernel object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Feature {
    Box { length: f64, width: f64, height: f64 },
    Cylinder { radius: f64, height: f64 },
    Sphere { radius: f64 },
    Cone { radius1: f64, radius2: f64, height: f64 },
    Torus { radius1: f64, radius2: f64 },
    /// Rounds every edge of `base`
    Fillet { base: SolidHandle, radius: f64 },
    /// Bevels every edge of `base`
    Chamfer { base: SolidHandle, size: f64 },
}

impl Feature {
    /// Kernel type identifier of the object this feature creates
    pub fn type_id(&self) -> &'static str {
        match self {
            Feature::Box { .. } => "Part::Box",
            Feature::Cylinder { .. } => "Part::Cylinder",
            Feature::Sphere { .. } => "Part::Sphere",
            Feature::Cone { .. } => "Part::Cone",
            Feature::Torus { .. } => "Part::Torus",
            Feature::Fillet { .. } => "Part::Fillet",
            Feature::Chamfer { .. } => "Part::Chamfer",
        }
    }

    /// Requested object name; the kernel may uniquify it
    pub fn label(&self) -> &'static str {
        match self {
            Feature::Box { .. } => "Box",
            Feature::Cylinder { .. } => "Cylinder",
            Feature::Sphere { .. } => "Sphere",
            Feature::Cone { .. } => "Cone",
            Feature::Torus { .. } => "Torus",
            Feature::Fillet { .. } => "Fillet",
            Feature::Chamfer { .. } => "Chamfer",
        }
    }

    /// Object this feature modifies, if it is a modifier
    pub fn base(&self) -> Option<&SolidHandle> {
        match self {
            Feature::Fillet { base, .. } | Feature::Chamfer { base, .. } => Some(base),
            _ => None,
        }
    }
}

/// Construction request: a feature and where to put it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub feature: Feature,
    pub placement: Placement,
}

impl ObjectSpec {
    pub fn new(feature: Feature) -> Self {
        Self {
            feature,
            placement: Placement::identity(),
        }
    }

    pub fn placed(feature: Feature, placement: Placement) -> Self {
        Self { feature, placement }
    }
}

/// Per-export settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Tessellation resolution for mesh formats
    pub segments: Option<u32>,
}

/// Narrow interface to an external CAD kernel.
///
/// Every call is blocking. Implementations are not expected to support
/// concurrent access.
pub trait CadKernel {
    /// Short name for status output
    fn name(&self) -> &str;

    /// Create a new empty document
    fn open_document(&mut self, name: &str) -> Result<DocumentId>;

    /// Construct an object and return a handle to it
    fn add_object(&mut self, doc: DocumentId, spec: &ObjectSpec) -> Result<SolidHandle>;

    /// Materialize the shapes of all objects in the document
    fn recompute(&mut self, doc: DocumentId) -> Result<()>;

    /// Serialize one object to `path` in `format`, returning the written path
    fn export(
        &mut self,
        solid: &SolidHandle,
        format: ExportFormat,
        options: &ExportOptions,
        path: &Path,
    ) -> Result<PathBuf>;

    /// Persist the document in the kernel's native format
    fn save_document(&mut self, doc: DocumentId, path: &Path) -> Result<PathBuf>;

    /// Release the document
    fn close_document(&mut self, doc: DocumentId) -> Result<()>;
}
