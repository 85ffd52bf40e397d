// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! In-memory kernel that records calls instead of building geometry

use super::{CadKernel, DocumentId, ExportFormat, ExportOptions, Feature, ObjectSpec, SolidHandle};
use crate::error::{CadError, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// One call made against the kernel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum KernelCall {
    OpenDocument {
        document: DocumentId,
        name: String,
    },
    AddObject {
        document: DocumentId,
        name: String,
        spec: ObjectSpec,
    },
    Recompute {
        document: DocumentId,
    },
    Export {
        name: String,
        format: ExportFormat,
        options: ExportOptions,
        path: PathBuf,
    },
    SaveDocument {
        document: DocumentId,
        path: PathBuf,
    },
    CloseDocument {
        document: DocumentId,
    },
}

/// Call at which the kernel should report a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    OpenDocument,
    AddObject,
    Recompute,
    Export(ExportFormat),
    SaveDocument,
}

#[derive(Serialize)]
struct Artifact<'a> {
    kernel: &'static str,
    objects: Vec<(&'a str, &'a ObjectSpec)>,
}

/// Kernel double: keeps objects in memory and records every call.
///
/// Unless built with [`RecordingKernel::dry_run`], exports and saves write
/// a small JSON description of the objects to the requested path.
pub struct RecordingKernel {
    calls: Vec<KernelCall>,
    fail_at: Option<FailPoint>,
    write_files: bool,
    open: HashSet<DocumentId>,
    objects: HashMap<DocumentId, Vec<(String, ObjectSpec)>>,
    next_id: u32,
}

impl RecordingKernel {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail_at: None,
            write_files: true,
            open: HashSet::new(),
            objects: HashMap::new(),
            next_id: 1,
        }
    }

    /// Record calls without touching the filesystem
    pub fn dry_run() -> Self {
        Self {
            write_files: false,
            ..Self::new()
        }
    }

    pub fn failing_at(mut self, point: FailPoint) -> Self {
        self.fail_at = Some(point);
        self
    }

    pub fn calls(&self) -> &[KernelCall] {
        &self.calls
    }

    pub fn open_documents(&self) -> usize {
        self.open.len()
    }

    pub fn close_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, KernelCall::CloseDocument { .. }))
            .count()
    }

    /// Construction request behind a handle
    pub fn spec_of(&self, solid: &SolidHandle) -> Option<&ObjectSpec> {
        self.objects
            .get(&solid.document)?
            .iter()
            .find(|(name, _)| *name == solid.name)
            .map(|(_, spec)| spec)
    }

    /// All construction requests, in call order
    pub fn constructed(&self) -> Vec<&ObjectSpec> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                KernelCall::AddObject { spec, .. } => Some(spec),
                _ => None,
            })
            .collect()
    }

    fn check(&self, point: FailPoint) -> std::result::Result<(), String> {
        if self.fail_at == Some(point) {
            Err(format!("simulated failure at {:?}", point))
        } else {
            Ok(())
        }
    }

    fn ensure_open(&self, doc: DocumentId, operation: &'static str) -> Result<()> {
        if self.open.contains(&doc) {
            Ok(())
        } else {
            Err(CadError::kernel(operation, format!("document {} is not open", doc.0)))
        }
    }

    fn unique_name(&self, doc: DocumentId, label: &str) -> String {
        let existing = self.objects.get(&doc).map(|v| v.as_slice()).unwrap_or(&[]);
        let taken = |candidate: &str| existing.iter().any(|(n, _)| n == candidate);
        if !taken(label) {
            return label.to_string();
        }
        (1..)
            .map(|i| format!("{}{:03}", label, i))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| label.to_string())
    }

    fn write_artifact(&self, doc: DocumentId, only: Option<&str>, path: &Path) -> std::io::Result<()> {
        if !self.write_files {
            return Ok(());
        }
        let objects: Vec<(&str, &ObjectSpec)> = self
            .objects
            .get(&doc)
            .map(|v| {
                v.iter()
                    .filter(|(name, _)| only.map_or(true, |o| o == name.as_str()))
                    .map(|(name, spec)| (name.as_str(), spec))
                    .collect()
            })
            .unwrap_or_default();
        let artifact = Artifact {
            kernel: "recording",
            objects,
        };
        let json = serde_json::to_string_pretty(&artifact)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

impl Default for RecordingKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn dimensions(feature: &Feature) -> Vec<f64> {
    match feature {
        Feature::Box {
            length,
            width,
            height,
        } => vec![*length, *width, *height],
        Feature::Cylinder { radius, height } => vec![*radius, *height],
        Feature::Sphere { radius } => vec![*radius],
        Feature::Cone {
            radius1,
            radius2,
            height,
        } => vec![*radius1, *radius2, *height],
        Feature::Torus { radius1, radius2 } => vec![*radius1, *radius2],
        Feature::Fillet { radius, .. } => vec![*radius],
        Feature::Chamfer { size, .. } => vec![*size],
    }
}

impl CadKernel for RecordingKernel {
    fn name(&self) -> &str {
        "recording"
    }

    fn open_document(&mut self, name: &str) -> Result<DocumentId> {
        self.check(FailPoint::OpenDocument)
            .map_err(|m| CadError::kernel("open document", m))?;
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        self.open.insert(id);
        self.objects.insert(id, Vec::new());
        self.calls.push(KernelCall::OpenDocument {
            document: id,
            name: name.to_string(),
        });
        Ok(id)
    }

    fn add_object(&mut self, doc: DocumentId, spec: &ObjectSpec) -> Result<SolidHandle> {
        self.ensure_open(doc, "construct")?;
        self.check(FailPoint::AddObject)
            .map_err(|m| CadError::kernel("construct", m))?;
        if let Some(base) = spec.feature.base() {
            if self.spec_of(base).is_none() {
                return Err(CadError::kernel(
                    "construct",
                    format!("no object named {}", base.name),
                ));
            }
        }
        let name = self.unique_name(doc, spec.feature.label());
        self.objects
            .entry(doc)
            .or_default()
            .push((name.clone(), spec.clone()));
        self.calls.push(KernelCall::AddObject {
            document: doc,
            name: name.clone(),
            spec: spec.clone(),
        });
        Ok(SolidHandle {
            document: doc,
            name,
        })
    }

    fn recompute(&mut self, doc: DocumentId) -> Result<()> {
        self.ensure_open(doc, "recompute")?;
        self.calls.push(KernelCall::Recompute { document: doc });
        self.check(FailPoint::Recompute)
            .map_err(|m| CadError::kernel("recompute", m))?;

        let invalid: Vec<&str> = self
            .objects
            .get(&doc)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter(|(_, spec)| {
                dimensions(&spec.feature)
                    .iter()
                    .any(|d| !d.is_finite() || *d <= 0.0)
            })
            .map(|(name, _)| name.as_str())
            .collect();
        if !invalid.is_empty() {
            return Err(CadError::kernel(
                "recompute",
                format!("invalid objects after recompute: {}", invalid.join(", ")),
            ));
        }
        Ok(())
    }

    fn export(
        &mut self,
        solid: &SolidHandle,
        format: ExportFormat,
        options: &ExportOptions,
        path: &Path,
    ) -> Result<PathBuf> {
        self.ensure_open(solid.document, "export")
            .map_err(|e| CadError::export(format, e.to_string()))?;
        self.calls.push(KernelCall::Export {
            name: solid.name.clone(),
            format,
            options: *options,
            path: path.to_path_buf(),
        });
        self.check(FailPoint::Export(format))
            .map_err(|m| CadError::export(format, m))?;
        if self.spec_of(solid).is_none() {
            return Err(CadError::export(format, format!("no object named {}", solid.name)));
        }
        self.write_artifact(solid.document, Some(&solid.name), path)
            .map_err(|e| CadError::export(format, e.to_string()))?;
        Ok(path.to_path_buf())
    }

    fn save_document(&mut self, doc: DocumentId, path: &Path) -> Result<PathBuf> {
        self.ensure_open(doc, "save")?;
        self.calls.push(KernelCall::SaveDocument {
            document: doc,
            path: path.to_path_buf(),
        });
        self.check(FailPoint::SaveDocument)
            .map_err(|m| CadError::kernel("save", m))?;
        self.write_artifact(doc, None, path)?;
        Ok(path.to_path_buf())
    }

    fn close_document(&mut self, doc: DocumentId) -> Result<()> {
        if !self.open.remove(&doc) {
            return Err(CadError::kernel("close", format!("document {} is not open", doc.0)));
        }
        self.calls.push(KernelCall::CloseDocument { document: doc });
        Ok(())
    }
}
