// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Python script generation for `freecadcmd`
//!
//! Every kernel call becomes one self-contained script. Documents live in a
//! working `.FCStd` file between calls: scripts open it, act, save it and
//! close it again. The script reports back through marker lines on stdout.

use super::{ExportFormat, ExportOptions, Feature, ObjectSpec, Placement};
use std::f64::consts::PI;
use std::path::Path;

pub const RESULT_MARKER: &str = "CADGEN_RESULT:";
pub const OK_MARKER: &str = "CADGEN_OK";
pub const ERROR_MARKER: &str = "CADGEN_ERROR:";

/// Linear deflection used for tessellation when a segment count is given
const LINEAR_DEFLECTION: f64 = 0.1;

/// What a finished script reported
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptOutcome {
    Succeeded { result: Option<String> },
    Failed(String),
    /// The interpreter exited without reaching either marker
    Incomplete,
}

/// Quote a string as a Python literal
pub fn py_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn py_path(path: &Path) -> String {
    py_str(&path.to_string_lossy())
}

/// Format a float so Python reads it back as a float
pub fn py_float(value: f64) -> String {
    format!("{:?}", value)
}

fn indent(lines: Vec<String>, depth: usize) -> Vec<String> {
    let pad = "    ".repeat(depth);
    lines
        .into_iter()
        .map(|line| {
            if line.is_empty() {
                line
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect()
}

/// Wrap a body into a complete script with result markers
fn wrap(body: Vec<String>) -> String {
    let mut lines = vec![
        "import os".to_string(),
        "import sys".to_string(),
        "import traceback".to_string(),
        "import FreeCAD".to_string(),
        String::new(),
        "def _cadgen_main():".to_string(),
    ];
    lines.extend(indent(body, 1));
    lines.push(String::new());
    lines.push("try:".to_string());
    lines.push("    _cadgen_main()".to_string());
    lines.push(format!("    print({})", py_str(OK_MARKER)));
    lines.push("except Exception as exc:".to_string());
    lines.push("    traceback.print_exc()".to_string());
    lines.push(format!(
        "    print({} + \" %s: %s\" % (type(exc).__name__, str(exc).replace(\"\\n\", \" \")))",
        py_str(ERROR_MARKER)
    ));
    lines.push("sys.stdout.flush()".to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// Open the working copy, run `inner`, optionally save, always close
fn with_document(work: &Path, inner: Vec<String>, save: bool) -> String {
    let mut body = vec![
        format!("doc = FreeCAD.openDocument({})", py_path(work)),
        "try:".to_string(),
    ];
    body.extend(indent(inner, 1));
    if save {
        body.push("    doc.save()".to_string());
    }
    body.push("finally:".to_string());
    body.push("    FreeCAD.closeDocument(doc.Name)".to_string());
    wrap(body)
}

pub fn new_document(name: &str, work: &Path) -> String {
    wrap(vec![
        format!("doc = FreeCAD.newDocument({})", py_str(name)),
        format!("doc.saveAs({})", py_path(work)),
        "FreeCAD.closeDocument(doc.Name)".to_string(),
    ])
}

fn feature_lines(feature: &Feature) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(base) = feature.base() {
        lines.push(format!("base = doc.getObject({})", py_str(&base.name)));
        lines.push("if base is None:".to_string());
        lines.push(format!(
            "    raise RuntimeError(\"no object named \" + {})",
            py_str(&base.name)
        ));
        lines.push("doc.recompute()".to_string());
    }
    lines.push(format!(
        "obj = doc.addObject({}, {})",
        py_str(feature.type_id()),
        py_str(feature.label())
    ));
    match feature {
        Feature::Box {
            length,
            width,
            height,
        } => {
            lines.push(format!("obj.Length = {}", py_float(*length)));
            lines.push(format!("obj.Width = {}", py_float(*width)));
            lines.push(format!("obj.Height = {}", py_float(*height)));
        }
        Feature::Cylinder { radius, height } => {
            lines.push(format!("obj.Radius = {}", py_float(*radius)));
            lines.push(format!("obj.Height = {}", py_float(*height)));
        }
        Feature::Sphere { radius } => {
            lines.push(format!("obj.Radius = {}", py_float(*radius)));
        }
        Feature::Cone {
            radius1,
            radius2,
            height,
        } => {
            lines.push(format!("obj.Radius1 = {}", py_float(*radius1)));
            lines.push(format!("obj.Radius2 = {}", py_float(*radius2)));
            lines.push(format!("obj.Height = {}", py_float(*height)));
        }
        Feature::Torus { radius1, radius2 } => {
            lines.push(format!("obj.Radius1 = {}", py_float(*radius1)));
            lines.push(format!("obj.Radius2 = {}", py_float(*radius2)));
        }
        Feature::Fillet { radius: size, .. } | Feature::Chamfer { size, .. } => {
            let size = py_float(*size);
            lines.push("obj.Base = base".to_string());
            lines.push(format!(
                "obj.Edges = [(i + 1, {}, {}) for i in range(len(base.Shape.Edges))]",
                size, size
            ));
        }
    }
    lines
}

fn placement_lines(placement: &Placement) -> Vec<String> {
    if placement.is_identity() {
        return Vec::new();
    }
    let b = &placement.base;
    let mut lines = vec![format!(
        "obj.Placement.Base = FreeCAD.Vector({}, {}, {})",
        py_float(b.x),
        py_float(b.y),
        py_float(b.z)
    )];
    if let Some((axis, angle)) = &placement.rotation {
        lines.push(format!(
            "obj.Placement.Rotation = FreeCAD.Rotation(FreeCAD.Vector({}, {}, {}), {})",
            py_float(axis.x),
            py_float(axis.y),
            py_float(axis.z),
            py_float(*angle)
        ));
    }
    lines
}

pub fn add_object(work: &Path, spec: &ObjectSpec) -> String {
    let mut inner = feature_lines(&spec.feature);
    inner.extend(placement_lines(&spec.placement));
    inner.push(format!("print({} + \" \" + obj.Name)", py_str(RESULT_MARKER)));
    with_document(work, inner, true)
}

pub fn recompute(work: &Path) -> String {
    let inner = vec![
        "doc.recompute()".to_string(),
        "bad = [o.Name for o in doc.Objects if \"Invalid\" in o.State or (hasattr(o, \"Shape\") and o.Shape.isNull())]".to_string(),
        "if bad:".to_string(),
        "    raise RuntimeError(\"invalid objects after recompute: \" + \", \".join(bad))".to_string(),
    ];
    with_document(work, inner, true)
}

/// Angular deflection in radians for a segment count
pub fn angular_deflection(segments: u32) -> f64 {
    2.0 * PI / segments as f64
}

pub fn export(
    work: &Path,
    object: &str,
    format: ExportFormat,
    options: &ExportOptions,
    out: &Path,
) -> String {
    let target = py_path(out);
    let mut inner = vec![
        format!("obj = doc.getObject({})", py_str(object)),
        "if obj is None:".to_string(),
        format!("    raise RuntimeError(\"no object named \" + {})", py_str(object)),
        "doc.recompute()".to_string(),
    ];
    match (format, options.segments) {
        (ExportFormat::Stl, Some(segments)) => {
            inner.push("import MeshPart".to_string());
            inner.push(format!(
                "mesh = MeshPart.meshFromShape(Shape=obj.Shape, LinearDeflection={}, AngularDeflection={}, Relative=False)",
                py_float(LINEAR_DEFLECTION),
                py_float(angular_deflection(segments))
            ));
            inner.push(format!("mesh.write({})", target));
        }
        (ExportFormat::Stl, None) => {
            inner.push("import Mesh".to_string());
            inner.push(format!("Mesh.export([obj], {})", target));
        }
        (ExportFormat::Step, _) => {
            inner.push(format!("obj.Shape.exportStep({})", target));
        }
        (ExportFormat::Dxf, _) => {
            inner.push("import importDXF".to_string());
            inner.push(format!("importDXF.export([obj], {})", target));
        }
    }
    inner.push(format!("if not os.path.exists({}):", target));
    inner.push("    raise RuntimeError(\"kernel wrote no file\")".to_string());
    with_document(work, inner, false)
}

pub fn save_copy(work: &Path, out: &Path) -> String {
    with_document(work, vec![format!("doc.saveCopy({})", py_path(out))], false)
}

/// Scan interpreter stdout for the markers written by [`wrap`]
pub fn parse_outcome(stdout: &str) -> ScriptOutcome {
    let mut result = None;
    for line in stdout.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(ERROR_MARKER) {
            return ScriptOutcome::Failed(rest.trim().to_string());
        }
        if let Some(rest) = line.strip_prefix(RESULT_MARKER) {
            result = Some(rest.trim().to_string());
        } else if line == OK_MARKER {
            return ScriptOutcome::Succeeded { result };
        }
    }
    ScriptOutcome::Incomplete
}
