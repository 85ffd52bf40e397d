// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! FreeCAD kernel driven through `freecadcmd`

use super::script::{self, ScriptOutcome};
use super::{CadKernel, DocumentId, ExportFormat, ExportOptions, ObjectSpec, SolidHandle};
use crate::error::{CadError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use tempfile::TempDir;
use tracing::debug;

/// Scripts embed paths as Python string literals, so they must be UTF-8
fn script_path(path: &Path) -> std::result::Result<&Path, String> {
    match path.to_str() {
        Some(_) => Ok(path),
        None => Err(format!("path is not valid UTF-8: {}", path.display())),
    }
}

/// Working copy of an open document
struct OpenDocument {
    name: String,
    work_path: PathBuf,
}

/// Kernel adapter that runs one `freecadcmd` process per call.
///
/// FreeCAD keeps a process-wide document registry, so state between calls
/// lives in working `.FCStd` files inside a private temporary directory.
/// Dropping the kernel removes that directory.
pub struct FreeCadKernel {
    executable: PathBuf,
    workdir: TempDir,
    documents: HashMap<DocumentId, OpenDocument>,
    next_id: u32,
    script_counter: u32,
}

impl FreeCadKernel {
    pub fn new(executable: impl Into<PathBuf>) -> Result<Self> {
        let workdir = tempfile::Builder::new()
            .prefix("cadgen-")
            .tempdir()?;
        script_path(workdir.path())
            .map_err(|message| std::io::Error::new(std::io::ErrorKind::InvalidInput, message))?;
        Ok(Self {
            executable: executable.into(),
            workdir,
            documents: HashMap::new(),
            next_id: 1,
            script_counter: 0,
        })
    }

    /// Check if the kernel executable can be launched
    pub fn is_available(&self) -> bool {
        Command::new(&self.executable)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn document(&self, doc: DocumentId, operation: &'static str) -> Result<&OpenDocument> {
        self.documents
            .get(&doc)
            .ok_or_else(|| CadError::kernel(operation, format!("document {} is not open", doc.0)))
    }

    /// Run one script and return its reported result value
    fn run(&mut self, operation: &'static str, source: &str) -> std::result::Result<Option<String>, String> {
        self.script_counter += 1;
        let script_path = self
            .workdir
            .path()
            .join(format!("{:03}_{}.py", self.script_counter, operation));
        std::fs::write(&script_path, source)
            .map_err(|e| format!("failed to write kernel script: {}", e))?;

        debug!(operation, script = %script_path.display(), "running freecadcmd");
        let start = Instant::now();

        let output = Command::new(&self.executable)
            .arg(&script_path)
            .current_dir(self.workdir.path())
            .output()
            .map_err(|e| format!("failed to execute {}: {}", self.executable.display(), e))?;

        debug!(
            operation,
            elapsed_ms = start.elapsed().as_millis() as u64,
            status = %output.status,
            "freecadcmd finished"
        );

        let stdout = String::from_utf8_lossy(&output.stdout);
        match script::parse_outcome(&stdout) {
            ScriptOutcome::Succeeded { result } => Ok(result),
            ScriptOutcome::Failed(message) => Err(message),
            ScriptOutcome::Incomplete => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let detail = stderr.lines().last().unwrap_or("").trim().to_string();
                Err(format!(
                    "freecadcmd exited with status {} without completing{}",
                    output.status,
                    if detail.is_empty() {
                        String::new()
                    } else {
                        format!(": {}", detail)
                    }
                ))
            }
        }
    }

    fn run_kernel(&mut self, operation: &'static str, source: &str) -> Result<Option<String>> {
        self.run(operation, source)
            .map_err(|message| CadError::kernel(operation, message))
    }
}

impl CadKernel for FreeCadKernel {
    fn name(&self) -> &str {
        "FreeCAD"
    }

    fn open_document(&mut self, name: &str) -> Result<DocumentId> {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        let work_path = self.workdir.path().join(format!("doc{}.FCStd", id.0));

        let source = script::new_document(name, &work_path);
        self.run_kernel("open document", &source)?;

        self.documents.insert(
            id,
            OpenDocument {
                name: name.to_string(),
                work_path,
            },
        );
        Ok(id)
    }

    fn add_object(&mut self, doc: DocumentId, spec: &ObjectSpec) -> Result<SolidHandle> {
        let work = self.document(doc, "construct")?.work_path.clone();
        let source = script::add_object(&work, spec);
        let name = self
            .run_kernel("construct", &source)?
            .unwrap_or_else(|| spec.feature.label().to_string());
        Ok(SolidHandle {
            document: doc,
            name,
        })
    }

    fn recompute(&mut self, doc: DocumentId) -> Result<()> {
        let work = self.document(doc, "recompute")?.work_path.clone();
        self.run_kernel("recompute", &script::recompute(&work))?;
        Ok(())
    }

    fn export(
        &mut self,
        solid: &SolidHandle,
        format: ExportFormat,
        options: &ExportOptions,
        path: &Path,
    ) -> Result<PathBuf> {
        let work = self
            .document(solid.document, "export")
            .map_err(|e| CadError::export(format, e.to_string()))?
            .work_path
            .clone();
        let path = script_path(path).map_err(|message| CadError::export(format, message))?;
        let source = script::export(&work, &solid.name, format, options, path);
        self.run("export", &source)
            .map_err(|message| CadError::export(format, message))?;
        Ok(path.to_path_buf())
    }

    fn save_document(&mut self, doc: DocumentId, path: &Path) -> Result<PathBuf> {
        let work = self.document(doc, "save")?.work_path.clone();
        let path = script_path(path).map_err(|message| CadError::kernel("save", message))?;
        self.run_kernel("save", &script::save_copy(&work, path))?;
        Ok(path.to_path_buf())
    }

    fn close_document(&mut self, doc: DocumentId) -> Result<()> {
        let open = self
            .documents
            .remove(&doc)
            .ok_or_else(|| CadError::kernel("close", format!("document {} is not open", doc.0)))?;
        debug!(document = %open.name, "closing document");
        if open.work_path.exists() {
            std::fs::remove_file(&open.work_path)?;
        }
        Ok(())
    }
}
