// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scoped ownership of the run's document

use crate::error::Result;
use crate::kernel::{CadKernel, DocumentId, ExportFormat, ExportOptions, ObjectSpec, SolidHandle};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One open document on a kernel.
///
/// The document is closed exactly once: by [`Session::close`] on the normal
/// path, or on drop when the run bails out early.
pub struct Session<'k> {
    kernel: &'k mut dyn CadKernel,
    document: DocumentId,
    closed: bool,
}

impl<'k> Session<'k> {
    pub fn open(kernel: &'k mut dyn CadKernel, name: &str) -> Result<Self> {
        let document = kernel.open_document(name)?;
        debug!(kernel = kernel.name(), document = document.0, name, "document opened");
        Ok(Self {
            kernel,
            document,
            closed: false,
        })
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn kernel_name(&self) -> &str {
        self.kernel.name()
    }

    pub fn add_object(&mut self, spec: &ObjectSpec) -> Result<SolidHandle> {
        let solid = self.kernel.add_object(self.document, spec)?;
        debug!(
            type_id = spec.feature.type_id(),
            name = %solid.name,
            "object constructed"
        );
        Ok(solid)
    }

    pub fn recompute(&mut self) -> Result<()> {
        self.kernel.recompute(self.document)
    }

    pub fn export(
        &mut self,
        solid: &SolidHandle,
        format: ExportFormat,
        options: &ExportOptions,
        path: &Path,
    ) -> Result<PathBuf> {
        self.kernel.export(solid, format, options, path)
    }

    pub fn save(&mut self, path: &Path) -> Result<PathBuf> {
        self.kernel.save_document(self.document, path)
    }

    /// Close the document, surfacing any kernel error
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.kernel.close_document(self.document)?;
        debug!(document = self.document.0, "document closed");
        Ok(())
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        match self.kernel.close_document(self.document) {
            Ok(()) => debug!(document = self.document.0, "document closed after failure"),
            Err(e) => warn!(document = self.document.0, error = %e, "failed to close document"),
        }
    }
}
