// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for cadgen

use crate::kernel::ExportFormat;
use thiserror::Error;

/// Rejected command-line parameters. Raised before any kernel work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("unknown shape '{0}' (expected box, cylinder, sphere, cone or torus)")]
    UnknownShape(String),

    #[error("unknown output format '{0}' (expected stl, step or dxf)")]
    UnknownFormat(String),

    #[error("{shape} requires --{field}")]
    Missing { shape: &'static str, field: &'static str },

    #[error("--{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("--{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("--segments must be at least 3, got {0}")]
    TooFewSegments(u32),
}

/// Errors raised while generating a model
#[derive(Error, Debug)]
pub enum CadError {
    #[error("invalid parameters: {0}")]
    Validation(#[from] ValidationError),

    /// The kernel rejected a construction, recompute or document operation
    #[error("kernel error during {operation}: {message}")]
    Kernel {
        operation: &'static str,
        message: String,
    },

    /// The kernel could not serialize the solid to a format
    #[error("{format} export failed: {message}")]
    Export {
        format: ExportFormat,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CadError {
    pub fn kernel(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Kernel {
            operation,
            message: message.into(),
        }
    }

    pub fn export(format: ExportFormat, message: impl Into<String>) -> Self {
        Self::Export {
            format,
            message: message.into(),
        }
    }

    /// Validation failures are usage errors; everything else is a run failure
    pub fn is_usage_error(&self) -> bool {
        matches!(self, CadError::Validation(_))
    }

    /// Process exit status: 2 for usage errors, 1 for run failures
    pub fn exit_code(&self) -> u8 {
        if self.is_usage_error() {
            2
        } else {
            1
        }
    }
}

/// Result alias for cadgen operations
pub type Result<T> = std::result::Result<T, CadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = ValidationError::Missing {
            shape: "box",
            field: "depth",
        };
        assert_eq!(err.to_string(), "box requires --depth");
    }

    #[test]
    fn test_export_error_names_format() {
        let err = CadError::export(ExportFormat::Step, "shape is null");
        assert_eq!(err.to_string(), "STEP export failed: shape is null");
        assert!(!err.is_usage_error());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_validation_is_usage_error() {
        let err: CadError = ValidationError::UnknownShape("prism".into()).into();
        assert!(err.is_usage_error());
        assert_eq!(err.exit_code(), 2);
    }
}
