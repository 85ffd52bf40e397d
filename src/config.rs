// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Configuration system

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cadgen.toml";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadGenConfig {
    /// Directory receiving all artifacts
    pub output_dir: PathBuf,
    /// FreeCAD command-line interpreter
    pub freecad_path: PathBuf,
    /// Name of the in-memory document
    pub document_name: String,
}

fn default_output_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join("cad-output"),
        None => PathBuf::from("cad-output"),
    }
}

impl Default for CadGenConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            freecad_path: PathBuf::from("freecadcmd"),
            document_name: "CADGen".to_string(),
        }
    }
}

impl CadGenConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: CadGenConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `explicit` if given, else `cadgen.toml` when present, else
    /// defaults; then apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `CADGEN_OUTPUT_DIR` and `FREECAD_PATH`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("CADGEN_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(freecad) = lookup("FREECAD_PATH") {
            self.freecad_path = PathBuf::from(freecad);
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
