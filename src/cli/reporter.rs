// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::exporter::RenderOutcome;
use crate::generate::GenerationReport;
use crate::kernel::{Feature, KernelCall};
use colored::*;
use std::path::Path;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report the artifacts of a finished run
    pub fn report_generation(report: &GenerationReport, duration: Duration) {
        for export in &report.exports {
            Self::saved(&export.format.to_string(), &export.path);
        }
        Self::saved("FreeCAD doc", &report.document);

        if let Some(RenderOutcome::NotSupported { intended_path }) = &report.render {
            Self::report_warning(&format!(
                "Rendering is not supported; no image written to {}",
                intended_path.display()
            ));
        }

        println!("\n{} {}", "✓".green(), "Model generated successfully!".green().bold());
        println!(
            "  {} {}",
            "Output directory:".bright_black(),
            report.output_dir.display().to_string().cyan()
        );
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
    }

    /// Report triangle count read back from an STL file
    pub fn report_mesh(path: &Path, triangles: usize) {
        println!(
            "  {} {} {}",
            "Mesh:".bright_black(),
            triangles.to_string().cyan(),
            format!("triangles in {}", path.display()).bright_black()
        );
    }

    /// Report the planned kernel calls of a dry run
    pub fn report_plan(calls: &[KernelCall]) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{}", "Dry run: kernel calls".bold());
        println!("{}", "━".repeat(80).bright_black());
        for (i, call) in calls.iter().enumerate() {
            println!("  {:>2}. {}", i + 1, Self::describe_call(call));
        }
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    fn saved(label: &str, path: &Path) {
        println!(
            "{} {} {}",
            "✓".green(),
            format!("{} saved:", label).bold(),
            path.display().to_string().cyan()
        );
    }

    fn describe_feature(feature: &Feature) -> String {
        match feature {
            Feature::Box {
                length,
                width,
                height,
            } => format!("Length={} Width={} Height={}", length, width, height),
            Feature::Cylinder { radius, height } => format!("Radius={} Height={}", radius, height),
            Feature::Sphere { radius } => format!("Radius={}", radius),
            Feature::Cone {
                radius1,
                radius2,
                height,
            } => format!("Radius1={} Radius2={} Height={}", radius1, radius2, height),
            Feature::Torus { radius1, radius2 } => {
                format!("Radius1={} Radius2={}", radius1, radius2)
            }
            Feature::Fillet { base, radius } => format!("Base={} Radius={}", base.name, radius),
            Feature::Chamfer { base, size } => format!("Base={} Size={}", base.name, size),
        }
    }

    fn describe_call(call: &KernelCall) -> String {
        match call {
            KernelCall::OpenDocument { name, .. } => format!("open document {}", name.cyan()),
            KernelCall::AddObject { name, spec, .. } => {
                let mut line = format!(
                    "add {} {} ({})",
                    spec.feature.type_id().cyan(),
                    name,
                    Self::describe_feature(&spec.feature)
                );
                if !spec.placement.is_identity() {
                    let b = &spec.placement.base;
                    line.push_str(&format!(" at ({}, {}, {})", b.x, b.y, b.z));
                    if let Some((axis, angle)) = &spec.placement.rotation {
                        line.push_str(&format!(
                            " rotated {}° about ({}, {}, {})",
                            angle, axis.x, axis.y, axis.z
                        ));
                    }
                }
                line
            }
            KernelCall::Recompute { .. } => "recompute".to_string(),
            KernelCall::Export { name, format, path, .. } => {
                format!("export {} as {} -> {}", name, format, path.display())
            }
            KernelCall::SaveDocument { path, .. } => format!("save document -> {}", path.display()),
            KernelCall::CloseDocument { .. } => "close document".to_string(),
        }
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{DocumentId, ObjectSpec, Placement, SolidHandle};

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }

    #[test]
    fn test_describe_modifier() {
        colored::control::set_override(false);
        let call = KernelCall::AddObject {
            document: DocumentId(1),
            name: "Fillet".into(),
            spec: ObjectSpec::new(Feature::Fillet {
                base: SolidHandle {
                    document: DocumentId(1),
                    name: "Box".into(),
                },
                radius: 2.0,
            }),
        };
        assert_eq!(
            Reporter::describe_call(&call),
            "add Part::Fillet Fillet (Base=Box Radius=2)"
        );
    }

    #[test]
    fn test_describe_placement() {
        colored::control::set_override(false);
        let call = KernelCall::AddObject {
            document: DocumentId(1),
            name: "Sphere".into(),
            spec: ObjectSpec::placed(Feature::Sphere { radius: 5.0 }, Placement::lifted(5.0)),
        };
        assert_eq!(
            Reporter::describe_call(&call),
            "add Part::Sphere Sphere (Radius=5) at (0, 0, 5)"
        );
    }
}
