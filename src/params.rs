// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shape parameters and their validation
//!
//! [`ShapeArgs`] is the raw flag set as clap reads it. [`ShapeParams::parse`]
//! turns it into a typed, validated record; nothing reaches the kernel
//! before that succeeds.

use crate::error::ValidationError;
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Primitive solid kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Box,
    Cylinder,
    Sphere,
    Cone,
    Torus,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Box => "box",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cone => "cone",
            ShapeKind::Torus => "torus",
        }
    }

    /// Tessellation resolution used when `--segments` is not given
    pub fn default_segments(&self) -> Option<u32> {
        match self {
            ShapeKind::Box => None,
            ShapeKind::Cylinder | ShapeKind::Cone => Some(50),
            ShapeKind::Sphere => Some(32),
            ShapeKind::Torus => Some(48),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "box" => Ok(ShapeKind::Box),
            "cylinder" => Ok(ShapeKind::Cylinder),
            "sphere" => Ok(ShapeKind::Sphere),
            "cone" => Ok(ShapeKind::Cone),
            "torus" => Ok(ShapeKind::Torus),
            _ => Err(ValidationError::UnknownShape(s.to_string())),
        }
    }
}

/// Raw shape flags
#[derive(Args, Debug, Clone, Default)]
pub struct ShapeArgs {
    /// Shape to generate (box, cylinder, sphere, cone, torus)
    #[arg(long)]
    pub shape: String,

    /// Width (box)
    #[arg(long)]
    pub width: Option<f64>,

    /// Height (box, cylinder, cone)
    #[arg(long)]
    pub height: Option<f64>,

    /// Depth (box)
    #[arg(long)]
    pub depth: Option<f64>,

    /// Fillet radius applied to every box edge
    #[arg(long, default_value_t = 0.0)]
    pub fillet_radius: f64,

    /// Chamfer size applied to every box edge
    #[arg(long, default_value_t = 0.0)]
    pub chamfer_size: f64,

    /// Chamfer the filleted solid instead of the original box
    #[arg(long)]
    pub chain_modifiers: bool,

    /// Diameter (cylinder, sphere)
    #[arg(long)]
    pub diameter: Option<f64>,

    /// Base diameter (cone)
    #[arg(long)]
    pub diameter_base: Option<f64>,

    /// Top diameter (cone)
    #[arg(long)]
    pub diameter_top: Option<f64>,

    /// Major diameter (torus)
    #[arg(long)]
    pub diameter_major: Option<f64>,

    /// Minor diameter (torus)
    #[arg(long)]
    pub diameter_minor: Option<f64>,

    /// Tessellation segments for mesh export
    /// [defaults: cylinder 50, sphere 32, cone 50, torus 48]
    #[arg(long)]
    pub segments: Option<u32>,
}

/// Dimensions of one primitive. Diameters, not radii, as given on the
/// command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Box {
        width: f64,
        height: f64,
        depth: f64,
    },
    Cylinder {
        diameter: f64,
        height: f64,
    },
    Sphere {
        diameter: f64,
    },
    Cone {
        diameter_base: f64,
        diameter_top: f64,
        height: f64,
    },
    Torus {
        diameter_major: f64,
        diameter_minor: f64,
    },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Box { .. } => ShapeKind::Box,
            Shape::Cylinder { .. } => ShapeKind::Cylinder,
            Shape::Sphere { .. } => ShapeKind::Sphere,
            Shape::Cone { .. } => ShapeKind::Cone,
            Shape::Torus { .. } => ShapeKind::Torus,
        }
    }
}

/// Edge modifiers (box only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    pub fillet_radius: f64,
    pub chamfer_size: f64,
    /// Base the chamfer on the fillet rather than on the box
    pub chain: bool,
}

/// Validated parameters for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeParams {
    pub shape: Shape,
    pub modifiers: Modifiers,
    pub segments: Option<u32>,
}

fn required(
    value: Option<f64>,
    shape: ShapeKind,
    field: &'static str,
) -> Result<f64, ValidationError> {
    let value = value.ok_or(ValidationError::Missing {
        shape: shape.as_str(),
        field,
    })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(value)
}

fn non_negative(value: f64, field: &'static str) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

impl ShapeParams {
    /// Validate raw flags into typed parameters
    pub fn parse(args: &ShapeArgs) -> Result<Self, ValidationError> {
        let kind: ShapeKind = args.shape.parse()?;

        let shape = match kind {
            ShapeKind::Box => {
                // Missing flags are reported before range errors
                first_missing(
                    kind,
                    &[("width", args.width), ("height", args.height), ("depth", args.depth)],
                )?;
                Shape::Box {
                    width: required(args.width, kind, "width")?,
                    height: required(args.height, kind, "height")?,
                    depth: required(args.depth, kind, "depth")?,
                }
            }
            ShapeKind::Cylinder => {
                first_missing(kind, &[("diameter", args.diameter), ("height", args.height)])?;
                Shape::Cylinder {
                    diameter: required(args.diameter, kind, "diameter")?,
                    height: required(args.height, kind, "height")?,
                }
            }
            ShapeKind::Sphere => Shape::Sphere {
                diameter: required(args.diameter, kind, "diameter")?,
            },
            ShapeKind::Cone => {
                first_missing(
                    kind,
                    &[
                        ("diameter-base", args.diameter_base),
                        ("diameter-top", args.diameter_top),
                        ("height", args.height),
                    ],
                )?;
                Shape::Cone {
                    diameter_base: required(args.diameter_base, kind, "diameter-base")?,
                    diameter_top: required(args.diameter_top, kind, "diameter-top")?,
                    height: required(args.height, kind, "height")?,
                }
            }
            ShapeKind::Torus => {
                first_missing(
                    kind,
                    &[
                        ("diameter-major", args.diameter_major),
                        ("diameter-minor", args.diameter_minor),
                    ],
                )?;
                Shape::Torus {
                    diameter_major: required(args.diameter_major, kind, "diameter-major")?,
                    diameter_minor: required(args.diameter_minor, kind, "diameter-minor")?,
                }
            }
        };

        let modifiers = Modifiers {
            fillet_radius: non_negative(args.fillet_radius, "fillet-radius")?,
            chamfer_size: non_negative(args.chamfer_size, "chamfer-size")?,
            chain: args.chain_modifiers,
        };

        if let Some(segments) = args.segments {
            if segments < 3 {
                return Err(ValidationError::TooFewSegments(segments));
            }
        }

        warn_ignored(kind, args);

        let modifiers = if kind == ShapeKind::Box {
            modifiers
        } else {
            Modifiers::default()
        };

        Ok(Self {
            shape,
            modifiers,
            segments: args.segments.or_else(|| kind.default_segments()),
        })
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }
}

fn first_missing(
    kind: ShapeKind,
    fields: &[(&'static str, Option<f64>)],
) -> Result<(), ValidationError> {
    match fields.iter().find(|(_, value)| value.is_none()) {
        Some((field, _)) => Err(ValidationError::Missing {
            shape: kind.as_str(),
            field: *field,
        }),
        None => Ok(()),
    }
}

/// Flags that were given but mean nothing for `kind`
fn ignored_flags(kind: ShapeKind, args: &ShapeArgs) -> Vec<&'static str> {
    let used: &[&str] = match kind {
        ShapeKind::Box => &[
            "width",
            "height",
            "depth",
            "fillet-radius",
            "chamfer-size",
            "chain-modifiers",
            "segments",
        ],
        ShapeKind::Cylinder => &["diameter", "height", "segments"],
        ShapeKind::Sphere => &["diameter", "segments"],
        ShapeKind::Cone => &["diameter-base", "diameter-top", "height", "segments"],
        ShapeKind::Torus => &["diameter-major", "diameter-minor", "segments"],
    };
    let given = [
        ("width", args.width.is_some()),
        ("height", args.height.is_some()),
        ("depth", args.depth.is_some()),
        ("fillet-radius", args.fillet_radius != 0.0),
        ("chamfer-size", args.chamfer_size != 0.0),
        ("chain-modifiers", args.chain_modifiers),
        ("diameter", args.diameter.is_some()),
        ("diameter-base", args.diameter_base.is_some()),
        ("diameter-top", args.diameter_top.is_some()),
        ("diameter-major", args.diameter_major.is_some()),
        ("diameter-minor", args.diameter_minor.is_some()),
    ];
    given
        .iter()
        .filter(|(flag, present)| *present && !used.contains(flag))
        .map(|(flag, _)| *flag)
        .collect()
}

fn warn_ignored(kind: ShapeKind, args: &ShapeArgs) {
    for flag in ignored_flags(kind, args) {
        warn!(shape = %kind, flag, "ignoring --{} for {}", flag, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(shape: &str) -> ShapeArgs {
        ShapeArgs {
            shape: shape.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_box_requires_all_three() {
        let mut raw = args("box");
        raw.width = Some(10.0);
        raw.height = Some(20.0);
        assert_eq!(
            ShapeParams::parse(&raw),
            Err(ValidationError::Missing {
                shape: "box",
                field: "depth"
            })
        );

        raw.depth = Some(30.0);
        let params = ShapeParams::parse(&raw).unwrap();
        assert_eq!(
            params.shape,
            Shape::Box {
                width: 10.0,
                height: 20.0,
                depth: 30.0
            }
        );
        assert_eq!(params.segments, None);
    }

    #[test]
    fn test_missing_reported_before_range() {
        let mut raw = args("cylinder");
        raw.diameter = Some(-1.0);
        assert_eq!(
            ShapeParams::parse(&raw),
            Err(ValidationError::Missing {
                shape: "cylinder",
                field: "height"
            })
        );
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let mut raw = args("sphere");
        raw.diameter = Some(0.0);
        assert_eq!(
            ShapeParams::parse(&raw),
            Err(ValidationError::NotPositive {
                field: "diameter",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_unknown_shape() {
        assert_eq!(
            ShapeParams::parse(&args("prism")),
            Err(ValidationError::UnknownShape("prism".into()))
        );
    }

    #[test]
    fn test_segment_defaults() {
        let mut torus = args("torus");
        torus.diameter_major = Some(40.0);
        torus.diameter_minor = Some(8.0);
        assert_eq!(ShapeParams::parse(&torus).unwrap().segments, Some(48));

        let mut sphere = args("sphere");
        sphere.diameter = Some(10.0);
        assert_eq!(ShapeParams::parse(&sphere).unwrap().segments, Some(32));

        sphere.segments = Some(64);
        assert_eq!(ShapeParams::parse(&sphere).unwrap().segments, Some(64));

        sphere.segments = Some(2);
        assert_eq!(
            ShapeParams::parse(&sphere),
            Err(ValidationError::TooFewSegments(2))
        );
    }

    #[test]
    fn test_negative_fillet_rejected() {
        let mut raw = args("box");
        raw.width = Some(1.0);
        raw.height = Some(1.0);
        raw.depth = Some(1.0);
        raw.fillet_radius = -0.5;
        assert!(matches!(
            ShapeParams::parse(&raw),
            Err(ValidationError::Negative {
                field: "fillet-radius",
                ..
            })
        ));
    }

    #[test]
    fn test_modifiers_dropped_for_non_box() {
        let mut raw = args("cone");
        raw.diameter_base = Some(10.0);
        raw.diameter_top = Some(4.0);
        raw.height = Some(12.0);
        raw.fillet_radius = 1.0;
        raw.width = Some(3.0);

        assert_eq!(ignored_flags(ShapeKind::Cone, &raw), vec!["width", "fillet-radius"]);
        let params = ShapeParams::parse(&raw).unwrap();
        assert_eq!(params.modifiers, Modifiers::default());
    }

    #[test]
    fn test_chain_modifiers_reported_for_non_box() {
        let mut raw = args("sphere");
        raw.diameter = Some(10.0);
        raw.chain_modifiers = true;
        assert_eq!(
            ignored_flags(ShapeKind::Sphere, &raw),
            vec!["chain-modifiers"]
        );
        assert!(!ShapeParams::parse(&raw).unwrap().modifiers.chain);

        let mut boxed = args("box");
        boxed.width = Some(1.0);
        boxed.height = Some(1.0);
        boxed.depth = Some(1.0);
        boxed.chain_modifiers = true;
        assert!(ignored_flags(ShapeKind::Box, &boxed).is_empty());
    }
}
