// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Maps validated shape parameters onto kernel objects

use crate::error::Result;
use crate::kernel::{Feature, ObjectSpec, Placement, SolidHandle};
use crate::params::{Modifiers, Shape, ShapeParams};
use crate::session::Session;
use nalgebra::Vector3;
use tracing::debug;

/// Construction request for the bare primitive.
///
/// Radii are half the given diameters. Cylinder, sphere and torus are
/// lifted so they sit on the XY plane; the cylinder is also turned -90°
/// about X.
pub fn primitive_spec(shape: &Shape) -> ObjectSpec {
    match *shape {
        Shape::Box {
            width,
            height,
            depth,
        } => ObjectSpec::new(Feature::Box {
            length: depth,
            width,
            height,
        }),
        Shape::Cylinder { diameter, height } => ObjectSpec::placed(
            Feature::Cylinder {
                radius: diameter / 2.0,
                height,
            },
            Placement::lifted(height / 2.0).with_rotation(Vector3::x(), -90.0),
        ),
        Shape::Sphere { diameter } => ObjectSpec::placed(
            Feature::Sphere {
                radius: diameter / 2.0,
            },
            Placement::lifted(diameter / 2.0),
        ),
        Shape::Cone {
            diameter_base,
            diameter_top,
            height,
        } => ObjectSpec::new(Feature::Cone {
            radius1: diameter_base / 2.0,
            radius2: diameter_top / 2.0,
            height,
        }),
        Shape::Torus {
            diameter_major,
            diameter_minor,
        } => ObjectSpec::placed(
            Feature::Torus {
                radius1: diameter_major / 2.0,
                radius2: diameter_minor / 2.0,
            },
            Placement::lifted(diameter_major / 2.0),
        ),
    }
}

/// Add fillet and chamfer objects on top of `base`.
///
/// Both modifiers reference `base` unless `chain` is set, in which case the
/// chamfer is applied to the fillet. Returns the last object created.
fn apply_modifiers(
    session: &mut Session<'_>,
    base: SolidHandle,
    modifiers: &Modifiers,
) -> Result<SolidHandle> {
    let mut last = base.clone();

    let fillet = if modifiers.fillet_radius > 0.0 {
        let handle = session.add_object(&ObjectSpec::new(Feature::Fillet {
            base: base.clone(),
            radius: modifiers.fillet_radius,
        }))?;
        last = handle.clone();
        Some(handle)
    } else {
        None
    };

    if modifiers.chamfer_size > 0.0 {
        let chamfer_base = match (modifiers.chain, fillet) {
            (true, Some(fillet)) => fillet,
            _ => base,
        };
        last = session.add_object(&ObjectSpec::new(Feature::Chamfer {
            base: chamfer_base,
            size: modifiers.chamfer_size,
        }))?;
    }

    Ok(last)
}

/// Construct the solid described by `params` and recompute the document.
///
/// The returned handle is the object to export: the outermost modifier when
/// any were applied, otherwise the primitive.
pub fn build(session: &mut Session<'_>, params: &ShapeParams) -> Result<SolidHandle> {
    let primitive = session.add_object(&primitive_spec(&params.shape))?;
    let solid = apply_modifiers(session, primitive, &params.modifiers)?;
    session.recompute()?;
    debug!(shape = %params.kind(), solid = %solid.name, "solid built");
    Ok(solid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{KernelCall, RecordingKernel};
    use approx::assert_relative_eq;

    fn boxed(modifiers: Modifiers) -> ShapeParams {
        ShapeParams {
            shape: Shape::Box {
                width: 10.0,
                height: 20.0,
                depth: 30.0,
            },
            modifiers,
            segments: None,
        }
    }

    #[test]
    fn test_box_maps_depth_to_length() {
        let spec = primitive_spec(&Shape::Box {
            width: 10.0,
            height: 20.0,
            depth: 30.0,
        });
        assert_eq!(
            spec.feature,
            Feature::Box {
                length: 30.0,
                width: 10.0,
                height: 20.0
            }
        );
        assert!(spec.placement.is_identity());
    }

    #[test]
    fn test_cylinder_placement() {
        let spec = primitive_spec(&Shape::Cylinder {
            diameter: 6.0,
            height: 10.0,
        });
        assert_eq!(
            spec.feature,
            Feature::Cylinder {
                radius: 3.0,
                height: 10.0
            }
        );
        assert_relative_eq!(spec.placement.base.z, 5.0);
        let (axis, angle) = spec.placement.rotation.unwrap();
        assert_eq!(axis, Vector3::x());
        assert_relative_eq!(angle, -90.0);
    }

    #[test]
    fn test_torus_radii() {
        let spec = primitive_spec(&Shape::Torus {
            diameter_major: 40.0,
            diameter_minor: 8.0,
        });
        match spec.feature {
            Feature::Torus { radius1, radius2 } => {
                assert_relative_eq!(radius1, 20.0);
                assert_relative_eq!(radius2, 4.0);
            }
            other => panic!("unexpected feature {:?}", other),
        }
        assert_relative_eq!(spec.placement.base.z, 20.0);
    }

    #[test]
    fn test_cone_is_not_moved() {
        let spec = primitive_spec(&Shape::Cone {
            diameter_base: 10.0,
            diameter_top: 2.0,
            height: 7.0,
        });
        assert!(spec.placement.is_identity());
    }

    #[test]
    fn test_modifiers_share_base_by_default() {
        let mut kernel = RecordingKernel::dry_run();
        let solid = {
            let mut session = Session::open(&mut kernel, "CADGen").unwrap();
            let solid = build(
                &mut session,
                &boxed(Modifiers {
                    fillet_radius: 1.0,
                    chamfer_size: 0.5,
                    chain: false,
                }),
            )
            .unwrap();
            session.close().unwrap();
            solid
        };

        assert_eq!(solid.name, "Chamfer");
        let specs = kernel.constructed();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[1].feature.base().map(|b| b.name.as_str()), Some("Box"));
        assert_eq!(specs[2].feature.base().map(|b| b.name.as_str()), Some("Box"));
        assert!(kernel
            .calls()
            .iter()
            .any(|c| matches!(c, KernelCall::Recompute { .. })));
    }

    #[test]
    fn test_chained_modifiers() {
        let mut kernel = RecordingKernel::dry_run();
        let mut session = Session::open(&mut kernel, "CADGen").unwrap();
        build(
            &mut session,
            &boxed(Modifiers {
                fillet_radius: 1.0,
                chamfer_size: 0.5,
                chain: true,
            }),
        )
        .unwrap();
        session.close().unwrap();

        let specs = kernel.constructed();
        assert_eq!(specs[2].feature.base().map(|b| b.name.as_str()), Some("Fillet"));
    }

    #[test]
    fn test_plain_box_exports_itself() {
        let mut kernel = RecordingKernel::dry_run();
        let mut session = Session::open(&mut kernel, "CADGen").unwrap();
        let solid = build(&mut session, &boxed(Modifiers::default())).unwrap();
        assert_eq!(solid.name, "Box");
        session.close().unwrap();
        assert_eq!(kernel.constructed().len(), 1);
    }

    #[test]
    fn test_degenerate_dimensions_fail_in_kernel() {
        let mut kernel = RecordingKernel::dry_run();
        let mut session = Session::open(&mut kernel, "CADGen").unwrap();
        let params = ShapeParams {
            shape: Shape::Sphere { diameter: 0.0 },
            modifiers: Modifiers::default(),
            segments: Some(32),
        };
        let err = build(&mut session, &params).unwrap_err();
        assert!(matches!(err, crate::error::CadError::Kernel { .. }));
    }
}
