//! Kernel-independent description of how a part is assembled.

use crate::config::{Dimensions, Feature, LidSpec};
use boxwright_geometry::{Aabb, Placement, Point2, Point3, Vector3};

/// Share of the relevant wall or plate thickness by which boolean tools
/// overshoot faces they would otherwise share with the solid.
const CLEARANCE_RATIO: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Box { origin: Point3, extents: Vector3 },
    Cylinder {
        placement: Placement,
        radius: f64,
        height: f64,
    },
}

impl Primitive {
    pub fn bounds(&self) -> Aabb {
        match self {
            Self::Box { origin, extents } => Aabb::from_origin_extents(*origin, *extents),
            Self::Cylinder {
                placement,
                radius,
                height,
            } => placement.cylinder_bounds(*radius, *height),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Subtract `tool` from the current solid.
    Cut { label: String, tool: Primitive },
    /// Subtract `hole` from `post`, then fuse the result onto the current solid.
    Post {
        label: String,
        post: Primitive,
        hole: Primitive,
    },
    /// Fuse `tool`, moved by `offset` first when given.
    Fuse {
        label: String,
        tool: Primitive,
        offset: Option<Vector3>,
    },
}

impl Step {
    pub fn label(&self) -> &str {
        match self {
            Self::Cut { label, .. } | Self::Post { label, .. } | Self::Fuse { label, .. } => label,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BuildPlan {
    pub name: String,
    pub base: Primitive,
    pub steps: Vec<Step>,
}

/// Plan for the enclosure body.
///
/// The cavity is cut first, then every cutout in caller order, then every
/// post in caller order.
pub fn plan_enclosure(dims: &Dimensions, features: &[Feature]) -> BuildPlan {
    let t = dims.thickness;
    let clearance = t * CLEARANCE_RATIO;

    let mut steps = vec![Step::Cut {
        label: "cavity".to_string(),
        tool: Primitive::Box {
            origin: Point3::new(t, t, t),
            // Runs past the open top so the cut does not end flush with the rim.
            extents: Vector3::new(
                dims.length - 2.0 * t,
                dims.width - 2.0 * t,
                dims.height - t + clearance,
            ),
        },
    }];

    let planes = wall_planes(dims);
    for feature in features.iter().filter(|f| f.is_cutout()) {
        let tool = match feature {
            Feature::BoxCutout {
                origin, extents, ..
            } => overshoot_box(*origin, *extents, &planes, clearance),
            Feature::CylinderCutout {
                placement,
                radius,
                depth,
                ..
            } => overshoot_cylinder(*placement, *radius, *depth, &planes, clearance),
            Feature::Post { .. } => continue,
        };
        steps.push(Step::Cut {
            label: feature.label().to_string(),
            tool,
        });
    }

    for feature in features {
        if let Feature::Post {
            label,
            placement,
            radius,
            hole_radius,
            height,
        } = feature
        {
            // Sunk into its seat so the fuse overlaps instead of touching.
            let post = Primitive::Cylinder {
                placement: placement.advanced(-clearance),
                radius: *radius,
                height: height + clearance,
            };
            // Blind bore: starts above the seat and runs out of the free end.
            let hole = Primitive::Cylinder {
                placement: placement.advanced(clearance),
                radius: *hole_radius,
                height: *height,
            };
            steps.push(Step::Post {
                label: label.clone(),
                post,
                hole,
            });
        }
    }

    BuildPlan {
        name: "enclosure".to_string(),
        base: Primitive::Box {
            origin: Point3::new(0.0, 0.0, 0.0),
            extents: Vector3::new(dims.length, dims.width, dims.height),
        },
        steps,
    }
}

/// Coordinates of the shell's planar faces along each axis: outer faces,
/// inner wall faces, the floor top and the rim.
fn wall_planes(dims: &Dimensions) -> [Vec<f64>; 3] {
    let t = dims.thickness;
    [
        vec![0.0, t, dims.length - t, dims.length],
        vec![0.0, t, dims.width - t, dims.width],
        vec![0.0, t, dims.height],
    ]
}

fn on_plane(value: f64, planes: &[f64], clearance: f64) -> bool {
    planes
        .iter()
        .any(|plane| (value - plane).abs() < clearance * 0.5)
}

/// Pushes every face of the box that lies on a shell face out by `clearance`.
fn overshoot_box(
    origin: Point3,
    extents: Vector3,
    planes: &[Vec<f64>; 3],
    clearance: f64,
) -> Primitive {
    let mut min = origin;
    let mut max = origin + extents;
    for (axis, planes) in planes.iter().enumerate() {
        if on_plane(min[axis], planes, clearance) {
            min[axis] -= clearance;
        }
        if on_plane(max[axis], planes, clearance) {
            max[axis] += clearance;
        }
    }
    Primitive::Box {
        origin: min,
        extents: max - min,
    }
}

/// Lengthens the cylinder past whichever end caps lie on a shell face.
fn overshoot_cylinder(
    placement: Placement,
    radius: f64,
    depth: f64,
    planes: &[Vec<f64>; 3],
    clearance: f64,
) -> Primitive {
    let axis = placement.axis.index();
    let mut placement = placement;
    let mut height = depth;
    if on_plane(placement.end(depth)[axis], &planes[axis], clearance) {
        height += clearance;
    }
    if on_plane(placement.origin[axis], &planes[axis], clearance) {
        placement = placement.advanced(-clearance);
        height += clearance;
    }
    Primitive::Cylinder {
        placement,
        radius,
        height,
    }
}

/// Plan for the lid plate, its screw holes and the optional logo block.
pub fn plan_lid(dims: &Dimensions, lid: &LidSpec, screw_coords: &[Point2]) -> BuildPlan {
    let clearance = lid.thickness * CLEARANCE_RATIO;

    let mut steps: Vec<Step> = screw_coords
        .iter()
        .enumerate()
        .map(|(i, screw)| Step::Cut {
            label: format!("screw_hole_{}", i + 1),
            tool: Primitive::Cylinder {
                placement: Placement::along_z(screw.x, screw.y, -clearance),
                radius: lid.hole_radius,
                height: lid.thickness + 2.0 * clearance,
            },
        })
        .collect();

    if let Some(logo) = &lid.logo {
        steps.push(Step::Fuse {
            label: "logo".to_string(),
            tool: Primitive::Box {
                origin: Point3::new(0.0, 0.0, 0.0),
                extents: Vector3::new(logo.length, logo.width, logo.height + clearance),
            },
            offset: Some(Vector3::new(
                (dims.length - logo.length) / 2.0,
                (dims.width - logo.width) / 2.0,
                lid.thickness - clearance,
            )),
        });
    }

    BuildPlan {
        name: "lid".to_string(),
        base: Primitive::Box {
            origin: Point3::new(0.0, 0.0, 0.0),
            extents: Vector3::new(dims.length, dims.width, lid.thickness),
        },
        steps,
    }
}
