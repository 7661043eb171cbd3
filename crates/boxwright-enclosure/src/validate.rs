//! Parameter checks run before any kernel call. All lengths are millimeters.

use crate::ConfigError;
use crate::config::{Dimensions, Feature, LidSpec};
use boxwright_geometry::{Aabb, Point2, Point3, Vector3};
use std::collections::HashSet;

type Result<T> = std::result::Result<T, ConfigError>;

/// One of the five walls of the open-topped shell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Wall {
    Left,
    Right,
    Front,
    Back,
    Floor,
}

impl Wall {
    pub const ALL: [Self; 5] = [Self::Left, Self::Right, Self::Front, Self::Back, Self::Floor];

    /// Index of the axis the wall's thickness is measured along.
    pub const fn normal_axis(self) -> usize {
        match self {
            Self::Left | Self::Right => 0,
            Self::Front | Self::Back => 1,
            Self::Floor => 2,
        }
    }

    /// Region occupied by the wall.
    pub fn slab(self, dims: &Dimensions) -> Aabb {
        let t = dims.thickness;
        let (origin, extents) = match self {
            Self::Left => (
                Point3::new(0.0, 0.0, 0.0),
                Vector3::new(t, dims.width, dims.height),
            ),
            Self::Right => (
                Point3::new(dims.length - t, 0.0, 0.0),
                Vector3::new(t, dims.width, dims.height),
            ),
            Self::Front => (
                Point3::new(0.0, 0.0, 0.0),
                Vector3::new(dims.length, t, dims.height),
            ),
            Self::Back => (
                Point3::new(0.0, dims.width - t, 0.0),
                Vector3::new(dims.length, t, dims.height),
            ),
            Self::Floor => (
                Point3::new(0.0, 0.0, 0.0),
                Vector3::new(dims.length, dims.width, t),
            ),
        };
        Aabb::from_origin_extents(origin, extents)
    }
}

impl std::fmt::Display for Wall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Front => "front",
            Self::Back => "back",
            Self::Floor => "floor",
        };
        f.write_str(name)
    }
}

pub fn validate_dimensions(dims: &Dimensions) -> Result<()> {
    positive("length", dims.length)?;
    positive("width", dims.width)?;
    positive("height", dims.height)?;
    positive("thickness", dims.thickness)?;

    let smallest = dims.length.min(dims.width).min(dims.height);
    if 2.0 * dims.thickness >= smallest {
        return Err(ConfigError::DegenerateCavity {
            thickness: dims.thickness,
            smallest,
        });
    }
    Ok(())
}

pub fn validate_enclosure(dims: &Dimensions, features: &[Feature], eps: f64) -> Result<()> {
    validate_dimensions(dims)?;

    let mut labels = HashSet::new();
    for feature in features {
        if !labels.insert(feature.label()) {
            return Err(ConfigError::DuplicateLabel(feature.label().to_string()));
        }
        validate_feature(dims, feature, eps)?;
    }
    Ok(())
}

fn validate_feature(dims: &Dimensions, feature: &Feature, eps: f64) -> Result<()> {
    let label = feature.label();
    let outer = dims.outer_bounds();

    let origin = match feature {
        Feature::BoxCutout {
            origin, extents, ..
        } => {
            positive(&format!("{label}.extents.x"), extents.x)?;
            positive(&format!("{label}.extents.y"), extents.y)?;
            positive(&format!("{label}.extents.z"), extents.z)?;
            *origin
        }
        Feature::CylinderCutout {
            placement,
            radius,
            depth,
            ..
        } => {
            positive(&format!("{label}.radius"), *radius)?;
            positive(&format!("{label}.depth"), *depth)?;
            placement.origin
        }
        Feature::Post {
            placement,
            radius,
            hole_radius,
            height,
            ..
        } => {
            positive(&format!("{label}.radius"), *radius)?;
            positive(&format!("{label}.hole_radius"), *hole_radius)?;
            positive(&format!("{label}.height"), *height)?;
            if hole_radius >= radius {
                return Err(ConfigError::HoleTooLarge {
                    feature: label.to_string(),
                    hole_radius: *hole_radius,
                    radius: *radius,
                });
            }
            placement.origin
        }
    };

    if !outer.contains_point(origin, eps) {
        return Err(ConfigError::OutOfBounds {
            feature: label.to_string(),
            x: origin.x,
            y: origin.y,
            z: origin.z,
        });
    }

    if feature.is_cutout() {
        check_through_cut(dims, label, &feature.bounds(), eps)
    } else if !outer.contains(&feature.bounds(), eps) {
        Err(ConfigError::Protrudes {
            feature: label.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Every wall the cutout touches must be spanned along its normal, otherwise
/// the cut leaves a pocket. A cutout touching no wall cuts nothing.
fn check_through_cut(dims: &Dimensions, label: &str, cut: &Aabb, eps: f64) -> Result<()> {
    let mut touched = false;
    for wall in Wall::ALL {
        let slab = wall.slab(dims);
        if !cut.overlaps(&slab, eps) {
            continue;
        }
        touched = true;

        let axis = wall.normal_axis();
        let spans = cut.min[axis] <= slab.min[axis] + eps && cut.max[axis] >= slab.max[axis] - eps;
        if !spans {
            return Err(ConfigError::ShallowCutout {
                feature: label.to_string(),
                wall,
                cut: cut.overlap_on(&slab, axis),
                thickness: dims.thickness,
            });
        }
    }

    if !touched {
        return Err(ConfigError::MissesShell {
            feature: label.to_string(),
        });
    }
    Ok(())
}

pub fn validate_lid(
    dims: &Dimensions,
    lid: &LidSpec,
    screw_coords: &[Point2],
    eps: f64,
) -> Result<()> {
    validate_dimensions(dims)?;
    positive("lid.thickness", lid.thickness)?;
    positive("lid.hole_radius", lid.hole_radius)?;

    for screw in screw_coords {
        let r = lid.hole_radius;
        let fits = screw.x - r >= -eps
            && screw.x + r <= dims.length + eps
            && screw.y - r >= -eps
            && screw.y + r <= dims.width + eps;
        if !fits {
            return Err(ConfigError::ScrewOutsideLid {
                x: screw.x,
                y: screw.y,
            });
        }
    }

    if let Some(logo) = &lid.logo {
        positive("lid.logo.length", logo.length)?;
        positive("lid.logo.width", logo.width)?;
        positive("lid.logo.height", logo.height)?;
        if logo.length > dims.length + eps || logo.width > dims.width + eps {
            return Err(ConfigError::LogoTooLarge {
                length: logo.length,
                width: logo.width,
                lid_length: dims.length,
                lid_width: dims.width,
            });
        }
    }
    Ok(())
}

/// Every lid screw hole must sit over an enclosure post.
pub fn check_screw_alignment(posts: &[Point2], screws: &[Point2], eps: f64) -> Result<()> {
    for screw in screws {
        let aligned = posts
            .iter()
            .any(|post| (post.x - screw.x).abs() <= eps && (post.y - screw.y).abs() <= eps);
        if !aligned {
            return Err(ConfigError::ScrewMisaligned {
                x: screw.x,
                y: screw.y,
            });
        }
    }
    Ok(())
}

fn positive(name: &str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::NonPositive {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}
