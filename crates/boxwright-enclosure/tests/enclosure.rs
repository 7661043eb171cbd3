use approx::assert_relative_eq;
use boxwright_enclosure::{
    ConfigError, Dimensions, EnclosureConfig, Error, Feature, Kernel, Result, build_enclosure,
    build_lid, corner_posts,
};
use boxwright_geometry::{Aabb, Placement, Point3, Vector3};
use std::cell::Cell;

/// Solid stand-in: the bounds of the material and every op that produced it.
#[derive(Clone, Debug, PartialEq)]
struct Trace {
    bounds: Aabb,
    ops: Vec<String>,
}

#[derive(Debug)]
struct Refused(usize);

impl std::fmt::Display for Refused {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "boolean #{} refused", self.0)
    }
}

impl std::error::Error for Refused {}

/// Kernel double that tracks bounds and can refuse the n-th boolean.
#[derive(Default)]
struct RecordingKernel {
    calls: Cell<usize>,
    booleans: Cell<usize>,
    refuse_boolean: Option<usize>,
}

impl RecordingKernel {
    fn refusing(boolean: usize) -> Self {
        Self {
            refuse_boolean: Some(boolean),
            ..Self::default()
        }
    }

    fn boolean(
        &self,
        name: &str,
        base: &Trace,
        tool: &Trace,
        bounds: Aabb,
    ) -> std::result::Result<Trace, Refused> {
        self.calls.set(self.calls.get() + 1);
        let n = self.booleans.get() + 1;
        self.booleans.set(n);
        if self.refuse_boolean == Some(n) {
            return Err(Refused(n));
        }
        let mut ops = base.ops.clone();
        ops.extend(tool.ops.iter().cloned());
        ops.push(name.to_string());
        Ok(Trace { bounds, ops })
    }
}

impl Kernel for RecordingKernel {
    type Solid = Trace;
    type Error = Refused;

    fn make_box(&self, origin: Point3, extents: Vector3) -> std::result::Result<Trace, Refused> {
        self.calls.set(self.calls.get() + 1);
        Ok(Trace {
            bounds: Aabb::from_origin_extents(origin, extents),
            ops: vec![format!("box {extents:?}")],
        })
    }

    fn make_cylinder(
        &self,
        placement: Placement,
        radius: f64,
        height: f64,
    ) -> std::result::Result<Trace, Refused> {
        self.calls.set(self.calls.get() + 1);
        Ok(Trace {
            bounds: placement.cylinder_bounds(radius, height),
            ops: vec![format!("cylinder r={radius} h={height} {}", placement.axis)],
        })
    }

    fn translate(&self, solid: &Trace, offset: Vector3) -> std::result::Result<Trace, Refused> {
        self.calls.set(self.calls.get() + 1);
        let mut ops = solid.ops.clone();
        ops.push(format!("translate {offset:?}"));
        Ok(Trace {
            bounds: Aabb::new(solid.bounds.min + offset, solid.bounds.max + offset),
            ops,
        })
    }

    fn difference(&self, base: &Trace, tool: &Trace) -> std::result::Result<Trace, Refused> {
        self.boolean("difference", base, tool, base.bounds)
    }

    fn union(&self, base: &Trace, tool: &Trace) -> std::result::Result<Trace, Refused> {
        self.boolean("union", base, tool, base.bounds.merge(&tool.bounds))
    }
}

fn assert_extents(bounds: &Aabb, x: f64, y: f64, z: f64) {
    let extents = bounds.extents();
    assert_relative_eq!(extents.x, x, epsilon = 1.0e-9);
    assert_relative_eq!(extents.y, y, epsilon = 1.0e-9);
    assert_relative_eq!(extents.z, z, epsilon = 1.0e-9);
}

#[test]
fn default_enclosure_is_105_by_72_by_47_millimeters() -> Result<()> {
    let kernel = RecordingKernel::default();
    let solid = EnclosureConfig::default().build_enclosure(&kernel)?;

    assert_extents(&solid.bounds, 105.0, 72.0, 47.0);
    assert_eq!(solid.bounds.min, Point3::new(0.0, 0.0, 0.0));
    // cavity + three cutouts + four posts (cut then fuse each)
    assert_eq!(kernel.booleans.get(), 1 + 3 + 4 * 2);
    Ok(())
}

#[test]
fn corner_post_scenario_in_centimeters() -> Result<()> {
    let dims = Dimensions::new(10.5, 7.2, 4.7, 0.2).scaled(10.0);
    let features: Vec<Feature> = corner_posts(&dims, 7.0, 2.5, 1.5);
    let kernel = RecordingKernel::default();

    let solid = build_enclosure(&kernel, &dims, &features)?;

    assert_extents(&solid.bounds, 105.0, 72.0, 47.0);
    Ok(())
}

#[test]
fn identical_inputs_build_identical_solids() -> Result<()> {
    let config = EnclosureConfig::default();
    let first = config.build_enclosure(&RecordingKernel::default())?;
    let second = config.build_enclosure(&RecordingKernel::default())?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn posts_are_hollowed_before_fusing() -> Result<()> {
    let dims = Dimensions::new(105.0, 72.0, 47.0, 2.0);
    let features = corner_posts(&dims, 7.0, 2.5, 1.5);
    let solid = build_enclosure(&RecordingKernel::default(), &dims, &features[..1])?;

    let tail: Vec<&str> = solid.ops.iter().rev().take(4).rev().map(String::as_str).collect();
    assert_eq!(tail[2], "difference");
    assert_eq!(tail[3], "union");
    assert!(tail[0].starts_with("cylinder r=2.5"));
    assert!(tail[1].starts_with("cylinder r=1.5"));
    Ok(())
}

#[test]
fn kernel_failure_names_the_step() {
    // Booleans: 1 cavity, 2 usb_b_port, 3 dc_jack.
    let kernel = RecordingKernel::refusing(3);
    let err = EnclosureConfig::default().build_enclosure(&kernel);
    match err {
        Err(Error::Construction { step, source }) => {
            assert_eq!(step, "dc_jack");
            assert_eq!(source.to_string(), "boolean #3 refused");
        }
        other => panic!("expected a construction error, got {other:?}"),
    }
}

#[test]
fn post_failure_aborts_without_partial_result() {
    // The fifth boolean hollows the first post.
    let kernel = RecordingKernel::refusing(5);
    let err = EnclosureConfig::default().build_enclosure(&kernel);
    assert!(matches!(err, Err(Error::Construction { ref step, .. }) if step == "post_front_left"));
    assert_eq!(kernel.booleans.get(), 5);
}

#[test]
fn shallow_cutout_never_reaches_the_kernel() {
    let dims = Dimensions::new(105.0, 72.0, 47.0, 2.0);
    let shallow = Feature::BoxCutout {
        label: "usb_b_port".to_string(),
        origin: Point3::new(0.0, 10.0, 7.0),
        extents: Vector3::new(1.0, 16.0, 11.5),
    };
    let kernel = RecordingKernel::default();

    let err = build_enclosure(&kernel, &dims, &[shallow]);

    assert!(matches!(
        err,
        Err(Error::Config(ConfigError::ShallowCutout { .. }))
    ));
    assert_eq!(kernel.calls.get(), 0);
}

#[test]
fn hole_as_wide_as_post_is_a_config_error() {
    let dims = Dimensions::new(105.0, 72.0, 47.0, 2.0);
    let features = corner_posts(&dims, 7.0, 2.5, 3.0);
    let kernel = RecordingKernel::default();

    let err = build_enclosure(&kernel, &dims, &features);

    assert!(matches!(
        err,
        Err(Error::Config(ConfigError::HoleTooLarge { .. }))
    ));
    assert_eq!(kernel.calls.get(), 0);
}

#[test]
fn default_lid_carries_holes_and_logo() -> Result<()> {
    let config = EnclosureConfig::default();
    let kernel = RecordingKernel::default();

    let lid = config.build_lid(&kernel)?;

    // plate 3 mm plus a 2 mm logo
    assert_extents(&lid.bounds, 105.0, 72.0, 5.0);
    assert_eq!(kernel.booleans.get(), 4 + 1);
    assert!(lid.ops.iter().any(|op| op.starts_with("translate")));
    Ok(())
}

#[test]
fn lid_screws_follow_the_posts() {
    let config = EnclosureConfig::default();
    assert_eq!(config.screw_coordinates(), config.post_coordinates());
    assert_eq!(config.post_coordinates().len(), 4);
}

#[test]
fn lid_without_logo_is_a_flat_plate() -> Result<()> {
    let mut config = EnclosureConfig::default();
    config.lid.logo = None;
    let mm = config.to_millimeters();

    let lid = build_lid(
        &RecordingKernel::default(),
        &mm.dimensions,
        &mm.lid,
        &mm.screw_coordinates(),
    )?;

    assert_extents(&lid.bounds, 105.0, 72.0, 3.0);
    assert!(lid.ops.iter().all(|op| op != "union"));
    Ok(())
}
