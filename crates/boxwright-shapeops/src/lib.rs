use boxwright_topology::{Solid, is_empty};
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

pub const DEFAULT_SHAPEOPS_TOLERANCE: f64 = 0.05;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("boolean operation failed")]
    BooleanFailed,
    #[error("boolean operation produced an empty solid")]
    EmptyResult,
    #[error(transparent)]
    Topology(#[from] boxwright_topology::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn difference(base: &Solid, tool: &Solid, tol: f64) -> Result<Solid> {
    ensure_tolerance(tol)?;

    let mut inverted_tool = tool.clone();
    inverted_tool.not();

    guarded(|| truck_shapeops::and(base, &inverted_tool, tol))
}

pub fn union(base: &Solid, tool: &Solid, tol: f64) -> Result<Solid> {
    ensure_tolerance(tol)?;

    guarded(|| truck_shapeops::or(base, tool, tol))
}

/// truck reports some degenerate inputs by panicking instead of returning
/// `None`. Both end up as `BooleanFailed`.
fn guarded(op: impl FnOnce() -> Option<Solid>) -> Result<Solid> {
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(Some(solid)) => non_empty(solid),
        Ok(None) | Err(_) => Err(Error::BooleanFailed),
    }
}

fn non_empty(solid: Solid) -> Result<Solid> {
    if is_empty(&solid) {
        return Err(Error::EmptyResult);
    }
    Ok(solid)
}

fn ensure_tolerance(tol: f64) -> Result<()> {
    if !(tol > 0.0) {
        return Err(Error::InvalidParameter("tolerance must be > 0".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxwright_topology::SolidBuilder;

    #[test]
    fn zero_tolerance_is_rejected() -> Result<()> {
        let a = SolidBuilder::box_solid(10.0, 10.0, 10.0)?;
        let b = SolidBuilder::box_solid(5.0, 5.0, 5.0)?;
        assert!(matches!(difference(&a, &b, 0.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(union(&a, &b, -1.0), Err(Error::InvalidParameter(_))));
        Ok(())
    }

    #[test]
    fn kernel_panic_becomes_boolean_failure() {
        let result = guarded(|| panic!("This shell is not oriented and closed."));
        assert!(matches!(result, Err(Error::BooleanFailed)));
        assert!(matches!(guarded(|| None), Err(Error::BooleanFailed)));
    }

    #[cfg(feature = "kernel-tests")]
    #[test]
    fn hollow_box_keeps_outer_bounds() -> Result<()> {
        use boxwright_topology::{Point3, Vector3, solid_bounds};

        let outer = SolidBuilder::box_solid(105.0, 72.0, 47.0)?;
        let cavity =
            SolidBuilder::box_at(Point3::new(2.0, 2.0, 2.0), Vector3::new(101.0, 68.0, 45.2))?;
        let hollow = difference(&outer, &cavity, DEFAULT_SHAPEOPS_TOLERANCE)?;
        let bounds = solid_bounds(&hollow).ok_or(Error::EmptyResult)?;
        assert!((bounds.max.x - 105.0).abs() < 1.0e-6);
        assert!((bounds.max.y - 72.0).abs() < 1.0e-6);
        assert!((bounds.max.z - 47.0).abs() < 1.0e-6);
        Ok(())
    }

    #[cfg(feature = "kernel-tests")]
    #[test]
    fn post_fuses_onto_floor() -> Result<()> {
        use boxwright_geometry::Placement;

        let floor = SolidBuilder::box_solid(20.0, 20.0, 2.0)?;
        let post = SolidBuilder::cylinder(Placement::along_z(10.0, 10.0, 1.8), 2.5, 10.2)?;
        // Blind bore: starts above the floor and runs out of the free end.
        let hole = SolidBuilder::cylinder(Placement::along_z(10.0, 10.0, 2.2), 1.5, 10.0)?;
        let bored = difference(&post, &hole, DEFAULT_SHAPEOPS_TOLERANCE)?;
        let fused = union(&floor, &bored, DEFAULT_SHAPEOPS_TOLERANCE)?;
        assert!(fused.face_iter().count() > 6);
        Ok(())
    }

    #[cfg(feature = "kernel-tests")]
    #[test]
    fn through_bored_post_fails_without_panicking() -> Result<()> {
        use boxwright_geometry::Placement;

        let floor = SolidBuilder::box_solid(20.0, 20.0, 2.0)?;
        let post = SolidBuilder::cylinder(Placement::along_z(10.0, 10.0, 1.8), 2.5, 10.2)?;
        let hole = SolidBuilder::cylinder(Placement::along_z(10.0, 10.0, 1.6), 1.5, 10.6)?;
        let tube = difference(&post, &hole, DEFAULT_SHAPEOPS_TOLERANCE)?;
        // Whatever truck makes of the open tube, it must come back as a value.
        let fused = union(&floor, &tube, DEFAULT_SHAPEOPS_TOLERANCE);
        assert!(matches!(fused, Ok(_) | Err(Error::BooleanFailed)));
        Ok(())
    }
}
