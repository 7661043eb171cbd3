use crate::kernel::Kernel;
use boxwright_base::Tolerance;
use boxwright_geometry::{Placement, Point3, Vector3};
use boxwright_topology::{Solid, SolidBuilder};

/// [`Kernel`] backed by the truck B-rep crates.
#[derive(Clone, Copy, Debug, Default)]
pub struct TruckKernel {
    tolerance: Tolerance,
}

impl TruckKernel {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }
}

impl Kernel for TruckKernel {
    type Solid = Solid;
    type Error = boxwright_shapeops::Error;

    fn make_box(&self, origin: Point3, extents: Vector3) -> Result<Solid, Self::Error> {
        Ok(SolidBuilder::box_at(origin, extents)?)
    }

    fn make_cylinder(
        &self,
        placement: Placement,
        radius: f64,
        height: f64,
    ) -> Result<Solid, Self::Error> {
        Ok(SolidBuilder::cylinder(placement, radius, height)?)
    }

    fn translate(&self, solid: &Solid, offset: Vector3) -> Result<Solid, Self::Error> {
        Ok(SolidBuilder::translated(solid, offset))
    }

    fn difference(&self, base: &Solid, tool: &Solid) -> Result<Solid, Self::Error> {
        boxwright_shapeops::difference(base, tool, self.tolerance.boolean)
    }

    fn union(&self, base: &Solid, tool: &Solid) -> Result<Solid, Self::Error> {
        boxwright_shapeops::union(base, tool, self.tolerance.boolean)
    }

    fn linear_tolerance(&self) -> f64 {
        self.tolerance.linear
    }
}
