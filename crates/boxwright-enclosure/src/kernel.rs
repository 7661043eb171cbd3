use crate::plan::{BuildPlan, Primitive, Step};
use crate::{Error, Result};
use boxwright_base::Tolerance;
use boxwright_geometry::{Placement, Point3, Vector3};
use tracing::{debug, info, instrument};

/// Geometry engine a build plan is executed against.
///
/// Solids are opaque values. Every operation returns a new solid and leaves
/// its inputs untouched.
pub trait Kernel {
    type Solid: Clone;
    type Error: std::error::Error + Send + Sync + 'static;

    fn make_box(
        &self,
        origin: Point3,
        extents: Vector3,
    ) -> std::result::Result<Self::Solid, Self::Error>;

    fn make_cylinder(
        &self,
        placement: Placement,
        radius: f64,
        height: f64,
    ) -> std::result::Result<Self::Solid, Self::Error>;

    fn translate(
        &self,
        solid: &Self::Solid,
        offset: Vector3,
    ) -> std::result::Result<Self::Solid, Self::Error>;

    fn difference(
        &self,
        base: &Self::Solid,
        tool: &Self::Solid,
    ) -> std::result::Result<Self::Solid, Self::Error>;

    fn union(
        &self,
        base: &Self::Solid,
        tool: &Self::Solid,
    ) -> std::result::Result<Self::Solid, Self::Error>;

    /// Distance under which two lengths are treated as equal when validating.
    fn linear_tolerance(&self) -> f64 {
        Tolerance::default().linear
    }
}

/// Runs the plan step by step. The first failing step aborts the build and
/// is named in the error.
#[instrument(skip_all, fields(plan = %plan.name, steps = plan.steps.len()))]
pub fn execute<K: Kernel>(kernel: &K, plan: &BuildPlan) -> Result<K::Solid> {
    let mut solid = make(kernel, &plan.base).map_err(|source| construction("base", source))?;

    for step in &plan.steps {
        debug!(step = step.label(), "applying step");
        solid = apply(kernel, &solid, step).map_err(|source| construction(step.label(), source))?;
    }

    info!("build complete");
    Ok(solid)
}

fn apply<K: Kernel>(
    kernel: &K,
    solid: &K::Solid,
    step: &Step,
) -> std::result::Result<K::Solid, K::Error> {
    match step {
        Step::Cut { tool, .. } => {
            let tool = make(kernel, tool)?;
            kernel.difference(solid, &tool)
        }
        Step::Post { post, hole, .. } => {
            let post = make(kernel, post)?;
            let hole = make(kernel, hole)?;
            let annulus = kernel.difference(&post, &hole)?;
            kernel.union(solid, &annulus)
        }
        Step::Fuse { tool, offset, .. } => {
            let mut tool = make(kernel, tool)?;
            if let Some(offset) = offset {
                tool = kernel.translate(&tool, *offset)?;
            }
            kernel.union(solid, &tool)
        }
    }
}

fn make<K: Kernel>(kernel: &K, primitive: &Primitive) -> std::result::Result<K::Solid, K::Error> {
    match primitive {
        Primitive::Box { origin, extents } => kernel.make_box(*origin, *extents),
        Primitive::Cylinder {
            placement,
            radius,
            height,
        } => kernel.make_cylinder(*placement, *radius, *height),
    }
}

fn construction<E: std::error::Error + Send + Sync + 'static>(step: &str, source: E) -> Error {
    Error::Construction {
        step: step.to_string(),
        source: Box::new(source),
    }
}
