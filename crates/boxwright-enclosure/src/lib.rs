//! Parametric enclosure and lid generation.
//!
//! A configuration is validated up front, turned into a [`BuildPlan`] of
//! primitives and boolean steps, and executed against a [`Kernel`].

use boxwright_geometry::Point2;
use std::path::PathBuf;
use thiserror::Error;

pub mod config;
pub mod kernel;
pub mod part;
pub mod plan;
pub mod truck;
pub mod validate;

pub use config::{
    ArtifactPaths, Dimensions, EnclosureConfig, Feature, LidSpec, LogoBlock, OutputConfig,
    corner_posts,
};
pub use kernel::{Kernel, execute};
pub use part::{Part, PartKind, ParameterSet, ParameterValue};
pub use plan::{BuildPlan, Primitive, Step, plan_enclosure, plan_lid};
pub use truck::TruckKernel;
pub use validate::{Wall, check_screw_alignment};

/// Invalid or inconsistent parameters, detected before the kernel is invoked.
/// Lengths are reported in millimeters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive number, got {value}")]
    NonPositive { name: String, value: f64 },
    #[error(
        "wall thickness {thickness} mm leaves no cavity: twice the thickness must be below {smallest} mm"
    )]
    DegenerateCavity { thickness: f64, smallest: f64 },
    #[error("feature label `{0}` is used more than once")]
    DuplicateLabel(String),
    #[error("feature `{feature}` is placed at ({x}, {y}, {z}), outside the outer shell")]
    OutOfBounds {
        feature: String,
        x: f64,
        y: f64,
        z: f64,
    },
    #[error("post `{feature}` extends outside the outer shell")]
    Protrudes { feature: String },
    #[error("cutout `{feature}` does not reach any wall")]
    MissesShell { feature: String },
    #[error(
        "cutout `{feature}` cuts {cut} mm into the {wall} wall, which is {thickness} mm thick; it would leave a pocket instead of an opening"
    )]
    ShallowCutout {
        feature: String,
        wall: Wall,
        cut: f64,
        thickness: f64,
    },
    #[error("post `{feature}` hole radius {hole_radius} mm must be smaller than its radius {radius} mm")]
    HoleTooLarge {
        feature: String,
        hole_radius: f64,
        radius: f64,
    },
    #[error("lid screw hole at ({x}, {y}) matches no enclosure post")]
    ScrewMisaligned { x: f64, y: f64 },
    #[error("lid screw hole at ({x}, {y}) does not fit inside the lid")]
    ScrewOutsideLid { x: f64, y: f64 },
    #[error("logo block {length} x {width} mm does not fit on a {lid_length} x {lid_width} mm lid")]
    LogoTooLarge {
        length: f64,
        width: f64,
        lid_length: f64,
        lid_width: f64,
    },
    #[error("invalid tolerance: {0}")]
    Tolerance(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("construction failed at step `{step}`: {source}")]
    Construction {
        step: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed to read configuration {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Builds the enclosure body from millimeter dimensions and features.
///
/// Cutouts are subtracted in the given order, then posts are fused in the
/// given order. Nothing reaches the kernel unless the parameters validate.
pub fn build_enclosure<K: Kernel>(
    kernel: &K,
    dims: &Dimensions,
    features: &[Feature],
) -> Result<K::Solid> {
    validate::validate_enclosure(dims, features, kernel.linear_tolerance())?;
    let plan = plan_enclosure(dims, features);
    execute(kernel, &plan)
}

/// Builds the lid: a plate with one through-hole per screw coordinate and an
/// optional raised logo block.
pub fn build_lid<K: Kernel>(
    kernel: &K,
    dims: &Dimensions,
    lid: &LidSpec,
    screw_coords: &[Point2],
) -> Result<K::Solid> {
    validate::validate_lid(dims, lid, screw_coords, kernel.linear_tolerance())?;
    let plan = plan_lid(dims, lid, screw_coords);
    execute(kernel, &plan)
}
