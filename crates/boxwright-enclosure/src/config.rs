use crate::part::{ParameterSet, ParameterValue};
use crate::validate;
use crate::{Error, Kernel, Result};
use boxwright_base::{LengthUnit, Tolerance};
use boxwright_geometry::{Aabb, Axis, Placement, Point2, Point3, Vector3};
use boxwright_io::{ExportRequest, StlFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Outer box size and wall thickness.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64, thickness: f64) -> Self {
        Self {
            length,
            width,
            height,
            thickness,
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.length * factor,
            self.width * factor,
            self.height * factor,
            self.thickness * factor,
        )
    }

    pub fn outer_bounds(&self) -> Aabb {
        Aabb::from_origin_extents(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(self.length, self.width, self.height),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feature {
    /// Rectangular opening spanning `origin` to `origin + extents`.
    BoxCutout {
        label: String,
        origin: Point3,
        extents: Vector3,
    },
    /// Round opening cut `depth` from the placement origin along its axis.
    CylinderCutout {
        label: String,
        placement: Placement,
        radius: f64,
        depth: f64,
    },
    /// Screw post with a coaxial through-hole, fused onto the shell.
    Post {
        label: String,
        placement: Placement,
        radius: f64,
        hole_radius: f64,
        height: f64,
    },
}

impl Feature {
    pub fn label(&self) -> &str {
        match self {
            Self::BoxCutout { label, .. }
            | Self::CylinderCutout { label, .. }
            | Self::Post { label, .. } => label,
        }
    }

    pub fn is_cutout(&self) -> bool {
        !matches!(self, Self::Post { .. })
    }

    /// Bounds of the material the feature removes or adds.
    pub fn bounds(&self) -> Aabb {
        match self {
            Self::BoxCutout {
                origin, extents, ..
            } => Aabb::from_origin_extents(*origin, *extents),
            Self::CylinderCutout {
                placement,
                radius,
                depth,
                ..
            } => placement.cylinder_bounds(*radius, *depth),
            Self::Post {
                placement,
                radius,
                height,
                ..
            } => placement.cylinder_bounds(*radius, *height),
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            Self::BoxCutout {
                label,
                origin,
                extents,
            } => Self::BoxCutout {
                label: label.clone(),
                origin: Point3::new(origin.x * factor, origin.y * factor, origin.z * factor),
                extents: *extents * factor,
            },
            Self::CylinderCutout {
                label,
                placement,
                radius,
                depth,
            } => Self::CylinderCutout {
                label: label.clone(),
                placement: placement.scaled(factor),
                radius: radius * factor,
                depth: depth * factor,
            },
            Self::Post {
                label,
                placement,
                radius,
                hole_radius,
                height,
            } => Self::Post {
                label: label.clone(),
                placement: placement.scaled(factor),
                radius: radius * factor,
                hole_radius: hole_radius * factor,
                height: height * factor,
            },
        }
    }
}

/// Four posts standing on the floor, `inset` from each corner, reaching the rim.
pub fn corner_posts(dims: &Dimensions, inset: f64, radius: f64, hole_radius: f64) -> Vec<Feature> {
    let far_x = dims.length - inset;
    let far_y = dims.width - inset;
    [
        ("post_front_left", inset, inset),
        ("post_front_right", far_x, inset),
        ("post_back_left", inset, far_y),
        ("post_back_right", far_x, far_y),
    ]
    .into_iter()
    .map(|(label, x, y)| Feature::Post {
        label: label.to_string(),
        placement: Placement::along_z(x, y, dims.thickness),
        radius,
        hole_radius,
        height: dims.height - dims.thickness,
    })
    .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogoBlock {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LidSpec {
    pub thickness: f64,
    pub hole_radius: f64,
    #[serde(default)]
    pub logo: Option<LogoBlock>,
    /// Explicit screw positions. Defaults to the vertical posts' positions.
    #[serde(default)]
    pub screw_coords: Option<Vec<Point2>>,
}

impl LidSpec {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            thickness: self.thickness * factor,
            hole_radius: self.hole_radius * factor,
            logo: self.logo.map(|logo| LogoBlock {
                length: logo.length * factor,
                width: logo.width * factor,
                height: logo.height * factor,
            }),
            screw_coords: self.screw_coords.as_ref().map(|coords| {
                coords
                    .iter()
                    .map(|p| Point2::new(p.x * factor, p.y * factor))
                    .collect()
            }),
        }
    }
}

/// Destinations for one part's exported files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub output_path: PathBuf,
    #[serde(default)]
    pub step_output_path: Option<PathBuf>,
}

impl ArtifactPaths {
    pub fn export_request(
        &self,
        part_name: &str,
        format: StlFormat,
        tessellation_tolerance: f64,
    ) -> ExportRequest {
        ExportRequest {
            part_name: part_name.to_string(),
            stl_path: self.output_path.clone(),
            step_path: self.step_output_path.clone(),
            stl_format: format,
            tessellation_tolerance,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub enclosure: ArtifactPaths,
    pub lid: ArtifactPaths,
    pub stl_format: StlFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enclosure: ArtifactPaths {
                output_path: PathBuf::from("out/container_box.stl"),
                step_output_path: None,
            },
            lid: ArtifactPaths {
                output_path: PathBuf::from("out/container_lid.stl"),
                step_output_path: Some(PathBuf::from("out/container_lid.step")),
            },
            stl_format: StlFormat::Binary,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnclosureConfig {
    pub name: String,
    pub units: LengthUnit,
    pub dimensions: Dimensions,
    pub features: Vec<Feature>,
    pub lid: LidSpec,
    /// Always in millimeters, whatever `units` says.
    #[serde(default)]
    pub tolerance: Tolerance,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for EnclosureConfig {
    /// Electronics box for a board with a USB-B port, a DC jack and a USB slit.
    fn default() -> Self {
        let dims = Dimensions::new(10.5, 7.2, 4.7, 0.2);

        let mut features = vec![
            Feature::BoxCutout {
                label: "usb_b_port".to_string(),
                origin: Point3::new(0.0, 1.0, 0.7),
                extents: Vector3::new(dims.thickness + 0.1, 1.6, 1.15),
            },
            Feature::CylinderCutout {
                label: "dc_jack".to_string(),
                placement: Placement::new(Point3::new(dims.length, 1.7, 1.1), Axis::NegX),
                radius: 0.4,
                depth: dims.thickness + 0.1,
            },
            // Starts at the inner face of the back wall and overshoots the outer face.
            Feature::BoxCutout {
                label: "usb_slit".to_string(),
                origin: Point3::new(7.5, dims.width - dims.thickness, 0.6),
                extents: Vector3::new(1.8, dims.thickness + 0.2, 0.4),
            },
        ];
        features.extend(corner_posts(&dims, 0.7, 0.25, 0.15));

        Self {
            name: "container".to_string(),
            units: LengthUnit::Centimeter,
            dimensions: dims,
            features,
            lid: LidSpec {
                thickness: 0.3,
                hole_radius: 0.16,
                logo: Some(LogoBlock {
                    length: 6.0,
                    width: 1.0,
                    height: 0.2,
                }),
                screw_coords: None,
            },
            tolerance: Tolerance::default(),
            output: OutputConfig::default(),
        }
    }
}

impl EnclosureConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Copy with every length converted to millimeters.
    pub fn to_millimeters(&self) -> Self {
        let factor = self.units.millimeters_per_unit();
        Self {
            name: self.name.clone(),
            units: LengthUnit::Millimeter,
            dimensions: self.dimensions.scaled(factor),
            features: self.features.iter().map(|f| f.scaled(factor)).collect(),
            lid: self.lid.scaled(factor),
            tolerance: self.tolerance,
            output: self.output.clone(),
        }
    }

    /// (x, y) of every post standing along Z.
    pub fn post_coordinates(&self) -> Vec<Point2> {
        self.features
            .iter()
            .filter_map(|feature| match feature {
                Feature::Post { placement, .. } if placement.axis.index() == 2 => {
                    Some(Point2::new(placement.origin.x, placement.origin.y))
                }
                _ => None,
            })
            .collect()
    }

    pub fn screw_coordinates(&self) -> Vec<Point2> {
        match &self.lid.screw_coords {
            Some(coords) => coords.clone(),
            None => self.post_coordinates(),
        }
    }

    /// Checks the enclosure, the lid, and that every lid screw lands on a post.
    pub fn validate(&self) -> Result<()> {
        self.tolerance
            .validate()
            .map_err(|err| crate::ConfigError::Tolerance(err.to_string()))?;

        let mm = self.to_millimeters();
        let eps = self.tolerance.linear;
        validate::validate_enclosure(&mm.dimensions, &mm.features, eps)?;
        let screws = mm.screw_coordinates();
        validate::validate_lid(&mm.dimensions, &mm.lid, &screws, eps)?;
        validate::check_screw_alignment(&mm.post_coordinates(), &screws, eps)?;
        Ok(())
    }

    pub fn build_enclosure<K: Kernel>(&self, kernel: &K) -> Result<K::Solid> {
        self.validate()?;
        let mm = self.to_millimeters();
        crate::build_enclosure(kernel, &mm.dimensions, &mm.features)
    }

    pub fn build_lid<K: Kernel>(&self, kernel: &K) -> Result<K::Solid> {
        self.validate()?;
        let mm = self.to_millimeters();
        crate::build_lid(kernel, &mm.dimensions, &mm.lid, &mm.screw_coordinates())
    }

    pub fn enclosure_parameters(&self) -> ParameterSet {
        let mut parameters = self.common_parameters();
        parameters.insert(
            "Height".to_string(),
            ParameterValue::Number(self.dimensions.height),
        );
        parameters.insert(
            "WallThickness".to_string(),
            ParameterValue::Number(self.dimensions.thickness),
        );
        let cutouts = self.features.iter().filter(|f| f.is_cutout()).count();
        let posts = self.features.len() - cutouts;
        parameters.insert(
            "CutoutCount".to_string(),
            ParameterValue::Integer(cutouts as i64),
        );
        parameters.insert("PostCount".to_string(), ParameterValue::Integer(posts as i64));
        parameters
    }

    pub fn lid_parameters(&self) -> ParameterSet {
        let mut parameters = self.common_parameters();
        parameters.insert(
            "Thickness".to_string(),
            ParameterValue::Number(self.lid.thickness),
        );
        parameters.insert(
            "HoleRadius".to_string(),
            ParameterValue::Number(self.lid.hole_radius),
        );
        parameters.insert(
            "ScrewCount".to_string(),
            ParameterValue::Integer(self.screw_coordinates().len() as i64),
        );
        parameters.insert(
            "Logo".to_string(),
            ParameterValue::Bool(self.lid.logo.is_some()),
        );
        parameters
    }

    fn common_parameters(&self) -> ParameterSet {
        let mut parameters = ParameterSet::new();
        parameters.insert(
            "Units".to_string(),
            ParameterValue::Text(self.units.symbol().to_string()),
        );
        parameters.insert(
            "Length".to_string(),
            ParameterValue::Number(self.dimensions.length),
        );
        parameters.insert(
            "Width".to_string(),
            ParameterValue::Number(self.dimensions.width),
        );
        parameters
    }
}
