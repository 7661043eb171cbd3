use boxwright_geometry::{Aabb, Placement};
use thiserror::Error;
use truck_modeling::{Rad, builder};

pub use truck_modeling::{Curve, Edge, Face, Point3, Shell, Solid, Surface, Vector3, Vertex, Wire};

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Modeling(#[from] truck_modeling::errors::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub struct SolidBuilder;

impl SolidBuilder {
    /// Box with one corner at the origin.
    pub fn box_solid(width: f64, height: f64, depth: f64) -> Result<Solid> {
        Self::box_at(Point3::new(0.0, 0.0, 0.0), Vector3::new(width, height, depth))
    }

    /// Axis-aligned box spanning `origin` to `origin + extents`.
    pub fn box_at(origin: Point3, extents: Vector3) -> Result<Solid> {
        ensure_positive("box x extent", extents.x)?;
        ensure_positive("box y extent", extents.y)?;
        ensure_positive("box z extent", extents.z)?;

        let v = builder::vertex(origin);
        let e = builder::tsweep(&v, Vector3::unit_x() * extents.x);
        let f = builder::tsweep(&e, Vector3::unit_y() * extents.y);
        Ok(builder::tsweep(&f, Vector3::unit_z() * extents.z))
    }

    /// Cylinder of `radius` swept `height` from the placement origin along its axis.
    pub fn cylinder(placement: Placement, radius: f64, height: f64) -> Result<Solid> {
        ensure_positive("radius", radius)?;
        ensure_positive("height", height)?;

        let axis = placement.axis.positive();
        let base = placement.low_end(height);
        let face = circle_face(base, axis.unit(), axis.perpendicular(), radius)?;
        Ok(builder::tsweep(&face, axis.unit() * height))
    }

    pub fn translated(solid: &Solid, offset: Vector3) -> Solid {
        builder::translated(solid, offset)
    }
}

/// Bounds of the solid's vertices.
///
/// Circles are split at quarter turns, so cylinder bounds are exact as well.
pub fn solid_bounds(solid: &Solid) -> Option<Aabb> {
    let points: Vec<Point3> = solid
        .boundaries()
        .iter()
        .flat_map(|shell| shell.vertex_iter())
        .map(|vertex| vertex.point())
        .collect();
    Aabb::from_points(&points)
}

pub fn is_empty(solid: &Solid) -> bool {
    solid.face_iter().next().is_none()
}

fn circle_face(center: Point3, normal: Vector3, start: Vector3, radius: f64) -> Result<Face> {
    let v = builder::vertex(center + start * radius);
    let wire: Wire = builder::rsweep(&v, center, normal, Rad(std::f64::consts::PI * 2.0));
    Ok(builder::try_attach_plane(&[wire])?)
}

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0) {
        return Err(Error::InvalidParameter(format!("{name} must be > 0")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use boxwright_geometry::Axis;

    #[test]
    fn box_solid_exists() -> Result<()> {
        let solid = SolidBuilder::box_solid(100.0, 200.0, 300.0)?;
        assert!(solid.face_iter().count() > 0);
        Ok(())
    }

    #[test]
    fn box_at_offset_has_offset_bounds() -> Result<()> {
        let solid =
            SolidBuilder::box_at(Point3::new(2.0, 2.0, 2.0), Vector3::new(101.0, 68.0, 46.0))?;
        let bounds = solid_bounds(&solid).ok_or_else(|| Error::InvalidParameter("no vertices".into()))?;
        assert_relative_eq!(bounds.min.x, 2.0);
        assert_relative_eq!(bounds.max.x, 103.0);
        assert_relative_eq!(bounds.max.y, 70.0);
        assert_relative_eq!(bounds.max.z, 48.0);
        Ok(())
    }

    #[test]
    fn zero_extent_is_rejected() {
        let result = SolidBuilder::box_at(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 1.0));
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn negative_axis_cylinder_extends_backwards() -> Result<()> {
        let placement = Placement::new(Point3::new(105.0, 17.0, 11.0), Axis::NegX);
        let solid = SolidBuilder::cylinder(placement, 4.0, 3.0)?;
        let bounds = solid_bounds(&solid).ok_or_else(|| Error::InvalidParameter("no vertices".into()))?;
        assert_relative_eq!(bounds.min.x, 102.0, epsilon = 1.0e-9);
        assert_relative_eq!(bounds.max.x, 105.0, epsilon = 1.0e-9);
        assert_relative_eq!(bounds.min.y, 13.0, epsilon = 1.0e-9);
        assert_relative_eq!(bounds.max.z, 15.0, epsilon = 1.0e-9);
        Ok(())
    }

    #[test]
    fn translated_box_moves() -> Result<()> {
        let solid = SolidBuilder::box_solid(60.0, 10.0, 2.0)?;
        let moved = SolidBuilder::translated(&solid, Vector3::new(22.5, 31.0, 3.0));
        let bounds = solid_bounds(&moved).ok_or_else(|| Error::InvalidParameter("no vertices".into()))?;
        assert_relative_eq!(bounds.min.x, 22.5);
        assert_relative_eq!(bounds.max.y, 41.0);
        assert_relative_eq!(bounds.min.z, 3.0);
        Ok(())
    }
}
