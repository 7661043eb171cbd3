use approx::assert_relative_eq;
use boxwright_geometry::Placement;
use boxwright_topology::{Result, SolidBuilder, is_empty, solid_bounds};

#[test]
fn enclosure_shell_primitive_exists() -> Result<()> {
    let solid = SolidBuilder::box_solid(105.0, 72.0, 47.0)?;
    assert_eq!(solid.face_iter().count(), 6);
    assert!(!is_empty(&solid));
    Ok(())
}

#[test]
fn post_cylinder_stands_on_floor() -> Result<()> {
    let post = SolidBuilder::cylinder(Placement::along_z(7.0, 7.0, 2.0), 2.5, 45.0)?;
    assert!(!is_empty(&post));
    let bounds = solid_bounds(&post).expect("post has vertices");
    assert_relative_eq!(bounds.min.z, 2.0, epsilon = 1.0e-9);
    assert_relative_eq!(bounds.max.z, 47.0, epsilon = 1.0e-9);
    assert_relative_eq!(bounds.min.x, 4.5, epsilon = 1.0e-9);
    Ok(())
}
