#![cfg(feature = "kernel-tests")]

use anyhow::{Context, Result};
use approx::assert_relative_eq;
use boxwright_enclosure::{
    Dimensions, EnclosureConfig, Feature, LidSpec, TruckKernel, build_enclosure, build_lid,
    corner_posts,
};
use boxwright_geometry::{Aabb, Point2, Point3, Vector3};
use boxwright_io::{mesh_stats, triangulate_solid};
use boxwright_topology::solid_bounds;

fn small_box() -> Dimensions {
    Dimensions::new(40.0, 30.0, 20.0, 2.0)
}

fn assert_extents(bounds: &Aabb, x: f64, y: f64, z: f64) {
    let extents = bounds.extents();
    assert_relative_eq!(extents.x, x, epsilon = 1.0e-6);
    assert_relative_eq!(extents.y, y, epsilon = 1.0e-6);
    assert_relative_eq!(extents.z, z, epsilon = 1.0e-6);
}

#[test]
fn default_enclosure_builds_end_to_end() -> Result<()> {
    let config = EnclosureConfig::default();
    let solid = config.build_enclosure(&TruckKernel::new(config.tolerance))?;

    let bounds = solid_bounds(&solid).context("enclosure has no vertices")?;
    assert_extents(&bounds, 105.0, 72.0, 47.0);
    assert_relative_eq!(bounds.min.x, 0.0, epsilon = 1.0e-6);
    assert_relative_eq!(bounds.min.z, 0.0, epsilon = 1.0e-6);
    Ok(())
}

#[test]
fn corner_post_scenario_keeps_outer_bounds() -> Result<()> {
    let dims = Dimensions::new(10.5, 7.2, 4.7, 0.2).scaled(10.0);
    let posts = corner_posts(&dims, 7.0, 2.5, 1.5);
    let solid = build_enclosure(&TruckKernel::default(), &dims, &posts)?;

    let bounds = solid_bounds(&solid).context("enclosure has no vertices")?;
    assert_extents(&bounds, 105.0, 72.0, 47.0);
    Ok(())
}

#[test]
fn default_cutouts_remove_only_wall_material() -> Result<()> {
    let config = EnclosureConfig::default().to_millimeters();
    let cutouts: Vec<Feature> = config
        .features
        .iter()
        .filter(|feature| feature.is_cutout())
        .cloned()
        .collect();
    let solid = build_enclosure(&TruckKernel::default(), &config.dimensions, &cutouts)?;

    let stats = mesh_stats(&triangulate_solid(&solid, 0.05)?);
    let shell = 105.0 * 72.0 * 47.0 - 101.0 * 68.0 * 45.0;
    let port = 2.0 * 16.0 * 11.5;
    let jack = std::f64::consts::PI * 4.0 * 4.0 * 2.0;
    let slit = 18.0 * 2.0 * 4.0;
    assert_relative_eq!(stats.volume, shell - port - jack - slit, max_relative = 2.0e-3);
    Ok(())
}

#[test]
fn default_lid_carries_logo() -> Result<()> {
    let config = EnclosureConfig::default();
    let solid = config.build_lid(&TruckKernel::new(config.tolerance))?;

    let bounds = solid_bounds(&solid).context("lid has no vertices")?;
    assert_extents(&bounds, 105.0, 72.0, 5.0);
    Ok(())
}

#[test]
fn plain_shell_keeps_outer_bounds() -> Result<()> {
    let solid = build_enclosure(&TruckKernel::default(), &small_box(), &[])?;

    let bounds = solid_bounds(&solid).context("enclosure has no vertices")?;
    assert_relative_eq!(bounds.min.z, 0.0, epsilon = 1.0e-6);
    assert_relative_eq!(bounds.max.x, 40.0, epsilon = 1.0e-6);
    assert_relative_eq!(bounds.max.y, 30.0, epsilon = 1.0e-6);
    assert_relative_eq!(bounds.max.z, 20.0, epsilon = 1.0e-6);
    Ok(())
}

#[test]
fn side_cutout_removes_wall_material() -> Result<()> {
    let port = Feature::BoxCutout {
        label: "port".to_string(),
        origin: Point3::new(0.0, 10.0, 6.0),
        extents: Vector3::new(2.2, 10.0, 8.0),
    };
    let solid = build_enclosure(&TruckKernel::default(), &small_box(), &[port])?;

    let stats = mesh_stats(&triangulate_solid(&solid, 0.1)?);
    // 40x30x20 outer, 36x26x18 cavity, 2x10x8 port
    let expected = 24_000.0 - 16_848.0 - 160.0;
    assert_relative_eq!(stats.volume, expected, max_relative = 1.0e-3);
    Ok(())
}

#[test]
fn lid_with_screw_holes_is_thinner_than_plate() -> Result<()> {
    let lid = LidSpec {
        thickness: 3.0,
        hole_radius: 1.6,
        logo: None,
        screw_coords: None,
    };
    let screws = [Point2::new(7.0, 7.0), Point2::new(33.0, 23.0)];
    let solid = build_lid(&TruckKernel::default(), &small_box(), &lid, &screws)?;

    let stats = mesh_stats(&triangulate_solid(&solid, 0.05)?);
    let plate = 40.0 * 30.0 * 3.0;
    assert!(stats.volume < plate);
    assert!(stats.volume > plate - 2.0 * std::f64::consts::PI * 1.7 * 1.7 * 3.0);
    let bounds = stats.bounds.context("lid mesh is empty")?;
    assert_relative_eq!(bounds.max.z, 3.0, epsilon = 1.0e-6);
    Ok(())
}
