use anyhow::{Context, Result, bail};
use boxwright_geometry::{Aabb, Point3};
use boxwright_topology::Solid;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use truck_meshalgo::prelude::*;
use truck_polymesh::PolygonMesh;
use truck_polymesh::stl::{self, StlType};

pub const DEFAULT_TESSELLATION_TOLERANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

impl StlFormat {
    fn stl_type(self) -> StlType {
        match self {
            Self::Binary => StlType::Binary,
            Self::Ascii => StlType::Ascii,
        }
    }
}

/// Summary of a tessellated solid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MeshStats {
    pub bounds: Option<Aabb>,
    pub volume: f64,
    pub triangles: usize,
}

/// Tessellates `solid` to within `tol` millimeters, with shared vertices
/// merged. Fails when nothing is left to write.
pub fn triangulate_solid(solid: &Solid, tol: f64) -> Result<PolygonMesh> {
    if !(tol > 0.0) {
        bail!("tessellation tolerance must be > 0, got {tol}");
    }

    let mut mesh = solid.triangulation(tol).to_polygon();
    if mesh.positions().is_empty() {
        bail!("triangulation produced empty mesh");
    }
    mesh.add_naive_normals(true)
        .put_together_same_attrs(truck_base::tolerance::TOLERANCE)
        .remove_unused_attrs();
    Ok(mesh)
}

/// Bounds, enclosed volume and triangle count of a closed mesh.
///
/// Quads and polygons are fanned into triangles. The volume is the absolute
/// sum of signed tetrahedra against the origin.
pub fn mesh_stats(mesh: &PolygonMesh) -> MeshStats {
    let positions = mesh.positions();
    let mut triangles: Vec<[usize; 3]> = mesh
        .tri_faces()
        .iter()
        .map(|tri| [tri[0].pos, tri[1].pos, tri[2].pos])
        .collect();
    for quad in mesh.quad_faces() {
        triangles.push([quad[0].pos, quad[1].pos, quad[2].pos]);
        triangles.push([quad[0].pos, quad[2].pos, quad[3].pos]);
    }
    for face in mesh.faces().other_faces() {
        if face.len() < 3 {
            continue;
        }
        for idx in 1..(face.len() - 1) {
            triangles.push([face[0].pos, face[idx].pos, face[idx + 1].pos]);
        }
    }

    let volume: f64 = triangles
        .iter()
        .map(|[a, b, c]| signed_volume(&positions[*a], &positions[*b], &positions[*c]))
        .sum();

    MeshStats {
        bounds: Aabb::from_points(positions),
        volume: volume.abs(),
        triangles: triangles.len(),
    }
}

fn signed_volume(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    (a.x * (b.y * c.z - b.z * c.y) - a.y * (b.x * c.z - b.z * c.x)
        + a.z * (b.x * c.y - b.y * c.x))
        / 6.0
}

pub fn export_stl(
    solid: &Solid,
    path: impl AsRef<Path>,
    tol: f64,
    format: StlFormat,
) -> Result<MeshStats> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }

    let mesh = triangulate_solid(solid, tol)?;

    let file = File::create(path).with_context(|| format!("create STL file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    stl::write(&mesh, &mut writer, format.stl_type())
        .with_context(|| format!("write STL file {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush STL file {}", path.display()))?;

    Ok(mesh_stats(&mesh))
}
