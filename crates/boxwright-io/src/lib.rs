pub mod export;
pub mod mesh;
pub mod step;

pub use export::{ArtifactKind, ExportOutcome, ExportReport, ExportRequest, export_all};
pub use mesh::{
    DEFAULT_TESSELLATION_TOLERANCE, MeshStats, StlFormat, export_stl, mesh_stats,
    triangulate_solid,
};
pub use step::export_step;
