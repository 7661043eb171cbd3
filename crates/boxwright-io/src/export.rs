//! Per-part export where each artifact succeeds or fails on its own.

use crate::mesh::{MeshStats, StlFormat, export_stl};
use crate::step::export_step;
use boxwright_topology::Solid;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArtifactKind {
    Stl,
    Step,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stl => f.write_str("STL"),
            Self::Step => f.write_str("STEP"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExportRequest {
    /// Recorded in the STEP header.
    pub part_name: String,
    pub stl_path: PathBuf,
    pub step_path: Option<PathBuf>,
    pub stl_format: StlFormat,
    pub tessellation_tolerance: f64,
}

#[derive(Debug)]
pub struct ExportOutcome {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub result: anyhow::Result<Option<MeshStats>>,
}

#[derive(Debug, Default)]
pub struct ExportReport {
    pub outcomes: Vec<ExportOutcome>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExportOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.result.is_err())
    }

    pub fn stl_stats(&self) -> Option<&MeshStats> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.kind == ArtifactKind::Stl)
            .find_map(|outcome| outcome.result.as_ref().ok().and_then(Option::as_ref))
    }
}

/// Writes the STEP file (when requested) and then the STL file.
///
/// A failed artifact is recorded in the report and the next one is still attempted.
pub fn export_all(solid: &Solid, request: &ExportRequest) -> ExportReport {
    let mut report = ExportReport::default();

    if let Some(step_path) = &request.step_path {
        let result = export_step(solid, step_path, &request.part_name).map(|()| None);
        report.outcomes.push(record(ArtifactKind::Step, step_path.clone(), result));
    }

    let result = export_stl(
        solid,
        &request.stl_path,
        request.tessellation_tolerance,
        request.stl_format,
    )
    .map(Some);
    report
        .outcomes
        .push(record(ArtifactKind::Stl, request.stl_path.clone(), result));

    report
}

fn record(
    kind: ArtifactKind,
    path: PathBuf,
    result: anyhow::Result<Option<MeshStats>>,
) -> ExportOutcome {
    match &result {
        Ok(_) => info!(artifact = %kind, path = %path.display(), "export complete"),
        Err(err) => {
            let message = format!("{err:#}");
            error!(artifact = %kind, path = %path.display(), error = %message, "export failed");
        }
    }
    ExportOutcome { kind, path, result }
}
