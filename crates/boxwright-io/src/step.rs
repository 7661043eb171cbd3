use anyhow::{Context, Result};
use boxwright_topology::Solid;
use std::path::Path;
use truck_stepio::out::{CompleteStepDisplay, StepHeaderDescriptor, StepModel};

/// Writes `solid` as an AP214 STEP file whose header names the part.
pub fn export_step(solid: &Solid, path: impl AsRef<Path>, part_name: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }

    let header = StepHeaderDescriptor {
        file_name: step_string(part_name),
        organization_system: format!("boxwright {}", env!("CARGO_PKG_VERSION")),
        ..Default::default()
    };
    let compressed = solid.compress();
    let text = CompleteStepDisplay::new(StepModel::from(&compressed), header).to_string();

    std::fs::write(path, text).with_context(|| format!("write STEP file {}", path.display()))
}

// Apostrophes are doubled inside STEP string literals.
fn step_string(text: &str) -> String {
    text.replace('\'', "''")
}
