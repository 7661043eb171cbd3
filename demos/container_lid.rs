use anyhow::Result;
use boxwright_enclosure::{EnclosureConfig, TruckKernel};
use boxwright_io::export_all;

fn main() -> Result<()> {
    let config = EnclosureConfig::default();
    let solid = config.build_lid(&TruckKernel::new(config.tolerance))?;
    let request = config.output.lid.export_request(
        "container_lid",
        config.output.stl_format,
        config.tolerance.tessellation,
    );
    let report = export_all(&solid, &request);
    for outcome in &report.outcomes {
        println!("{}: {}", outcome.kind, outcome.path.display());
    }
    if !report.is_success() {
        anyhow::bail!("lid export failed");
    }
    Ok(())
}
