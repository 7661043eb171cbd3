use anyhow::Result;
use boxwright_enclosure::{EnclosureConfig, TruckKernel};
use boxwright_io::export_stl;

fn main() -> Result<()> {
    let config = EnclosureConfig::default();
    let solid = config.build_enclosure(&TruckKernel::new(config.tolerance))?;
    let stats = export_stl(
        &solid,
        &config.output.enclosure.output_path,
        config.tolerance.tessellation,
        config.output.stl_format,
    )?;
    println!("{} triangles, {:.1} mm^3", stats.triangles, stats.volume);
    Ok(())
}
