use anyhow::{Context, Result, bail};
use boxwright_base::LengthUnit;
use boxwright_enclosure::{ArtifactPaths, EnclosureConfig, Part, PartKind, TruckKernel};
use boxwright_io::{ExportReport, MeshStats, export_all};
use boxwright_view::{DisabledViewer, ExternalViewer, Viewer, present};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "boxwright")]
#[command(about = "Parametric enclosure and lid generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default configuration as JSON.
    Config(ConfigArgs),
    Generate {
        #[command(subcommand)]
        command: GenerateCommand,
    },
}

#[derive(Subcommand)]
enum GenerateCommand {
    Enclosure(PartArgs),
    Lid(PartArgs),
    All(AllArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// Defaults to stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct SourceArgs {
    #[arg(long)]
    config: Option<PathBuf>,
    /// Unit the configuration's lengths are read in: mm, cm or m.
    #[arg(long)]
    units: Option<LengthUnit>,
    /// Program that is run on an STL preview of each part.
    #[arg(long)]
    viewer: Option<String>,
}

#[derive(Args)]
struct PartArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long = "step-out")]
    step_out: Option<PathBuf>,
}

#[derive(Args)]
struct AllArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[arg(long)]
    manifest: Option<PathBuf>,
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    #[serde(flatten)]
    part: &'a Part,
    stl_path: &'a Path,
    step_path: Option<&'a Path>,
    mesh: Option<&'a MeshStats>,
}

struct Generated {
    part: Part,
    paths: ArtifactPaths,
    report: ExportReport,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Config(args) => write_default_config(args),
        Command::Generate {
            command: GenerateCommand::Enclosure(args),
        } => generate_single(PartKind::Enclosure, args),
        Command::Generate {
            command: GenerateCommand::Lid(args),
        } => generate_single(PartKind::Lid, args),
        Command::Generate {
            command: GenerateCommand::All(args),
        } => generate_all(args),
    }
}

fn write_default_config(args: ConfigArgs) -> Result<()> {
    let json = EnclosureConfig::default()
        .to_json()
        .context("failed to serialize default configuration")?;
    match args.out {
        Some(path) => {
            write_file(&path, &json)?;
            info!(path = %path.display(), "configuration written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn generate_single(kind: PartKind, args: PartArgs) -> Result<()> {
    let config = load_config(args.source.config.as_deref(), args.source.units)?;
    let viewer = make_viewer(args.source.viewer);

    let mut paths = artifact_paths(&config, kind).clone();
    if let Some(out) = args.out {
        paths.output_path = out;
    }
    if let Some(step_out) = args.step_out {
        paths.step_output_path = Some(step_out);
    }

    let generated = generate_part(&config, kind, paths, viewer.as_ref())?;
    let failures = report_failures(&generated.report);
    if failures > 0 {
        bail!("{failures} export(s) of {} failed", generated.part.name);
    }
    Ok(())
}

fn generate_all(args: AllArgs) -> Result<()> {
    let config = load_config(args.source.config.as_deref(), args.source.units)?;
    let viewer = make_viewer(args.source.viewer);

    let mut generated = Vec::new();
    let mut failures = 0;
    for kind in [PartKind::Enclosure, PartKind::Lid] {
        let paths = artifact_paths(&config, kind).clone();
        match generate_part(&config, kind, paths, viewer.as_ref()) {
            Ok(item) => {
                failures += report_failures(&item.report);
                generated.push(item);
            }
            Err(err) => {
                let message = format!("{err:#}");
                error!(part = part_label(kind), error = %message, "build failed");
                failures += 1;
            }
        }
    }

    if let Some(manifest) = &args.manifest {
        write_manifest(manifest, &generated)?;
    }
    if failures > 0 {
        bail!("{failures} part build(s) or export(s) failed");
    }
    Ok(())
}

fn generate_part(
    config: &EnclosureConfig,
    kind: PartKind,
    paths: ArtifactPaths,
    viewer: &dyn Viewer,
) -> Result<Generated> {
    let kernel = TruckKernel::new(config.tolerance);
    let label = part_label(kind);
    let (geometry, parameters) = match kind {
        PartKind::Enclosure => (config.build_enclosure(&kernel), config.enclosure_parameters()),
        PartKind::Lid => (config.build_lid(&kernel), config.lid_parameters()),
    };
    let geometry = geometry.with_context(|| format!("failed to build {label}"))?;
    let part = Part::new(format!("{}_{label}", config.name), kind, parameters, geometry);
    info!(part = %part.name, guid = %part.guid, "part built");

    let request = paths.export_request(
        &part.name,
        config.output.stl_format,
        config.tolerance.tessellation,
    );
    let report = export_all(part.geometry(), &request);
    if let Some(stats) = report.stl_stats() {
        info!(
            part = %part.name,
            triangles = stats.triangles,
            volume = stats.volume,
            "mesh summary"
        );
    }

    present(viewer, &part.name, part.geometry());
    Ok(Generated {
        part,
        paths,
        report,
    })
}

fn load_config(path: Option<&Path>, units: Option<LengthUnit>) -> Result<EnclosureConfig> {
    let mut config = match path {
        Some(path) => EnclosureConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => EnclosureConfig::default(),
    };
    if let Some(units) = units {
        config.units = units;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn make_viewer(program: Option<String>) -> Box<dyn Viewer> {
    match program {
        Some(program) => Box::new(ExternalViewer::new(program)),
        None => Box::new(DisabledViewer),
    }
}

fn artifact_paths(config: &EnclosureConfig, kind: PartKind) -> &ArtifactPaths {
    match kind {
        PartKind::Enclosure => &config.output.enclosure,
        PartKind::Lid => &config.output.lid,
    }
}

fn part_label(kind: PartKind) -> &'static str {
    match kind {
        PartKind::Enclosure => "enclosure",
        PartKind::Lid => "lid",
    }
}

// Each failure has already been logged by `export_all`.
fn report_failures(report: &ExportReport) -> usize {
    report.failures().count()
}

fn write_manifest(path: &Path, generated: &[Generated]) -> Result<()> {
    let entries: Vec<ManifestEntry<'_>> = generated
        .iter()
        .map(|item| ManifestEntry {
            part: &item.part,
            stl_path: &item.paths.output_path,
            step_path: item.paths.step_output_path.as_deref(),
            mesh: item.report.stl_stats(),
        })
        .collect();
    let json = serde_json::to_string_pretty(&entries).context("failed to serialize manifest")?;
    write_file(path, &json)?;
    info!(path = %path.display(), parts = entries.len(), "manifest written");
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
