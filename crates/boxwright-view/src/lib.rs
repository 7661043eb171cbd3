//! Optional preview of built parts.
//!
//! A viewer is a capability, not a requirement: when none is configured or
//! the configured one cannot be found, generation carries on without it.

use boxwright_io::{DEFAULT_TESSELLATION_TOLERANCE, StlFormat, export_stl};
use boxwright_topology::Solid;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("viewer `{0}` is not available")]
    Unavailable(String),
    #[error("failed to start viewer `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("viewer `{program}` exited with {status}")]
    Exited { program: String, status: ExitStatus },
    #[error("failed to write preview: {0:#}")]
    Preview(anyhow::Error),
}

pub trait Viewer {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool;

    /// Shows `solid` and returns once the viewer is closed.
    fn show(&self, label: &str, solid: &Solid) -> Result<(), ViewerError>;
}

/// Viewer used when no program is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledViewer;

impl Viewer for DisabledViewer {
    fn name(&self) -> &str {
        "disabled"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn show(&self, _label: &str, _solid: &Solid) -> Result<(), ViewerError> {
        Err(ViewerError::Unavailable(self.name().to_string()))
    }
}

/// Runs an external program on a temporary STL preview.
///
/// The preview path is appended after `args`.
#[derive(Clone, Debug)]
pub struct ExternalViewer {
    program: String,
    args: Vec<String>,
}

impl ExternalViewer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn resolve(&self) -> Option<PathBuf> {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return program.is_file().then(|| program.to_path_buf());
        }

        let path = std::env::var_os("PATH")?;
        let mut file_name = OsString::from(&self.program);
        file_name.push(std::env::consts::EXE_SUFFIX);
        std::env::split_paths(&path)
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
    }
}

impl Viewer for ExternalViewer {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        self.resolve().is_some()
    }

    fn show(&self, label: &str, solid: &Solid) -> Result<(), ViewerError> {
        let Some(program) = self.resolve() else {
            return Err(ViewerError::Unavailable(self.program.clone()));
        };

        let preview = preview_path(label);
        export_stl(
            solid,
            &preview,
            DEFAULT_TESSELLATION_TOLERANCE,
            StlFormat::Binary,
        )
        .map_err(ViewerError::Preview)?;

        debug!(program = %program.display(), preview = %preview.display(), "starting viewer");
        let status = Command::new(&program)
            .args(&self.args)
            .arg(&preview)
            .status();

        if let Err(err) = std::fs::remove_file(&preview) {
            debug!(preview = %preview.display(), error = %err, "preview not removed");
        }

        let status = status.map_err(|source| ViewerError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if !status.success() {
            return Err(ViewerError::Exited {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// What happened when a part was handed to a viewer.
#[derive(Debug)]
pub enum ViewOutcome {
    Shown,
    Unavailable,
    Failed(ViewerError),
}

impl ViewOutcome {
    pub fn is_shown(&self) -> bool {
        matches!(self, Self::Shown)
    }
}

/// Hands `solid` to `viewer`. Never fails; problems are logged and returned.
pub fn present<V: Viewer + ?Sized>(viewer: &V, label: &str, solid: &Solid) -> ViewOutcome {
    if !viewer.is_available() {
        info!(viewer = viewer.name(), part = label, "viewer unavailable, skipping preview");
        return ViewOutcome::Unavailable;
    }

    match viewer.show(label, solid) {
        Ok(()) => {
            info!(viewer = viewer.name(), part = label, "preview closed");
            ViewOutcome::Shown
        }
        Err(ViewerError::Unavailable(_)) => ViewOutcome::Unavailable,
        Err(err) => {
            warn!(viewer = viewer.name(), part = label, error = %err, "viewer failed");
            ViewOutcome::Failed(err)
        }
    }
}

fn preview_path(label: &str) -> PathBuf {
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_nanos(),
        Err(_) => 0,
    };
    let label: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    std::env::temp_dir().join(format!("boxwright_preview_{stamp}_{label}.stl"))
}
