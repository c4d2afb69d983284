//! OpenSCAD as an optional external exporter.
//!
//! Every invocation runs under a timeout; a process that overruns it is
//! killed and reported as [`ExportError::ExternalToolTimeout`].

use crate::templates::ScadTemplate;
use nametagkit_core::{ExportError, Result};
use nametagkit_designer::{Mesh3D, MeshExporter, Solid};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

pub const TOOL_NAME: &str = "openscad";

/// Default limit for one render
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[cfg(target_os = "macos")]
const PLATFORM_CANDIDATES: &[&str] = &["/Applications/OpenSCAD.app/Contents/MacOS/OpenSCAD"];
#[cfg(not(target_os = "macos"))]
const PLATFORM_CANDIDATES: &[&str] = &[];

#[cfg(windows)]
const EXECUTABLE_NAMES: &[&str] = &["openscad.exe", "OpenSCAD.exe", "openscad.com"];
#[cfg(not(windows))]
const EXECUTABLE_NAMES: &[&str] = &["openscad"];

fn search_path() -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path).find_map(|dir| {
        EXECUTABLE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

fn missing() -> ExportError {
    ExportError::ExternalToolMissing {
        tool: TOOL_NAME.to_string(),
    }
}

fn failure(reason: impl Into<String>) -> ExportError {
    ExportError::ExternalToolFailure {
        tool: TOOL_NAME.to_string(),
        reason: reason.into(),
    }
}

/// Last non-empty line of a process stream, for error messages.
fn last_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Handle on a located OpenSCAD executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenScadRunner {
    executable: PathBuf,
    timeout: Duration,
}

impl OpenScadRunner {
    pub fn new(executable: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            timeout,
        }
    }

    /// Find OpenSCAD on `PATH` or in its usual install location.
    pub fn locate(timeout: Duration) -> std::result::Result<Self, ExportError> {
        let found = search_path().or_else(|| {
            PLATFORM_CANDIDATES
                .iter()
                .map(PathBuf::from)
                .find(|p| p.is_file())
        });
        match found {
            Some(executable) => {
                debug!("Found OpenSCAD at {}", executable.display());
                Ok(Self::new(executable, timeout))
            }
            None => Err(missing()),
        }
    }

    /// Use `explicit` when given, otherwise [`OpenScadRunner::locate`].
    pub fn resolve(
        explicit: Option<&Path>,
        timeout: Duration,
    ) -> std::result::Result<Self, ExportError> {
        match explicit {
            Some(path) if path.is_file() => Ok(Self::new(path, timeout)),
            Some(path) => {
                warn!("Configured OpenSCAD path {} does not exist", path.display());
                Err(missing())
            }
            None => Self::locate(timeout),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn runtime() -> std::result::Result<tokio::runtime::Runtime, ExportError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| failure(format!("cannot start runtime: {}", e)))
    }

    async fn run(&self, args: &[&OsStr]) -> std::result::Result<Output, ExportError> {
        let child = Command::new(&self.executable)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => missing(),
                _ => failure(format!("cannot start: {}", e)),
            })?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(failure(e.to_string())),
            // The child future is dropped here, which kills the process
            Err(_) => Err(ExportError::ExternalToolTimeout {
                tool: TOOL_NAME.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }

    /// Version banner, e.g. `OpenSCAD version 2021.01`.
    pub async fn version_async(&self) -> std::result::Result<String, ExportError> {
        let output = self.run(&[OsStr::new("--version")]).await?;
        if !output.status.success() {
            return Err(failure(format!(
                "--version exited with {}: {}",
                output.status,
                last_line(&output.stderr)
            )));
        }
        // OpenSCAD prints its version on stderr
        let banner = match last_line(&output.stderr) {
            line if line.is_empty() => last_line(&output.stdout),
            line => line,
        };
        Ok(banner)
    }

    pub fn version(&self) -> std::result::Result<String, ExportError> {
        Self::runtime()?.block_on(self.version_async())
    }

    /// Render `source` and return the produced STL bytes as written by OpenSCAD.
    pub async fn render_stl_async(&self, source: &str) -> std::result::Result<Vec<u8>, ExportError> {
        let dir = tempfile::tempdir().map_err(|e| failure(format!("temp dir: {}", e)))?;
        let input = dir.path().join("tag.scad");
        let output = dir.path().join("tag.stl");
        tokio::fs::write(&input, source)
            .await
            .map_err(|e| failure(format!("cannot write model: {}", e)))?;

        let result = self
            .run(&[OsStr::new("-o"), output.as_os_str(), input.as_os_str()])
            .await?;
        if !result.status.success() {
            return Err(failure(format!(
                "exited with {}: {}",
                result.status,
                last_line(&result.stderr)
            )));
        }

        let bytes = tokio::fs::read(&output)
            .await
            .map_err(|e| failure(format!("no output produced: {}", e)))?;
        if bytes.is_empty() {
            return Err(failure("empty output"));
        }
        Ok(bytes)
    }

    pub fn render_stl(&self, source: &str) -> std::result::Result<Vec<u8>, ExportError> {
        Self::runtime()?.block_on(self.render_stl_async(source))
    }
}

/// Exporter that renders the OpenSCAD template instead of extruding the solid.
///
/// Only the solid's label is used. The result is normalised to binary STL.
#[derive(Debug, Clone)]
pub struct ScadExporter {
    template: ScadTemplate,
    runner: OpenScadRunner,
}

impl ScadExporter {
    pub fn new(template: ScadTemplate, runner: OpenScadRunner) -> Self {
        info!(
            "Using OpenSCAD exporter: {} (timeout {:?})",
            runner.executable().display(),
            runner.timeout()
        );
        Self { template, runner }
    }

    pub fn template(&self) -> &ScadTemplate {
        &self.template
    }
}

impl MeshExporter for ScadExporter {
    fn export(&self, solid: &Solid) -> Result<Vec<u8>> {
        if !solid.is_printable() {
            return Err(ExportError::PreviewGeometry.into());
        }
        let source = self.template.render_text(&solid.label);
        let raw = self.runner.render_stl(&source)?;
        let mesh = Mesh3D::from_stl_bytes(&raw)?;
        if mesh.is_empty() {
            return Err(failure("model has no triangles").into());
        }
        Ok(mesh.to_stl_binary()?)
    }
}
