//! Configuration for NameTagKit
//!
//! Supports JSON and TOML files; the default lives in the platform config
//! directory. Sections:
//! - Name validation (length limit, upper-casing)
//! - Tag geometry
//! - Export (exporter, union mode, OpenSCAD)
//! - Packaging (archive name, extra sources)
//! - Preview

use crate::error::{ConfigError, SettingsError, SettingsResult};
use nametagkit_core::{NameValidator, MAX_NAME_LENGTH};
use nametagkit_designer::{TagDimensions, UnionMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Largest name length a config may ask for
pub const MAX_CONFIGURABLE_LENGTH: usize = 64;

/// Name validation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameSettings {
    /// Maximum characters per name
    pub max_length: usize,
    /// Upper-case raw input before validation
    pub auto_uppercase: bool,
}

impl Default for NameSettings {
    fn default() -> Self {
        Self {
            max_length: MAX_NAME_LENGTH,
            auto_uppercase: true,
        }
    }
}

impl NameSettings {
    pub fn validator(&self) -> NameValidator {
        NameValidator {
            max_length: self.max_length,
            auto_uppercase: self.auto_uppercase,
        }
    }
}

/// Which exporter turns solids into STL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExporterKind {
    /// Built-in extrusion and STL writer
    #[default]
    Native,
    /// Render the OpenSCAD template with the external tool
    OpenScad,
}

impl std::fmt::Display for ExporterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::OpenScad => write!(f, "openscad"),
        }
    }
}

impl std::str::FromStr for ExporterKind {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "openscad" => Ok(Self::OpenScad),
            other => Err(SettingsError::invalid(
                "export.exporter",
                format!("unknown exporter '{}'", other),
            )),
        }
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub exporter: ExporterKind,
    pub union_mode: UnionMode,
    /// Explicit OpenSCAD executable; searched for when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openscad_path: Option<PathBuf>,
    /// Per-name limit for one OpenSCAD render
    pub openscad_timeout_secs: u64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            exporter: ExporterKind::Native,
            union_mode: UnionMode::Disjoint,
            openscad_path: None,
            openscad_timeout_secs: 30,
        }
    }
}

impl ExportSettings {
    pub fn openscad_timeout(&self) -> Duration {
        Duration::from_secs(self.openscad_timeout_secs)
    }
}

/// Archive and output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageSettings {
    pub archive_name: String,
    /// Add per-name OpenSCAD sources and the batch script
    pub include_sources: bool,
    pub output_directory: PathBuf,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            archive_name: "name-tags-stl.zip".to_string(),
            include_sources: false,
            output_directory: PathBuf::from("."),
        }
    }
}

/// Preview settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// System font for preview letters; baked outlines when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    pub width: u32,
    pub height: u32,
    pub auto_rotate: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            font_family: None,
            width: 800,
            height: 600,
            auto_rotate: false,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub names: NameSettings,
    pub geometry: TagDimensions,
    pub export: ExportSettings,
    pub package: PackageSettings,
    pub preview: PreviewSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config_dir>/nametagkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".into())
        })?;
        Ok(dir.join("nametagkit").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// [`Config::load_from_file`] if `path` exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, content).map_err(|e| SettingsError::SaveError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.names.max_length == 0 || self.names.max_length > MAX_CONFIGURABLE_LENGTH {
            return Err(SettingsError::invalid(
                "names.max_length",
                format!("must be between 1 and {}", MAX_CONFIGURABLE_LENGTH),
            ));
        }

        self.geometry
            .validate()
            .map_err(|reason| SettingsError::invalid("geometry", reason))?;

        if self.export.openscad_timeout_secs == 0 {
            return Err(SettingsError::invalid(
                "export.openscad_timeout_secs",
                "must be > 0",
            ));
        }

        let archive = self.package.archive_name.trim();
        if archive.is_empty() || archive.contains(['/', '\\']) {
            return Err(SettingsError::invalid(
                "package.archive_name",
                "must be a plain file name",
            ));
        }

        if self.preview.width == 0 || self.preview.height == 0 {
            return Err(SettingsError::invalid(
                "preview",
                "width and height must be > 0",
            ));
        }

        Ok(())
    }
}
