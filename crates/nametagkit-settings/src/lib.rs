//! NameTagKit Settings Crate
//!
//! Application configuration: file formats, defaults and validation.

pub mod config;
pub mod error;

pub use config::{
    Config, ExportSettings, ExporterKind, NameSettings, PackageSettings, PreviewSettings,
    MAX_CONFIGURABLE_LENGTH,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
