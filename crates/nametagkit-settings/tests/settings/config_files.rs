use nametagkit_designer::UnionMode;
use nametagkit_settings::{Config, ConfigError, ExporterKind, SettingsError};
use std::path::PathBuf;
use tempfile::TempDir;

fn custom_config() -> Config {
    let mut config = Config::default();
    config.names.max_length = 10;
    config.export.exporter = ExporterKind::OpenScad;
    config.export.union_mode = UnionMode::Merged;
    config.export.openscad_path = Some(PathBuf::from("/opt/openscad/bin/openscad"));
    config.package.include_sources = true;
    config.preview.font_family = Some("DejaVu Sans".to_string());
    config.geometry.spacing_factor = 1.5;
    config
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let config = custom_config();

    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip_without_bevel() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let mut config = custom_config();
    config.geometry.bevel = None;

    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.geometry.bevel, None);
    assert_eq!(loaded, config);
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("config.toml");
    Config::default().save_to_file(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_unknown_extension_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    let err = Config::default().save_to_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_invalid_file_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[export]\nopenscad_timeout_secs = 0\n").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::InvalidSetting { .. })
    ));

    std::fs::write(&path, "this is not toml = = =").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}
