//! OpenSCAD stand-ins written as shell scripts.

use nametagkit_core::{Error, ExportError, NameString};
use nametagkit_designer::{MeshExporter, TagDimensions, TagGenerator};
use nametagkit_packager::{OpenScadRunner, ScadExporter, ScadTemplate};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

const WORKING: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "OpenSCAD version 2021.01" >&2
    exit 0
fi
grep -q 'name = "BOB";' "$3" || exit 3
cat > "$2" <<'STL'
solid tag
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid tag
STL
"#;

const BROKEN: &str = r#"#!/bin/sh
echo "WARNING: something odd" >&2
echo "ERROR: Parser error in file tag.scad, line 3" >&2
exit 1
"#;

const HANGING: &str = r#"#!/bin/sh
sleep 10
"#;

const SILENT: &str = r#"#!/bin/sh
exit 0
"#;

fn fake_tool(dir: &Path, script: &str) -> PathBuf {
    let path = dir.join("openscad");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn exporter(dir: &TempDir, script: &str, timeout: Duration) -> ScadExporter {
    let runner = OpenScadRunner::new(fake_tool(dir.path(), script), timeout);
    ScadExporter::new(ScadTemplate::new(&TagDimensions::default()).unwrap(), runner)
}

fn bob() -> nametagkit_designer::Solid {
    TagGenerator::default()
        .generate(&NameString::parse("BOB", 14).unwrap())
        .unwrap()
}

#[test]
fn test_version_banner() {
    let dir = TempDir::new().unwrap();
    let runner = OpenScadRunner::new(fake_tool(dir.path(), WORKING), Duration::from_secs(5));
    assert_eq!(runner.version().unwrap(), "OpenSCAD version 2021.01");
}

#[test]
fn test_render_normalises_to_binary() {
    let dir = TempDir::new().unwrap();
    let bytes = exporter(&dir, WORKING, Duration::from_secs(5))
        .export(&bob())
        .unwrap();
    assert_eq!(bytes.len(), 84 + 50);
    assert_eq!(&bytes[80..84], &1u32.to_le_bytes());
}

#[test]
fn test_tool_failure_reports_stderr() {
    let dir = TempDir::new().unwrap();
    let err = exporter(&dir, BROKEN, Duration::from_secs(5))
        .export(&bob())
        .unwrap_err();
    match err {
        Error::Export(ExportError::ExternalToolFailure { tool, reason }) => {
            assert_eq!(tool, "openscad");
            assert!(reason.contains("Parser error"), "{}", reason);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_hanging_tool_times_out() {
    let dir = TempDir::new().unwrap();
    let started = std::time::Instant::now();
    let err = exporter(&dir, HANGING, Duration::from_millis(300))
        .export(&bob())
        .unwrap_err();
    assert!(err.is_timeout());
    assert!(err.is_per_name());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_missing_output_is_failure() {
    let dir = TempDir::new().unwrap();
    let err = exporter(&dir, SILENT, Duration::from_secs(5))
        .export(&bob())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Export(ExportError::ExternalToolFailure { .. })
    ));
}
