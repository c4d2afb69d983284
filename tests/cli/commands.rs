use nametagkit::cli::Cli;
use nametagkit::commands::{run, EXIT_FAILURE, EXIT_INVALID_INPUT, EXIT_SUCCESS};
use nametagkit_settings::Config;
use std::io::{Cursor, Read};
use std::path::Path;
use tempfile::TempDir;
use zip::ZipArchive;

/// Config file inside `dir` with output going to `dir/out`.
fn write_config(dir: &Path, edit: impl FnOnce(&mut Config)) -> String {
    let mut config = Config::default();
    config.package.output_directory = dir.join("out");
    edit(&mut config);
    let path = dir.join("config.toml");
    config.save_to_file(&path).unwrap();
    path.display().to_string()
}

fn run_args(args: &[&str]) -> (u8, String) {
    let cli = Cli::parse(args.iter().copied()).unwrap();
    let mut out = Vec::new();
    let code = run(&cli, &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

fn entry_names(path: &Path) -> Vec<String> {
    let bytes = std::fs::read(path).unwrap();
    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(str::to_string).collect()
}

#[test]
fn test_generate_writes_archive() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), |_| {});

    let (code, out) = run_args(&["--config", &config, "generate", "alice", "Bob"]);
    assert_eq!(code, EXIT_SUCCESS, "{}", out);
    assert!(out.contains("Generated 2/2 tags"), "{}", out);

    let mut names = entry_names(&dir.path().join("out").join("name-tags-stl.zip"));
    names.sort();
    assert_eq!(names, ["ALICE_tag.stl", "BOB_tag.stl", "README.txt"]);
}

#[test]
fn test_generate_keeps_repeated_names() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), |_| {});

    let (code, out) = run_args(&["--config", &config, "generate", "ALICE", "BOB", "ALICE"]);
    assert_eq!(code, EXIT_SUCCESS, "{}", out);
    assert!(out.contains("Generated 3/3 tags"), "{}", out);

    let names = entry_names(&dir.path().join("out").join("name-tags-stl.zip"));
    assert_eq!(names.len(), 4, "{:?}", names);
    assert!(names.iter().any(|n| n == "ALICE_2_tag.stl"), "{:?}", names);

    let loose = dir.path().join("loose");
    let (code, out) = run_args(&[
        "--config",
        &config,
        "generate",
        "ALICE",
        "BOB",
        "ALICE",
        "--loose",
        "--out",
        loose.to_str().unwrap(),
    ]);
    assert_eq!(code, EXIT_SUCCESS, "{}", out);
    assert!(out.contains("Wrote 3 STL files"), "{}", out);
    assert!(loose.join("ALICE_tag.stl").is_file());
    assert!(loose.join("ALICE_2_tag.stl").is_file());
}

#[test]
fn test_generate_from_file_with_sources() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), |c| c.package.archive_name = "tags.zip".into());
    let list = dir.path().join("names.txt");
    std::fs::write(&list, "ZED\r\n\r\nMARY ANN\r\n").unwrap();

    let (code, _) = run_args(&[
        "--config",
        &config,
        "generate",
        "--file",
        list.to_str().unwrap(),
        "--sources",
    ]);
    assert_eq!(code, EXIT_SUCCESS);

    let names = entry_names(&dir.path().join("out").join("tags.zip"));
    for expected in [
        "ZED_tag.stl",
        "MARY_ANN_tag.stl",
        "ZED_tag.scad",
        "MARY_ANN_tag.scad",
        "nametag.scad",
        "generate_names.py",
        "README.txt",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {}", expected);
    }
}

#[test]
fn test_invalid_line_aborts_before_output() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), |_| {});

    let (code, out) = run_args(&["--config", &config, "generate", "ALICE", "B@B"]);
    assert_eq!(code, EXIT_INVALID_INPUT);
    assert!(out.starts_with("Line 2:"), "{}", out);
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_failed_name_gives_partial_result() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), |c| c.geometry.spacing_factor = 0.5);
    let loose = dir.path().join("loose");

    let (code, out) = run_args(&[
        "--config",
        &config,
        "generate",
        "AB",
        "I",
        "--merged",
        "--loose",
        "--out",
        loose.to_str().unwrap(),
    ]);
    assert_eq!(code, EXIT_FAILURE);
    assert!(out.contains("Generated 1/2 tags"), "{}", out);
    assert!(out.contains("  AB: "), "{}", out);
    assert!(loose.join("I_tag.stl").is_file());
    assert!(!loose.join("AB_tag.stl").exists());
}

#[test]
fn test_validate_lists_every_problem() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), |c| c.names.max_length = 4);

    let (code, out) = run_args(&["--config", &config, "validate", "ANNA", "JOHNNY", "J_D"]);
    assert_eq!(code, EXIT_INVALID_INPUT);
    assert!(out.contains("Line 2: name is too long (6 characters, max 4)"), "{}", out);
    assert!(out.contains("Line 3: contains invalid characters '_'"), "{}", out);
    assert!(out.contains("1 valid, 2 invalid"), "{}", out);

    let (code, out) = run_args(&["--config", &config, "validate", "ANNA"]);
    assert_eq!(code, EXIT_SUCCESS);
    assert!(out.contains("1 names OK"));
}

#[test]
fn test_preview_writes_svg() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), |_| {});
    let svg = dir.path().join("zed.svg");

    let (code, out) = run_args(&[
        "--config",
        &config,
        "preview",
        "zed",
        "--out",
        svg.to_str().unwrap(),
        "--yaw",
        "-60",
    ]);
    assert_eq!(code, EXIT_SUCCESS, "{}", out);
    assert!(out.contains("Baked"), "{}", out);

    let mut content = String::new();
    std::fs::File::open(&svg)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert!(content.starts_with("<svg"));
    assert!(content.contains("<polygon"));
}

#[test]
fn test_auto_rotate_writes_turntable_frames() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), |c| c.preview.auto_rotate = true);
    let svg = dir.path().join("bob.svg");

    let (code, out) = run_args(&[
        "--config",
        &config,
        "preview",
        "BOB",
        "--out",
        svg.to_str().unwrap(),
    ]);
    assert_eq!(code, EXIT_SUCCESS, "{}", out);
    assert!(out.contains("12 turntable frames"), "{}", out);
    assert!(!svg.exists());

    let first = std::fs::read_to_string(dir.path().join("bob_01.svg")).unwrap();
    let second = std::fs::read_to_string(dir.path().join("bob_02.svg")).unwrap();
    assert!(dir.path().join("bob_12.svg").is_file());
    assert!(!dir.path().join("bob_13.svg").exists());
    assert_ne!(first, second);
}

#[test]
fn test_fonts_lists_families() {
    let (code, _) = run_args(&["fonts"]);
    assert_eq!(code, EXIT_SUCCESS);
}

#[test]
fn test_init_config_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let path_arg = path.to_str().unwrap();

    let (code, _) = run_args(&["init-config", path_arg]);
    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(Config::load_from_file(&path).unwrap(), Config::default());

    let cli = Cli::parse(["init-config", path_arg]).unwrap();
    assert!(run(&cli, &mut Vec::new()).is_err());

    let (code, _) = run_args(&["init-config", path_arg, "--force"]);
    assert_eq!(code, EXIT_SUCCESS);
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");
    let cli = Cli::parse(["--config", missing.to_str().unwrap(), "validate", "A"]).unwrap();
    assert!(run(&cli, &mut Vec::new()).is_err());
}
