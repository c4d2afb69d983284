use nametagkit_core::{NameString, NameValidator, ProgressStatus};
use nametagkit_designer::{StlExporter, TagDimensions, TagGenerator, UnionMode};
use nametagkit_packager::{
    package_tags, BatchProcessor, DirectoryDelivery, MemoryDelivery, PackageOptions,
};
use std::io::{Cursor, Read};
use zip::ZipArchive;

fn read_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            (file.name().to_string(), content)
        })
        .collect()
}

#[test]
fn test_two_names_make_three_entries() {
    let names = NameValidator::default().validate("alice\n\nBob\n").unwrap();
    let mut batch = BatchProcessor::new(
        TagGenerator::default(),
        StlExporter::default(),
        MemoryDelivery::new(),
    );
    let mut events = Vec::new();
    let result = batch.run(&names, |e| events.push(e.clone()));
    assert!(result.is_complete_success());
    assert_eq!(result.successful, 2);
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.status == ProgressStatus::Processing));

    let artifacts = batch.into_delivery().into_artifacts();
    let bytes = package_tags(&artifacts, &PackageOptions::default()).unwrap();
    let entries = read_entries(&bytes);
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["ALICE_tag.stl", "BOB_tag.stl", "README.txt"]);

    for (name, content) in &entries[..2] {
        let mesh = stl_io::read_stl(&mut Cursor::new(content)).unwrap();
        assert!(!mesh.faces.is_empty(), "{} has no faces", name);
        let declared = u32::from_le_bytes([content[80], content[81], content[82], content[83]]);
        assert_eq!(content.len(), 84 + declared as usize * 50);
    }

    let readme = String::from_utf8(entries[2].1.clone()).unwrap();
    assert!(readme.contains("2 name tag(s)"));
    assert!(readme.contains("- ALICE_tag.stl"));
}

#[test]
fn test_merge_failure_skips_only_that_name() {
    let dims = TagDimensions {
        spacing_factor: 0.5,
        ..Default::default()
    };
    let names: Vec<NameString> = ["AB", "I"]
        .iter()
        .map(|n| NameString::parse(n, 14).unwrap())
        .collect();
    let mut batch = BatchProcessor::new(
        TagGenerator::new(dims),
        StlExporter::new(UnionMode::Merged),
        MemoryDelivery::new(),
    );
    let result = batch.run(&names, |_| {});

    assert_eq!(result.successful, 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].name, "AB");
    assert!(result.errors[0].error.to_lowercase().contains("degenerate"));
    assert_eq!(batch.delivery().artifacts()[0].name.as_str(), "I");

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["total"], 2);
    assert_eq!(json["errors"][0]["name"], "AB");
}

#[test]
fn test_directory_delivery_writes_loose_files() {
    let dir = tempfile::tempdir().unwrap();
    let names = NameValidator::default().validate("ZED\nMARY ANN").unwrap();
    let mut batch = BatchProcessor::new(
        TagGenerator::default(),
        StlExporter::default(),
        DirectoryDelivery::new(dir.path()),
    );
    let result = batch.run(&names, |_| {});
    assert!(result.is_complete_success());
    assert!(dir.path().join("ZED_tag.stl").is_file());
    assert!(dir.path().join("MARY_ANN_tag.stl").is_file());
    assert_eq!(batch.delivery().written().len(), 2);
}

#[test]
fn test_repeated_name_is_packaged_twice() {
    let names = NameValidator::default().validate("ALICE\nBOB\nalice").unwrap();
    let mut batch = BatchProcessor::new(
        TagGenerator::default(),
        StlExporter::default(),
        MemoryDelivery::new(),
    );
    let result = batch.run(&names, |_| {});
    assert!(result.is_complete_success());
    assert_eq!(result.successful, 3);

    let artifacts = batch.into_delivery().into_artifacts();
    let bytes = package_tags(&artifacts, &PackageOptions::default()).unwrap();
    let entries = read_entries(&bytes);
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        ["ALICE_tag.stl", "BOB_tag.stl", "ALICE_2_tag.stl", "README.txt"]
    );
    assert_eq!(entries[0].1, entries[2].1);
}
