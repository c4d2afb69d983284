use nametagkit_core::{NameString, NameValidator};
use nametagkit_designer::{
    BodyKind, Mesh3D, MeshExporter, StlExporter, TagDimensions, TagGenerator, UnionMode,
};

fn names(raw: &str) -> Vec<NameString> {
    NameValidator::default().validate(raw).unwrap()
}

#[test]
fn test_every_supported_character_exports() {
    let generator = TagGenerator::default();
    let exporter = StlExporter::default();
    for name in names("ABCDEFGHIJKLM\nNOPQRSTUVWXYZ\n0123456789\nA-B C") {
        let bytes = exporter.export(&generator.generate(&name).unwrap()).unwrap();
        let mesh = Mesh3D::from_stl_bytes(&bytes).unwrap();
        assert!(mesh.triangle_count() > 0, "{name}");
        assert!(mesh.volume() > 0.0, "{name}");
    }
}

#[test]
fn test_merged_and_disjoint_volumes_agree() {
    let name = &names("ALICE")[0];
    let dims = TagDimensions {
        bevel: None,
        ..Default::default()
    };
    let solid = TagGenerator::new(dims).generate(name).unwrap();
    let disjoint = StlExporter::new(UnionMode::Disjoint).mesh(&solid).unwrap();
    let merged = StlExporter::new(UnionMode::Merged).mesh(&solid).unwrap();
    let relative = (disjoint.volume() - merged.volume()).abs() / disjoint.volume();
    assert!(relative < 1e-4);
}

#[test]
fn test_touching_glyphs_merge() {
    let dims = TagDimensions {
        spacing_factor: 1.0,
        bevel: None,
        ..Default::default()
    };
    let name = &names("HH")[0];
    let solid = TagGenerator::new(dims).generate(name).unwrap();
    let merged = nametagkit_designer::merge_bodies(&solid).unwrap();
    let text_bodies = merged
        .bodies
        .iter()
        .filter(|b| b.kind == BodyKind::Merged)
        .count();
    // Two letters sharing an edge plus the separate underline
    assert_eq!(text_bodies, 2);
}

#[test]
fn test_single_character_name() {
    let name = &names("Q")[0];
    let solid = TagGenerator::default().generate(name).unwrap();
    assert_eq!(solid.bodies.len(), 3);
    assert!(StlExporter::default().export(&solid).is_ok());
}
