use assert_fs::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use vbsync_fs::{ComponentKind, DirectoryMapper, KindFolder};

#[rstest]
#[case(ComponentKind::Module, "drawing1/Modules/Module1.bas")]
#[case(ComponentKind::Class, "drawing1/Classes/Module1.cls")]
#[case(ComponentKind::Form, "drawing1/Forms/Module1.frm")]
#[case(ComponentKind::DocumentModule, "drawing1/VisioObjects/Module1.cls")]
fn test_component_path_per_kind(#[case] kind: ComponentKind, #[case] relative: &str) {
    let temp = assert_fs::TempDir::new().unwrap();
    let mapper = DirectoryMapper::new(temp.path());

    let path = mapper.component_path("drawing1", "Module1", kind);
    assert_eq!(path, mapper.root().join(relative));
}

#[rstest]
#[case(ComponentKind::Module)]
#[case(ComponentKind::Class)]
#[case(ComponentKind::Form)]
#[case(ComponentKind::DocumentModule)]
fn test_resolve_inverts_component_path(#[case] kind: ComponentKind) {
    let temp = assert_fs::TempDir::new().unwrap();
    let mapper = DirectoryMapper::new(temp.path());
    let path = mapper.component_path("stencil", "Widget", kind);

    let mapped = mapper.resolve(path.to_native()).unwrap();

    assert_eq!(mapped.document_folder.as_deref(), Some("stencil"));
    assert_eq!(mapped.name, "Widget");
    assert_eq!(mapped.kind, kind);
    assert_eq!(mapped.folder, Some(kind.folder()));
    assert!(!mapped.is_legacy());
}

#[test]
fn test_resolve_legacy_flat_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mapper = DirectoryMapper::new(temp.path());

    let mapped = mapper.resolve(mapper.root().join("Foo.bas")).unwrap();
    assert_eq!(mapped.document_folder, None);
    assert_eq!(mapped.kind, ComponentKind::Module);
    assert!(mapped.is_legacy());
}

#[test]
fn test_resolve_flat_file_inside_document_folder() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mapper = DirectoryMapper::new(temp.path());

    let mapped = mapper.resolve(mapper.root().join("drawing1/Class1.cls")).unwrap();
    assert_eq!(mapped.document_folder.as_deref(), Some("drawing1"));
    assert_eq!(mapped.kind, ComponentKind::Class);
    assert!(mapped.is_legacy());
}

#[test]
fn test_resolve_kind_folder_is_case_insensitive() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mapper = DirectoryMapper::new(temp.path());

    let mapped = mapper
        .resolve(mapper.root().join("drawing1/visioobjects/ThisDocument.cls"))
        .unwrap();
    assert_eq!(mapped.kind, ComponentKind::DocumentModule);
    assert_eq!(mapped.folder, Some(KindFolder::VisioObjects));
}

#[rstest]
#[case("drawing1/Modules/notes.txt")]
#[case("drawing1/Other/Module1.bas")]
#[case("a/b/c/Module1.bas")]
fn test_resolve_rejects_unmapped_paths(#[case] relative: &str) {
    let temp = assert_fs::TempDir::new().unwrap();
    let mapper = DirectoryMapper::new(temp.path());

    assert!(mapper.resolve(mapper.root().join(relative)).is_none());
}

#[test]
fn test_resolve_rejects_paths_outside_root() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mapper = DirectoryMapper::new(temp.path().join("out"));

    assert!(mapper.resolve(temp.path().join("Module1.bas")).is_none());
}

#[test]
fn test_scan_document_orders_by_kind_folder() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("drawing1/VisioObjects/ThisDocument.cls").write_str("x").unwrap();
    temp.child("drawing1/Classes/Class1.cls").write_str("x").unwrap();
    temp.child("drawing1/Modules/B.bas").write_str("x").unwrap();
    temp.child("drawing1/Modules/A.bas").write_str("x").unwrap();
    temp.child("drawing1/Modules/readme.md").write_str("x").unwrap();
    temp.child("drawing1/Old.bas").write_str("x").unwrap();

    let mapper = DirectoryMapper::new(temp.path());
    let names: Vec<String> = mapper
        .scan_document("drawing1")
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();

    assert_eq!(names, vec!["A", "B", "Class1", "ThisDocument", "Old"]);
}

#[test]
fn test_scan_missing_document_is_empty() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mapper = DirectoryMapper::new(temp.path());

    assert!(mapper.scan_document("nothing").unwrap().is_empty());
}

#[test]
fn test_scan_legacy_and_document_folders() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("Module1.bas").write_str("x").unwrap();
    temp.child("Form1.frm").write_str("x").unwrap();
    temp.child("drawing1/Modules").create_dir_all().unwrap();
    temp.child("stencil").create_dir_all().unwrap();
    temp.child(".git").create_dir_all().unwrap();

    let mapper = DirectoryMapper::new(temp.path());

    let legacy: Vec<String> = mapper
        .scan_legacy()
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(legacy, vec!["Form1", "Module1"]);
    assert_eq!(mapper.document_folders().unwrap(), vec!["drawing1", "stencil"]);
}
