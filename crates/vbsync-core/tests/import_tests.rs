use pretty_assertions::assert_eq;
use rstest::rstest;
use vbsync_core::{
    AssumeYes, ConflictResolver, DocumentRole, Error, ImportOutcome, KeepLocal, MemoryHost,
    ScriptedResolver, SyncEngine, SyncOptions, Warning,
};
use vbsync_fs::{ComponentKind, DirectoryMapper};
use vbsync_test_utils::{TestDir, samples};

const DRAWING: &str = "Drawing1.vsdm";

fn host() -> MemoryHost {
    let host = MemoryHost::new().with_document(DRAWING, DocumentRole::Main);
    host.insert_component(DRAWING, "Module1", ComponentKind::Module, samples::MODULE1);
    host.insert_component(
        DRAWING,
        "ThisDocument",
        ComponentKind::DocumentModule,
        samples::THIS_DOCUMENT,
    );
    host
}

fn engine(
    host: &MemoryHost,
    dir: &TestDir,
    resolver: impl ConflictResolver + 'static,
    force: bool,
) -> SyncEngine {
    let mut engine = SyncEngine::new(host.clone(), DirectoryMapper::new(dir.root()), resolver)
        .with_options(SyncOptions { force });
    engine.connect().unwrap();
    engine
}

#[test]
fn test_import_creates_component_with_name_attribute() {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write("drawing1/Modules/Foo.bas", "Sub Foo()\nEnd Sub\n");

    let report = engine(&host, &dir, KeepLocal, false).import_one(&path).unwrap();

    assert_eq!(report.outcome, ImportOutcome::Created);
    let foo = host.component(DRAWING, "Foo").unwrap();
    assert_eq!(foo.kind, ComponentKind::Module);
    assert_eq!(foo.raw, "Attribute VB_Name = \"Foo\"\r\nSub Foo()\r\nEnd Sub\r\n");
}

#[test]
fn test_import_class_without_header_stays_a_class() {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write("drawing1/Classes/Point.cls", "Public X As Long\n");

    engine(&host, &dir, KeepLocal, false).import_one(&path).unwrap();

    let point = host.component(DRAWING, "Point").unwrap();
    assert_eq!(point.kind, ComponentKind::Class);
    assert!(point.raw.contains("Attribute VB_Name = \"Point\"\r\n"));
}

#[test]
fn test_import_of_empty_file_adds_placeholder() {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write("drawing1/Modules/Empty.bas", "");

    engine(&host, &dir, KeepLocal, false).import_one(&path).unwrap();

    assert_eq!(
        host.component(DRAWING, "Empty").unwrap().raw,
        "Attribute VB_Name = \"Empty\"\r\nPrivate Sub Placeholder()\r\nEnd Sub\r\n"
    );
}

#[test]
fn test_equal_content_is_unchanged_without_asking() {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write(
        "drawing1/Modules/Module1.bas",
        "Option Explicit\n\nPublic Sub Main()\n    MsgBox \"Hello\"\nEnd Sub\n\n",
    );
    let mut engine = engine(&host, &dir, ScriptedResolver::new(), false);

    let report = engine.import_one(&path).unwrap();

    assert_eq!(report.outcome, ImportOutcome::Unchanged);
    assert_eq!(host.component(DRAWING, "Module1").unwrap().raw, samples::MODULE1);
}

#[rstest]
#[case(true, ImportOutcome::Replaced)]
#[case(false, ImportOutcome::Declined)]
fn test_changed_component_needs_confirmation(#[case] confirm: bool, #[case] expected: ImportOutcome) {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write(
        "drawing1/Modules/Module1.bas",
        &samples::module_source("Module1", "Public Sub Main()\n    MsgBox \"Changed\"\nEnd Sub\n"),
    );
    let mut engine = engine(&host, &dir, ScriptedResolver::new().import(confirm), false);

    let report = engine.import_one(&path).unwrap();

    assert_eq!(report.outcome, expected);
    let raw = host.component(DRAWING, "Module1").unwrap().raw;
    assert_eq!(raw.contains("Changed"), confirm);
}

#[test]
fn test_document_module_is_refused_without_force() {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write(
        "drawing1/VisioObjects/ThisDocument.cls",
        "Attribute VB_Name = \"ThisDocument\"\nSub Changed()\nEnd Sub\n",
    );

    let report = engine(&host, &dir, AssumeYes, false).import_one(&path).unwrap();

    assert_eq!(report.outcome, ImportOutcome::Refused);
    assert_eq!(
        host.component(DRAWING, "ThisDocument").unwrap().raw,
        samples::THIS_DOCUMENT
    );
}

#[test]
fn test_document_module_in_flat_layout_is_refused_by_host_kind() {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write("ThisDocument.cls", "Sub Changed()\nEnd Sub\n");

    let report = engine(&host, &dir, AssumeYes, false).import_one(&path).unwrap();

    assert_eq!(report.outcome, ImportOutcome::Refused);
}

#[test]
fn test_document_module_is_rewritten_in_place_with_force() {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write(
        "drawing1/VisioObjects/ThisDocument.cls",
        "Attribute VB_Name = \"ThisDocument\"\nPrivate Sub Document_DocumentOpened(ByVal doc As IVDocument)\n    MsgBox \"opened\"\nEnd Sub\n",
    );

    let report = engine(&host, &dir, AssumeYes, true).import_one(&path).unwrap();

    assert_eq!(report.outcome, ImportOutcome::Rewritten);
    let this_document = host.component(DRAWING, "ThisDocument").unwrap();
    assert_eq!(this_document.kind, ComponentKind::DocumentModule);
    assert!(this_document.raw.starts_with("VERSION 1.0 CLASS\r\n"));
    assert!(this_document.raw.contains("Attribute VB_Exposed = True\r\n"));
    assert!(this_document.raw.contains("    MsgBox \"opened\"\r\n"));
}

#[test]
fn test_failed_import_restores_previous_component() {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write(
        "drawing1/Modules/Module1.bas",
        &samples::module_source("Module1", "Sub Broken()\nEnd Sub\n"),
    );
    let mut engine = engine(&host, &dir, AssumeYes, false);

    host.fail_next_imports(1);
    let err = engine.import_one(&path).unwrap_err();

    assert!(matches!(err, Error::ImportFailure { ref name, .. } if name == "Module1"));
    assert_eq!(host.component(DRAWING, "Module1").unwrap().raw, samples::MODULE1);
}

#[rstest]
#[case::module_without_name_attribute("Helpers", ComponentKind::Module, "Sub Old()\r\nEnd Sub\r\n")]
#[case::class_without_header("Shape", ComponentKind::Class, "Attribute VB_Name = \"Shape\"\r\nPublic Width As Double\r\n")]
fn test_rollback_keeps_name_and_kind(
    #[case] name: &str,
    #[case] kind: ComponentKind,
    #[case] previous: &str,
) {
    let host = host();
    host.insert_component(DRAWING, name, kind, previous);
    let dir = TestDir::new();
    let folder = if kind == ComponentKind::Class { "Classes" } else { "Modules" };
    let path = dir.write(
        &format!("drawing1/{}/{}.{}", folder, name, kind.extension()),
        &samples::module_source(name, "Sub Broken()\nEnd Sub\n"),
    );
    let mut engine = engine(&host, &dir, AssumeYes, false);

    host.fail_next_imports(1);
    engine.import_one(&path).unwrap_err();

    let restored = host.component(DRAWING, name).unwrap();
    assert_eq!(restored.kind, kind);
    assert!(!host.component_names(DRAWING).iter().any(|n| n.starts_with("previous")));
}

#[test]
fn test_failed_rollback_is_reported() {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write(
        "drawing1/Modules/Module1.bas",
        &samples::module_source("Module1", "Sub Broken()\nEnd Sub\n"),
    );
    let mut engine = engine(&host, &dir, AssumeYes, false);

    host.reject_imports_of("Module1");
    let err = engine.import_one(&path).unwrap_err();

    assert!(err.to_string().contains("restoring the previous version also failed"));
    assert!(host.component(DRAWING, "Module1").is_none());
}

#[test]
fn test_unmappable_characters_are_reported() {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write("drawing1/Modules/Check.bas", "Sub Check()\n    MsgBox \"✓ → ✓\"\nEnd Sub\n");

    let report = engine(&host, &dir, KeepLocal, false).import_one(&path).unwrap();

    assert_eq!(
        report.warnings,
        vec![Warning::EncodingLoss {
            component: "Check".into(),
            chars: vec!['✓', '→'],
        }]
    );
    assert!(host.component(DRAWING, "Check").unwrap().raw.contains("MsgBox \"? ? ?\""));
    // The local file keeps its UTF-8 text.
    dir.assert_file_contains("drawing1/Modules/Check.bas", "✓ → ✓");
}

#[test]
fn test_legacy_flat_file_imports_into_main_document_and_becomes_utf8() {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write_bytes(
        "Legacy.bas",
        b"Attribute VB_Name = \"Legacy\"\r\n' Gr\xF6\xDFe\r\nSub A()\r\nEnd Sub\r\n",
    );

    let report = engine(&host, &dir, KeepLocal, false).import_one(&path).unwrap();

    assert_eq!(report.document, DRAWING);
    assert_eq!(report.outcome, ImportOutcome::Created);
    assert!(matches!(report.warnings[0], Warning::LegacyLayout { .. }));
    assert!(matches!(report.warnings[1], Warning::ConvertedToUtf8 { .. }));
    assert!(host.component(DRAWING, "Legacy").unwrap().raw.contains("' Größe\r\n"));
    assert_eq!(
        dir.read("Legacy.bas"),
        "Attribute VB_Name = \"Legacy\"\r\n' Größe\r\nSub A()\r\nEnd Sub\r\n"
    );
}

#[test]
fn test_mismatched_name_is_rewritten_to_file_name() {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write(
        "drawing1/Modules/Renamed.bas",
        "Attribute VB_Name = \"Original\"\nSub A()\nEnd Sub\n",
    );

    let report = engine(&host, &dir, KeepLocal, false).import_one(&path).unwrap();

    assert!(host.component(DRAWING, "Renamed").is_some());
    assert!(host.component(DRAWING, "Original").is_none());
    assert_eq!(
        report.warnings,
        vec![Warning::NameRewritten {
            component: "Renamed".into(),
            declared: "Original".into(),
        }]
    );
}

#[rstest]
#[case("drawing1/Modules/notes.txt")]
#[case("drawing1/Other/Module1.bas")]
fn test_unmapped_path_is_component_not_found(#[case] relative: &str) {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write(relative, "x");

    let err = engine(&host, &dir, KeepLocal, false).import_one(&path).unwrap_err();
    assert!(matches!(err, Error::ComponentNotFound { .. }));
}

#[test]
fn test_unknown_document_folder() {
    let host = host();
    let dir = TestDir::new();
    let path = dir.write("closed/Modules/A.bas", "Sub A()\nEnd Sub\n");

    let err = engine(&host, &dir, KeepLocal, false).import_one(&path).unwrap_err();
    assert!(matches!(err, Error::UnknownDocument { ref folder } if folder == "closed"));
}

#[test]
fn test_import_all_walks_kind_folders_then_flat_files() {
    let host = host();
    let dir = TestDir::new();
    dir.write("Flat.bas", "Sub Flat()\nEnd Sub\n");
    dir.write("drawing1/Forms/Dialog.frm", "Sub Dialog()\nEnd Sub\n");
    dir.write("drawing1/Classes/Point.cls", "Public X As Long\n");
    dir.write("drawing1/Modules/Helpers.bas", "Sub Help()\nEnd Sub\n");
    dir.write("drawing1/VisioObjects/ThisDocument.cls", "Sub Changed()\nEnd Sub\n");
    dir.write("closed/Modules/Ignored.bas", "Sub Ignored()\nEnd Sub\n");

    let summary = engine(&host, &dir, KeepLocal, false).import_all().unwrap();

    let order: Vec<&str> = summary.imports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(order, vec!["Helpers", "Point", "Dialog", "ThisDocument", "Flat"]);
    assert_eq!(summary.count(ImportOutcome::Created), 4);
    assert_eq!(summary.count(ImportOutcome::Refused), 1);
    assert!(summary.is_success());
    assert!(host.component(DRAWING, "Ignored").is_none());
}

#[test]
fn test_import_all_isolates_per_file_failures() {
    let host = host();
    let dir = TestDir::new();
    dir.write("drawing1/Modules/Bad.bas", "Sub Bad()\nEnd Sub\n");
    dir.write("drawing1/Modules/Good.bas", "Sub Good()\nEnd Sub\n");
    host.reject_imports_of("Bad");

    let summary = engine(&host, &dir, KeepLocal, false).import_all().unwrap();

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.count(ImportOutcome::Created), 1);
    assert_eq!(
        host.component_names(DRAWING),
        vec!["Module1", "ThisDocument", "Good"]
    );
}
