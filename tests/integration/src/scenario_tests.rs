//! Sync scenarios across the whole stack: a host persisted as a project
//! file, the directory layout, framing, and the engine.

use pretty_assertions::assert_eq;
use vbsync_core::{
    AssumeYes, ConflictResolver, DocumentOracle, DocumentRole, HostComponent, HostDocument,
    HostProject, ImportOutcome, KeepLocal, OrphanDecision, PassStatus, ProjectFileHost,
    ScriptedResolver, SyncEngine,
};
use vbsync_fs::{ComponentKind, DirectoryMapper};
use vbsync_test_utils::{TestDir, samples};

const DRAWING: &str = "Drawing1.vsdm";

fn component(name: &str, kind: ComponentKind, raw: &str) -> HostComponent {
    HostComponent {
        name: name.into(),
        kind,
        raw: raw.into(),
    }
}

/// A project file at `<dir>/drawing.json`; the sync tree lives in `<dir>/src`.
fn setup(dir: &TestDir, components: Vec<HostComponent>) {
    let project = HostProject {
        trusted: true,
        documents: vec![HostDocument {
            name: DRAWING.into(),
            role: DocumentRole::Main,
            components,
        }],
    };
    ProjectFileHost::create(dir.path("drawing.json"), &project).unwrap();
}

fn engine(dir: &TestDir, resolver: impl ConflictResolver + 'static) -> SyncEngine {
    let mut engine = SyncEngine::new(
        ProjectFileHost::open(dir.path("drawing.json")),
        DirectoryMapper::new(dir.path("src")),
        resolver,
    );
    engine.connect().unwrap();
    engine
}

/// Host text of a component, read back from the project file.
fn host_raw(dir: &TestDir, name: &str) -> Option<String> {
    let mut host = ProjectFileHost::open(dir.path("drawing.json"));
    host.connect().unwrap();
    let document = host.main_document().unwrap();
    let store = host.component_store(&document).unwrap();
    store.read_body(name).ok()
}

#[test]
fn test_import_creates_component_with_name_attribute() {
    let dir = TestDir::new();
    setup(&dir, vec![]);
    let path = dir.write("src/drawing1/Modules/Foo.bas", "Public Sub Foo()\nEnd Sub\n");

    let report = engine(&dir, KeepLocal).import_one(&path).unwrap();

    assert_eq!(report.outcome, ImportOutcome::Created);
    let raw = host_raw(&dir, "Foo").unwrap();
    assert!(raw.starts_with("Attribute VB_Name = \"Foo\""), "got: {}", raw);
}

#[test]
fn test_unchanged_host_writes_nothing_and_keeps_fingerprint() {
    let dir = TestDir::new();
    setup(
        &dir,
        vec![component(
            "Bar",
            ComponentKind::Module,
            &samples::module_export("Bar", "Sub Bar()\nEnd Sub"),
        )],
    );
    let mut engine = engine(&dir, KeepLocal);

    engine.export_all().unwrap();
    let first = engine.state().last_hash(DRAWING).unwrap().to_string();
    let report = engine.export_all().unwrap();

    let document = report.document(DRAWING).unwrap();
    assert_eq!(document.status, PassStatus::NoChange);
    assert!(document.written.is_empty());
    assert_eq!(engine.state().last_hash(DRAWING), Some(first.as_str()));
}

#[test]
fn test_deleted_local_file_is_recreated() {
    let dir = TestDir::new();
    setup(
        &dir,
        vec![component("Module1", ComponentKind::Module, samples::MODULE1)],
    );
    engine(&dir, KeepLocal).export_all().unwrap();
    dir.remove("src/drawing1/Modules/Module1.bas");

    let report = engine(&dir, KeepLocal).export_all().unwrap();

    assert_eq!(report.document(DRAWING).unwrap().written, vec!["Module1"]);
    dir.assert_file_contains("src/drawing1/Modules/Module1.bas", "MsgBox \"Hello\"");
}

#[test]
fn test_kept_orphan_stays_local_only() {
    let dir = TestDir::new();
    setup(
        &dir,
        vec![
            component("Module1", ComponentKind::Module, samples::MODULE1),
            component("Shape", ComponentKind::Class, samples::SHAPE_CLASS),
        ],
    );
    engine(&dir, KeepLocal).export_all().unwrap();

    // The component disappears from the host.
    setup(
        &dir,
        vec![component("Module1", ComponentKind::Module, samples::MODULE1)],
    );
    let report = engine(&dir, ScriptedResolver::new().orphan(OrphanDecision::Keep))
        .export_all()
        .unwrap();

    assert_eq!(
        report.document(DRAWING).unwrap().orphans,
        vec![("Shape".to_string(), OrphanDecision::Keep)]
    );
    dir.assert_file_exists("src/drawing1/Classes/Shape.cls");
    assert!(host_raw(&dir, "Shape").is_none());
}

#[test]
fn test_conflicting_edits_wait_for_the_resolver() {
    let dir = TestDir::new();
    setup(
        &dir,
        vec![component("Module1", ComponentKind::Module, samples::MODULE1)],
    );
    engine(&dir, KeepLocal).export_all().unwrap();
    dir.write(
        "src/drawing1/Modules/Module1.bas",
        &samples::module_source("Module1", "' local edit\n"),
    );
    setup(
        &dir,
        vec![component(
            "Module1",
            ComponentKind::Module,
            &samples::module_export("Module1", "' host edit"),
        )],
    );

    let report = engine(&dir, KeepLocal).export_all().unwrap();
    assert_eq!(report.document(DRAWING).unwrap().skipped, vec!["Module1"]);
    dir.assert_file_contains("src/drawing1/Modules/Module1.bas", "' local edit");

    engine(&dir, AssumeYes).export_all().unwrap();
    dir.assert_file_contains("src/drawing1/Modules/Module1.bas", "' host edit");
}

#[test]
fn test_document_module_needs_force_end_to_end() {
    let dir = TestDir::new();
    setup(
        &dir,
        vec![component(
            "ThisDocument",
            ComponentKind::DocumentModule,
            samples::THIS_DOCUMENT,
        )],
    );
    engine(&dir, KeepLocal).export_all().unwrap();
    let path = dir.write(
        "src/drawing1/VisioObjects/ThisDocument.cls",
        "Attribute VB_Name = \"ThisDocument\"\nSub Changed()\nEnd Sub\n",
    );

    let refused = engine(&dir, AssumeYes).import_one(&path).unwrap();
    assert_eq!(refused.outcome, ImportOutcome::Refused);
    assert_eq!(host_raw(&dir, "ThisDocument").unwrap(), samples::THIS_DOCUMENT);

    let mut forced = engine(&dir, AssumeYes).with_options(vbsync_core::SyncOptions { force: true });
    assert_eq!(forced.import_one(&path).unwrap().outcome, ImportOutcome::Rewritten);
    let raw = host_raw(&dir, "ThisDocument").unwrap();
    assert!(raw.starts_with("VERSION 1.0 CLASS\r\n"));
    assert!(raw.contains("Sub Changed()\r\n"));
}

#[test]
fn test_documents_with_colliding_names_get_distinct_folders() {
    let dir = TestDir::new();
    let project = HostProject {
        trusted: true,
        documents: vec![
            HostDocument {
                name: "Plan.vsdm".into(),
                role: DocumentRole::Main,
                components: vec![component("A", ComponentKind::Module, &samples::module_export("A", "' main"))],
            },
            HostDocument {
                name: "plan.vssm".into(),
                role: DocumentRole::Auxiliary,
                components: vec![component("A", ComponentKind::Module, &samples::module_export("A", "' stencil"))],
            },
        ],
    };
    ProjectFileHost::create(dir.path("drawing.json"), &project).unwrap();

    engine(&dir, KeepLocal).export_all().unwrap();

    dir.assert_file_contains("src/plan/Modules/A.bas", "' main");
    dir.assert_file_contains("src/plan_2/Modules/A.bas", "' stencil");
}
