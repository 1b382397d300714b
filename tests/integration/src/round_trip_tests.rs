//! Exported files imported back without edits leave the host untouched.

use proptest::prelude::*;
use vbsync_content::{canonicalize, name_attribute, restore, strip};
use vbsync_core::{DocumentRole, ImportOutcome, KeepLocal, MemoryHost, SyncEngine};
use vbsync_fs::{ComponentKind, DirectoryMapper};
use vbsync_test_utils::{TestDir, samples};

const DRAWING: &str = "Drawing1.vsdm";

#[test]
fn test_export_then_import_is_unchanged_for_every_kind() {
    let host = MemoryHost::new().with_document(DRAWING, DocumentRole::Main);
    host.insert_component(DRAWING, "Module1", ComponentKind::Module, samples::MODULE1);
    host.insert_component(DRAWING, "Shape", ComponentKind::Class, samples::SHAPE_CLASS);
    host.insert_component(DRAWING, "UserForm1", ComponentKind::Form, samples::USER_FORM);
    let dir = TestDir::new();

    let mut engine = SyncEngine::new(host.clone(), DirectoryMapper::new(dir.root()), KeepLocal);
    engine.connect().unwrap();
    engine.export_all().unwrap();
    let before = host.snapshot();

    let summary = engine.import_all().unwrap();

    assert!(summary.is_success());
    assert_eq!(summary.count(ImportOutcome::Unchanged), 3);
    assert_eq!(host.snapshot(), before);
}

fn code_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("' comment".to_string()),
        "[A-Za-z][A-Za-z0-9_ ()=\"]{0,30}",
    ]
}

proptest! {
    #[test]
    fn restore_then_strip_gives_the_canonical_body(lines in proptest::collection::vec(code_line(), 0..12)) {
        // Bodies that start with framing keywords are not plain code.
        prop_assume!(lines.iter().all(|l| {
            let upper = l.trim_start().to_ascii_uppercase();
            !upper.starts_with("ATTRIBUTE") && !upper.starts_with("VERSION") && !upper.starts_with("BEGIN") && !upper.starts_with("END")
        }));
        let body = lines.join("\r\n");
        let canonical = canonicalize(&body);
        let expected = if canonical.is_empty() {
            format!("{}\nPrivate Sub Placeholder()\nEnd Sub\n", name_attribute("Module1"))
        } else {
            format!("{}\n{}", name_attribute("Module1"), canonical)
        };

        prop_assert_eq!(strip(&restore(&body, "Module1")), expected);
    }
}
