//! Export, re-import and decode against the real file system

use mailcraft_common::RealFileSystem;
use mailcraft_document::{ComponentKind, IdGenerator, NodeSubtree, NodeTree, MAIN_NODE};
use mailcraft_state::{
    decode_state, encode_state, validate_editor_state, EditorState, ExportImportService,
    ImportedState, StateFormat, STATE_VERSION,
};

fn sample_tree() -> NodeTree {
    let mut tree = NodeTree::empty_document();
    let mut ids = IdGenerator::from_seed("t");
    let text = NodeSubtree::fresh(ComponentKind::Text, false, &tree, &mut ids);
    tree.insert_subtree(text, MAIN_NODE, 0).unwrap();
    tree
}

#[test]
fn test_export_then_import_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let service = ExportImportService::new(RealFileSystem, dir.path());

    let tree = sample_tree();
    let state = EditorState::from_tree(&tree, STATE_VERSION).unwrap();
    let path = service.export_as_json(Some(&state), "roundtrip").unwrap();
    assert!(path.ends_with("roundtrip.json"));

    let imported = service.import_from_json(Some(&path)).unwrap();
    assert_eq!(imported.filename, "roundtrip.json");

    let validation = validate_editor_state(&imported.data);
    assert!(validation.valid);
    assert_eq!(validation.format, Some(StateFormat::Export));

    let restored = ImportedState::classify(imported.data)
        .unwrap()
        .into_editor_state(STATE_VERSION)
        .unwrap();
    assert_eq!(restored.version, STATE_VERSION);
    assert_eq!(restored.tree().unwrap(), tree);
}

#[test]
fn test_encoded_token_in_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let state = EditorState::from_tree(&sample_tree(), STATE_VERSION).unwrap();
    let token = encode_state(&state).unwrap();

    let path = dir.path().join("token.json");
    std::fs::write(&path, serde_json::to_string(&token).unwrap()).unwrap();

    let service = ExportImportService::new(RealFileSystem, dir.path());
    let imported = service.import_from_json(Some(&path)).unwrap();
    assert!(validate_editor_state(&imported.data).is_encoded);

    let restored = ImportedState::classify(imported.data)
        .unwrap()
        .into_editor_state(STATE_VERSION)
        .unwrap();
    assert_eq!(restored, state);
    assert_eq!(decode_state(&token), Some(state));
}

#[test]
fn test_html_exports_land_in_out_dir() {
    let dir = tempfile::tempdir().unwrap();
    let service = ExportImportService::new(RealFileSystem, dir.path().join("exports"));

    let html = service.export_as_html("<p>Hello</p>", "welcome").unwrap();
    let shell = service
        .export_as_email_template("<p>Hello</p>", "welcome")
        .unwrap();

    assert_eq!(std::fs::read_to_string(html).unwrap(), "<p>Hello</p>");
    let wrapped = std::fs::read_to_string(shell).unwrap();
    assert!(wrapped.contains("<title>Email Template</title>"));
    assert!(wrapped.contains("    <p>Hello</p>\n</body>"));
}
