pub mod export;
pub mod init;
pub mod render;
pub mod settings;
pub mod state;

pub use export::{export, ExportArgs};
pub use init::{init, InitArgs};
pub use render::{preview, render, PreviewArgs, RenderArgs};
pub use settings::{settings, SettingsArgs};
pub use state::{decode, encode, import, DecodeArgs, EncodeArgs, ImportArgs};

use anyhow::{anyhow, Result};
use mailcraft_common::RealFileSystem;
use mailcraft_state::{decode_state, EditorState, ExportImportService, ImportedState};
use std::path::PathBuf;

use crate::config::Config;

/// Resolve `input` to an editor state: a `.json` file (any importable
/// shape) when the path exists, otherwise an encoded token
pub(crate) fn load_state(input: &str, config: &Config, cwd: &str) -> Result<EditorState> {
    let path = PathBuf::from(cwd).join(input);
    let state = if path.exists() {
        let service = ExportImportService::new(RealFileSystem, config.get_out_dir(cwd));
        let imported = service.import_from_json(Some(&path))?;
        ImportedState::classify(imported.data)?.into_editor_state(&config.state_version)?
    } else {
        decode_state(input).ok_or_else(|| anyhow!("Not a file or a state token: {}", input))?
    };

    // reject documents the editor could not open
    state.tree()?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_document::NodeTree;
    use mailcraft_state::encode_state;

    fn cwd(dir: &tempfile::TempDir) -> String {
        dir.path().display().to_string()
    }

    #[test]
    fn test_load_state_from_export_file() {
        let dir = tempfile::tempdir().unwrap();
        let tree = NodeTree::empty_document();
        let export = serde_json::json!({ "json": tree.to_value().unwrap(), "version": "1.0.0" });
        std::fs::write(dir.path().join("doc.json"), export.to_string()).unwrap();

        let state = load_state("doc.json", &Config::default(), &cwd(&dir)).unwrap();
        assert_eq!(state.version, "1.0.0");
        assert_eq!(state.tree().unwrap(), tree);
    }

    #[test]
    fn test_load_state_from_token() {
        let dir = tempfile::tempdir().unwrap();
        let state = EditorState::from_tree(&NodeTree::empty_document(), "1.0.0").unwrap();
        let token = encode_state(&state).unwrap();

        assert_eq!(load_state(&token, &Config::default(), &cwd(&dir)).unwrap(), state);
    }

    #[test]
    fn test_raw_nodes_take_configured_version() {
        let dir = tempfile::tempdir().unwrap();
        let tree = NodeTree::empty_document();
        std::fs::write(dir.path().join("nodes.json"), tree.to_json().unwrap()).unwrap();

        let config = Config {
            state_version: "0.9.0".to_string(),
            ..Config::default()
        };
        let state = load_state("nodes.json", &config, &cwd(&dir)).unwrap();
        assert_eq!(state.version, "0.9.0");
    }

    #[test]
    fn test_garbage_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_state("%%%", &Config::default(), &cwd(&dir)).is_err());
    }
}
