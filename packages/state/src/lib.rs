//! # Mailcraft State
//!
//! Everything that turns a document into bytes and back:
//!
//! ```text
//! NodeTree ──to_json──► EditorState {json, version}
//!                            │
//!             ┌──────────────┼─────────────────┐
//!             ▼              ▼                 ▼
//!        codec::encode   export (.json)   import + validate
//!        (opaque token)  (.html shells)   (ImportedState)
//! ```
//!
//! Settings persistence lives here too since it shares the storage seams.

mod codec;
mod editor_state;
mod error;
mod export;
mod import;
mod settings;

pub use codec::{decode, decode_state, encode, encode_state};
pub use editor_state::{EditorState, STATE_VERSION};
pub use error::{StateError, TransferError};
pub use export::{
    email_template, generate_filename, generate_filename_at, ExportImportService, ImportedFile,
    DEFAULT_FILENAME,
};
pub use import::{validate_editor_state, ImportedState, StateFormat, Validation};
pub use settings::{
    restore_settings, store_settings, Direction, FileStore, KeyValueStore, MemoryStore, Settings,
    SettingsStore, SettingsUpdate, Theme, SETTINGS_KEY,
};
