//! The embedded editor.
//!
//! Saving is split in two so a driver can keep reading messages while the
//! render request is in flight: `receive` snapshots the document into a
//! [`FetchJob`], the job runs against the render service on its own, and
//! `complete` releases the fetch latch. A `fetchState` that arrives while
//! a job is running is coalesced into it.

use mailcraft_document::NodeTree;
use mailcraft_editor::{Document, EditSession};
use mailcraft_render::{FetchLatch, RenderClient};
use mailcraft_state::{decode_state, encode_state, EditorState, STATE_VERSION};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{origin_allowed, EmbedError, Inbound, Outbound, SavedState};

/// What the driver has to do with a message
#[derive(Debug)]
pub enum HostAction {
    Reply(Outbound),
    Fetch(FetchJob),
    Ignore,
}

/// Snapshot of the document taken for one save
#[derive(Debug, Clone)]
pub struct FetchJob {
    tree: NodeTree,
    state: String,
    document_version: u64,
}

impl FetchJob {
    /// Encoded `{json, version}` token of the snapshot
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn document_version(&self) -> u64 {
        self.document_version
    }

    /// Render the snapshot. A render failure is logged and leaves `html`
    /// empty; the state token is always delivered.
    pub async fn run(self, renderer: &RenderClient) -> SavedState {
        let html = match renderer.render_html(&self.tree).await {
            Ok(html) => Some(html),
            Err(e) => {
                warn!(error = %e, "Render failed, saving state without html");
                None
            }
        };
        SavedState {
            html,
            state: self.state,
        }
    }
}

pub struct EmbedHost {
    parent_url: String,
    session: EditSession,
    renderer: RenderClient,
    latch: FetchLatch,
}

impl EmbedHost {
    pub fn new(parent_url: impl Into<String>, renderer: RenderClient) -> Self {
        Self::with_session(
            parent_url,
            EditSession::new("embed", Document::new()),
            renderer,
        )
    }

    pub fn with_session(
        parent_url: impl Into<String>,
        session: EditSession,
        renderer: RenderClient,
    ) -> Self {
        Self {
            parent_url: parent_url.into(),
            session,
            renderer,
            latch: FetchLatch::new(),
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }

    pub fn renderer(&self) -> &RenderClient {
        &self.renderer
    }

    pub fn is_fetching(&self) -> bool {
        self.latch.is_fetching()
    }

    /// Dispatch one raw message from `origin`
    pub fn receive(&mut self, origin: &str, data: &Value) -> Result<HostAction, EmbedError> {
        if !origin_allowed(&self.parent_url, origin) {
            debug!(origin, "Dropping message from foreign origin");
            return Ok(HostAction::Ignore);
        }
        let Some(message) = Inbound::parse(data) else {
            return Ok(HostAction::Ignore);
        };

        match message {
            Inbound::LoadEditor(token) => {
                self.load(token.as_deref());
                Ok(HostAction::Reply(Outbound::EditorLoaded(true)))
            }
            Inbound::FetchState => {
                if !self.latch.begin() {
                    return Ok(HostAction::Ignore);
                }
                match self.snapshot() {
                    Ok(job) => Ok(HostAction::Fetch(job)),
                    Err(e) => {
                        self.latch.finish(false);
                        Err(e)
                    }
                }
            }
        }
    }

    /// Release the latch after a job finished; the document counts as
    /// saved unless it was edited in the meantime
    pub fn complete(&mut self, document_version: Option<u64>) {
        self.latch.finish(false);
        if document_version == Some(self.session.document.version) {
            self.session.document.mark_saved();
        }
    }

    /// `receive`, running any fetch inline
    pub async fn handle(
        &mut self,
        origin: &str,
        data: &Value,
    ) -> Result<Option<Outbound>, EmbedError> {
        match self.receive(origin, data)? {
            HostAction::Reply(reply) => Ok(Some(reply)),
            HostAction::Ignore => Ok(None),
            HostAction::Fetch(job) => {
                let version = job.document_version();
                let saved = job.run(&self.renderer).await;
                self.complete(Some(version));
                Ok(Some(Outbound::SavedState(saved)))
            }
        }
    }

    fn load(&mut self, token: Option<&str>) {
        let loaded = token.and_then(decode_state).and_then(|state| match state.tree() {
            Ok(tree) => Some((tree, state.version)),
            Err(e) => {
                warn!(error = %e, "Decoded state holds no valid document");
                None
            }
        });

        let (tree, version) = loaded.unwrap_or_else(|| {
            if token.is_some() {
                warn!("Could not parse editor state, starting from an empty document");
            }
            (NodeTree::empty_document(), STATE_VERSION.to_string())
        });

        info!(version = %version, nodes = tree.len(), "Editor loaded");
        self.session.load(tree);
        self.session.document.state_version = version;
        self.session.document.mark_saved();
    }

    fn snapshot(&self) -> Result<FetchJob, EmbedError> {
        let document = &self.session.document;
        let state = EditorState::from_tree(document.tree(), document.state_version.clone())?;
        Ok(FetchJob {
            tree: document.tree().clone(),
            state: encode_state(&state)?,
            document_version: document.version,
        })
    }
}
