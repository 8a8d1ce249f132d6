//! Parent page conversations against a local render stand-in

use std::net::SocketAddr;
use std::time::Duration;

use axum::routing::post;
use axum::Router;
use mailcraft_document::{ComponentKind, MAIN_NODE};
use mailcraft_editor::{Document, EditSession};
use mailcraft_embed::{pump, EmbedHost, InboundEvent, Outbound};
use mailcraft_render::{RenderClient, RenderConfig};
use mailcraft_state::{decode_state, encode, encode_state, EditorState};
use serde_json::{json, Value};
use tokio::sync::mpsc;

const PARENT: &str = "https://crm.example.com/templates/7/edit";
const ORIGIN: &str = "https://crm.example.com";

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn renderer(delay: Duration) -> RenderClient {
    let app = Router::new().route(
        "/html",
        post(move || async move {
            tokio::time::sleep(delay).await;
            "<table><tr><td>Rendered</td></tr></table>"
        }),
    );
    let addr = spawn(app).await;
    RenderClient::new(RenderConfig::new(format!("http://{}/html", addr)))
}

/// A document with one text node, encoded the way the parent stores it
fn stored_token() -> (String, String) {
    let mut session = EditSession::new("author", Document::new());
    session
        .insert_child(ComponentKind::Text, MAIN_NODE, 0)
        .unwrap();
    let json = session.tree().to_json().unwrap();
    let token = encode_state(&EditorState::new(json.clone(), "1.0.0")).unwrap();
    (json, token)
}

#[tokio::test]
async fn test_load_then_save_round_trips_state() {
    let (json, token) = stored_token();
    let mut host = EmbedHost::new(PARENT, renderer(Duration::ZERO).await);

    let loaded = host
        .handle(ORIGIN, &json!({"message": "loadEditor", "value": token}))
        .await
        .unwrap();
    assert_eq!(loaded, Some(Outbound::EditorLoaded(true)));
    assert_eq!(host.session().tree().count_kind(ComponentKind::Text), 1);

    let saved = host
        .handle(ORIGIN, &json!({"message": "fetchState"}))
        .await
        .unwrap();
    let Some(Outbound::SavedState(saved)) = saved else {
        panic!("expected saved state, got {:?}", saved);
    };
    assert_eq!(
        saved.html.as_deref(),
        Some("<table><tr><td>Rendered</td></tr></table>")
    );

    let state = decode_state(&saved.state).unwrap();
    assert_eq!(state.version, "1.0.0");
    let reloaded: Value = serde_json::from_str(&state.json).unwrap();
    let original: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded, original);
}

#[tokio::test]
async fn test_token_without_version_keeps_document() {
    let (json, _) = stored_token();
    let token = encode(&json!({ "json": json }).to_string());
    let mut host = EmbedHost::new(PARENT, renderer(Duration::ZERO).await);

    host.handle(ORIGIN, &json!({"message": "loadEditor", "value": token}))
        .await
        .unwrap();
    assert_eq!(host.session().tree().count_kind(ComponentKind::Text), 1);
    assert_eq!(host.session().document.state_version, "1.0.0");
}

#[tokio::test]
async fn test_edits_after_load_are_saved() {
    let (_, token) = stored_token();
    let mut host = EmbedHost::new(PARENT, renderer(Duration::ZERO).await);
    host.handle(ORIGIN, &json!({"message": "loadEditor", "value": token}))
        .await
        .unwrap();

    host.session_mut()
        .insert_child(ComponentKind::Button, MAIN_NODE, 1)
        .unwrap();
    assert!(host.session().document.is_dirty());

    let Some(Outbound::SavedState(saved)) = host
        .handle(ORIGIN, &json!({"message": "fetchState"}))
        .await
        .unwrap()
    else {
        panic!("expected saved state");
    };
    let tree = decode_state(&saved.state).unwrap().tree().unwrap();
    assert_eq!(tree.count_kind(ComponentKind::Button), 1);
    assert!(!host.session().document.is_dirty());
}

#[tokio::test]
async fn test_pump_ignores_foreign_origins_and_coalesces_saves() {
    let (_, token) = stored_token();
    let host = EmbedHost::new(PARENT, renderer(Duration::from_millis(200)).await);

    let (in_tx, in_rx) = mpsc::channel(16);
    let (out_tx, mut out_rx) = mpsc::channel(16);
    let driver = tokio::spawn(pump(host, in_rx, out_tx));

    in_tx
        .send(InboundEvent::new(
            "https://attacker.example",
            json!({"message": "loadEditor", "value": "x"}),
        ))
        .await
        .unwrap();
    in_tx
        .send(InboundEvent::new(
            ORIGIN,
            json!({"message": "loadEditor", "value": token}),
        ))
        .await
        .unwrap();
    in_tx
        .send(InboundEvent::new(ORIGIN, json!({"message": "fetchState"})))
        .await
        .unwrap();
    in_tx
        .send(InboundEvent::new(ORIGIN, json!({"message": "fetchState"})))
        .await
        .unwrap();
    drop(in_tx);

    let mut replies = Vec::new();
    while let Some(reply) = out_rx.recv().await {
        replies.push(reply);
    }
    let host = driver.await.unwrap().unwrap();

    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0], json!({"message": "editorLoaded", "value": true}));
    assert_eq!(replies[1]["message"], "savedState");
    assert_eq!(
        replies[1]["value"]["html"],
        "<table><tr><td>Rendered</td></tr></table>"
    );
    assert_eq!(host.session().tree().count_kind(ComponentKind::Text), 1);
    assert!(!host.is_fetching());
}
