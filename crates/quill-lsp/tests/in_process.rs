//! In-process LSP integration tests.
//!
//! These tests use tower-lsp's in-process testing capabilities to verify
//! the server behavior without spawning subprocesses or parsing
//! protocols.

use std::sync::Arc;

use futures::StreamExt;
use serde_json::{Value, json};
use tower::Service;
use tower_lsp::LspService;
use tower_lsp::jsonrpc::{Request, Response};

use quill_complete::{AllPlugins, PluginGates};
use quill_lsp::QuillLanguageServer;
use quill_test_schema::{sample_datasets, sample_schema};

/// Helper to create a JSON-RPC request
fn make_request(id: i64, method: &str, params: Value) -> Request {
    let req = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    });
    serde_json::from_value(req).expect("valid request")
}

/// Helper to create a JSON-RPC notification (no id)
fn make_notification(method: &str, params: Value) -> Request {
    let req = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params
    });
    serde_json::from_value(req).expect("valid notification")
}

fn new_service() -> LspService<QuillLanguageServer> {
    let schema = Arc::new(sample_schema());
    let datasets = Arc::new(sample_datasets());
    let gates: Arc<dyn PluginGates> = Arc::new(AllPlugins);
    let (service, socket) = LspService::new(move |client| {
        QuillLanguageServer::new(client, schema.clone(), datasets.clone(), gates.clone())
    });

    // Drain server-to-client notifications so sends never block.
    let (mut notifications, _responses) = socket.split();
    tokio::spawn(async move { while notifications.next().await.is_some() {} });

    service
}

async fn initialized_service() -> LspService<QuillLanguageServer> {
    let mut service = new_service();
    let init = make_request(
        1,
        "initialize",
        json!({
            "processId": null,
            "capabilities": {},
            "rootUri": null
        }),
    );
    let _: Option<Response> = service.call(init).await.unwrap();
    let _ = service
        .call(make_notification("initialized", json!({})))
        .await;
    service
}

async fn open(service: &mut LspService<QuillLanguageServer>, uri: &str, text: &str) {
    let did_open = make_notification(
        "textDocument/didOpen",
        json!({
            "textDocument": {
                "uri": uri,
                "languageId": "quill",
                "version": 1,
                "text": text
            }
        }),
    );
    let _ = service.call(did_open).await;
}

async fn completion(
    service: &mut LspService<QuillLanguageServer>,
    uri: &str,
    line: u32,
    character: u32,
) -> Vec<Value> {
    let request = make_request(
        2,
        "textDocument/completion",
        json!({
            "textDocument": { "uri": uri },
            "position": { "line": line, "character": character },
            "context": { "triggerKind": 1 }
        }),
    );
    let response = service.call(request).await.unwrap().expect("a response");
    let (_, result) = response.into_parts();
    let value = result.expect("completion result");
    value.as_array().cloned().unwrap_or_default()
}

fn labels(items: &[Value]) -> Vec<&str> {
    items
        .iter()
        .map(|item| item.get("label").and_then(Value::as_str).unwrap_or(""))
        .collect()
}

#[tokio::test]
async fn initialize_advertises_completion_triggers() {
    let mut service = new_service();
    let init = make_request(
        1,
        "initialize",
        json!({
            "processId": null,
            "capabilities": {},
            "rootUri": null
        }),
    );
    let response: Option<Response> = service.call(init).await.unwrap();
    let (_, result) = response.expect("a response").into_parts();
    let value = result.expect("initialize result");

    let triggers = value
        .pointer("/capabilities/completionProvider/triggerCharacters")
        .and_then(Value::as_array)
        .expect("trigger characters");
    let triggers: Vec<&str> = triggers.iter().filter_map(Value::as_str).collect();
    assert_eq!(triggers, [" ", ":", "-"]);
}

#[tokio::test]
async fn boolean_values_complete_after_the_colon() {
    let mut service = initialized_service().await;
    let uri = "file:///rules.quill";
    open(&mut service, uri, "evening:\n  Enabled: ").await;

    let items = completion(&mut service, uri, 1, 11).await;
    assert_eq!(labels(&items), ["true", "false"]);
    assert_eq!(
        items[0].get("insertText").and_then(Value::as_str),
        Some("true")
    );
    // Snippet format
    assert_eq!(
        items[0].get("insertTextFormat").and_then(Value::as_u64),
        Some(2)
    );
}

#[tokio::test]
async fn blank_line_offers_the_rule_keys() {
    let mut service = initialized_service().await;
    let uri = "file:///rules.quill";
    open(&mut service, uri, "evening:\n  ").await;

    let items = completion(&mut service, uri, 1, 2).await;
    let got = labels(&items);
    assert!(got.contains(&"Enabled"), "got {got:?}");
    assert!(got.contains(&"Actions"), "got {got:?}");
    assert_eq!(
        items[0].get("sortText").and_then(Value::as_str),
        Some("000")
    );
}

#[tokio::test]
async fn entry_list_slots_chain_via_retrigger() {
    let mut service = initialized_service().await;
    let uri = "file:///rules.quill";
    open(&mut service, uri, "evening:\n  Actions:\n  - ").await;

    let items = completion(&mut service, uri, 2, 4).await;
    assert_eq!(labels(&items), ["turn_on", "turn_off", "toggle"]);
    assert_eq!(
        items[0].get("insertText").and_then(Value::as_str),
        Some("turn_on ")
    );
    assert_eq!(
        items[0].pointer("/command/command").and_then(Value::as_str),
        Some("editor.action.triggerSuggest")
    );
}

#[tokio::test]
async fn unopened_documents_get_no_completions() {
    let mut service = initialized_service().await;
    let items = completion(&mut service, "file:///unknown.quill", 0, 0).await;
    assert!(items.is_empty());
}
