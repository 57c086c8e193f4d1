//! LSP server implementation

use std::collections::HashMap;
use std::sync::Arc;

use quill_complete::{
    CompletionRequest, PluginGates, StaticDatasets, Suggestion, TextDocument, Trigger, resolve,
};
use quill_schema::Schema;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use crate::config::ServerConfig;

/// The Quill language server
pub struct QuillLanguageServer {
    /// LSP client for sending notifications
    client: Client,
    /// Open documents, full text per URI
    documents: Arc<RwLock<HashMap<Url, String>>>,
    schema: Arc<Schema>,
    datasets: Arc<StaticDatasets>,
    gates: Arc<dyn PluginGates>,
}

impl QuillLanguageServer {
    pub fn new(
        client: Client,
        schema: Arc<Schema>,
        datasets: Arc<StaticDatasets>,
        gates: Arc<dyn PluginGates>,
    ) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
            schema,
            datasets,
            gates,
        }
    }
}

/// Map the LSP completion context onto the engine's trigger.
fn trigger_of(context: Option<CompletionContext>) -> Trigger {
    let Some(context) = context else {
        return Trigger::Invoked;
    };
    match context.trigger_kind {
        CompletionTriggerKind::TRIGGER_CHARACTER => context
            .trigger_character
            .and_then(|s| s.chars().next())
            .map(Trigger::Character)
            .unwrap_or(Trigger::Invoked),
        CompletionTriggerKind::TRIGGER_FOR_INCOMPLETE_COMPLETIONS => Trigger::Automatic,
        _ => Trigger::Invoked,
    }
}

fn to_completion_item(suggestion: Suggestion) -> CompletionItem {
    // Chained suggestions reopen the completion popup on accept.
    let command = suggestion.retrigger.then(|| Command {
        title: "Trigger Suggest".to_string(),
        command: "editor.action.triggerSuggest".to_string(),
        arguments: None,
    });
    CompletionItem {
        label: suggestion.label,
        kind: Some(CompletionItemKind::FIELD),
        detail: suggestion.detail,
        insert_text: Some(suggestion.insert),
        insert_text_format: Some(InsertTextFormat::SNIPPET),
        sort_text: suggestion.sort_text,
        command,
        ..Default::default()
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for QuillLanguageServer {
    async fn initialize(&self, _params: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                // Full document sync - we get the whole document on each change
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                // Auto-completion
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![" ".into(), ":".into(), "-".into()]),
                    resolve_provider: Some(false),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "quill-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Quill language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let mut docs = self.documents.write().await;
        docs.insert(params.text_document.uri, params.text_document.text);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // Full sync: the last change carries the whole document.
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };
        let mut docs = self.documents.write().await;
        docs.insert(params.text_document.uri, change.text);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let mut docs = self.documents.write().await;
        docs.remove(&params.text_document.uri);
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let docs = self.documents.read().await;
        let Some(text) = docs.get(&uri) else {
            return Ok(None);
        };

        let document = TextDocument::new(uri.as_str(), text);
        let request = CompletionRequest {
            document: &document,
            position: quill_complete::Position::new(position.line, position.character),
            trigger: trigger_of(params.context),
        };

        let suggestions = resolve(
            &request,
            &self.schema,
            self.datasets.as_ref(),
            self.gates.as_ref(),
        )
        .await;
        if suggestions.is_empty() {
            return Ok(None);
        }

        let items: Vec<CompletionItem> =
            suggestions.into_iter().map(to_completion_item).collect();
        Ok(Some(CompletionResponse::Array(items)))
    }
}

/// Run the LSP server on stdin/stdout
pub async fn run(config: ServerConfig) -> eyre::Result<()> {
    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let schema = Arc::new(config.schema);
    let datasets = Arc::new(config.datasets);
    let gates = config.gates;

    let (service, socket) = LspService::new(move |client| {
        QuillLanguageServer::new(client, schema.clone(), datasets.clone(), gates.clone())
    });
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
