use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use htmx_pal::buffer::apply_change;
use htmx_pal::config::Settings;
use htmx_pal::markdown::to_blocks;
use htmx_pal::registry::AttributeRegistry;
use htmx_pal::{completion, hover};
use once_cell::sync::OnceCell;
use ropey::Rope;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HTMX_PAL_LOG";

#[derive(Parser, Debug)]
#[command(name = "htmx-pal", version, about = "Language server for htmx attributes")]
struct Cli {
    /// Root of the htmx documentation corpus
    #[arg(long, global = true, default_value = "docs")]
    docs_root: String,

    /// Log filter, e.g. `info` or `htmx_pal=debug`; falls back to $HTMX_PAL_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the language server over stdio (the default)
    Serve,
    /// Print the rendered blocks of a Markdown document as JSON
    Render { file: PathBuf },
    /// List the documented attributes and their keyword values
    Keywords,
}

/// State fixed at `initialize`.
struct Session {
    settings: Settings,
    registry: Option<Arc<AttributeRegistry>>,
}

struct Backend {
    client: Client,
    docs_root: PathBuf,
    session: OnceCell<Session>,
    documents: RwLock<HashMap<Url, Rope>>,
}

impl Backend {
    fn new(client: Client, docs_root: PathBuf) -> Backend {
        Backend {
            client,
            docs_root,
            session: OnceCell::new(),
            documents: RwLock::new(HashMap::new()),
        }
    }

    fn session(&self) -> Option<(&Settings, &AttributeRegistry)> {
        let session = self.session.get()?;
        Some((&session.settings, session.registry.as_deref()?))
    }
}

fn workspace_root(params: &InitializeParams) -> PathBuf {
    #[allow(deprecated)]
    let root_uri = params.root_uri.as_ref();

    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri)
        .or(root_uri)
        .and_then(|uri| uri.to_file_path().ok())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let root_dir = workspace_root(&params);

        let settings = Settings::new(&root_dir, &self.docs_root, &params.capabilities)
            .unwrap_or_else(|err| {
                warn!(%err, "failed to load settings, using defaults");
                Settings {
                    docs_root: self.docs_root.clone(),
                    ..Settings::default()
                }
            });

        let registry = match AttributeRegistry::load(&settings.docs_root) {
            Ok(registry) => Some(Arc::new(registry)),
            Err(err) => {
                error!(%err, "htmx documentation unavailable, completion and hover are disabled");
                None
            }
        };

        info!(root = %root_dir.display(), "initialized");
        if self.session.set(Session { settings, registry }).is_err() {
            warn!("initialize received twice, keeping the first session");
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec!["-".to_string(), "\"".to_string()]),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "htmx-pal".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let Some(registry) = self.session.get().and_then(|s| s.registry.clone()) else {
            self.client
                .show_message(
                    MessageType::WARNING,
                    "htmx-pal: documentation not found, check `docs_root`",
                )
                .await;
            return;
        };

        // first-touch file reads happen here instead of on the first hover
        tokio::task::spawn_blocking(move || registry.warm_up());
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        debug!(uri = %document.uri, "did_open");
        self.documents
            .write()
            .await
            .insert(document.uri, Rope::from_str(&document.text));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let mut documents = self.documents.write().await;

        let Some(rope) = documents.get_mut(&uri) else {
            warn!(uri = %uri, "change for a document that is not open");
            return;
        };

        for change in &params.content_changes {
            if !apply_change(rope, change) {
                warn!(uri = %uri, range = ?change.range, "change out of range, ignored");
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents
            .write()
            .await
            .remove(&params.text_document.uri);
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let Some((settings, registry)) = self.session() else {
            return Ok(None);
        };

        let documents = self.documents.read().await;
        let uri = &params.text_document_position_params.text_document.uri;
        let Some(rope) = documents.get(uri) else {
            return Ok(None);
        };

        Ok(hover::hover(registry, rope, &params, settings))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let Some((settings, registry)) = self.session() else {
            return Ok(None);
        };

        let documents = self.documents.read().await;
        let uri = &params.text_document_position.text_document.uri;
        let Some(rope) = documents.get(uri) else {
            return Ok(None);
        };

        Ok(completion::get_completions(registry, rope, &params, settings))
    }
}

fn init_logging(level: Option<&str>) -> anyhow::Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    Ok(())
}

fn render(file: &Path) -> anyhow::Result<()> {
    let markdown = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let blocks = to_blocks(&markdown);

    println!("{}", serde_json::to_string_pretty(&blocks)?);
    Ok(())
}

fn list_keywords(docs_root: &Path) -> anyhow::Result<()> {
    let registry = AttributeRegistry::load(docs_root)
        .with_context(|| format!("failed to load documentation from {}", docs_root.display()))?;

    for keyword in registry.keywords() {
        match registry.sub_keywords(keyword) {
            Some(values) => println!("{keyword}: {}", values.join(", ")),
            None => println!("{keyword}"),
        }
    }

    Ok(())
}

async fn serve(docs_root: PathBuf) {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| Backend::new(client, docs_root));
    Server::new(stdin, stdout, socket).serve(service).await;
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let docs_root = PathBuf::from(shellexpand::tilde(&cli.docs_root).as_ref());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!(docs_root = %docs_root.display(), "starting htmx-pal");
            serve(docs_root).await;
            Ok(())
        }
        Command::Render { file } => render(&file),
        Command::Keywords => list_keywords(&docs_root),
    }
}
