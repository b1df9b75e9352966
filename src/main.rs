// ChatUI - Main Entry Point
// Native chat widget talking to a single message-answering endpoint

use anyhow::Context as _;
use chatui::api::{read_encoded, EncodedFile, HttpEndpoint, RemoteEndpoint, Reply};
use chatui::config::{Config, ViewConfig};
use chatui::error::ChatError;
use chatui::state::{Conversation, JsonFileStore, PendingRequest, RequestKind};
use chatui::ui::{render_chat_layout, UiAction, UiState};
use eframe::egui;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use tracing::info;

/// Results of background work, delivered back to the UI thread
enum AppEvent {
    /// A file picked for upload was read and encoded
    Encoded(Result<EncodedFile, ChatError>),
    /// A remote call finished
    Completed(RequestKind, Result<Reply, ChatError>),
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    let app = ChatApp::new(&config, runtime)?;

    // Configure window options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ChatUI")
            .with_inner_size([640.0, 760.0])
            .with_min_inner_size([420.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native("ChatUI", options, Box::new(|_cc| Box::new(app)))
        .map_err(|e| anyhow::anyhow!("Failed to run ChatUI window: {}", e))
}

/// Main application struct
/// Owns the conversation, view state and the runtime remote calls run on
struct ChatApp {
    /// Conversation history and controller state
    conversation: Conversation<JsonFileStore>,
    /// View-only state
    ui_state: UiState,
    /// Which controls are visible
    view: ViewConfig,
    /// Message-answering endpoint
    endpoint: Arc<dyn RemoteEndpoint>,
    /// Runtime for file reads and remote calls (egui's update loop is blocking)
    runtime: tokio::runtime::Runtime,
    /// Channel for receiving background results from runtime tasks
    event_tx: mpsc::Sender<AppEvent>,
    event_rx: mpsc::Receiver<AppEvent>,
}

impl ChatApp {
    /// Create the application, restoring history from the configured data dir
    fn new(config: &Config, runtime: tokio::runtime::Runtime) -> anyhow::Result<Self> {
        let endpoint = HttpEndpoint::from_config(config).context("Failed to build HTTP client")?;
        let store = JsonFileStore::new(config.history_path());
        info!("Using history file {}", store.path().display());

        let (event_tx, event_rx) = mpsc::channel();

        Ok(Self {
            conversation: Conversation::restore(store),
            ui_state: UiState::new(),
            view: config.view,
            endpoint: Arc::new(endpoint),
            runtime,
            event_tx,
            event_rx,
        })
    }

    /// Apply every background result that has arrived, in arrival order
    fn drain_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(ctx, event);
        }
    }

    fn handle_event(&mut self, ctx: &egui::Context, event: AppEvent) {
        match event {
            AppEvent::Encoded(Ok(file)) => {
                let request = self.conversation.file_ready(file);
                self.dispatch(ctx, request);
            }
            AppEvent::Encoded(Err(e)) => self.conversation.complete(RequestKind::Upload, Err(e)),
            AppEvent::Completed(kind, outcome) => self.conversation.complete(kind, outcome),
        }
    }

    /// Run the user's actions against the conversation
    fn apply_actions(&mut self, ctx: &egui::Context, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::Send => {
                    if let Some(request) = self.conversation.begin_send() {
                        self.dispatch(ctx, request);
                    }
                }
                UiAction::Upload(path) => {
                    if self.conversation.begin_upload() {
                        self.encode(ctx, path);
                    }
                }
                UiAction::Clear => self.conversation.clear(),
            }
        }
    }

    /// Read and encode an upload on the runtime
    fn encode(&self, ctx: &egui::Context, path: PathBuf) {
        let sender = self.event_tx.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let encoded = read_encoded(path).await;
            // Receiver only goes away on shutdown
            let _ = sender.send(AppEvent::Encoded(encoded));
            ctx.request_repaint();
        });
    }

    /// Send a request on the runtime; the outcome comes back over the channel
    fn dispatch(&self, ctx: &egui::Context, request: PendingRequest) {
        let endpoint = Arc::clone(&self.endpoint);
        let sender = self.event_tx.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let outcome = endpoint.send(&request.body).await;
            let _ = sender.send(AppEvent::Completed(request.kind, outcome));
            ctx.request_repaint();
        });
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);

        let actions = render_chat_layout(
            ctx,
            &mut self.conversation,
            &mut self.ui_state,
            &self.view,
        );
        self.apply_actions(ctx, actions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatui::state::{HistoryStore, Message};
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_config(data_dir: &Path, base_url: &str) -> Config {
        let mut config = Config::default();
        config.persistence.data_dir = data_dir.to_path_buf();
        config.endpoint.base_url = base_url.to_string();
        config
    }

    fn test_runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    fn wait_for_event(app: &mut ChatApp, ctx: &egui::Context) {
        let event = app.event_rx.recv_timeout(Duration::from_secs(10)).unwrap();
        app.handle_event(ctx, event);
    }

    #[test]
    fn test_app_creation_restores_history() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), "http://127.0.0.1:9");
        let mut store = JsonFileStore::new(config.history_path());
        store.append(&Message::user("earlier")).unwrap();

        let app = ChatApp::new(&config, test_runtime()).unwrap();
        assert_eq!(app.conversation.messages(), &[Message::user("earlier")]);
    }

    #[test]
    fn test_send_action_round_trip() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/send_message")
            .with_status(200)
            .with_body(r#"{"message":"hi"}"#)
            .create();

        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), &server.url());
        let mut app = ChatApp::new(&config, test_runtime()).unwrap();
        let ctx = egui::Context::default();

        app.conversation.set_input("hello");
        app.apply_actions(&ctx, vec![UiAction::Send]);
        assert_eq!(app.conversation.messages(), &[Message::user("hello")]);

        wait_for_event(&mut app, &ctx);
        assert_eq!(
            app.conversation.messages(),
            &[Message::user("hello"), Message::system("hi")]
        );
        assert_eq!(app.conversation.input(), "");
    }

    #[test]
    fn test_upload_action_reads_file_off_the_ui_thread() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/send_message")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "message": "data:application/pdf;base64,JVBERg==",
                "filename": "a.pdf"
            })))
            .with_status(200)
            .with_body(r#"{"message":"received"}"#)
            .create();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.pdf");
        std::fs::write(&path, b"%PDF").unwrap();
        let config = test_config(dir.path(), &server.url());
        let mut app = ChatApp::new(&config, test_runtime()).unwrap();
        let ctx = egui::Context::default();

        app.apply_actions(&ctx, vec![UiAction::Upload(path.clone())]);
        assert!(app.conversation.is_uploading());
        assert!(app.conversation.messages().is_empty());

        // Second upload while the first is in flight is ignored
        app.apply_actions(&ctx, vec![UiAction::Upload(path)]);

        wait_for_event(&mut app, &ctx);
        assert_eq!(
            app.conversation.messages(),
            &[Message::user("Uploading file: a.pdf")]
        );
        assert!(app.conversation.is_uploading());

        wait_for_event(&mut app, &ctx);
        assert_eq!(
            app.conversation.messages(),
            &[
                Message::user("Uploading file: a.pdf"),
                Message::system("received")
            ]
        );
        assert!(!app.conversation.is_uploading());
        assert!(app.event_rx.try_recv().is_err());
    }

    #[test]
    fn test_upload_of_missing_file_reports_failure() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), "http://127.0.0.1:9");
        let mut app = ChatApp::new(&config, test_runtime()).unwrap();
        let ctx = egui::Context::default();

        app.apply_actions(&ctx, vec![UiAction::Upload(dir.path().join("missing.pdf"))]);
        wait_for_event(&mut app, &ctx);

        let messages = app.conversation.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.starts_with("Failed to upload file: "));
        assert!(!app.conversation.is_uploading());
    }

    #[test]
    fn test_clear_action() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), "http://127.0.0.1:9");
        let mut store = JsonFileStore::new(config.history_path());
        store.append(&Message::user("old")).unwrap();

        let mut app = ChatApp::new(&config, test_runtime()).unwrap();
        app.apply_actions(&egui::Context::default(), vec![UiAction::Clear]);

        assert!(app.conversation.messages().is_empty());
        assert!(!config.history_path().exists());
    }
}
