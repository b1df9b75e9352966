// Conversation controller
// Applies user actions (send, upload, clear) to the history and the remote endpoint

use super::message::Message;
use super::persistence::{HistoryStore, LoadOutcome};
use crate::api::client::{OutgoingMessage, RemoteEndpoint, Reply};
use crate::api::upload::{read_encoded, EncodedFile};
use crate::error::ChatError;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Which user action a remote request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Plain text message
    Message,
    /// File upload
    Upload,
}

/// A request built by the local half of an action, ready to go to the endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// Action the request belongs to
    pub kind: RequestKind,
    /// Body to post
    pub body: OutgoingMessage,
}

/// Conversation state for one session.
///
/// Holds the visible message list, mirrored to a `HistoryStore`, along with
/// the text input and the `uploading` guard.
///
/// Each action is split so it can run on an event loop: `begin_send` and
/// `file_ready` do the local work and return the request to send, `complete`
/// applies the endpoint's outcome. `send_message` and `upload_file` chain the
/// steps around an endpoint call.
#[derive(Debug)]
pub struct Conversation<S: HistoryStore> {
    messages: Vec<Message>,
    store: S,
    input: String,
    uploading: bool,
}

impl<S: HistoryStore> Conversation<S> {
    /// Start a session from whatever `store` already holds.
    /// Malformed stored data is logged and treated as no history.
    pub fn restore(store: S) -> Self {
        let messages = match store.load_all() {
            LoadOutcome::Loaded(messages) => {
                info!("Restored {} messages from history", messages.len());
                messages
            }
            LoadOutcome::Empty => Vec::new(),
            LoadOutcome::Malformed(e) => {
                warn!("Discarding unreadable chat history: {}", e);
                Vec::new()
            }
        };

        Self {
            messages,
            store,
            input: String::new(),
            uploading: false,
        }
    }

    /// Messages in display order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Current contents of the text input
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Mutable access to the text input, for binding to a text field
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    /// Replace the text input
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether a file upload is in flight
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// The backing history store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append a record, mirroring it to the store first when it is persisted
    fn push(&mut self, message: Message) {
        if message.persist {
            if let Err(e) = self.store.append(&message) {
                warn!("Failed to persist message: {}", e);
            }
        }
        self.messages.push(message);
    }

    /// Local half of sending the current input.
    ///
    /// Ignored while an upload is in flight. Empty input is still sent; the
    /// view only disables the send button for it.
    pub fn begin_send(&mut self) -> Option<PendingRequest> {
        if self.uploading {
            debug!("Ignoring send while an upload is in flight");
            return None;
        }

        let text = self.input.clone();
        self.push(Message::user(text.clone()));

        Some(PendingRequest {
            kind: RequestKind::Message,
            body: OutgoingMessage::text(text),
        })
    }

    /// Local half of an upload: raise the `uploading` guard.
    /// Returns false if an upload is already in flight.
    ///
    /// The file is read and encoded elsewhere (off the UI thread); hand the
    /// result to `file_ready`, or a read failure to `complete`.
    pub fn begin_upload(&mut self) -> bool {
        if self.uploading {
            debug!("Ignoring upload while another is in flight");
            return false;
        }
        self.uploading = true;
        true
    }

    /// Record an encoded file as uploading and build its request
    pub fn file_ready(&mut self, file: EncodedFile) -> PendingRequest {
        self.push(Message::user(format!("Uploading file: {}", file.filename)));
        PendingRequest {
            kind: RequestKind::Upload,
            body: OutgoingMessage::file(file.data_url, file.filename),
        }
    }

    /// Remote half of an action: record the reply or the failure.
    ///
    /// A reply without a message adds nothing. A failed send keeps the input
    /// text; a finished upload always clears it and drops the `uploading`
    /// guard.
    pub fn complete(&mut self, kind: RequestKind, outcome: Result<Reply, ChatError>) {
        match outcome {
            Ok(reply) => {
                match reply.message {
                    Some(text) => self.push(Message::system(text)),
                    None => debug!(?kind, "Response carried no message"),
                }
                self.input.clear();
            }
            Err(e) => {
                error!(?kind, "Request failed: {}", e);
                let text = match kind {
                    RequestKind::Message => format!("Failed to send message: {}", e),
                    RequestKind::Upload => format!("Failed to upload file: {}", e),
                };
                self.push(Message::system(text));
                if kind == RequestKind::Upload {
                    self.input.clear();
                }
            }
        }

        if kind == RequestKind::Upload {
            self.uploading = false;
        }
    }

    /// Empty both the visible list and the store.
    /// Does not touch the `uploading` guard.
    pub fn clear(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored history: {}", e);
        }
        self.messages.clear();
    }

    /// Send the current input and wait for the endpoint's answer
    pub async fn send_message<E: RemoteEndpoint + ?Sized>(&mut self, endpoint: &E) {
        if let Some(request) = self.begin_send() {
            let outcome = endpoint.send(&request.body).await;
            self.complete(request.kind, outcome);
        }
    }

    /// Upload the file at `path` and wait for the endpoint's answer
    pub async fn upload_file<E: RemoteEndpoint + ?Sized>(&mut self, path: &Path, endpoint: &E) {
        if !self.begin_upload() {
            return;
        }
        match read_encoded(path.to_path_buf()).await {
            Ok(file) => {
                let request = self.file_ready(file);
                let outcome = endpoint.send(&request.body).await;
                self.complete(request.kind, outcome);
            }
            Err(e) => self.complete(RequestKind::Upload, Err(e)),
        }
    }
}
