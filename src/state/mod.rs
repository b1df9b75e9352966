// State management module
// Handles message records, history persistence and the conversation controller

pub mod conversation;
pub mod message;
pub mod persistence;

pub use conversation::{Conversation, PendingRequest, RequestKind};
pub use message::{Message, Sender};
pub use persistence::{HistoryStore, JsonFileStore, LoadOutcome, MemoryStore};
