//! ChatUI Library
//!
//! A minimal chat widget: message history mirrored to local storage, a
//! conversation controller and an HTTP client for the answering endpoint.
//! The desktop binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
/// Conversation state management
///
/// Handles message records, history persistence and the controller that
/// applies user actions.
pub mod state;
pub mod ui;
