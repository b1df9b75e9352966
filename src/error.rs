//! Error types for the chat client
//!
//! Every failure in the send and upload flows ends up as a `ChatError`. The
//! conversation controller turns it into a visible system message using its
//! `Display` output, so the messages here are what the user reads.

use thiserror::Error;

/// Errors raised while talking to the remote endpoint or reading uploads
#[derive(Error, Debug)]
pub enum ChatError {
    /// The request could not be sent or the connection failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status
    #[error("Request failed with status code {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// The response body was not valid JSON
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The selected file could not be read
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        /// Path of the file that was selected
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A background task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors raised by durable history storage
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// File I/O error
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}
