//! Remote endpoint access
//!
//! Request/response types, the HTTP client and upload encoding.

pub mod client;
pub mod upload;

pub use client::{HttpEndpoint, OutgoingMessage, RemoteEndpoint, Reply};
pub use upload::{read_encoded, EncodedFile};
