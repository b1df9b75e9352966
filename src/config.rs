//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;

/// File name of the persisted conversation history inside the data directory
pub const HISTORY_FILE_NAME: &str = "messages.json";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote endpoint configuration
    pub endpoint: EndpointConfig,
    /// Persistence configuration
    pub persistence: PersistenceConfig,
    /// Which controls are shown in the input row
    pub view: ViewConfig,
}

/// Remote endpoint configuration
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Base URL of the message-answering service
    pub base_url: String,
    /// Path of the message exchange route
    pub message_path: String,
    /// Optional request timeout (in seconds); `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

/// Persistence configuration
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Base directory for storing conversation history
    pub data_dir: PathBuf,
}

/// Visibility flags for the input row controls.
///
/// These are presentational only: hiding the send button does not disable
/// sending with the Enter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    /// Show the send button
    pub show_send_button: bool,
    /// Show the file upload button
    pub show_upload_button: bool,
    /// Show the clear history button
    pub show_clear_button: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            show_send_button: true,
            show_upload_button: true,
            show_clear_button: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig {
                base_url: "http://127.0.0.1:5000".to_string(),
                message_path: "/send_message".to_string(),
                timeout_secs: None,
            },
            persistence: PersistenceConfig {
                data_dir: default_data_dir(),
            },
            view: ViewConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: EndpointConfig {
                base_url: env::var("CHATUI_ENDPOINT").unwrap_or(defaults.endpoint.base_url),
                message_path: env::var("CHATUI_MESSAGE_PATH")
                    .unwrap_or(defaults.endpoint.message_path),
                timeout_secs: env::var("CHATUI_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok()),
            },
            persistence: PersistenceConfig {
                data_dir: env::var_os("CHATUI_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.persistence.data_dir),
            },
            view: ViewConfig {
                show_send_button: env_flag("CHATUI_SHOW_SEND_BUTTON", true),
                show_upload_button: env_flag("CHATUI_SHOW_UPLOAD_BUTTON", true),
                show_clear_button: env_flag("CHATUI_SHOW_CLEAR_BUTTON", true),
            },
        }
    }

    /// Full URL of the message exchange route
    pub fn message_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.base_url.trim_end_matches('/'),
            self.endpoint.message_path.trim_start_matches('/')
        )
    }

    /// Path of the JSON file holding the conversation history
    pub fn history_path(&self) -> PathBuf {
        self.persistence.data_dir.join(HISTORY_FILE_NAME)
    }
}

/// Default to ~/.chatui or a directory relative to the working directory
fn default_data_dir() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".chatui"),
        None => PathBuf::from(".chatui"),
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
