// UI module
// Contains the chat layout and its components

pub mod components;
pub mod file_picker;
pub mod layout;

pub use components::*;
pub use layout::{render_chat_layout, UiAction, UiState};
