// Main chat layout
// Handles the menu bar, message list, input row and upload picker

use crate::config::ViewConfig;
use crate::state::{Conversation, HistoryStore, Sender};
use crate::ui::components::*;
use crate::ui::file_picker::{FilePicker, FilePickerStatus};
use eframe::egui;
use std::path::PathBuf;

/// Something the user asked for during a frame.
/// The application applies these after rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Send the current input
    Send,
    /// Upload the file at this path
    Upload(PathBuf),
    /// Clear the whole history
    Clear,
}

/// Id of the message text field
pub const INPUT_FIELD_ID: &str = "message_input";

/// Entries of the File menu besides Quit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMenuEntry {
    /// Open the upload picker
    Upload,
    /// Clear the whole history
    Clear,
}

/// File menu entries allowed by the view flags
pub fn file_menu_entries(view: &ViewConfig) -> Vec<FileMenuEntry> {
    let mut entries = Vec::new();
    if view.show_upload_button {
        entries.push(FileMenuEntry::Upload);
    }
    if view.show_clear_button {
        entries.push(FileMenuEntry::Clear);
    }
    entries
}

/// View-only state that is not part of the conversation
#[derive(Default)]
pub struct UiState {
    /// Upload picker, while open
    pub file_picker: Option<FilePicker>,
    /// Message count the list was last scrolled for
    seen_messages: Option<usize>,
}

impl UiState {
    /// Create a new UI state
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the upload picker in the home directory
    pub fn open_file_picker(&mut self) {
        self.file_picker = Some(FilePicker::new());
    }

    /// Returns true once each time the message count changes, including the
    /// first frame after start-up
    pub fn take_scroll_request(&mut self, message_count: usize) -> bool {
        if self.seen_messages == Some(message_count) {
            false
        } else {
            self.seen_messages = Some(message_count);
            true
        }
    }
}

/// First dropped file that has a path on disk, unless an upload is running
pub fn dropped_upload(dropped: &[egui::DroppedFile], uploading: bool) -> Option<PathBuf> {
    if uploading {
        return None;
    }
    dropped.iter().find_map(|file| file.path.clone())
}

/// Render the whole chat window and collect the actions the user triggered
pub fn render_chat_layout<S: HistoryStore>(
    ctx: &egui::Context,
    conversation: &mut Conversation<S>,
    ui_state: &mut UiState,
    view: &ViewConfig,
) -> Vec<UiAction> {
    let mut actions = Vec::new();
    let uploading = conversation.is_uploading();

    render_menu_bar(ctx, ui_state, view, uploading, &mut actions);

    // Input row at the bottom
    egui::TopBottomPanel::bottom("input_row").show(ctx, |ui| {
        ui.add_space(16.0);
        render_input_row(ui, conversation, ui_state, view, &mut actions);
        ui.add_space(16.0);
    });

    // Message list fills the rest
    egui::CentralPanel::default().show(ctx, |ui| {
        render_message_list(ui, conversation, ui_state);
    });

    if let Some(path) = show_file_picker(ctx, ui_state) {
        if !uploading {
            actions.push(UiAction::Upload(path));
        }
    }

    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    if let Some(path) = dropped_upload(&dropped, uploading) {
        actions.push(UiAction::Upload(path));
    }

    actions
}

/// Render the top menu bar
fn render_menu_bar(
    ctx: &egui::Context,
    ui_state: &mut UiState,
    view: &ViewConfig,
    uploading: bool,
    actions: &mut Vec<UiAction>,
) {
    let entries = file_menu_entries(view);

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                for entry in &entries {
                    let label = match entry {
                        FileMenuEntry::Upload => "Upload file...",
                        FileMenuEntry::Clear => "Clear history",
                    };
                    if ui
                        .add_enabled(!uploading, egui::Button::new(label))
                        .clicked()
                    {
                        match entry {
                            FileMenuEntry::Upload => ui_state.open_file_picker(),
                            FileMenuEntry::Clear => actions.push(UiAction::Clear),
                        }
                        ui.close_menu();
                    }
                }
                if !entries.is_empty() {
                    ui.separator();
                }
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let mut dark_mode = ctx.style().visuals.dark_mode;
                if ui.checkbox(&mut dark_mode, "Dark Mode").changed() {
                    let visuals = if dark_mode {
                        egui::Visuals::dark()
                    } else {
                        egui::Visuals::light()
                    };
                    ctx.set_visuals(visuals);
                }
            });
        });
    });
}

/// Render the scrolling message list
fn render_message_list<S: HistoryStore>(
    ui: &mut egui::Ui,
    conversation: &Conversation<S>,
    ui_state: &mut UiState,
) {
    let scroll = ui_state.take_scroll_request(conversation.messages().len());

    egui::ScrollArea::vertical()
        .id_source("message_list_scroll")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            ui.add_space(16.0);
            ui.vertical_centered(|ui| {
                ui.heading(egui::RichText::new("ChatUI").size(28.0));
            });
            ui.add_space(32.0);

            for message in conversation.messages() {
                chat_bubble(ui, &message.text, message.sender);
            }

            // Transient bubble, never stored
            if conversation.is_uploading() {
                chat_bubble(ui, "Uploading file...", Sender::User);
            }

            if scroll {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
            }
        });
}

/// Render the text field and control buttons
fn render_input_row<S: HistoryStore>(
    ui: &mut egui::Ui,
    conversation: &mut Conversation<S>,
    ui_state: &mut UiState,
    view: &ViewConfig,
    actions: &mut Vec<UiAction>,
) {
    let uploading = conversation.is_uploading();

    ui.horizontal(|ui| {
        ui.add_space(8.0);

        // Leave room for the buttons on the right
        let field_width = (ui.available_width() - 260.0).max(120.0);
        let response = ui.add(
            egui::TextEdit::singleline(conversation.input_mut())
                .id(egui::Id::new(INPUT_FIELD_ID))
                .hint_text("Type your message")
                .desired_width(field_width),
        );

        // Enter sends even when the send button is hidden
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            actions.push(UiAction::Send);
            response.request_focus();
        }

        if view.show_send_button {
            let enabled = !conversation.input().is_empty() && !uploading;
            if send_button(ui, enabled).clicked() {
                actions.push(UiAction::Send);
            }
        }

        if view.show_upload_button && upload_button(ui, !uploading).clicked() {
            ui_state.open_file_picker();
        }

        if view.show_clear_button && clear_button(ui, !uploading).clicked() {
            actions.push(UiAction::Clear);
        }

        if uploading {
            ui.add(egui::Spinner::new().size(20.0));
        }
    });
}

/// Show the upload picker if it is open and return the chosen file
fn show_file_picker(ctx: &egui::Context, ui_state: &mut UiState) -> Option<PathBuf> {
    let picker = ui_state.file_picker.as_mut()?;
    picker.show(ctx);

    match picker.status.clone() {
        FilePickerStatus::Open => None,
        FilePickerStatus::Closed => {
            ui_state.file_picker = None;
            None
        }
        FilePickerStatus::Selected(path) => {
            ui_state.file_picker = None;
            Some(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{MemoryStore, Message};

    #[test]
    fn test_scroll_request_fires_once_per_change() {
        let mut state = UiState::new();
        assert!(state.take_scroll_request(0));
        assert!(!state.take_scroll_request(0));
        assert!(state.take_scroll_request(2));
        assert!(!state.take_scroll_request(2));
        assert!(state.take_scroll_request(0));
    }

    #[test]
    fn test_dropped_upload_picks_first_path() {
        let dropped = vec![
            egui::DroppedFile {
                name: "web-only".to_string(),
                ..Default::default()
            },
            egui::DroppedFile {
                path: Some(PathBuf::from("/tmp/a.pdf")),
                ..Default::default()
            },
            egui::DroppedFile {
                path: Some(PathBuf::from("/tmp/b.pdf")),
                ..Default::default()
            },
        ];

        assert_eq!(
            dropped_upload(&dropped, false),
            Some(PathBuf::from("/tmp/a.pdf"))
        );
        assert_eq!(dropped_upload(&dropped, true), None);
        assert_eq!(dropped_upload(&[], false), None);
    }

    #[test]
    fn test_render_without_input_has_no_actions() {
        let ctx = egui::Context::default();
        let mut store = MemoryStore::new();
        store.append(&Message::user("hello")).unwrap();
        store.append(&Message::system("hi")).unwrap();
        let mut conversation = Conversation::restore(store);
        let mut ui_state = UiState::new();

        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = render_chat_layout(
                ctx,
                &mut conversation,
                &mut ui_state,
                &ViewConfig::default(),
            );
        });

        assert!(actions.is_empty());
        assert!(!ui_state.take_scroll_request(2));
    }

    #[test]
    fn test_dropping_a_file_requests_upload() {
        let ctx = egui::Context::default();
        let mut conversation = Conversation::restore(MemoryStore::new());
        let mut ui_state = UiState::new();
        let input = egui::RawInput {
            dropped_files: vec![egui::DroppedFile {
                path: Some(PathBuf::from("/tmp/report.pdf")),
                ..Default::default()
            }],
            ..Default::default()
        };

        let mut actions = Vec::new();
        let _ = ctx.run(input, |ctx| {
            actions = render_chat_layout(
                ctx,
                &mut conversation,
                &mut ui_state,
                &ViewConfig::default(),
            );
        });

        assert_eq!(
            actions,
            vec![UiAction::Upload(PathBuf::from("/tmp/report.pdf"))]
        );
    }

    #[test]
    fn test_file_menu_follows_view_flags() {
        assert_eq!(
            file_menu_entries(&ViewConfig::default()),
            vec![FileMenuEntry::Upload, FileMenuEntry::Clear]
        );

        let no_upload = ViewConfig {
            show_upload_button: false,
            ..ViewConfig::default()
        };
        assert_eq!(file_menu_entries(&no_upload), vec![FileMenuEntry::Clear]);

        let bare = ViewConfig {
            show_send_button: false,
            show_upload_button: false,
            show_clear_button: false,
        };
        assert!(file_menu_entries(&bare).is_empty());
    }

    #[test]
    fn test_enter_sends_with_send_button_hidden() {
        let ctx = egui::Context::default();
        let mut conversation = Conversation::restore(MemoryStore::new());
        conversation.set_input("hello");
        let mut ui_state = UiState::new();
        let view = ViewConfig {
            show_send_button: false,
            ..ViewConfig::default()
        };

        // First frame lays out the field and focuses it
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            render_chat_layout(ctx, &mut conversation, &mut ui_state, &view);
            ctx.memory_mut(|m| m.request_focus(egui::Id::new(INPUT_FIELD_ID)));
        });

        let enter = egui::RawInput {
            events: vec![egui::Event::Key {
                key: egui::Key::Enter,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        };
        let mut actions = Vec::new();
        let _ = ctx.run(enter, |ctx| {
            actions = render_chat_layout(ctx, &mut conversation, &mut ui_state, &view);
        });

        assert_eq!(actions, vec![UiAction::Send]);
    }

    #[test]
    fn test_picked_file_requests_upload_and_closes_picker() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let ctx = egui::Context::default();
        let mut conversation = Conversation::restore(MemoryStore::new());
        let mut ui_state = UiState::new();
        let mut picker = FilePicker::at(dir.path().to_path_buf());
        picker.open_entry(0);
        ui_state.file_picker = Some(picker);

        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = render_chat_layout(
                ctx,
                &mut conversation,
                &mut ui_state,
                &ViewConfig::default(),
            );
        });

        assert_eq!(actions, vec![UiAction::Upload(path)]);
        assert!(ui_state.file_picker.is_none());
    }

    #[test]
    fn test_cancelled_picker_is_dropped() {
        let dir = tempfile::TempDir::new().unwrap();
        let ctx = egui::Context::default();
        let mut conversation = Conversation::restore(MemoryStore::new());
        let mut ui_state = UiState::new();
        let mut picker = FilePicker::at(dir.path().to_path_buf());
        picker.status = FilePickerStatus::Closed;
        ui_state.file_picker = Some(picker);

        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = render_chat_layout(
                ctx,
                &mut conversation,
                &mut ui_state,
                &ViewConfig::default(),
            );
        });

        assert!(actions.is_empty());
        assert!(ui_state.file_picker.is_none());
    }
}
