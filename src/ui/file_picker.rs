// Upload file picker
// Browses directories with fuzzy search and returns the chosen file

use eframe::egui;
use egui::{Color32, Context, Key, RichText, Window};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::path::{Path, PathBuf};

const SEARCH_FIELD_ID: &str = "upload_picker_search";

/// Status of the file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilePickerStatus {
    /// The picker is open and waiting for input
    Open,
    /// The picker was closed without a choice
    Closed,
    /// A file was chosen
    Selected(PathBuf),
}

/// One row of the directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    /// File or directory name
    pub name: String,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

/// A file picker that uses fuzzy search to navigate directories
pub struct FilePicker {
    /// Current status of the picker
    pub status: FilePickerStatus,
    current_dir: PathBuf,
    query: String,
    /// Directories first, then files, both sorted by name
    entries: Vec<PickerEntry>,
    selected_index: Option<usize>,
    error_message: Option<String>,
    matcher: SkimMatcherV2,
}

impl Default for FilePicker {
    fn default() -> Self {
        Self::new()
    }
}

impl FilePicker {
    /// Create a picker starting in the user's home directory
    pub fn new() -> Self {
        Self::at(dirs::home_dir().unwrap_or_else(|| PathBuf::from("/")))
    }

    /// Create a picker starting in `dir`
    pub fn at(dir: PathBuf) -> Self {
        let mut picker = Self {
            status: FilePickerStatus::Open,
            current_dir: dir,
            query: String::new(),
            entries: Vec::new(),
            selected_index: None,
            error_message: None,
            matcher: SkimMatcherV2::default(),
        };
        picker.update_entries();
        picker
    }

    /// Directory being browsed
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Entries matching the current query
    pub fn entries(&self) -> &[PickerEntry] {
        &self.entries
    }

    /// Change the search query and refilter
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.update_entries();
    }

    fn update_entries(&mut self) {
        self.entries.clear();
        self.selected_index = None;
        self.error_message = None;

        let listing = match std::fs::read_dir(&self.current_dir) {
            Ok(listing) => listing,
            Err(e) => {
                self.error_message = Some(format!("Error reading directory: {}", e));
                return;
            }
        };

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in listing.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            // Skip hidden files and directories
            if name.starts_with('.') {
                continue;
            }
            if !self.query.is_empty() && self.matcher.fuzzy_match(&name, &self.query).is_none() {
                continue;
            }

            let is_dir = entry.path().is_dir();
            let target = if is_dir { &mut dirs } else { &mut files };
            target.push(PickerEntry { name, is_dir });
        }

        dirs.sort_by_key(|e| e.name.to_lowercase());
        files.sort_by_key(|e| e.name.to_lowercase());
        self.entries.extend(dirs);
        self.entries.extend(files);

        if !self.entries.is_empty() {
            self.selected_index = Some(0);
        }
    }

    /// Open the entry at `index`: navigate into a directory or choose a file
    pub fn open_entry(&mut self, index: usize) {
        let Some(entry) = self.entries.get(index).cloned() else {
            return;
        };
        let path = self.current_dir.join(&entry.name);

        if entry.is_dir {
            if path.is_dir() {
                self.current_dir = path;
                self.query.clear();
                self.update_entries();
            } else {
                self.error_message = Some(format!("Cannot access directory: {}", entry.name));
            }
        } else {
            self.status = FilePickerStatus::Selected(path);
        }
    }

    /// Navigate to the parent directory
    pub fn navigate_to_parent(&mut self) {
        if let Some(parent) = self.current_dir.parent() {
            self.current_dir = parent.to_path_buf();
            self.query.clear();
            self.update_entries();
        }
    }

    fn move_selection(&mut self, down: bool) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() - 1;
        self.selected_index = Some(match (self.selected_index, down) {
            (Some(idx), true) => (idx + 1).min(last),
            (Some(idx), false) => idx.saturating_sub(1),
            (None, true) => 0,
            (None, false) => last,
        });
    }

    /// Show the picker window
    pub fn show(&mut self, ctx: &Context) {
        if self.status != FilePickerStatus::Open {
            return;
        }

        ctx.memory_mut(|mem| mem.request_focus(egui::Id::new(SEARCH_FIELD_ID)));

        let screen_rect = ctx.screen_rect();
        let window_size = [screen_rect.width() * 0.7, screen_rect.height() * 0.6];

        let mut to_open: Option<usize> = None;
        let mut go_up = false;
        let mut close = false;

        Window::new("Upload file")
            .default_size(window_size)
            .collapsible(false)
            .resizable(true)
            .show(ctx, |ui| {
                ui.label(RichText::new(self.current_dir.display().to_string()).strong());
                ui.add_space(8.0);

                if let Some(error) = &self.error_message {
                    ui.colored_label(Color32::RED, error);
                    ui.add_space(8.0);
                }

                ui.horizontal(|ui| {
                    ui.label("Search:");
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.query)
                            .id(egui::Id::new(SEARCH_FIELD_ID))
                            .desired_width(f32::INFINITY),
                    );
                    if response.changed() {
                        self.update_entries();
                    }
                });
                ui.add_space(4.0);

                egui::ScrollArea::vertical()
                    .max_height(ui.available_height() - 40.0)
                    .show(ui, |ui| {
                        if ui.selectable_label(false, ".. (Parent Directory)").clicked() {
                            go_up = true;
                        }

                        for (idx, entry) in self.entries.iter().enumerate() {
                            let text = if entry.is_dir {
                                RichText::new(format!("📁 {}", entry.name))
                                    .color(Color32::from_rgb(100, 170, 255))
                                    .strong()
                            } else {
                                RichText::new(format!("📄 {}", entry.name))
                            };
                            let selected = self.selected_index == Some(idx);
                            if ui.selectable_label(selected, text).clicked() {
                                to_open = Some(idx);
                            }
                        }
                    });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                    ui.label(
                        RichText::new("Enter: open | ←: up a level | Esc: cancel").weak(),
                    );
                });
            });

        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            close = true;
        }
        if ctx.input(|i| i.key_pressed(Key::Enter)) {
            to_open = to_open.or(self.selected_index);
        }
        if ctx.input(|i| i.key_pressed(Key::ArrowLeft)) && self.query.is_empty() {
            go_up = true;
        }
        if ctx.input(|i| i.key_pressed(Key::ArrowDown)) {
            self.move_selection(true);
        }
        if ctx.input(|i| i.key_pressed(Key::ArrowUp)) {
            self.move_selection(false);
        }

        if close {
            self.status = FilePickerStatus::Closed;
        } else if go_up {
            self.navigate_to_parent();
        } else if let Some(idx) = to_open {
            self.open_entry(idx);
        }
    }
}
