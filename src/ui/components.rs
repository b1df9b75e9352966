// Reusable UI components
// Chat bubbles and the input row buttons

use crate::state::Sender;
use eframe::egui;

/// Background of user bubbles
pub const USER_BUBBLE_FILL: egui::Color32 = egui::Color32::from_rgb(0xF5, 0xF5, 0xF5);
/// Background of system bubbles
pub const SYSTEM_BUBBLE_FILL: egui::Color32 = egui::Color32::from_rgb(0xDC, 0xF8, 0xC6);

/// Share of the row a bubble may take before its text wraps
const BUBBLE_MAX_WIDTH_RATIO: f32 = 0.7;

/// Render one chat bubble.
/// User messages sit on the right with a person glyph, system messages on the
/// left with a bot glyph.
pub fn chat_bubble(ui: &mut egui::Ui, text: &str, sender: Sender) {
    let is_user = sender == Sender::User;
    let (glyph, fill, row_layout, text_align) = if is_user {
        (
            "👤",
            USER_BUBBLE_FILL,
            egui::Layout::right_to_left(egui::Align::Center),
            egui::Align::Max,
        )
    } else {
        (
            "🤖",
            SYSTEM_BUBBLE_FILL,
            egui::Layout::left_to_right(egui::Align::Center),
            egui::Align::Min,
        )
    };
    let max_width = ui.available_width() * BUBBLE_MAX_WIDTH_RATIO;

    ui.with_layout(row_layout, |ui| {
        ui.label(egui::RichText::new(glyph).size(18.0));
        ui.add_space(8.0);
        egui::Frame::none()
            .fill(fill)
            .rounding(egui::Rounding::same(4.0))
            .inner_margin(egui::Margin::symmetric(16.0, 8.0))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.with_layout(egui::Layout::top_down(text_align), |ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(text).color(egui::Color32::BLACK),
                        )
                        .wrap(true),
                    );
                });
            });
    });
    ui.add_space(8.0);
}

/// Render the send button
pub fn send_button(ui: &mut egui::Ui, enabled: bool) -> egui::Response {
    ui.add_enabled(enabled, egui::Button::new(egui::RichText::new("➡ Send").strong()))
}

/// Render the file upload button
pub fn upload_button(ui: &mut egui::Ui, enabled: bool) -> egui::Response {
    ui.add_enabled(enabled, egui::Button::new("⬆ Upload"))
}

/// Render the clear history button (dark grey)
pub fn clear_button(ui: &mut egui::Ui, enabled: bool) -> egui::Response {
    ui.add_enabled(
        enabled,
        egui::Button::new(egui::RichText::new("🗑 Clear").color(egui::Color32::WHITE))
            .fill(egui::Color32::from_rgb(0x58, 0x58, 0x59)),
    )
}
