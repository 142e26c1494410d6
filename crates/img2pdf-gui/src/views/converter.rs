use eframe::egui;
use img2pdf_core::{PreviewSet, PreviewSlot, Session};

use crate::logger::AppLogger;

const THUMBNAIL_BOX: f32 = 140.0;

/// What the user asked for during this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterAction {
    None,
    PickFiles,
    Generate,
}

pub fn show_converter(
    ui: &mut egui::Ui,
    session: &Session,
    previews: &PreviewSet<egui::TextureHandle>,
    compress: &mut bool,
    max_files: usize,
) -> ConverterAction {
    let mut action = ConverterAction::None;
    let busy = session.is_busy();

    ui.heading("Image to PDF");
    ui.add_space(10.0);

    ui.horizontal(|ui| {
        if ui
            .add_enabled(!busy, egui::Button::new("Select images..."))
            .on_hover_text(format!("JPEG or PNG, up to {max_files} images"))
            .clicked()
        {
            action = ConverterAction::PickFiles;
        }

        ui.add_enabled(
            !busy,
            egui::Checkbox::new(compress, "Compress images (max 1 MB, 1920 px)"),
        );
    });

    ui.add_space(10.0);

    let caption = if busy {
        "Processing..."
    } else {
        "Convert to PDF"
    };
    if ui
        .add_enabled(session.can_generate(), egui::Button::new(caption))
        .clicked()
    {
        action = ConverterAction::Generate;
    }

    ui.separator();

    if previews.is_empty() {
        ui.label("No images selected. Pick files or drop them here.");
        return action;
    }

    ui.label(format!("{} images selected", previews.len()));
    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            for slot in previews.slots() {
                show_thumbnail(ui, slot);
            }
        });
    });

    action
}

fn show_thumbnail(ui: &mut egui::Ui, slot: &PreviewSlot<egui::TextureHandle>) {
    let box_size = egui::vec2(THUMBNAIL_BOX, THUMBNAIL_BOX);
    ui.allocate_ui(box_size, |ui| {
        ui.centered_and_justified(|ui| match slot {
            PreviewSlot::Ready(texture) => {
                let size = texture.size_vec2();
                let scale = (THUMBNAIL_BOX / size.x).min(THUMBNAIL_BOX / size.y);
                ui.image((texture.id(), size * scale));
            }
            PreviewSlot::Pending => {
                ui.spinner();
            }
            PreviewSlot::Failed => {
                ui.weak("No preview");
            }
        });
    });
}

pub fn show_log_panel(ui: &mut egui::Ui, logger: &AppLogger) {
    egui::CollapsingHeader::new("Log")
        .default_open(false)
        .show(ui, |ui| {
            if ui.small_button("Clear").clicked() {
                logger.clear();
            }
            egui::ScrollArea::vertical()
                .max_height(150.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for entry in logger.get_entries() {
                        ui.label(format!(
                            "{} {:<5} {}: {}",
                            entry.timestamp.format("%H:%M:%S"),
                            entry.level,
                            entry.target,
                            entry.message
                        ));
                    }
                });
        });
}
