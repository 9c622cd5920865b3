use eframe::egui;
use log::Level;

use crate::logger::AppLogger;

fn level_color(ui: &egui::Ui, level: Level) -> egui::Color32 {
    match level {
        Level::Error => ui.visuals().error_fg_color,
        Level::Warn => ui.visuals().warn_fg_color,
        Level::Info => ui.visuals().text_color(),
        Level::Debug | Level::Trace => ui.visuals().weak_text_color(),
    }
}

pub fn show_log_panel(ui: &mut egui::Ui, logger: &AppLogger) {
    ui.horizontal(|ui| {
        ui.strong("Log");
        if ui.small_button("Clear").clicked() {
            logger.clear();
        }
    });

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for entry in logger.entries() {
                ui.horizontal(|ui| {
                    ui.weak(entry.timestamp.format("%H:%M:%S").to_string());
                    ui.colored_label(level_color(ui, entry.level), entry.level.as_str());
                    ui.label(entry.message.as_str())
                        .on_hover_text(entry.target.as_str());
                });
            }
        });
}
