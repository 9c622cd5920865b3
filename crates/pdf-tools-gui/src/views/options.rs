use eframe::egui;
use pdf_arrange::{ArrangeOptions, RotationMode};
use std::path::PathBuf;

use crate::ui_components::{choice_buttons, labeled_slider};

pub enum OptionsAction {
    Apply,
    Load(PathBuf),
    Save(PathBuf),
}

/// Edit `draft` in place; nothing takes effect until the caller handles `Apply`
pub fn show_options(ui: &mut egui::Ui, draft: &mut ArrangeOptions) -> Option<OptionsAction> {
    let mut action = None;

    labeled_slider(
        ui,
        "Thumbnail width",
        &mut draft.thumbnail_width,
        ArrangeOptions::MIN_THUMBNAIL_WIDTH..=ArrangeOptions::MAX_THUMBNAIL_WIDTH,
        " px",
    );
    labeled_slider(
        ui,
        "Cached thumbnails",
        &mut draft.max_cached_thumbnails,
        1..=2000,
        "",
    );
    choice_buttons(
        ui,
        "Rotation",
        &mut draft.rotation_mode,
        &[
            (RotationMode::Relative, "Add to page rotation"),
            (RotationMode::Absolute, "Replace page rotation"),
        ],
    );
    ui.horizontal(|ui| {
        ui.label("Output suffix");
        ui.text_edit_singleline(&mut draft.output_suffix);
    });

    if let Err(e) = draft.validate() {
        ui.colored_label(ui.visuals().error_fg_color, e.to_string());
    }

    ui.separator();
    ui.horizontal(|ui| {
        if ui
            .add_enabled(draft.validate().is_ok(), egui::Button::new("✔ Apply"))
            .clicked()
        {
            action = Some(OptionsAction::Apply);
        }

        if ui.button("📂 Load...").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("JSON", &["json"])
                .pick_file()
            {
                action = Some(OptionsAction::Load(path));
            }
        }

        if ui.button("💾 Save...").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("JSON", &["json"])
                .set_file_name("arrange_options.json")
                .save_file()
            {
                action = Some(OptionsAction::Save(path));
            }
        }
    });

    action
}
