use eframe::egui;

/// Button that is greyed out when `enabled` is false; returns true when clicked
pub fn tool_button(ui: &mut egui::Ui, enabled: bool, text: &str, hover: &str) -> bool {
    ui.add_enabled(enabled, egui::Button::new(text))
        .on_hover_text(hover)
        .on_disabled_hover_text(hover)
        .clicked()
}

/// Horizontal row of selectable buttons for enum choices
pub fn choice_buttons<T>(ui: &mut egui::Ui, label: &str, value: &mut T, choices: &[(T, &str)]) -> bool
where
    T: PartialEq + Copy,
{
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(label);
        for (choice, text) in choices {
            changed |= ui.selectable_value(value, *choice, *text).changed();
        }
    });
    changed
}

/// Slider with a leading label and unit suffix
pub fn labeled_slider<T>(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut T,
    range: std::ops::RangeInclusive<T>,
    suffix: &str,
) -> bool
where
    T: egui::emath::Numeric,
{
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::Slider::new(value, range).suffix(suffix)).changed()
    })
    .inner
}

/// Largest size with the aspect ratio of `image` that fits inside `bounds`
pub fn fit_within(image: egui::Vec2, bounds: egui::Vec2) -> egui::Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.x / image.x).min(bounds.y / image.y);
    image * scale
}
