use eframe::egui;
use pdf_arrange::{
    ArrangeError, ArrangeOptions, DragController, DragOutcome, ExportPlanner, PageCollection,
    Point, Rect, Rotation,
};
use pdf_async_runtime::{CommandSender, DocumentId, PdfCommand};
use lru::LruCache;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::thumbnails::cache_capacity;
use crate::ui_components::{fit_within, tool_button};

const THUMBNAILS_ENABLED: bool = cfg!(feature = "thumbnails");

/// Height of the thumbnail box relative to its width (US Letter is ~1.29)
const THUMBNAIL_ASPECT: f32 = 1.3;

pub type ThumbnailId = (usize, Rotation);

/// Editing session for one opened document
pub struct ArrangeState {
    pub doc_id: DocumentId,
    pub path: PathBuf,
    pub source_pages: usize,
    pub collection: PageCollection,
    pub drag: DragController,
    pub export_in_flight: bool,
    /// Uploaded thumbnails, bounded by `max_cached_thumbnails`
    textures: LruCache<ThumbnailId, egui::TextureHandle>,
    requested: HashSet<ThumbnailId>,
    prefetched: HashSet<ThumbnailId>,
    /// Renders the worker gave up on; not requested again until a reset
    failed: HashSet<ThumbnailId>,
}

impl ArrangeState {
    pub fn new(
        doc_id: DocumentId,
        path: PathBuf,
        page_count: usize,
        max_textures: usize,
    ) -> Result<Self, ArrangeError> {
        Ok(Self {
            doc_id,
            path,
            source_pages: page_count,
            collection: PageCollection::new(page_count)?,
            drag: DragController::new(),
            export_in_flight: false,
            textures: LruCache::new(cache_capacity(max_textures)),
            requested: HashSet::new(),
            prefetched: HashSet::new(),
            failed: HashSet::new(),
        })
    }

    pub fn store_thumbnail(
        &mut self,
        ctx: &egui::Context,
        original_index: usize,
        rotation: Rotation,
        size: [usize; 2],
        rgba_data: &[u8],
    ) {
        let image = egui::ColorImage::from_rgba_unmultiplied(size, rgba_data);
        let texture = ctx.load_texture(
            format!("thumb-{}-{}", original_index, rotation.degrees()),
            image,
            egui::TextureOptions::LINEAR,
        );
        let id = (original_index, rotation);
        self.failed.remove(&id);
        if let Some((evicted, _)) = self.textures.push(id, texture) {
            if evicted != id {
                self.forget(&evicted);
            }
        }
    }

    /// The worker could not render this thumbnail
    pub fn thumbnail_failed(&mut self, original_index: usize, rotation: Rotation) {
        let id = (original_index, rotation);
        self.requested.remove(&id);
        self.failed.insert(id);
    }

    /// Bound the number of uploaded textures, dropping the least recently
    /// drawn ones first
    pub fn set_thumbnail_capacity(&mut self, max_textures: usize) {
        let capacity = cache_capacity(max_textures);
        while self.textures.len() > capacity.get() {
            match self.textures.pop_lru() {
                Some((evicted, _)) => self.forget(&evicted),
                None => break,
            }
        }
        self.textures.resize(capacity);
    }

    /// Forget every rendered thumbnail, e.g. after the thumbnail width changed
    pub fn clear_thumbnails(&mut self) {
        self.textures.clear();
        self.requested.clear();
        self.prefetched.clear();
        self.failed.clear();
    }

    /// True while some requested thumbnail hasn't arrived yet
    pub fn has_pending_thumbnails(&self) -> bool {
        self.requested.iter().any(|id| !self.textures.contains(id))
    }

    /// An evicted texture is requested again the next time it is drawn
    fn forget(&mut self, id: &ThumbnailId) {
        self.requested.remove(id);
    }

    fn should_request(&self, id: &ThumbnailId) -> bool {
        THUMBNAILS_ENABLED && !self.requested.contains(id) && !self.failed.contains(id)
    }

    fn controls_enabled(&self) -> bool {
        !self.export_in_flight
    }
}

/// Something the user asked for while the grid was being drawn. Applied
/// after the pass so the model isn't mutated while its entries are borrowed.
enum PageAction {
    Toggle(usize),
    Rotate(usize),
    RotateCounterClockwise(usize),
    Delete(usize),
    BeginDrag(usize),
}

fn dispatch(commands: &CommandSender, command: PdfCommand, status: &mut String) -> bool {
    match commands.send(command) {
        Ok(()) => true,
        Err(e) => {
            log::error!("{}", e);
            *status = e.to_string();
            false
        }
    }
}

fn report(result: Result<String, ArrangeError>, status: &mut String) {
    match result {
        Ok(message) => {
            log::info!("{}", message);
            *status = message;
        }
        Err(e) => {
            log::warn!("{}", e);
            *status = e.to_string();
        }
    }
}

pub fn show_arrange(
    ui: &mut egui::Ui,
    arrange: &mut Option<ArrangeState>,
    options: &ArrangeOptions,
    commands: &CommandSender,
    status: &mut String,
) {
    let Some(state) = arrange else {
        show_empty(ui, commands, status);
        return;
    };

    show_toolbar(ui, state, options, commands, status);
    ui.separator();

    let actions = ui
        .add_enabled_ui(state.controls_enabled(), |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| show_grid(ui, state, options, commands, status))
                .inner
        })
        .inner;

    apply_actions(state, actions, status);
}

fn show_empty(ui: &mut egui::Ui, commands: &CommandSender, status: &mut String) {
    ui.vertical_centered(|ui| {
        ui.add_space(50.0);
        ui.heading("Arrange Pages");
        ui.add_space(20.0);
        ui.label("Drop a PDF file here or click to open");
        ui.add_space(10.0);

        if ui.button("📂 Open PDF...").clicked() {
            open_document(commands, status);
        }
    });
}

pub fn open_document(commands: &CommandSender, status: &mut String) {
    if let Some(path) = rfd::FileDialog::new()
        .add_filter("PDF", &["pdf"])
        .pick_file()
    {
        if dispatch(commands, PdfCommand::ArrangeLoad { path }, status) {
            *status = "Loading PDF...".to_string();
        }
    }
}

fn show_toolbar(
    ui: &mut egui::Ui,
    state: &mut ArrangeState,
    options: &ArrangeOptions,
    commands: &CommandSender,
    status: &mut String,
) {
    let enabled = state.controls_enabled() && state.drag.active().is_none();
    let selected = state.collection.selection().len();

    // Keyboard shortcuts share the toolbar's enablement
    let (select_all_key, delete_key) = if enabled {
        ui.input_mut(|i| {
            (
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::A),
                i.consume_key(egui::Modifiers::NONE, egui::Key::Delete),
            )
        })
    } else {
        (false, false)
    };

    ui.horizontal_wrapped(|ui| {
        ui.label(format!(
            "{} of {} pages · {} selected",
            state.collection.len(),
            state.source_pages,
            selected
        ));
        ui.separator();

        if tool_button(ui, enabled, "☑ Select All", "Select every page (Ctrl+A)") || select_all_key
        {
            state.collection.select_all();
        }
        if tool_button(ui, enabled && selected > 0, "☐ Deselect All", "Clear the selection") {
            state.collection.deselect_all();
        }
        if tool_button(ui, enabled && selected > 0, "⟳ Rotate Selected", "Rotate selected pages 90° clockwise") {
            let result = state
                .collection
                .rotate_selected()
                .map(|count| format!("Rotated {} pages", count));
            report(result, status);
        }
        if tool_button(ui, enabled && selected > 0, "🗑 Delete Selected", "Delete selected pages (Del)")
            || (delete_key && selected > 0)
        {
            let result = state
                .collection
                .delete_selected()
                .map(|removed| format!("Deleted {} pages", removed.len()));
            report(result, status);
        }
        if tool_button(ui, enabled, "↺ Reset", "Restore the source page order and rotation") {
            report(
                PageCollection::new(state.source_pages).map(|fresh| {
                    state.collection = fresh;
                    "Restored source order".to_string()
                }),
                status,
            );
        }

        ui.separator();

        if tool_button(ui, enabled, "💾 Export...", "Write the arranged pages to a new PDF") {
            start_export(state, options, commands, status);
        }
        if tool_button(ui, enabled, "✖ Close", "Close this document") {
            dispatch(commands, PdfCommand::ArrangeClose { doc_id: state.doc_id }, status);
        }

        if state.export_in_flight {
            ui.spinner();
            ui.label("Exporting...");
        }
    });
}

fn start_export(
    state: &mut ArrangeState,
    options: &ArrangeOptions,
    commands: &CommandSender,
    status: &mut String,
) {
    let suggested = options.default_output_path(&state.path);
    let mut dialog = rfd::FileDialog::new().add_filter("PDF", &["pdf"]);
    if let Some(dir) = suggested.parent() {
        dialog = dialog.set_directory(dir);
    }
    if let Some(name) = suggested.file_name().and_then(|name| name.to_str()) {
        dialog = dialog.set_file_name(name);
    }
    let Some(output_path) = dialog.save_file() else {
        return;
    };

    if output_path == state.path {
        *status = "Choose a different file than the source PDF".to_string();
        return;
    }

    let instructions = match ExportPlanner::plan(&state.collection) {
        Ok(instructions) => instructions,
        Err(e) => {
            report(Err(e), status);
            return;
        }
    };

    let command = PdfCommand::ArrangeExport {
        doc_id: state.doc_id,
        instructions,
        output_path,
    };
    if dispatch(commands, command, status) {
        state.export_in_flight = true;
        *status = "Exporting...".to_string();
    }
}

/// Draw every page card in model order and collect the user's actions.
/// Card rectangles double as the drop-target bounds for the drag session.
fn show_grid(
    ui: &mut egui::Ui,
    state: &mut ArrangeState,
    options: &ArrangeOptions,
    commands: &CommandSender,
    status: &mut String,
) -> Vec<PageAction> {
    let thumb_width = options.thumbnail_width as f32;
    let thumb_size = egui::vec2(thumb_width, thumb_width * THUMBNAIL_ASPECT);
    let dragging = state.drag.active().map(|session| session.start());
    let can_delete = state.collection.len() > 1;

    let mut actions = Vec::new();
    let mut bounds = Vec::with_capacity(state.collection.len());
    let mut prefetch = Vec::new();

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(10.0, 10.0);

        let entries = state.collection.entries().to_vec();
        for (position, entry) in entries.iter().enumerate() {
            let id: ThumbnailId = (entry.original_index(), entry.rotation());
            let selected = state.collection.is_selected(position);

            let fill = if Some(position) == dragging {
                ui.visuals().widgets.active.weak_bg_fill
            } else if selected {
                ui.visuals().selection.bg_fill.gamma_multiply(0.4)
            } else {
                ui.visuals().faint_bg_color
            };

            let card = egui::Frame::group(ui.style()).fill(fill).show(ui, |ui| {
                ui.set_width(thumb_size.x);
                ui.vertical(|ui| {
                    let (rect, response) =
                        ui.allocate_exact_size(thumb_size, egui::Sense::click_and_drag());
                    paint_thumbnail(ui, rect, state.textures.get(&id), position);

                    if response.drag_started() {
                        actions.push(PageAction::BeginDrag(position));
                    } else if response.clicked() {
                        actions.push(PageAction::Toggle(position));
                    }

                    if state.should_request(&id) {
                        if ui.is_rect_visible(rect) {
                            let command = PdfCommand::ArrangeRenderThumbnail {
                                doc_id: state.doc_id,
                                original_index: id.0,
                                rotation: id.1,
                            };
                            if dispatch(commands, command, status) {
                                state.requested.insert(id);
                            }
                        } else if !state.prefetched.contains(&id) {
                            prefetch.push(id);
                        }
                    }

                    ui.horizontal(|ui| {
                        let mut checked = selected;
                        if ui.checkbox(&mut checked, format!("{}", position + 1)).changed() {
                            actions.push(PageAction::Toggle(position));
                        }
                        if ui.small_button("⟲").on_hover_text("Rotate left").clicked() {
                            actions.push(PageAction::RotateCounterClockwise(position));
                        }
                        if ui.small_button("⟳").on_hover_text("Rotate right").clicked() {
                            actions.push(PageAction::Rotate(position));
                        }
                        if ui
                            .add_enabled(can_delete, egui::Button::new("🗑").small())
                            .on_hover_text("Delete page")
                            .clicked()
                        {
                            actions.push(PageAction::Delete(position));
                        }
                    });

                    let mut caption = format!("source p. {}", entry.original_index() + 1);
                    if entry.rotation() != Rotation::None {
                        caption.push_str(&format!(" · {}", entry.rotation()));
                    }
                    ui.weak(caption);
                });
            });

            let rect = card.response.rect;
            bounds.push(Rect::new(rect.min.x, rect.min.y, rect.width(), rect.height()));
        }
    });

    if !prefetch.is_empty() {
        let command = PdfCommand::ArrangePrefetchThumbnails {
            doc_id: state.doc_id,
            pages: prefetch.clone(),
        };
        if dispatch(commands, command, status) {
            state.prefetched.extend(prefetch);
        }
    }

    track_drag(ui, state, &bounds, status);
    actions
}

fn paint_thumbnail(
    ui: &egui::Ui,
    rect: egui::Rect,
    texture: Option<&egui::TextureHandle>,
    position: usize,
) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 2.0, ui.visuals().extreme_bg_color);

    match texture {
        Some(texture) => {
            let size = fit_within(texture.size_vec2(), rect.size());
            let image_rect = egui::Rect::from_center_size(rect.center(), size);
            painter.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                format!("{}", position + 1),
                egui::FontId::proportional(24.0),
                ui.visuals().weak_text_color(),
            );
        }
    }
}

/// Feed the pointer to the active drag session, draw the insertion marker and
/// finish the gesture on release (drop) or Escape (cancel).
fn track_drag(ui: &egui::Ui, state: &mut ArrangeState, bounds: &[Rect], status: &mut String) {
    let Some(start) = state.drag.active().map(|session| session.start()) else {
        return;
    };

    ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);

    if let Some(pointer) = ui.ctx().pointer_interact_pos() {
        state.drag.hover(Point::new(pointer.x, pointer.y), bounds);
    }

    if let Some(candidate) = state.drag.active().map(|session| session.candidate()) {
        if candidate != start {
            if let Some(target) = bounds.get(candidate) {
                // The page lands after the target when moving forward, before it otherwise
                let x = if candidate > start {
                    target.right() + 4.0
                } else {
                    target.x - 4.0
                };
                let stroke = egui::Stroke::new(3.0, ui.visuals().selection.stroke.color);
                ui.painter().line_segment(
                    [egui::pos2(x, target.y), egui::pos2(x, target.bottom())],
                    stroke,
                );
            }
        }
    }

    let (released, escaped) =
        ui.input(|i| (i.pointer.any_released(), i.key_pressed(egui::Key::Escape)));
    if !released && !escaped {
        return;
    }

    match state.drag.finish(&mut state.collection, !escaped) {
        Ok(DragOutcome::Moved { from, to }) => {
            report(Ok(format!("Moved page {} to position {}", from + 1, to + 1)), status);
        }
        Ok(DragOutcome::Unchanged) => {}
        Err(e) => report(Err(e), status),
    }
}

fn apply_actions(state: &mut ArrangeState, actions: Vec<PageAction>, status: &mut String) {
    for action in actions {
        let result = match action {
            PageAction::Toggle(position) => state.collection.toggle(position).map(|selected| {
                format!(
                    "{} page {}",
                    if selected { "Selected" } else { "Deselected" },
                    position + 1
                )
            }),
            PageAction::Rotate(position) => state
                .collection
                .rotate(position)
                .map(|rotation| format!("Page {} rotated to {}", position + 1, rotation)),
            PageAction::RotateCounterClockwise(position) => state
                .collection
                .rotate_counter_clockwise(position)
                .map(|rotation| format!("Page {} rotated to {}", position + 1, rotation)),
            PageAction::Delete(position) => state
                .collection
                .delete_at(position)
                .map(|removed| {
                    format!(
                        "Deleted page {} (source p. {})",
                        position + 1,
                        removed.original_index() + 1
                    )
                }),
            PageAction::BeginDrag(position) => {
                if let Err(e) = state.drag.begin(&state.collection, position) {
                    report(Err(e), status);
                }
                continue;
            }
        };
        report(result, status);
    }
}
