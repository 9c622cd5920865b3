use eframe::egui;
use pdf_arrange::ArrangeOptions;
use pdf_async_runtime::{CommandSender, PdfCommand, PdfUpdate};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::logger::AppLogger;
use crate::views::{
    ArrangeState, OptionsAction, open_document, show_arrange, show_log_panel, show_options,
};

#[derive(Clone)]
struct ProgressState {
    operation: String,
    current: usize,
    total: usize,
}

pub struct PdfToolsApp {
    arrange: Option<ArrangeState>,
    options: ArrangeOptions,
    options_draft: ArrangeOptions,
    status: String,
    loading: bool,

    // Async infrastructure
    commands: CommandSender,
    update_rx: mpsc::UnboundedReceiver<PdfUpdate>,
    tokio_handle: tokio::runtime::Handle,

    progress: Option<ProgressState>,

    logger: AppLogger,
    show_log: bool,
    show_options: bool,
}

impl PdfToolsApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        tokio_handle: tokio::runtime::Handle,
        logger: AppLogger,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        tokio_handle.spawn(crate::worker::worker_task(command_rx, update_tx));

        Self {
            arrange: None,
            options: ArrangeOptions::default(),
            options_draft: ArrangeOptions::default(),
            status: String::new(),
            loading: false,
            commands: CommandSender::new(command_tx),
            update_rx,
            tokio_handle,
            progress: None,
            logger,
            show_log: false,
            show_options: false,
        }
    }

    fn send(&mut self, command: PdfCommand) {
        if let Err(e) = self.commands.send(command) {
            log::error!("{}", e);
            self.status = e.to_string();
        }
    }

    fn load(&mut self, path: std::path::PathBuf) {
        self.status = format!("Loading {}...", path.display());
        self.loading = true;
        self.send(PdfCommand::ArrangeLoad { path });
    }

    /// Switch to new options, dropping thumbnails rendered at another width
    /// or under another rotation mode
    fn set_options(&mut self, options: ArrangeOptions) {
        if let Some(state) = &mut self.arrange {
            if options.thumbnail_width != self.options.thumbnail_width
                || options.rotation_mode != self.options.rotation_mode
            {
                state.clear_thumbnails();
            }
            state.set_thumbnail_capacity(options.max_cached_thumbnails);
        }
        self.options_draft = options.clone();
        self.options = options;
    }

    fn process_updates(&mut self, ctx: &egui::Context) {
        while let Ok(update) = self.update_rx.try_recv() {
            match update {
                PdfUpdate::Progress {
                    operation,
                    current,
                    total,
                } => {
                    self.progress = Some(ProgressState {
                        operation,
                        current,
                        total,
                    });
                    ctx.request_repaint();
                    continue;
                }
                PdfUpdate::ArrangeLoaded {
                    doc_id,
                    path,
                    page_count,
                } => {
                    self.loading = false;
                    if let Some(previous) = self.arrange.take() {
                        self.send(PdfCommand::ArrangeClose {
                            doc_id: previous.doc_id,
                        });
                    }
                    match ArrangeState::new(
                        doc_id,
                        path.clone(),
                        page_count,
                        self.options.max_cached_thumbnails,
                    ) {
                        Ok(state) => {
                            self.arrange = Some(state);
                            self.status = format!(
                                "Loaded {} with {} pages",
                                path.display(),
                                page_count
                            );
                        }
                        Err(e) => self.status = format!("Error: {e}"),
                    }
                }
                PdfUpdate::ArrangeThumbnailRendered {
                    doc_id,
                    original_index,
                    rotation,
                    width,
                    height,
                    rgba_data,
                } => {
                    if let Some(state) = &mut self.arrange {
                        if state.doc_id == doc_id {
                            state.store_thumbnail(
                                ctx,
                                original_index,
                                rotation,
                                [width, height],
                                &rgba_data,
                            );
                        }
                    }
                }
                PdfUpdate::ArrangeThumbnailFailed {
                    doc_id,
                    original_index,
                    rotation,
                    message,
                } => {
                    if let Some(state) = &mut self.arrange {
                        if state.doc_id == doc_id {
                            state.thumbnail_failed(original_index, rotation);
                        }
                    }
                    self.status = message;
                }
                PdfUpdate::ArrangeExportComplete { path, page_count } => {
                    if let Some(state) = &mut self.arrange {
                        state.export_in_flight = false;
                    }
                    self.status = format!("Exported {} pages → {}", page_count, path.display());
                }
                PdfUpdate::ArrangeExportFailed { path, message } => {
                    if let Some(state) = &mut self.arrange {
                        state.export_in_flight = false;
                    }
                    self.status = format!("Export to {} failed: {message}", path.display());
                }
                PdfUpdate::ArrangeConfigLoaded { options } => {
                    self.set_options(options);
                    self.status = "Options loaded".to_string();
                }
                PdfUpdate::ArrangeClosed { doc_id } => {
                    if self.arrange.as_ref().is_some_and(|s| s.doc_id == doc_id) {
                        self.arrange = None;
                        self.status = "Closed PDF".to_string();
                    }
                }
                PdfUpdate::Error { message } => {
                    self.loading = false;
                    self.status = format!("Error: {message}");
                }
            }
            self.progress = None;
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<std::path::PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("pdf"))
                .collect()
        });

        let busy = self.arrange.as_ref().is_some_and(|s| s.export_in_flight);
        // Only one document is edited at a time; the last dropped file wins
        if let Some(path) = dropped.into_iter().last() {
            if busy {
                self.status = "Wait for the export to finish before opening another PDF".into();
            } else {
                self.load(path);
            }
        }
    }

    fn handle_options_action(&mut self, action: OptionsAction) {
        match action {
            OptionsAction::Apply => {
                let options = self.options_draft.clone();
                self.send(PdfCommand::ArrangeSetOptions {
                    options: options.clone(),
                });
                self.set_options(options);
                self.status = "Options applied".to_string();
            }
            OptionsAction::Load(path) => {
                self.send(PdfCommand::ArrangeLoadConfig { path });
            }
            OptionsAction::Save(path) => {
                let options = self.options_draft.clone();
                self.tokio_handle.spawn(async move {
                    match options.save(&path).await {
                        Ok(()) => log::info!("Saved options to {}", path.display()),
                        Err(e) => log::error!("Failed to save {}: {}", path.display(), e),
                    }
                });
            }
        }
    }

    fn awaiting_worker(&self) -> bool {
        self.loading
            || self.progress.is_some()
            || self
                .arrange
                .as_ref()
                .is_some_and(|s| s.export_in_flight || s.has_pending_thumbnails())
    }
}

impl eframe::App for PdfToolsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.process_updates(ctx);

        let busy = self.arrange.as_ref().is_some_and(|s| s.export_in_flight);

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!busy, egui::Button::new("📂 Open PDF..."))
                    .clicked()
                {
                    open_document(&self.commands, &mut self.status);
                }
                ui.separator();
                ui.toggle_value(&mut self.show_options, "⚙ Options");
                ui.toggle_value(&mut self.show_log, "📜 Log");
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if let Some(ref progress) = self.progress {
                ui.label(&progress.operation);
                ui.add(
                    egui::ProgressBar::new(progress.current as f32 / progress.total.max(1) as f32)
                        .show_percentage(),
                );
            }

            let status = if self.status.is_empty() {
                self.logger.latest().map(|entry| entry.message).unwrap_or_default()
            } else {
                self.status.clone()
            };
            ui.label(status);
        });

        if self.show_log {
            egui::TopBottomPanel::bottom("log")
                .resizable(true)
                .default_height(160.0)
                .show(ctx, |ui| show_log_panel(ui, &self.logger));
        }

        let mut options_action = None;
        egui::Window::new("Options")
            .open(&mut self.show_options)
            .resizable(false)
            .show(ctx, |ui| {
                options_action = show_options(ui, &mut self.options_draft);
            });
        if let Some(action) = options_action {
            self.handle_options_action(action);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            show_arrange(
                ui,
                &mut self.arrange,
                &self.options,
                &self.commands,
                &mut self.status,
            );
        });

        if self.awaiting_worker() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
