#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use log::LevelFilter;

mod app;
mod handlers;
mod logger;
mod thumbnails;
mod ui_components;
mod views;
mod worker;

use logger::AppLogger;

const MAX_LOG_ENTRIES: usize = 500;

fn main() -> anyhow::Result<()> {
    let logger = AppLogger::new(MAX_LOG_ENTRIES, LevelFilter::Info);
    if let Err(e) = logger.clone().init() {
        eprintln!("Failed to install logger: {e}");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let tokio_handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_title("PDF Tools: Arrange Pages")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    log::info!("Starting PDF Tools");
    eframe::run_native(
        "PDF Tools",
        options,
        Box::new(move |cc| Ok(Box::new(app::PdfToolsApp::new(cc, tokio_handle, logger)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start the UI: {e}"))?;

    runtime.shutdown_timeout(std::time::Duration::from_secs(2));
    Ok(())
}
