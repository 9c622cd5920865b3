use pdf_arrange::{
    ArrangeOptions, AuthoringBackend, LopdfAuthor, Rotation, SourceDocument, save_pdf,
};
use pdf_async_runtime::{DocumentId, ExportInstruction, PdfUpdate};
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::thumbnails::{ThumbnailKey, ThumbnailStore};

#[cfg(feature = "thumbnails")]
use crate::thumbnails::PdfiumRenderer;
#[cfg(feature = "thumbnails")]
use pdf_arrange::PreviewRenderer;

/// Everything the worker keeps between commands
pub struct WorkerState {
    pub store: ThumbnailStore,
    pub options: ArrangeOptions,
}

impl WorkerState {
    pub fn new(options: ArrangeOptions) -> Self {
        Self {
            store: ThumbnailStore::new(options.max_cached_thumbnails),
            options,
        }
    }

    /// Cache key for a page shown at the user's `rotation`. Pdfium already
    /// applies the page's own `/Rotate`, so the key holds the rotation the
    /// renderer is asked for under the current rotation mode.
    fn thumbnail_key(
        &self,
        doc_id: DocumentId,
        original_index: usize,
        rotation: Rotation,
    ) -> Option<ThumbnailKey> {
        let source = self.store.document(doc_id)?;
        let preview =
            source.preview_rotation(original_index, rotation, self.options.rotation_mode);
        Some((doc_id, original_index, preview, self.options.thumbnail_width))
    }
}

fn send_error(update_tx: &mpsc::UnboundedSender<PdfUpdate>, message: String) {
    log::error!("{}", message);
    let _ = update_tx.send(PdfUpdate::Error { message });
}

pub async fn handle_load(
    path: PathBuf,
    state: &mut WorkerState,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    match SourceDocument::load(&path).await {
        Ok(source) => {
            let page_count = source.page_count();
            let doc_id = state.store.add_document(source);
            let _ = update_tx.send(PdfUpdate::ArrangeLoaded {
                doc_id,
                path,
                page_count,
            });
        }
        Err(e) => send_error(update_tx, format!("Failed to load {}: {}", path.display(), e)),
    }
}

/// Render one thumbnail, consulting the cache first
#[cfg(feature = "thumbnails")]
async fn render_thumbnail(
    doc_id: DocumentId,
    original_index: usize,
    rotation: Rotation,
    state: &mut WorkerState,
) -> Result<pdf_arrange::RasterImage, String> {
    let key = state
        .thumbnail_key(doc_id, original_index, rotation)
        .ok_or_else(|| format!("Document not found: {:?}", doc_id))?;
    if let Some(cached) = state.store.get(&key) {
        return Ok(cached.clone());
    }

    let source = state
        .store
        .document(doc_id)
        .ok_or_else(|| format!("Document not found: {:?}", doc_id))?;
    let renderer = PdfiumRenderer::new(source);
    let (_, _, preview, width) = key;

    let image = tokio::task::spawn_blocking(move || {
        renderer
            .render_preview(original_index, preview, width)
            .map_err(|e| format!("Failed to render page {}: {}", original_index + 1, e))
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))??;

    state.store.insert(key, image.clone());
    log::debug!(
        "Rendered page {} at {} ({} thumbnails cached)",
        original_index + 1,
        rotation,
        state.store.len()
    );
    Ok(image)
}

#[cfg(feature = "thumbnails")]
pub async fn handle_render_thumbnails(
    doc_id: DocumentId,
    pages: Vec<(usize, Rotation)>,
    state: &mut WorkerState,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let total = pages.len();
    for (done, (original_index, rotation)) in pages.into_iter().enumerate() {
        if total > 1 {
            let _ = update_tx.send(PdfUpdate::Progress {
                operation: "Rendering thumbnails".to_string(),
                current: done,
                total,
            });
        }

        match render_thumbnail(doc_id, original_index, rotation, state).await {
            Ok(image) => {
                let _ = update_tx.send(PdfUpdate::ArrangeThumbnailRendered {
                    doc_id,
                    original_index,
                    rotation,
                    width: image.width,
                    height: image.height,
                    rgba_data: image.rgba_data,
                });
            }
            Err(message) => {
                log::error!("{}", message);
                let _ = update_tx.send(PdfUpdate::ArrangeThumbnailFailed {
                    doc_id,
                    original_index,
                    rotation,
                    message,
                });
            }
        }
    }
}

/// Warm the cache without sending updates to the UI
#[cfg(feature = "thumbnails")]
pub async fn handle_prefetch_thumbnails(
    doc_id: DocumentId,
    pages: Vec<(usize, Rotation)>,
    state: &mut WorkerState,
) {
    for (original_index, rotation) in pages {
        if state
            .thumbnail_key(doc_id, original_index, rotation)
            .is_some_and(|key| state.store.contains(&key))
        {
            continue;
        }
        match render_thumbnail(doc_id, original_index, rotation, state).await {
            Ok(_) => log::debug!("Prefetched page {} ({})", original_index + 1, rotation),
            Err(message) => log::warn!("Prefetch failed: {}", message),
        }
    }
}

#[cfg(not(feature = "thumbnails"))]
pub async fn handle_thumbnails_unavailable(update_tx: &mpsc::UnboundedSender<PdfUpdate>) {
    let _ = update_tx.send(PdfUpdate::Error {
        message: "Thumbnails not available (thumbnails feature disabled)".to_string(),
    });
}

pub async fn handle_export(
    doc_id: DocumentId,
    instructions: Vec<ExportInstruction>,
    output_path: PathBuf,
    state: &WorkerState,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let fail = |message: String| {
        log::error!("{}", message);
        let _ = update_tx.send(PdfUpdate::ArrangeExportFailed {
            path: output_path.clone(),
            message,
        });
    };

    let Some(source) = state.store.document(doc_id) else {
        fail(format!("Document not found: {:?}", doc_id));
        return;
    };

    let page_count = instructions.len();
    let _ = update_tx.send(PdfUpdate::Progress {
        operation: format!("Exporting {} pages", page_count),
        current: 0,
        total: 2,
    });

    let author = LopdfAuthor::new(state.options.rotation_mode);
    let bytes = source.shared_bytes();
    let result =
        tokio::task::spawn_blocking(move || author.build_document(&bytes, &instructions)).await;

    let output = match result {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            fail(format!("Export failed: {}", e));
            return;
        }
        Err(e) => {
            fail(format!("Task join error: {}", e));
            return;
        }
    };

    let _ = update_tx.send(PdfUpdate::Progress {
        operation: format!("Writing {}", output_path.display()),
        current: 1,
        total: 2,
    });

    match save_pdf(&output, &output_path).await {
        Ok(()) => {
            log::info!("Exported {} pages → {}", page_count, output_path.display());
            let _ = update_tx.send(PdfUpdate::ArrangeExportComplete {
                path: output_path.clone(),
                page_count,
            });
        }
        Err(e) => fail(format!("Failed to save {}: {}", output_path.display(), e)),
    }
}

pub async fn handle_load_config(
    path: PathBuf,
    state: &mut WorkerState,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    match ArrangeOptions::load(&path).await {
        Ok(options) => {
            log::info!("Loaded options from {}", path.display());
            apply_options(options.clone(), state);
            let _ = update_tx.send(PdfUpdate::ArrangeConfigLoaded { options });
        }
        Err(e) => send_error(
            update_tx,
            format!("Failed to load options from {}: {}", path.display(), e),
        ),
    }
}

pub async fn handle_set_options(
    options: ArrangeOptions,
    state: &mut WorkerState,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    match options.validate() {
        Ok(()) => apply_options(options, state),
        Err(e) => send_error(update_tx, format!("Invalid options: {}", e)),
    }
}

fn apply_options(options: ArrangeOptions, state: &mut WorkerState) {
    state.store.set_capacity(options.max_cached_thumbnails);
    state.options = options;
}

pub async fn handle_close(
    doc_id: DocumentId,
    state: &mut WorkerState,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    if state.store.remove_document(doc_id) {
        log::info!("Closed document {:?}", doc_id);
    }
    let _ = update_tx.send(PdfUpdate::ArrangeClosed { doc_id });
}
