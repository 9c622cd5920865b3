use pdf_arrange::ArrangeOptions;
use pdf_async_runtime::{PdfCommand, PdfUpdate};
use tokio::sync::mpsc;

use crate::handlers::arrange::{self, WorkerState};

/// Async worker task that processes PDF commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<PdfCommand>,
    update_tx: mpsc::UnboundedSender<PdfUpdate>,
) {
    let mut state = WorkerState::new(ArrangeOptions::default());

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut state, &mut command_rx, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: PdfCommand,
    state: &mut WorkerState,
    command_rx: &mut mpsc::UnboundedReceiver<PdfCommand>,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    match cmd {
        PdfCommand::ArrangeLoad { path } => {
            arrange::handle_load(path, state, update_tx).await;
        }
        #[cfg(feature = "thumbnails")]
        PdfCommand::ArrangeRenderThumbnail {
            doc_id,
            original_index,
            rotation,
        } => {
            // Batch every render already queued so one frame's requests share
            // a single progress run; queued prefetches yield to them
            let mut pages = vec![(original_index, rotation)];
            while let Ok(next_cmd) = command_rx.try_recv() {
                match next_cmd {
                    PdfCommand::ArrangeRenderThumbnail {
                        doc_id: next_doc,
                        original_index,
                        rotation,
                    } if next_doc == doc_id => {
                        if !pages.contains(&(original_index, rotation)) {
                            pages.push((original_index, rotation));
                        }
                    }
                    PdfCommand::ArrangePrefetchThumbnails { .. } => {
                        log::debug!("Discarding prefetch while thumbnails are pending");
                    }
                    other => {
                        Box::pin(process_command(other, state, command_rx, update_tx)).await;
                    }
                }
            }

            arrange::handle_render_thumbnails(doc_id, pages, state, update_tx).await;
        }
        #[cfg(feature = "thumbnails")]
        PdfCommand::ArrangePrefetchThumbnails { doc_id, pages } => {
            arrange::handle_prefetch_thumbnails(doc_id, pages, state).await;
        }
        #[cfg(not(feature = "thumbnails"))]
        PdfCommand::ArrangeRenderThumbnail { .. } | PdfCommand::ArrangePrefetchThumbnails { .. } => {
            arrange::handle_thumbnails_unavailable(update_tx).await;
        }
        PdfCommand::ArrangeExport {
            doc_id,
            instructions,
            output_path,
        } => {
            arrange::handle_export(doc_id, instructions, output_path, state, update_tx).await;
        }
        PdfCommand::ArrangeLoadConfig { path } => {
            arrange::handle_load_config(path, state, update_tx).await;
        }
        PdfCommand::ArrangeSetOptions { options } => {
            arrange::handle_set_options(options, state, update_tx).await;
        }
        PdfCommand::ArrangeClose { doc_id } => {
            arrange::handle_close(doc_id, state, update_tx).await;
        }
    }
}
