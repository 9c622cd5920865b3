use std::path::PathBuf;
use thiserror::Error;

// Re-export types from library crates
pub use pdf_arrange::{ArrangeOptions, ExportInstruction, Rotation};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum PdfCommand {
    ArrangeLoad {
        path: PathBuf,
    },
    ArrangeRenderThumbnail {
        doc_id: DocumentId,
        original_index: usize,
        rotation: Rotation,
    },
    /// Warm the thumbnail cache (lower priority than direct renders)
    ArrangePrefetchThumbnails {
        doc_id: DocumentId,
        pages: Vec<(usize, Rotation)>,
    },
    ArrangeExport {
        doc_id: DocumentId,
        instructions: Vec<ExportInstruction>,
        output_path: PathBuf,
    },
    ArrangeLoadConfig {
        path: PathBuf,
    },
    ArrangeSetOptions {
        options: ArrangeOptions,
    },
    ArrangeClose {
        doc_id: DocumentId,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum PdfUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    ArrangeLoaded {
        doc_id: DocumentId,
        path: PathBuf,
        page_count: usize,
    },
    ArrangeThumbnailRendered {
        doc_id: DocumentId,
        original_index: usize,
        rotation: Rotation,
        width: usize,
        height: usize,
        rgba_data: Vec<u8>,
    },
    /// A requested thumbnail could not be rendered
    ArrangeThumbnailFailed {
        doc_id: DocumentId,
        original_index: usize,
        rotation: Rotation,
        message: String,
    },
    ArrangeExportComplete {
        path: PathBuf,
        page_count: usize,
    },
    ArrangeExportFailed {
        path: PathBuf,
        message: String,
    },
    ArrangeConfigLoaded {
        options: ArrangeOptions,
    },
    ArrangeClosed {
        doc_id: DocumentId,
    },
    Error {
        message: String,
    },
}

/// Handle to a loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

/// Failure to reach the background worker
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("PDF worker is no longer running")]
    WorkerGone,
}

/// UI-side handle for sending commands to the worker
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: tokio::sync::mpsc::UnboundedSender<PdfCommand>,
}

impl CommandSender {
    pub fn new(tx: tokio::sync::mpsc::UnboundedSender<PdfCommand>) -> Self {
        Self { tx }
    }

    pub fn send(&self, command: PdfCommand) -> Result<(), RuntimeError> {
        self.tx.send(command).map_err(|_| RuntimeError::WorkerGone)
    }
}
