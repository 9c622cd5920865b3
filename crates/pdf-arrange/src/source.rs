//! Source document I/O

use crate::author::{LopdfAuthor, page_rotation};
use crate::collection::PageCollection;
use crate::export::{AuthoringBackend, ExportPlanner};
use crate::options::{ArrangeOptions, RotationMode};
use crate::types::*;
use lopdf::Document;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A loaded source document. The bytes are never modified; every export is
/// built from them afresh.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: Option<PathBuf>,
    bytes: Arc<Vec<u8>>,
    /// Own `/Rotate` of each source page, in source order
    rotations: Vec<Rotation>,
}

impl SourceDocument {
    /// Read a PDF from disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_owned();
        let bytes = tokio::fs::read(&path).await?;
        let mut source = Self::from_bytes(bytes).await?;
        log::info!(
            "Loaded {} ({} pages)",
            path.display(),
            source.page_count()
        );
        source.path = Some(path);
        Ok(source)
    }

    /// Parse PDF bytes already in memory
    pub async fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let bytes = Arc::new(bytes);
        let parse_bytes = Arc::clone(&bytes);
        let rotations = tokio::task::spawn_blocking(move || {
            let doc = Document::load_mem(&parse_bytes)?;
            let mut rotations = Vec::new();
            for page_id in doc.get_pages().into_values() {
                let page = doc.get_dictionary(page_id)?;
                rotations.push(page_rotation(&doc, page));
            }
            Ok::<_, ArrangeError>(rotations)
        })
        .await??;

        if rotations.is_empty() {
            return Err(ArrangeError::NoPages);
        }

        Ok(Self {
            path: None,
            bytes,
            rotations,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn page_count(&self) -> usize {
        self.rotations.len()
    }

    /// The `/Rotate` a source page carries before any editing
    pub fn source_rotation(&self, original_index: usize) -> Option<Rotation> {
        self.rotations.get(original_index).copied()
    }

    /// Rotation to hand a renderer that already honours the page's own
    /// `/Rotate`, so the preview matches what `mode` will export
    pub fn preview_rotation(
        &self,
        original_index: usize,
        user: Rotation,
        mode: RotationMode,
    ) -> Rotation {
        let source = self.source_rotation(original_index).unwrap_or_default();
        mode.preview(source, user)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn shared_bytes(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.bytes)
    }

    /// Initial arrangement: every page in source order, unrotated
    pub fn new_collection(&self) -> Result<PageCollection> {
        PageCollection::new(self.page_count())
    }
}

/// Build the output document for `collection` from `source`
pub async fn export_pdf(
    source: &SourceDocument,
    collection: &PageCollection,
    options: &ArrangeOptions,
) -> Result<Vec<u8>> {
    let instructions = ExportPlanner::plan(collection)?;
    let bytes = source.shared_bytes();
    let author = LopdfAuthor::new(options.rotation_mode);

    let output =
        tokio::task::spawn_blocking(move || author.build_document(&bytes, &instructions))
            .await??;
    log::info!(
        "Built output document with {} pages ({} bytes)",
        collection.len(),
        output.len()
    );
    Ok(output)
}

/// Write output bytes to disk
pub async fn save_pdf(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, bytes).await?;
    log::info!("Saved {}", path.display());
    Ok(())
}
