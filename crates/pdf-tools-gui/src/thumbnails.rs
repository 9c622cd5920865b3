use pdf_arrange::{RasterImage, Rotation, SourceDocument};
use pdf_async_runtime::DocumentId;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;

#[cfg(feature = "thumbnails")]
use pdf_arrange::PreviewRenderer;
#[cfg(feature = "thumbnails")]
use pdfium_render::prelude::*;
#[cfg(feature = "thumbnails")]
use std::sync::Arc;

/// Initialize Pdfium, trying the vendored library first, then falling back to system
#[cfg(feature = "thumbnails")]
pub fn init_pdfium() -> Result<Pdfium, PdfiumError> {
    let vendor_path = std::env::current_dir()
        .ok()
        .map(|dir| dir.join("vendor/pdfium/lib"))
        .filter(|dir| dir.exists());

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Renders pages of one source document with pdfium
#[cfg(feature = "thumbnails")]
pub struct PdfiumRenderer {
    bytes: Arc<Vec<u8>>,
}

#[cfg(feature = "thumbnails")]
impl PdfiumRenderer {
    pub fn new(source: &SourceDocument) -> Self {
        Self {
            bytes: source.shared_bytes(),
        }
    }
}

#[cfg(feature = "thumbnails")]
fn render_rotation(rotation: Rotation) -> PdfPageRenderRotation {
    match rotation {
        Rotation::None => PdfPageRenderRotation::None,
        Rotation::Clockwise90 => PdfPageRenderRotation::Degrees90,
        Rotation::Clockwise180 => PdfPageRenderRotation::Degrees180,
        Rotation::Clockwise270 => PdfPageRenderRotation::Degrees270,
    }
}

#[cfg(feature = "thumbnails")]
impl PreviewRenderer for PdfiumRenderer {
    type Error = PdfiumError;

    fn render_preview(
        &self,
        original_index: usize,
        rotation: Rotation,
        target_width: u32,
    ) -> Result<RasterImage, PdfiumError> {
        let pdfium = init_pdfium()?;
        let document = pdfium.load_pdf_from_byte_slice(self.bytes.as_slice(), None)?;
        let page = document.pages().get(original_index as u16)?;

        // Rotated constraints keep the on-screen width at target_width
        let config = PdfRenderConfig::new()
            .set_target_width(target_width as Pixels)
            .rotate(render_rotation(rotation), true);

        let bitmap = page.render_with_config(&config)?;
        Ok(RasterImage {
            width: bitmap.width() as usize,
            height: bitmap.height() as usize,
            rgba_data: bitmap.as_rgba_bytes().to_vec(),
        })
    }
}

/// Thumbnail cache key: document, source page, rotation handed to the
/// renderer and pixel width
pub type ThumbnailKey = (DocumentId, usize, Rotation, u32);

/// Cache capacity, never zero
pub fn cache_capacity(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}

/// Documents opened by the worker plus an LRU cache of rendered thumbnails
pub struct ThumbnailStore {
    documents: HashMap<DocumentId, SourceDocument>,
    cache: LruCache<ThumbnailKey, RasterImage>,
    next_doc_id: u64,
}

impl ThumbnailStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            documents: HashMap::new(),
            cache: LruCache::new(cache_capacity(capacity)),
            next_doc_id: 0,
        }
    }

    pub fn add_document(&mut self, source: SourceDocument) -> DocumentId {
        let doc_id = DocumentId(self.next_doc_id);
        self.next_doc_id += 1;
        self.documents.insert(doc_id, source);
        doc_id
    }

    pub fn document(&self, doc_id: DocumentId) -> Option<&SourceDocument> {
        self.documents.get(&doc_id)
    }

    pub fn remove_document(&mut self, doc_id: DocumentId) -> bool {
        let stale: Vec<ThumbnailKey> = self
            .cache
            .iter()
            .map(|(key, _)| *key)
            .filter(|key| key.0 == doc_id)
            .collect();
        for key in &stale {
            self.cache.pop(key);
        }
        self.documents.remove(&doc_id).is_some()
    }

    pub fn contains(&self, key: &ThumbnailKey) -> bool {
        self.cache.contains(key)
    }

    /// Look up a thumbnail, marking it most recently used
    pub fn get(&mut self, key: &ThumbnailKey) -> Option<&RasterImage> {
        self.cache.get(key)
    }

    pub fn insert(&mut self, key: ThumbnailKey, image: RasterImage) {
        self.cache.put(key, image);
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.cache.resize(cache_capacity(capacity));
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }
}
