use crate::types::{PageEntry, Rotation};

/// RGBA pixels produced by a preview renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: usize,
    pub height: usize,
    pub rgba_data: Vec<u8>,
}

/// Rasterizes a source page for display. The arrangement only supplies the
/// page reference and rotation; it never inspects the pixels.
pub trait PreviewRenderer {
    type Error: std::fmt::Display;

    fn render_preview(
        &self,
        original_index: usize,
        rotation: Rotation,
        target_width: u32,
    ) -> std::result::Result<RasterImage, Self::Error>;

    fn render_entry(
        &self,
        entry: &PageEntry,
        target_width: u32,
    ) -> std::result::Result<RasterImage, Self::Error> {
        self.render_preview(entry.original_index(), entry.rotation(), target_width)
    }
}
