mod author;
mod collection;
mod drag;
mod export;
mod options;
mod render;
mod script;
mod selection;
mod source;
mod types;

pub use author::LopdfAuthor;
pub use collection::PageCollection;
pub use drag::{
    DragController, DragOutcome, DragPhase, DragReorderSession, Point, Rect, insertion_target,
};
pub use export::{AuthoringBackend, ExportInstruction, ExportPlanner};
pub use options::*;
pub use render::{PreviewRenderer, RasterImage};
pub use script::{EditOp, apply_script};
pub use selection::SelectionSet;
pub use source::{SourceDocument, export_pdf, save_pdf};
pub use types::*;
