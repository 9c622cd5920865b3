//! Turning the final arrangement into authoring instructions

use crate::collection::PageCollection;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One output page: which source page to take and how to rotate it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExportInstruction {
    pub original_index: usize,
    pub rotation: Rotation,
}

impl From<&PageEntry> for ExportInstruction {
    fn from(entry: &PageEntry) -> Self {
        Self {
            original_index: entry.original_index(),
            rotation: entry.rotation(),
        }
    }
}

/// Builds output documents from source bytes and an ordered plan
pub trait AuthoringBackend {
    fn build_document(
        &self,
        source: &[u8],
        instructions: &[ExportInstruction],
    ) -> Result<Vec<u8>>;
}

pub struct ExportPlanner;

impl ExportPlanner {
    /// One instruction per entry, in current order, rotation verbatim
    pub fn plan(collection: &PageCollection) -> Result<Vec<ExportInstruction>> {
        if collection.is_empty() {
            return Err(ArrangeError::EmptyCollection);
        }
        Ok(collection
            .entries()
            .iter()
            .map(ExportInstruction::from)
            .collect())
    }

    /// Plan the export and hand it to `backend`
    pub fn export_with(
        backend: &dyn AuthoringBackend,
        source: &[u8],
        collection: &PageCollection,
    ) -> Result<Vec<u8>> {
        let instructions = Self::plan(collection)?;
        backend.build_document(source, &instructions)
    }
}
