//! Output document assembly with lopdf
//!
//! The source document is loaded, its page tree is replaced by a flat list of
//! the requested pages in plan order, and everything no longer reachable is
//! pruned before the bytes are written.

use crate::export::{AuthoringBackend, ExportInstruction};
use crate::options::RotationMode;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;

/// Page attributes that may be inherited from ancestor `Pages` nodes
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files
const MAX_TREE_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfAuthor {
    rotation_mode: RotationMode,
}

impl LopdfAuthor {
    pub fn new(rotation_mode: RotationMode) -> Self {
        Self { rotation_mode }
    }

    /// Rewrite `doc` in place so its pages follow `instructions`
    pub fn arrange(&self, doc: &mut Document, instructions: &[ExportInstruction]) -> Result<()> {
        if instructions.is_empty() {
            return Err(ArrangeError::EmptyCollection);
        }

        let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
        if page_ids.is_empty() {
            return Err(ArrangeError::NoPages);
        }
        if let Some(bad) = instructions
            .iter()
            .find(|ins| ins.original_index >= page_ids.len())
        {
            return Err(ArrangeError::OutOfRange {
                position: bad.original_index,
                len: page_ids.len(),
            });
        }

        let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
        let pages_id = doc.get_dictionary(catalog_id)?.get(b"Pages")?.as_reference()?;

        let mut kids = Vec::with_capacity(instructions.len());
        let mut placed: HashSet<ObjectId> = HashSet::new();

        for instruction in instructions {
            let source_id = page_ids[instruction.original_index];
            let mut page = flattened_page(doc, source_id)?;

            let rotation = self
                .rotation_mode
                .effective(page_rotation(doc, &page), instruction.rotation);

            page.set("Rotate", Object::Integer(i64::from(rotation.degrees())));
            page.set("Parent", Object::Reference(pages_id));

            // A page listed twice needs its own object
            let page_id = if placed.insert(source_id) {
                doc.objects.insert(source_id, Object::Dictionary(page));
                source_id
            } else {
                doc.add_object(page)
            };
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        let pages_dict = doc.get_dictionary_mut(pages_id)?;
        pages_dict.set("Kids", Object::Array(kids));
        pages_dict.set("Count", Object::Integer(count));

        let pruned = doc.prune_objects();
        log::debug!(
            "Arranged {} output pages, pruned {} unreachable objects",
            count,
            pruned.len()
        );
        Ok(())
    }
}

impl AuthoringBackend for LopdfAuthor {
    fn build_document(
        &self,
        source: &[u8],
        instructions: &[ExportInstruction],
    ) -> Result<Vec<u8>> {
        let mut doc = Document::load_mem(source)?;
        self.arrange(&mut doc, instructions)?;

        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok(writer)
    }
}

/// Copy of a page dictionary with inherited attributes made explicit
fn flattened_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut page = doc.get_dictionary(page_id)?.clone();
    for key in INHERITABLE_KEYS {
        if !page.has(key) {
            if let Some(value) = inherited_attribute(doc, &page, key) {
                page.set(key, value);
            }
        }
    }
    Ok(page)
}

/// Rotation a page is displayed with, inherited attributes included
pub(crate) fn page_rotation(doc: &Document, page: &Dictionary) -> Rotation {
    page.get(b"Rotate")
        .ok()
        .cloned()
        .or_else(|| inherited_attribute(doc, page, b"Rotate"))
        .and_then(|value| resolve_integer(doc, &value))
        .map(Rotation::from_degrees)
        .unwrap_or_default()
}

fn inherited_attribute(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent_id = page.get(b"Parent").and_then(Object::as_reference).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        let parent = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = parent.get(key) {
            return Some(value.clone());
        }
        parent_id = parent.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

fn resolve_integer(doc: &Document, value: &Object) -> Option<i64> {
    let value = match value {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    value.as_float().ok().map(|v| v.round() as i64)
}
