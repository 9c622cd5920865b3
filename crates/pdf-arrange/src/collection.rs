//! The working page arrangement
//!
//! A `PageCollection` owns both the ordered page entries and the selection, so
//! one `&mut` borrow (or one lock in a threaded embedding) covers every
//! mutation. All validation happens before any state is touched: a rejected
//! operation leaves entries and selection exactly as they were.

use crate::selection::SelectionSet;
use crate::types::*;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct PageCollection {
    entries: Vec<PageEntry>,
    selection: SelectionSet,
}

impl PageCollection {
    /// Arrangement for a freshly loaded document: one unrotated entry per
    /// source page, in source order.
    pub fn new(page_count: usize) -> Result<Self> {
        if page_count == 0 {
            return Err(ArrangeError::NoPages);
        }

        Ok(Self {
            entries: (0..page_count).map(PageEntry::new).collect(),
            selection: SelectionSet::new(),
        })
    }

    /// Build an arrangement from explicit entries
    pub fn from_entries(entries: Vec<PageEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(ArrangeError::NoPages);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.original_index()) {
                return Err(ArrangeError::DuplicatePage {
                    original_index: entry.original_index(),
                });
            }
        }

        Ok(Self {
            entries,
            selection: SelectionSet::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    pub fn get(&self, position: usize) -> Option<&PageEntry> {
        self.entries.get(position)
    }

    /// Current position of the page that came from `original_index`
    pub fn position_of(&self, original_index: usize) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.original_index() == original_index)
    }

    pub fn original_indices(&self) -> Vec<usize> {
        self.entries.iter().map(PageEntry::original_index).collect()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selected_entries(&self) -> impl Iterator<Item = &PageEntry> + '_ {
        self.selection.iter().map(move |pos| &self.entries[pos])
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if position >= self.entries.len() {
            return Err(ArrangeError::OutOfRange {
                position,
                len: self.entries.len(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Reordering
    // =========================================================================

    /// Move the entry at `from` so that it ends up at `to`.
    ///
    /// `to` is interpreted against the sequence after the entry has been
    /// removed, so `move_page(1, 3)` on `[A,B,C,D,E]` yields `[A,C,D,B,E]`.
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_position(from)?;
        self.check_position(to)?;

        if from == to {
            return Ok(());
        }

        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        self.selection.remap_after_move(from, to);

        log::debug!(
            "Moved source page {} from position {} to {}",
            entry.original_index(),
            from,
            to
        );
        Ok(())
    }

    // =========================================================================
    // Rotation
    // =========================================================================

    /// Rotate the entry at `position` by +90°, returning its new rotation
    pub fn rotate(&mut self, position: usize) -> Result<Rotation> {
        self.check_position(position)?;
        let rotation = self.entries[position].rotate_clockwise();
        log::debug!("Rotated position {} to {}", position, rotation);
        Ok(rotation)
    }

    /// Rotate the entry at `position` by -90°, returning its new rotation
    pub fn rotate_counter_clockwise(&mut self, position: usize) -> Result<Rotation> {
        self.check_position(position)?;
        let rotation = self.entries[position].rotate_counter_clockwise();
        log::debug!("Rotated position {} to {}", position, rotation);
        Ok(rotation)
    }

    /// Rotate every selected entry by +90°, returning how many were rotated
    pub fn rotate_selected(&mut self) -> Result<usize> {
        if self.selection.is_empty() {
            return Err(ArrangeError::EmptySelection);
        }

        for position in self.selection.iter() {
            self.entries[position].rotate_clockwise();
        }
        Ok(self.selection.len())
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Remove the entry at `position`, returning it
    pub fn delete_at(&mut self, position: usize) -> Result<PageEntry> {
        if self.entries.len() == 1 {
            return Err(ArrangeError::LastPage);
        }
        self.check_position(position)?;

        let removed = self.entries.remove(position);
        self.selection.remap_after_delete(position);

        log::debug!(
            "Deleted source page {} at position {}",
            removed.original_index(),
            position
        );
        Ok(removed)
    }

    /// Remove every selected entry, returning them in their former order.
    ///
    /// Positions are removed from the highest down, so earlier removals never
    /// shift a position that is still waiting to be removed. The selection is
    /// empty afterwards.
    pub fn delete_selected(&mut self) -> Result<Vec<PageEntry>> {
        if self.selection.is_empty() {
            return Err(ArrangeError::EmptySelection);
        }
        if self.selection.covers(self.entries.len()) {
            return Err(ArrangeError::AllSelected);
        }

        let positions = self.selection.to_vec();
        let mut removed: Vec<PageEntry> = positions
            .into_iter()
            .rev()
            .map(|position| self.entries.remove(position))
            .collect();
        removed.reverse();
        self.selection.clear();

        log::debug!(
            "Deleted {} selected pages, {} remain",
            removed.len(),
            self.entries.len()
        );
        Ok(removed)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn is_selected(&self, position: usize) -> bool {
        self.selection.contains(position)
    }

    pub fn select(&mut self, position: usize) -> Result<()> {
        self.check_position(position)?;
        self.selection.insert(position);
        Ok(())
    }

    pub fn deselect(&mut self, position: usize) -> Result<()> {
        self.check_position(position)?;
        self.selection.remove(position);
        Ok(())
    }

    /// Flip selection of `position`, returning whether it is now selected
    pub fn toggle(&mut self, position: usize) -> Result<bool> {
        self.check_position(position)?;
        if self.selection.remove(position) {
            Ok(false)
        } else {
            self.selection.insert(position);
            Ok(true)
        }
    }

    pub fn select_all(&mut self) {
        self.selection.fill(self.entries.len());
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }
}
