//! Selected positions within a page arrangement
//!
//! The selection stores positions, not page identities, so every mutation of
//! the arrangement has to rewrite it. Both rewrite rules live here and are the
//! only place positions are remapped.

use std::collections::BTreeSet;

/// Set of currently selected positions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    positions: BTreeSet<usize>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.contains(&position)
    }

    /// Selected positions in ascending order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.positions.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    /// True when every position of an arrangement of `len` pages is selected
    pub fn covers(&self, len: usize) -> bool {
        len > 0 && self.positions.len() == len
    }

    pub(crate) fn insert(&mut self, position: usize) -> bool {
        self.positions.insert(position)
    }

    pub(crate) fn remove(&mut self, position: usize) -> bool {
        self.positions.remove(&position)
    }

    pub(crate) fn clear(&mut self) {
        self.positions.clear();
    }

    pub(crate) fn fill(&mut self, len: usize) {
        self.positions = (0..len).collect();
    }

    pub(crate) fn remap_after_move(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        self.positions = self
            .positions
            .iter()
            .map(|&p| moved_position(p, from, to))
            .collect();
    }

    pub(crate) fn remap_after_delete(&mut self, deleted: usize) {
        self.positions = self
            .positions
            .iter()
            .filter_map(|&p| position_after_delete(p, deleted))
            .collect();
    }
}

/// Where position `p` ends up after the entry at `from` is moved to `to`
pub(crate) fn moved_position(p: usize, from: usize, to: usize) -> usize {
    if p == from {
        to
    } else if from < to && from < p && p <= to {
        p - 1
    } else if from > to && to <= p && p < from {
        p + 1
    } else {
        p
    }
}

/// Where position `p` ends up after the entry at `deleted` is removed
pub(crate) fn position_after_delete(p: usize, deleted: usize) -> Option<usize> {
    match p.cmp(&deleted) {
        std::cmp::Ordering::Less => Some(p),
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(p - 1),
    }
}
