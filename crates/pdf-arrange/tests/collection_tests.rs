use pdf_arrange::*;
use std::collections::BTreeSet;

/// `[A,B,C,D,E]` with originals 0..5
fn five_pages() -> PageCollection {
    PageCollection::new(5).unwrap()
}

fn originals(collection: &PageCollection) -> Vec<usize> {
    collection.original_indices()
}

fn selected_originals(collection: &PageCollection) -> BTreeSet<usize> {
    collection
        .selected_entries()
        .map(PageEntry::original_index)
        .collect()
}

fn select_mask(collection: &mut PageCollection, mask: u32) {
    for pos in 0..collection.len() {
        if mask & (1 << pos) != 0 {
            collection.select(pos).unwrap();
        }
    }
}

#[test]
fn test_new_collection_is_source_order() {
    let collection = five_pages();
    assert_eq!(originals(&collection), vec![0, 1, 2, 3, 4]);
    assert!(
        collection
            .entries()
            .iter()
            .all(|e| e.rotation() == Rotation::None)
    );
    assert!(collection.selection().is_empty());
}

#[test]
fn test_new_collection_rejects_zero_pages() {
    assert!(matches!(PageCollection::new(0), Err(ArrangeError::NoPages)));
}

#[test]
fn test_from_entries_rejects_duplicates() {
    let result = PageCollection::from_entries(vec![PageEntry::new(1), PageEntry::new(1)]);
    assert!(matches!(
        result,
        Err(ArrangeError::DuplicatePage { original_index: 1 })
    ));
}

// =============================================================================
// move
// =============================================================================

#[test]
fn test_move_forward_uses_remove_then_insert() {
    let mut collection = five_pages();
    collection.move_page(1, 3).unwrap();
    assert_eq!(originals(&collection), vec![0, 2, 3, 1, 4]);
}

#[test]
fn test_move_backward() {
    let mut collection = five_pages();
    collection.move_page(4, 0).unwrap();
    assert_eq!(originals(&collection), vec![4, 0, 1, 2, 3]);
}

#[test]
fn test_move_same_position_is_noop() {
    let mut collection = five_pages();
    collection.select(2).unwrap();
    let before = collection.clone();
    collection.move_page(2, 2).unwrap();
    assert_eq!(collection, before);
}

#[test]
fn test_move_remaps_selection_to_same_pages() {
    let mut collection = five_pages();
    collection.select(1).unwrap();
    collection.select(3).unwrap();

    collection.move_page(1, 3).unwrap();

    // B now at 3, D now at 2
    assert_eq!(collection.selection().to_vec(), vec![2, 3]);
    assert_eq!(collection.get(3).unwrap().original_index(), 1);
    assert_eq!(collection.get(2).unwrap().original_index(), 3);
    assert_eq!(selected_originals(&collection), BTreeSet::from([1, 3]));
}

#[test]
fn test_move_out_of_range_leaves_collection_unchanged() {
    let mut collection = five_pages();
    collection.select(0).unwrap();
    let before = collection.clone();

    assert!(matches!(
        collection.move_page(5, 0),
        Err(ArrangeError::OutOfRange { position: 5, len: 5 })
    ));
    assert!(matches!(
        collection.move_page(0, 7),
        Err(ArrangeError::OutOfRange { position: 7, len: 5 })
    ));
    assert_eq!(collection, before);
}

#[test]
fn test_move_every_pair_keeps_selection_on_same_pages() {
    for from in 0..5 {
        for to in 0..5 {
            for mask in 0..32u32 {
                let mut collection = five_pages();
                select_mask(&mut collection, mask);
                let expected_selected = selected_originals(&collection);

                let mut expected_order = originals(&collection);
                let moved = expected_order.remove(from);
                expected_order.insert(to, moved);

                collection.move_page(from, to).unwrap();

                assert_eq!(originals(&collection), expected_order, "move({from}, {to})");
                assert_eq!(
                    selected_originals(&collection),
                    expected_selected,
                    "move({from}, {to}) with mask {mask:05b}"
                );
                assert_eq!(collection.selection().len(), mask.count_ones() as usize);
                assert!(collection.selection().iter().all(|p| p < collection.len()));
            }
        }
    }
}

// =============================================================================
// rotate
// =============================================================================

#[test]
fn test_rotate_four_times_wraps_to_zero() {
    let mut collection = five_pages();
    assert_eq!(collection.rotate(2).unwrap(), Rotation::Clockwise90);
    assert_eq!(collection.rotate(2).unwrap(), Rotation::Clockwise180);
    assert_eq!(collection.rotate(2).unwrap(), Rotation::Clockwise270);
    assert_eq!(collection.rotate(2).unwrap(), Rotation::None);
}

#[test]
fn test_rotate_does_not_touch_order_or_selection() {
    let mut collection = five_pages();
    collection.select(1).unwrap();
    collection.rotate(1).unwrap();

    assert_eq!(originals(&collection), vec![0, 1, 2, 3, 4]);
    assert_eq!(collection.selection().to_vec(), vec![1]);
    assert_eq!(collection.get(1).unwrap().rotation(), Rotation::Clockwise90);
    assert_eq!(collection.get(0).unwrap().rotation(), Rotation::None);
}

#[test]
fn test_rotate_counter_clockwise_is_inverse() {
    let mut collection = five_pages();
    assert_eq!(
        collection.rotate_counter_clockwise(0).unwrap(),
        Rotation::Clockwise270
    );
    assert_eq!(collection.rotate(0).unwrap(), Rotation::None);
}

#[test]
fn test_rotate_out_of_range() {
    let mut collection = five_pages();
    let before = collection.clone();
    assert!(matches!(
        collection.rotate(9),
        Err(ArrangeError::OutOfRange { position: 9, .. })
    ));
    assert_eq!(collection, before);
}

#[test]
fn test_rotate_selected() {
    let mut collection = five_pages();
    assert!(matches!(
        collection.rotate_selected(),
        Err(ArrangeError::EmptySelection)
    ));

    collection.select(0).unwrap();
    collection.select(4).unwrap();
    assert_eq!(collection.rotate_selected().unwrap(), 2);

    let rotations: Vec<Rotation> = collection.entries().iter().map(|e| e.rotation()).collect();
    assert_eq!(
        rotations,
        vec![
            Rotation::Clockwise90,
            Rotation::None,
            Rotation::None,
            Rotation::None,
            Rotation::Clockwise90
        ]
    );
}

#[test]
fn test_original_indices_stable_under_moves_and_rotations() {
    let mut collection = PageCollection::new(7).unwrap();
    // Deterministic pseudo-random sequence of operations
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    for _ in 0..500 {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let a = (seed % 7) as usize;
        let b = ((seed >> 8) % 7) as usize;
        if seed % 3 == 0 {
            collection.rotate(a).unwrap();
        } else {
            collection.move_page(a, b).unwrap();
        }
    }

    let mut indices = originals(&collection);
    indices.sort_unstable();
    assert_eq!(indices, (0..7).collect::<Vec<_>>());
}

// =============================================================================
// delete
// =============================================================================

#[test]
fn test_delete_at_remaps_selection() {
    let mut collection = five_pages();
    collection.select(0).unwrap();
    collection.select(2).unwrap();
    collection.select(4).unwrap();

    let removed = collection.delete_at(2).unwrap();

    assert_eq!(removed.original_index(), 2);
    assert_eq!(collection.len(), 4);
    assert_eq!(collection.selection().to_vec(), vec![0, 3]);
    assert_eq!(selected_originals(&collection), BTreeSet::from([0, 4]));
}

#[test]
fn test_delete_at_every_position_keeps_selection_on_same_pages() {
    for pos in 0..5 {
        for mask in 0..32u32 {
            let mut collection = five_pages();
            select_mask(&mut collection, mask);
            let mut expected = selected_originals(&collection);
            expected.remove(&pos);

            collection.delete_at(pos).unwrap();

            assert_eq!(selected_originals(&collection), expected, "delete_at({pos})");
            assert!(collection.selection().iter().all(|p| p < collection.len()));
        }
    }
}

#[test]
fn test_delete_last_page_rejected() {
    let mut collection = PageCollection::new(1).unwrap();
    collection.rotate(0).unwrap();
    let before = collection.clone();

    assert!(matches!(collection.delete_at(0), Err(ArrangeError::LastPage)));
    assert_eq!(collection, before);
}

#[test]
fn test_delete_at_out_of_range() {
    let mut collection = five_pages();
    let before = collection.clone();
    assert!(matches!(
        collection.delete_at(5),
        Err(ArrangeError::OutOfRange { position: 5, len: 5 })
    ));
    assert_eq!(collection, before);
}

#[test]
fn test_delete_selected_removes_simultaneously() {
    let mut collection = five_pages();
    collection.select(1).unwrap();
    collection.select(3).unwrap();

    let removed = collection.delete_selected().unwrap();

    assert_eq!(originals(&collection), vec![0, 2, 4]);
    assert_eq!(
        removed.iter().map(|e| e.original_index()).collect::<Vec<_>>(),
        vec![1, 3]
    );
    assert!(collection.selection().is_empty());
}

#[test]
fn test_delete_selected_after_reorder_uses_current_positions() {
    let mut collection = five_pages();
    collection.move_page(4, 0).unwrap(); // [E,A,B,C,D]
    collection.select(0).unwrap();
    collection.select(1).unwrap();

    collection.delete_selected().unwrap();
    assert_eq!(originals(&collection), vec![1, 2, 3]);
}

#[test]
fn test_delete_selected_empty_selection() {
    let mut collection = five_pages();
    let before = collection.clone();
    assert!(matches!(
        collection.delete_selected(),
        Err(ArrangeError::EmptySelection)
    ));
    assert_eq!(collection, before);
}

#[test]
fn test_delete_selected_all_selected_rejected() {
    let mut collection = five_pages();
    collection.rotate(3).unwrap();
    collection.select_all();
    let before = collection.clone();

    assert!(matches!(
        collection.delete_selected(),
        Err(ArrangeError::AllSelected)
    ));
    assert_eq!(collection, before);
}

#[test]
fn test_deletes_never_empty_the_collection() {
    let mut collection = five_pages();
    let mut rejected = 0;
    for _ in 0..10 {
        if collection.delete_at(0).is_err() {
            rejected += 1;
        }
    }
    assert_eq!(collection.len(), 1);
    assert_eq!(rejected, 6);

    collection.select_all();
    assert!(collection.delete_selected().is_err());
    assert_eq!(collection.len(), 1);
}

// =============================================================================
// selection
// =============================================================================

#[test]
fn test_select_all_and_deselect_all() {
    let mut collection = five_pages();
    collection.select_all();
    assert_eq!(collection.selection().to_vec(), vec![0, 1, 2, 3, 4]);
    collection.deselect_all();
    assert!(collection.selection().is_empty());
}

#[test]
fn test_toggle_and_bounds() {
    let mut collection = five_pages();
    assert!(collection.toggle(2).unwrap());
    assert!(collection.is_selected(2));
    assert!(!collection.toggle(2).unwrap());
    assert!(!collection.is_selected(2));

    assert!(matches!(
        collection.select(5),
        Err(ArrangeError::OutOfRange { .. })
    ));
    assert!(matches!(
        collection.toggle(5),
        Err(ArrangeError::OutOfRange { .. })
    ));
}

#[test]
fn test_position_of_tracks_page_across_moves() {
    let mut collection = five_pages();
    collection.move_page(0, 4).unwrap();
    assert_eq!(collection.position_of(0), Some(4));
    collection.delete_at(1).unwrap();
    assert_eq!(collection.position_of(0), Some(3));
    assert_eq!(collection.position_of(2), None);
}
