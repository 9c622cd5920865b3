use pdf_arrange::*;

/// Five 100x140 thumbnails in a single row with 10px gaps
fn row_bounds() -> Vec<Rect> {
    (0..5)
        .map(|i| Rect::new(i as f32 * 110.0, 0.0, 100.0, 140.0))
        .collect()
}

/// Six thumbnails in a 3-column grid
fn grid_bounds() -> Vec<Rect> {
    (0..6)
        .map(|i| {
            let col = (i % 3) as f32;
            let row = (i / 3) as f32;
            Rect::new(col * 110.0, row * 150.0, 100.0, 140.0)
        })
        .collect()
}

#[test]
fn test_insertion_target_after_midpoint() {
    let bounds = row_bounds();
    // Right half of entry 3
    assert_eq!(insertion_target(0, Point::new(400.0, 70.0), &bounds), Some(3));
    // Left half of entry 3
    assert_eq!(insertion_target(0, Point::new(340.0, 70.0), &bounds), Some(2));
}

#[test]
fn test_insertion_target_moving_backwards() {
    let bounds = row_bounds();
    // Left half of entry 1
    assert_eq!(insertion_target(4, Point::new(120.0, 70.0), &bounds), Some(1));
    // Right half of entry 1
    assert_eq!(insertion_target(4, Point::new(200.0, 70.0), &bounds), Some(2));
}

#[test]
fn test_insertion_target_over_self_is_start() {
    let bounds = row_bounds();
    assert_eq!(insertion_target(2, Point::new(230.0, 70.0), &bounds), Some(2));
    assert_eq!(insertion_target(2, Point::new(290.0, 70.0), &bounds), Some(2));
}

#[test]
fn test_insertion_target_beyond_edges_is_clamped() {
    let bounds = row_bounds();
    assert_eq!(
        insertion_target(1, Point::new(2000.0, 70.0), &bounds),
        Some(4)
    );
    assert_eq!(
        insertion_target(3, Point::new(-500.0, 70.0), &bounds),
        Some(0)
    );
}

#[test]
fn test_insertion_target_in_grid_uses_nearest_row() {
    let bounds = grid_bounds();
    // Right half of entry 4 (second row, middle column)
    assert_eq!(
        insertion_target(0, Point::new(190.0, 200.0), &bounds),
        Some(4)
    );
    // In the gap below entry 2, nearest is entry 2, left half
    assert_eq!(
        insertion_target(5, Point::new(230.0, 144.0), &bounds),
        Some(2)
    );
}

#[test]
fn test_insertion_target_without_bounds() {
    assert_eq!(insertion_target(0, Point::new(10.0, 10.0), &[]), None);
}

#[test]
fn test_session_drop_performs_single_move() {
    let mut collection = PageCollection::new(5).unwrap();
    collection.select(0).unwrap();

    let mut session = DragReorderSession::begin(&collection, 0).unwrap();
    assert_eq!(session.phase(), DragPhase::Armed);

    // Pointer travels across several entries before the drop
    session.hover(Point::new(120.0, 70.0), &row_bounds());
    session.hover(Point::new(490.0, 70.0), &row_bounds());
    session.hover(Point::new(400.0, 70.0), &row_bounds());
    assert_eq!(session.candidate(), 3);
    // Nothing changes until the drop
    assert_eq!(collection.original_indices(), vec![0, 1, 2, 3, 4]);

    let outcome = session.drop_on(&mut collection).unwrap();
    assert_eq!(outcome, DragOutcome::Moved { from: 0, to: 3 });
    assert_eq!(collection.original_indices(), vec![1, 2, 3, 0, 4]);
    assert_eq!(collection.selection().to_vec(), vec![3]);
    assert!(session.is_dirty());
    assert_eq!(session.phase(), DragPhase::Idle);
}

#[test]
fn test_session_drop_on_start_is_unchanged() {
    let mut collection = PageCollection::new(3).unwrap();
    let mut session = DragReorderSession::begin(&collection, 1).unwrap();
    let before = collection.clone();

    assert_eq!(
        session.drop_on(&mut collection).unwrap(),
        DragOutcome::Unchanged
    );
    assert_eq!(collection, before);
    assert_eq!(session.phase(), DragPhase::Idle);
    assert!(!session.is_dirty());
}

#[test]
fn test_session_release_then_commit() {
    let mut collection = PageCollection::new(5).unwrap();
    let mut session = DragReorderSession::begin(&collection, 0).unwrap();
    session.hover(Point::new(400.0, 70.0), &row_bounds());
    assert!(!session.is_dirty());

    assert_eq!(session.release(), DragPhase::Committing);
    assert_eq!(session.phase(), DragPhase::Committing);

    // Candidate is frozen once released
    assert_eq!(session.hover(Point::new(10.0, 70.0), &row_bounds()), 3);
    assert_eq!(collection.original_indices(), vec![0, 1, 2, 3, 4]);

    let outcome = session.commit(&mut collection).unwrap();
    assert_eq!(outcome, DragOutcome::Moved { from: 0, to: 3 });
    assert_eq!(session.phase(), DragPhase::Idle);
    assert!(session.is_dirty());
    assert_eq!(collection.original_indices(), vec![1, 2, 3, 0, 4]);

    // A second commit is a no-op
    assert_eq!(
        session.commit(&mut collection).unwrap(),
        DragOutcome::Unchanged
    );
    assert_eq!(collection.original_indices(), vec![1, 2, 3, 0, 4]);
}

#[test]
fn test_session_commit_requires_release() {
    let mut collection = PageCollection::new(5).unwrap();
    let mut session = DragReorderSession::begin(&collection, 0).unwrap();
    session.hover(Point::new(400.0, 70.0), &row_bounds());

    assert_eq!(
        session.commit(&mut collection).unwrap(),
        DragOutcome::Unchanged
    );
    assert_eq!(session.phase(), DragPhase::Armed);
    assert!(!session.is_dirty());
    assert_eq!(collection.original_indices(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_session_failed_commit_returns_to_idle() {
    let mut collection = PageCollection::new(5).unwrap();
    let mut session = DragReorderSession::begin(&collection, 4).unwrap();
    session.hover(Point::new(10.0, 70.0), &row_bounds());
    session.release();

    // The arrangement shrank while the gesture was held
    collection.delete_at(0).unwrap();
    assert!(matches!(
        session.commit(&mut collection),
        Err(ArrangeError::OutOfRange { position: 4, len: 4 })
    ));
    assert_eq!(session.phase(), DragPhase::Idle);
    assert!(!session.is_dirty());
}

#[test]
fn test_session_cancel_after_travel_leaves_model_untouched() {
    let collection = PageCollection::new(5).unwrap();
    let before = collection.clone();

    let mut session = DragReorderSession::begin(&collection, 4).unwrap();
    session.hover(Point::new(10.0, 70.0), &row_bounds());
    assert_eq!(session.candidate(), 0);

    assert_eq!(session.cancel(), DragOutcome::Unchanged);
    assert_eq!(session.phase(), DragPhase::Idle);
    assert!(!session.is_dirty());
    assert_eq!(collection, before);
}

#[test]
fn test_session_begin_out_of_range() {
    let collection = PageCollection::new(2).unwrap();
    assert!(matches!(
        DragReorderSession::begin(&collection, 2),
        Err(ArrangeError::OutOfRange { position: 2, len: 2 })
    ));
}

#[test]
fn test_hover_without_bounds_keeps_candidate() {
    let collection = PageCollection::new(5).unwrap();
    let mut session = DragReorderSession::begin(&collection, 0).unwrap();
    session.hover(Point::new(400.0, 70.0), &row_bounds());
    assert_eq!(session.hover(Point::new(0.0, 0.0), &[]), 3);
}

#[test]
fn test_controller_allows_one_gesture_at_a_time() {
    let mut collection = PageCollection::new(4).unwrap();
    let mut controller = DragController::new();
    assert_eq!(controller.phase(), DragPhase::Idle);

    controller.begin(&collection, 1).unwrap();
    assert_eq!(controller.phase(), DragPhase::Armed);
    assert!(matches!(
        controller.begin(&collection, 2),
        Err(ArrangeError::DragInProgress)
    ));

    let bounds: Vec<Rect> = row_bounds().into_iter().take(4).collect();
    assert_eq!(controller.hover(Point::new(400.0, 70.0), &bounds), Some(3));

    let outcome = controller.finish(&mut collection, true).unwrap();
    assert_eq!(outcome, DragOutcome::Moved { from: 1, to: 3 });
    assert_eq!(collection.original_indices(), vec![0, 2, 3, 1]);
    assert_eq!(controller.phase(), DragPhase::Idle);
    assert!(controller.active().is_none());

    // A fresh gesture can start once the previous one ended
    controller.begin(&collection, 0).unwrap();
    assert_eq!(
        controller.finish(&mut collection, false).unwrap(),
        DragOutcome::Unchanged
    );
    assert!(controller.active().is_none());
}

#[test]
fn test_controller_finish_without_gesture() {
    let mut collection = PageCollection::new(2).unwrap();
    let mut controller = DragController::new();
    assert_eq!(controller.hover(Point::new(0.0, 0.0), &[]), None);
    assert_eq!(
        controller.finish(&mut collection, true).unwrap(),
        DragOutcome::Unchanged
    );
}

#[test]
fn test_drag_converges_with_direct_move() {
    let bounds = row_bounds();
    for start in 0..5 {
        for x in (0..560).step_by(15) {
            let pointer = Point::new(x as f32, 70.0);

            let mut dragged = PageCollection::new(5).unwrap();
            let mut session = DragReorderSession::begin(&dragged, start).unwrap();
            let target = session.hover(pointer, &bounds);
            session.drop_on(&mut dragged).unwrap();

            let mut direct = PageCollection::new(5).unwrap();
            direct.move_page(start, target).unwrap();

            assert_eq!(dragged.original_indices(), direct.original_indices());
        }
    }
}
