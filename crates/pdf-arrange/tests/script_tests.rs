use pdf_arrange::*;

fn parse(ops: &[&str]) -> Vec<EditOp> {
    ops.iter().map(|op| op.parse().unwrap()).collect()
}

#[test]
fn test_parse_every_operation() {
    assert_eq!(
        "move:0:3".parse::<EditOp>().unwrap(),
        EditOp::Move { from: 0, to: 3 }
    );
    assert_eq!("rotate:2".parse::<EditOp>().unwrap(), EditOp::Rotate(2));
    assert_eq!(
        "rotate-ccw:2".parse::<EditOp>().unwrap(),
        EditOp::RotateCounterClockwise(2)
    );
    assert_eq!("delete:1".parse::<EditOp>().unwrap(), EditOp::Delete(1));
    assert_eq!(
        "select:1, 3".parse::<EditOp>().unwrap(),
        EditOp::Select(vec![1, 3])
    );
    assert_eq!(
        "deselect:3".parse::<EditOp>().unwrap(),
        EditOp::Deselect(vec![3])
    );
    assert_eq!("select-all".parse::<EditOp>().unwrap(), EditOp::SelectAll);
    assert_eq!(
        "DESELECT-ALL".parse::<EditOp>().unwrap(),
        EditOp::DeselectAll
    );
    assert_eq!(
        "delete-selected".parse::<EditOp>().unwrap(),
        EditOp::DeleteSelected
    );
    assert_eq!(
        "rotate-selected".parse::<EditOp>().unwrap(),
        EditOp::RotateSelected
    );
}

#[test]
fn test_parse_rejects_malformed() {
    for bad in ["", "move:1", "move:a:2", "rotate", "rotate:1:2", "select:", "flip:1"] {
        assert!(
            matches!(bad.parse::<EditOp>(), Err(ArrangeError::InvalidOp(_))),
            "{bad:?} should not parse"
        );
    }
}

#[test]
fn test_display_parses_back() {
    for text in ["move:4:0", "rotate-ccw:1", "select:0,2,4", "delete-selected"] {
        let op: EditOp = text.parse().unwrap();
        assert_eq!(op.to_string(), text);
    }
}

#[test]
fn test_apply_script_runs_in_order() {
    let mut collection = PageCollection::new(5).unwrap();
    let ops = parse(&[
        "select:1,3",
        "move:1:3",
        "rotate-selected",
        "delete-selected",
        "rotate:0",
    ]);

    apply_script(&mut collection, &ops).unwrap();

    assert_eq!(collection.original_indices(), vec![0, 2, 4]);
    assert_eq!(collection.get(0).unwrap().rotation(), Rotation::Clockwise90);
    assert!(collection.selection().is_empty());
}

#[test]
fn test_apply_script_reports_failing_index() {
    let mut collection = PageCollection::new(3).unwrap();
    let ops = parse(&["move:0:2", "delete:7", "rotate:0"]);

    let err = apply_script(&mut collection, &ops).unwrap_err();
    match err {
        ArrangeError::Script { index, source } => {
            assert_eq!(index, 1);
            assert!(matches!(
                *source,
                ArrangeError::OutOfRange { position: 7, len: 3 }
            ));
        }
        other => panic!("Expected Script error, got {other:?}"),
    }

    // The first op stays applied, the third never ran
    assert_eq!(collection.original_indices(), vec![1, 2, 0]);
    assert!(
        collection
            .entries()
            .iter()
            .all(|e| e.rotation() == Rotation::None)
    );
}

#[test]
fn test_select_with_bad_position_selects_nothing() {
    let mut collection = PageCollection::new(3).unwrap();
    let op: EditOp = "select:0,9".parse().unwrap();
    assert!(op.apply(&mut collection).is_err());
    assert!(collection.selection().is_empty());
}

#[test]
fn test_script_cannot_delete_everything() {
    let mut collection = PageCollection::new(2).unwrap();
    let ops = parse(&["select-all", "delete-selected"]);
    let err = apply_script(&mut collection, &ops).unwrap_err();
    assert!(matches!(
        err,
        ArrangeError::Script { index: 1, ref source } if matches!(**source, ArrangeError::AllSelected)
    ));
    assert_eq!(collection.len(), 2);
}
