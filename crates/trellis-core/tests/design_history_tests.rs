// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Undo/redo history, snapshot sharing, and named-frame tests.

mod common;

use common::{flows_design, stock};
use trellis_core::{AcceptError, Frame, FrameId, ObjectId};

fn accept_empty(design: &mut trellis_core::Design) -> FrameId {
    let mut frame = design.edit();
    frame.accept().unwrap()
}

fn accept_with_stock(design: &mut trellis_core::Design, name: &str) -> (FrameId, ObjectId) {
    let mut frame = design.edit();
    let id = frame.create(stock(name)).unwrap();
    let frame_id = frame.accept().unwrap();
    (frame_id, id)
}

#[test]
fn undo_redo_with_a_new_branch() {
    let mut design = flows_design();
    // Version history: v0 (empty), then frames creating a and b.
    let v0 = accept_empty(&mut design);
    let (f1, _a) = accept_with_stock(&mut design, "a");
    let (f2, _b) = accept_with_stock(&mut design, "b");
    assert_eq!(design.undoable_frames(), &[v0, f1]);
    assert_eq!(design.current_frame_id(), Some(f2));

    assert!(design.undo(f1));
    assert_eq!(design.current_frame_id(), Some(f1));
    assert_eq!(design.undoable_frames(), &[v0]);
    assert_eq!(design.redoable_frames(), &[f2]);

    // Accepting a new frame clears the redo list; history ends [v0, f1, f3].
    let (f3, _c) = accept_with_stock(&mut design, "c");
    assert!(design.redoable_frames().is_empty());
    assert_eq!(design.undoable_frames(), &[v0, f1]);
    assert_eq!(design.current_frame_id(), Some(f3));
}

#[test]
fn redo_after_undo_restores_the_exact_state() {
    let mut design = flows_design();
    let v0 = accept_empty(&mut design);
    let (f1, _) = accept_with_stock(&mut design, "a");
    let (f2, _) = accept_with_stock(&mut design, "b");

    let undoable_before = design.undoable_frames().to_vec();
    let current_before = design.current_frame_id();

    assert!(design.undo(v0));
    assert_eq!(design.redoable_frames(), &[f1, f2]);
    assert!(design.redo(f2));

    assert_eq!(design.undoable_frames(), undoable_before.as_slice());
    assert_eq!(design.current_frame_id(), current_before);
    assert!(design.redoable_frames().is_empty());
}

#[test]
fn unchanged_snapshots_are_shared_between_frames() {
    let mut design = flows_design();
    let (f1, a) = accept_with_stock(&mut design, "a");
    let (f2, _b) = accept_with_stock(&mut design, "b");

    let first = design.frame(f1).unwrap().object(a).unwrap().snapshot_id;
    let second = design.frame(f2).unwrap().object(a).unwrap().snapshot_id;
    assert_eq!(first, second, "the untouched object keeps its snapshot");
    assert_eq!(design.reference_count(first), Some(2));

    // Mutating the object in a third frame leaves the shared snapshot at
    // its old count and introduces a fresh one.
    let mut edit = design.edit();
    edit.set_attribute(a, "name", "renamed").unwrap();
    let f3 = edit.accept().unwrap();
    drop(edit);
    let third = design.frame(f3).unwrap().object(a).unwrap().snapshot_id;
    assert_ne!(third, first);
    assert_eq!(design.reference_count(first), Some(2));
    assert_eq!(design.reference_count(third), Some(1));
}

#[test]
fn snapshots_resolve_through_the_design() {
    let mut design = flows_design();
    let (f1, a) = accept_with_stock(&mut design, "a");
    let snapshot_id = design.frame(f1).unwrap().object(a).unwrap().snapshot_id;
    let snapshot = design.snapshot(snapshot_id).unwrap();
    assert_eq!(snapshot.object_id, a);
    assert_eq!(snapshot.name().as_deref(), Some("a"));
    assert!(design.snapshot(trellis_core::SnapshotId(9999)).is_none());
}

#[test]
fn named_frames_are_separate_from_history() {
    let mut design = flows_design();
    let (f1, _) = accept_with_stock(&mut design, "a");

    let mut frame = design.derive_frame(f1).unwrap();
    frame.create(stock("annotation")).unwrap();
    let named_id = frame.accept_named("scenario").unwrap();
    drop(frame);

    assert_eq!(design.current_frame_id(), Some(f1));
    assert!(design.undoable_frames().is_empty());
    assert_eq!(design.named_frame("scenario").map(|f| f.id()), Some(named_id));
    assert_eq!(
        design.named_frames().collect::<Vec<_>>(),
        vec![("scenario", named_id)]
    );

    // Names are unique.
    let mut another = design.create_frame();
    let err = another.accept_named("scenario").unwrap_err();
    assert!(matches!(err, AcceptError::NameInUse(_)));
}

#[test]
fn current_frame_follows_history() {
    let mut design = flows_design();
    assert!(design.current_frame().is_none());
    assert!(!design.can_undo());
    assert!(!design.can_redo());

    let (f1, _) = accept_with_stock(&mut design, "a");
    assert_eq!(design.current_frame().map(|f| f.id()), Some(f1));
    assert!(!design.can_undo(), "the first frame has nothing before it");

    let (f2, _) = accept_with_stock(&mut design, "b");
    assert!(design.can_undo());
    assert_eq!(design.current_frame().map(|f| f.id()), Some(f2));
}
