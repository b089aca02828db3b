// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Design writer: live design to the raw JSON form.

use std::path::Path;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::design::Design;
use crate::frame::Frame;
use crate::ident::{FrameId, SnapshotId};
use crate::object::{ObjectSnapshot, Structure};
use crate::store::{
    RawDesign, RawDesignState, RawFrame, RawReference, RawSnapshot, StoreError,
    CURRENT_FORMAT_VERSION,
};
use crate::value::VariantEncoding;

/// Serializes a design into the raw JSON form.
///
/// The output contains every frame referenced by history, the current frame,
/// and the named frames — in that order — plus each snapshot those frames
/// reach, written once no matter how many frames share it. Attribute values
/// use the dictionary variant encoding; references are JSON integers.
#[derive(Debug, Clone, Copy)]
pub struct DesignWriter<'a> {
    design: &'a Design,
}

impl<'a> DesignWriter<'a> {
    /// Creates a writer for `design`.
    #[must_use]
    pub fn new(design: &'a Design) -> Self {
        Self { design }
    }

    /// Builds the raw form.
    #[must_use]
    pub fn raw(&self) -> RawDesign {
        let design = self.design;
        let mut included: Vec<FrameId> = Vec::new();
        let mut seen_frames: FxHashSet<FrameId> = FxHashSet::default();
        let mut include = |id: FrameId, included: &mut Vec<FrameId>| {
            if seen_frames.insert(id) {
                included.push(id);
            }
        };
        for id in design.undoable_frames() {
            include(*id, &mut included);
        }
        if let Some(current) = design.current_frame_id() {
            include(current, &mut included);
        }
        for id in design.redoable_frames() {
            include(*id, &mut included);
        }
        for (_, id) in design.named_frames() {
            include(id, &mut included);
        }

        let mut snapshots: Vec<RawSnapshot> = Vec::new();
        let mut seen_snapshots: FxHashSet<SnapshotId> = FxHashSet::default();
        let mut frames: Vec<RawFrame> = Vec::with_capacity(included.len());
        for frame_id in included {
            let Some(frame) = design.frame(frame_id) else {
                debug_assert!(false, "history references a missing frame: {frame_id}");
                continue;
            };
            let mut members = Vec::with_capacity(frame.len());
            for snapshot in frame.shared_snapshots() {
                members.push(RawReference::Id(snapshot.snapshot_id.value()));
                if seen_snapshots.insert(snapshot.snapshot_id) {
                    snapshots.push(raw_snapshot(snapshot));
                }
            }
            frames.push(RawFrame {
                id: Some(RawReference::Id(frame_id.value())),
                snapshots: members,
            });
        }

        let state = RawDesignState {
            current_frame: design.current_frame_id().map(|id| RawReference::Id(id.value())),
            undoable_frames: design
                .undoable_frames()
                .iter()
                .map(|id| RawReference::Id(id.value()))
                .collect(),
            redoable_frames: design
                .redoable_frames()
                .iter()
                .map(|id| RawReference::Id(id.value()))
                .collect(),
        };
        let named_frames: IndexMap<String, RawReference> = design
            .named_frames()
            .map(|(name, id)| (name.to_owned(), RawReference::Id(id.value())))
            .collect();

        RawDesign {
            store_format_version: Some(CURRENT_FORMAT_VERSION.to_owned()),
            metamodel: Some(design.metamodel().name.clone()),
            snapshots,
            frames,
            state: Some(state),
            named_frames,
        }
    }

    /// Serializes the design to pretty-printed JSON bytes.
    ///
    /// # Errors
    /// [`StoreError::DataCorrupted`] when JSON serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec_pretty(&self.raw()).map_err(|_| StoreError::DataCorrupted)
    }

    /// Writes the design to a store file.
    ///
    /// # Errors
    /// [`StoreError::UnableToWrite`] on I/O failure.
    pub fn write_path(&self, path: &Path) -> Result<(), StoreError> {
        let data = self.to_bytes()?;
        std::fs::write(path, data).map_err(|error| StoreError::UnableToWrite {
            path: path.display().to_string(),
            source: error,
        })
    }
}

fn raw_snapshot(snapshot: &ObjectSnapshot) -> RawSnapshot {
    let (from, to) = match snapshot.structure {
        Structure::Edge { origin, target } => (
            Some(RawReference::Id(origin.value())),
            Some(RawReference::Id(target.value())),
        ),
        _ => (None, None),
    };
    RawSnapshot {
        id: Some(RawReference::Id(snapshot.object_id.value())),
        snapshot_id: Some(RawReference::Id(snapshot.snapshot_id.value())),
        type_name: Some(snapshot.type_name.clone()),
        structural_type: Some(snapshot.structure.structural_type().name().to_owned()),
        from,
        to,
        parent: snapshot.parent.map(|id| RawReference::Id(id.value())),
        attributes: snapshot
            .attributes
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json(VariantEncoding::Dictionary)))
            .collect(),
    }
}
