// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The design: top-level owner of frames, history, and identities.
//!
//! A [`Design`] is the whole versioned database: the metamodel it is
//! validated against, the identity manager, the shared snapshot table, every
//! frozen frame, and the undo/redo history with named frames on the side.
//!
//! All mutation happens through a [`TransientFrame`] obtained from
//! [`Design::create_frame`] or [`Design::derive_frame`]; the frame holds the
//! design's only mutable borrow until it is accepted or discarded, so there
//! is never more than one writer. There is no global state anywhere — the
//! design is the ambient context.

use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::checker::ConstraintChecker;
use crate::frame::{Frame, FrozenFrame};
use crate::ident::{FrameId, SnapshotId};
#[cfg(test)]
use crate::ident::ObjectId;
use crate::identity::IdentityManager;
use crate::metamodel::Metamodel;
use crate::object::ObjectSnapshot;
use crate::snapshot_table::SnapshotTable;
use crate::transient::{HistoryDisposition, TransientFrame};

/// Error raised by design-level operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesignError {
    /// The referenced frame does not exist in this design.
    #[error("unknown frame: {0}")]
    UnknownFrame(FrameId),
}

/// Versioned, constraint-validated design database.
#[derive(Debug)]
pub struct Design {
    metamodel: Metamodel,
    identity: IdentityManager,
    snapshots: SnapshotTable,
    frames: IndexMap<FrameId, FrozenFrame>,
    undoable_frames: Vec<FrameId>,
    redoable_frames: Vec<FrameId>,
    current_frame_id: Option<FrameId>,
    named_frames: IndexMap<String, FrameId>,
}

impl Design {
    /// Creates an empty design validated against `metamodel`.
    #[must_use]
    pub fn new(metamodel: Metamodel) -> Self {
        Self {
            metamodel,
            identity: IdentityManager::new(),
            snapshots: SnapshotTable::new(),
            frames: IndexMap::new(),
            undoable_frames: Vec::new(),
            redoable_frames: Vec::new(),
            current_frame_id: None,
            named_frames: IndexMap::new(),
        }
    }

    /// The metamodel this design is validated against.
    #[must_use]
    pub fn metamodel(&self) -> &Metamodel {
        &self.metamodel
    }

    /// A constraint checker bound to this design's metamodel.
    #[must_use]
    pub fn checker(&self) -> ConstraintChecker<'_> {
        ConstraintChecker::new(&self.metamodel)
    }

    pub(crate) fn identity(&self) -> &IdentityManager {
        &self.identity
    }

    pub(crate) fn identity_mut(&mut self) -> &mut IdentityManager {
        &mut self.identity
    }

    /// Opens an empty transient frame.
    ///
    /// The frame holds the design's only mutable borrow until it is accepted
    /// or discarded.
    pub fn create_frame(&mut self) -> TransientFrame<'_> {
        let id = self.identity.reserve_new_object();
        TransientFrame::new(self, id, None)
    }

    /// Opens a transient frame deriving from the frozen frame `frame_id`.
    ///
    /// The new frame starts with the parent's content, shares its snapshots,
    /// and reports no changes.
    ///
    /// # Errors
    /// [`DesignError::UnknownFrame`] when the frame does not exist.
    pub fn derive_frame(&mut self, frame_id: FrameId) -> Result<TransientFrame<'_>, DesignError> {
        let Some(parent) = self.frames.get(&frame_id).cloned() else {
            return Err(DesignError::UnknownFrame(frame_id));
        };
        let id = self.identity.reserve_new_object();
        Ok(TransientFrame::new(self, id, Some(&parent)))
    }

    /// Opens a transient frame deriving from the current frame, or an empty
    /// one when there is no history yet.
    pub fn edit(&mut self) -> TransientFrame<'_> {
        match self.current_frame_id {
            Some(current) => {
                let parent = self.frames.get(&current).cloned();
                let id = self.identity.reserve_new_object();
                TransientFrame::new(self, id, parent.as_ref())
            }
            None => self.create_frame(),
        }
    }

    /// Opens a transient frame with a caller-provided, already reserved
    /// frame id (store loader path).
    pub(crate) fn create_frame_with_id(&mut self, id: FrameId) -> TransientFrame<'_> {
        TransientFrame::new(self, id, None)
    }

    pub(crate) fn install_frame(&mut self, frame: FrozenFrame, disposition: HistoryDisposition) {
        for snapshot in frame.shared_snapshots() {
            self.snapshots.insert_or_retain(Arc::clone(snapshot));
        }
        let id = frame.id();
        self.frames.insert(id, frame);
        match disposition {
            HistoryDisposition::Append => {
                if let Some(current) = self.current_frame_id {
                    self.undoable_frames.push(current);
                }
                self.current_frame_id = Some(id);
                self.redoable_frames.clear();
            }
            HistoryDisposition::Named(name) => {
                self.named_frames.insert(name, id);
            }
            HistoryDisposition::Detached => {}
        }
    }

    pub(crate) fn install_state(
        &mut self,
        undoable: Vec<FrameId>,
        redoable: Vec<FrameId>,
        current: Option<FrameId>,
        named: IndexMap<String, FrameId>,
    ) {
        self.undoable_frames = undoable;
        self.redoable_frames = redoable;
        self.current_frame_id = current;
        self.named_frames = named;
    }

    /// Returns the frozen frame `frame_id`, if present.
    #[must_use]
    pub fn frame(&self, frame_id: FrameId) -> Option<&FrozenFrame> {
        self.frames.get(&frame_id)
    }

    /// Returns the frozen frame registered under `name`, if any.
    #[must_use]
    pub fn named_frame(&self, name: &str) -> Option<&FrozenFrame> {
        self.named_frames
            .get(name)
            .and_then(|id| self.frames.get(id))
    }

    pub(crate) fn named_frame_id(&self, name: &str) -> Option<FrameId> {
        self.named_frames.get(name).copied()
    }

    /// Returns `true` when the design contains a frozen frame `frame_id`.
    #[must_use]
    pub fn contains_frame(&self, frame_id: FrameId) -> bool {
        self.frames.contains_key(&frame_id)
    }

    /// Iterates all frozen frames in installation order.
    pub fn frames(&self) -> impl Iterator<Item = &FrozenFrame> {
        self.frames.values()
    }

    /// Returns the stored snapshot for `snapshot_id`, if any.
    #[must_use]
    pub fn snapshot(&self, snapshot_id: SnapshotId) -> Option<&Arc<ObjectSnapshot>> {
        self.snapshots.get(snapshot_id)
    }

    /// Number of frames currently containing the snapshot.
    #[must_use]
    pub fn reference_count(&self, snapshot_id: SnapshotId) -> Option<u32> {
        self.snapshots.ref_count(snapshot_id)
    }

    /// Identifier of the current frame, when history is non-empty.
    #[must_use]
    pub fn current_frame_id(&self) -> Option<FrameId> {
        self.current_frame_id
    }

    /// The current frame, when history is non-empty.
    #[must_use]
    pub fn current_frame(&self) -> Option<&FrozenFrame> {
        self.current_frame_id.and_then(|id| self.frames.get(&id))
    }

    /// Frames that can be undone to, oldest first.
    #[must_use]
    pub fn undoable_frames(&self) -> &[FrameId] {
        &self.undoable_frames
    }

    /// Frames that can be redone to, nearest first.
    #[must_use]
    pub fn redoable_frames(&self) -> &[FrameId] {
        &self.redoable_frames
    }

    /// Iterates the named frames in registration order.
    pub fn named_frames(&self) -> impl Iterator<Item = (&str, FrameId)> {
        self.named_frames.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Returns `true` when at least one frame can be undone to.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undoable_frames.is_empty()
    }

    /// Returns `true` when at least one frame can be redone to.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redoable_frames.is_empty()
    }

    /// Moves the current frame back to `frame_id`.
    ///
    /// Every frame after the target — including the current one — moves to
    /// the front of the redo list, preserving order. Returns `false` when
    /// the target is not in the undo list.
    pub fn undo(&mut self, frame_id: FrameId) -> bool {
        let Some(index) = self.undoable_frames.iter().position(|f| *f == frame_id) else {
            return false;
        };
        let moved = self.undoable_frames.split_off(index + 1);
        let target = self.undoable_frames.pop();
        debug_assert_eq!(target, Some(frame_id));
        let mut redoable = moved;
        if let Some(current) = self.current_frame_id {
            redoable.push(current);
        }
        redoable.append(&mut self.redoable_frames);
        self.redoable_frames = redoable;
        self.current_frame_id = Some(frame_id);
        debug!(frame = %frame_id, "undo");
        true
    }

    /// Moves the current frame forward to `frame_id`.
    ///
    /// Every redoable frame before the target — and the current frame —
    /// returns to the undo list, preserving order. Returns `false` when the
    /// target is not in the redo list.
    pub fn redo(&mut self, frame_id: FrameId) -> bool {
        let Some(index) = self.redoable_frames.iter().position(|f| *f == frame_id) else {
            return false;
        };
        let mut moved: Vec<FrameId> = self.redoable_frames.drain(..=index).collect();
        let target = moved.pop();
        debug_assert_eq!(target, Some(frame_id));
        if let Some(current) = self.current_frame_id {
            self.undoable_frames.push(current);
        }
        self.undoable_frames.append(&mut moved);
        self.current_frame_id = Some(frame_id);
        debug!(frame = %frame_id, "redo");
        true
    }
}
