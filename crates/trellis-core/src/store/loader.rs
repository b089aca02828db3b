// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Design loader: raw design to live design, in phases.
//!
//! Loading funnels every raw reference through the design's identity
//! manager, then rebuilds the object graph:
//!
//! 1. **Identities** — object, snapshot, and frame references are reserved;
//!    string names resolve to one allocated id for the whole load.
//! 2. **Snapshots** — each raw snapshot becomes an [`ObjectSnapshot`] after
//!    type, structural-type, and attribute checks.
//! 3. **Frames** — frame ids are checked for duplicates, members resolved,
//!    and children lists derived from the members' parent references.
//! 4. **Design state** — history and named frames are validated (no frame
//!    may appear twice in history or both in history and named).
//! 5. **Validation** — every frame is accepted through the regular
//!    transient-frame path, which runs full constraint validation.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::design::Design;
use crate::ident::{FrameId, IdKind, ObjectId, SnapshotId};
use crate::identity::IdentityManager;
use crate::metamodel::StructuralType;
use crate::object::{ObjectSnapshot, Structure};
use crate::store::{RawDesign, RawReference, StoreError};
use crate::transient::AcceptError;
use crate::value::Variant;

/// Resolves raw references to allocated ids within one load.
#[derive(Debug, Default)]
struct LoadingContext {
    names: FxHashMap<String, u64>,
}

impl LoadingContext {
    /// Resolves a reference, reserving the id when it is new.
    fn resolve(
        &mut self,
        identity: &mut IdentityManager,
        reference: &RawReference,
        kind: IdKind,
    ) -> Result<u64, StoreError> {
        match reference {
            RawReference::Id(id) => {
                identity.reserve_if_needed(*id, kind)?;
                Ok(*id)
            }
            RawReference::Name(text) => match text.parse::<u64>() {
                Ok(id) => {
                    identity.reserve_if_needed(id, kind)?;
                    Ok(id)
                }
                Err(_) => match self.names.get(text) {
                    Some(id) => {
                        match identity.kind(*id) {
                            Some(actual) if actual != kind => {
                                Err(crate::identity::IdentityError::KindMismatch {
                                    id: *id,
                                    expected: kind,
                                    actual,
                                }
                                .into())
                            }
                            _ => Ok(*id),
                        }
                    }
                    None => {
                        let id = identity.reserve_new(kind);
                        self.names.insert(text.clone(), id);
                        Ok(id)
                    }
                },
            },
        }
    }

    /// Resolves a reference that must not have been seen before.
    fn resolve_unique(
        &mut self,
        identity: &mut IdentityManager,
        reference: &RawReference,
        kind: IdKind,
    ) -> Result<u64, StoreError> {
        match reference {
            RawReference::Id(id) => {
                identity.reserve_unique(*id, kind)?;
                Ok(*id)
            }
            RawReference::Name(text) => match text.parse::<u64>() {
                Ok(id) => {
                    identity.reserve_unique(id, kind)?;
                    Ok(id)
                }
                Err(_) => {
                    if let Some(id) = self.names.get(text) {
                        return Err(crate::identity::IdentityError::DuplicateId(*id).into());
                    }
                    let id = identity.reserve_new(kind);
                    self.names.insert(text.clone(), id);
                    Ok(id)
                }
            },
        }
    }
}

/// A decoded snapshot waiting for its first containing frame.
#[derive(Debug)]
struct PendingSnapshot {
    snapshot: ObjectSnapshot,
    /// Set when the first containing frame derived the children and froze
    /// the snapshot; later frames must agree.
    frozen: Option<Arc<ObjectSnapshot>>,
}

/// Installs a [`RawDesign`] into a live [`Design`].
#[derive(Debug)]
pub struct DesignLoader<'a> {
    design: &'a mut Design,
}

impl<'a> DesignLoader<'a> {
    /// Creates a loader targeting `design` (normally a fresh one).
    pub fn new(design: &'a mut Design) -> Self {
        Self { design }
    }

    /// Loads the raw design.
    ///
    /// # Errors
    /// Any [`StoreError`]; the design must be considered unusable after a
    /// failed load.
    pub fn load(&mut self, raw: &RawDesign) -> Result<(), StoreError> {
        if let Some(name) = &raw.metamodel {
            if !name.is_empty() && *name != self.design.metamodel().name {
                return Err(StoreError::MetamodelMismatch(name.clone()));
            }
        }
        let mut context = LoadingContext::default();
        let mut pending = self.load_snapshots(raw, &mut context)?;
        let frames = self.load_frames(raw, &mut context, &pending)?;
        self.accept_frames(&frames, &mut pending)?;
        self.load_state(raw, &mut context)?;
        debug!(
            snapshots = raw.snapshots.len(),
            frames = raw.frames.len(),
            "loaded design"
        );
        Ok(())
    }

    /// Phases 1–2: reserve identities and build snapshots.
    fn load_snapshots(
        &mut self,
        raw: &RawDesign,
        context: &mut LoadingContext,
    ) -> Result<FxHashMap<u64, PendingSnapshot>, StoreError> {
        let mut pending: FxHashMap<u64, PendingSnapshot> = FxHashMap::default();
        for (index, raw_snapshot) in raw.snapshots.iter().enumerate() {
            let path = format!("$.snapshots[{index}]");
            let id_reference =
                raw_snapshot
                    .id
                    .as_ref()
                    .ok_or_else(|| StoreError::MissingProperty {
                        name: "id".to_owned(),
                        path: path.clone(),
                    })?;
            let object_id = ObjectId(context.resolve(
                self.design.identity_mut(),
                id_reference,
                IdKind::Object,
            )?);
            let snapshot_reference =
                raw_snapshot
                    .snapshot_id
                    .as_ref()
                    .ok_or_else(|| StoreError::MissingProperty {
                        name: "snapshot_id".to_owned(),
                        path: path.clone(),
                    })?;
            let snapshot_id = context
                .resolve_unique(
                    self.design.identity_mut(),
                    snapshot_reference,
                    IdKind::Snapshot,
                )
                .map_err(|error| match error {
                    StoreError::Identity(crate::identity::IdentityError::DuplicateId(id)) => {
                        StoreError::DuplicateSnapshot(id)
                    }
                    other => other,
                })?;

            let type_name =
                raw_snapshot
                    .type_name
                    .as_ref()
                    .ok_or_else(|| StoreError::MissingProperty {
                        name: "type".to_owned(),
                        path: path.clone(),
                    })?;
            let expected = self
                .design
                .metamodel()
                .object_type(type_name)
                .ok_or_else(|| StoreError::UnknownObjectType(type_name.clone()))?
                .structural_type;
            if let Some(spelling) = &raw_snapshot.structural_type {
                let actual: StructuralType = spelling
                    .parse()
                    .map_err(|_| StoreError::UnknownStructuralType(spelling.clone()))?;
                if actual != expected {
                    return Err(StoreError::StructuralTypeMismatch { expected, actual });
                }
            }

            let structure = match expected {
                StructuralType::Unstructured => Structure::Unstructured,
                StructuralType::Node => Structure::Node,
                StructuralType::Edge => {
                    let from =
                        raw_snapshot
                            .from
                            .as_ref()
                            .ok_or_else(|| StoreError::MissingProperty {
                                name: "from".to_owned(),
                                path: path.clone(),
                            })?;
                    let to = raw_snapshot
                        .to
                        .as_ref()
                        .ok_or_else(|| StoreError::MissingProperty {
                            name: "to".to_owned(),
                            path: path.clone(),
                        })?;
                    let origin = ObjectId(context.resolve(
                        self.design.identity_mut(),
                        from,
                        IdKind::Object,
                    )?);
                    let target =
                        ObjectId(context.resolve(self.design.identity_mut(), to, IdKind::Object)?);
                    Structure::Edge { origin, target }
                }
            };

            let parent = match &raw_snapshot.parent {
                Some(reference) => Some(ObjectId(context.resolve(
                    self.design.identity_mut(),
                    reference,
                    IdKind::Object,
                )?)),
                None => None,
            };

            let mut attributes = IndexMap::new();
            for (name, value) in &raw_snapshot.attributes {
                let variant =
                    Variant::from_json(value).map_err(|_| StoreError::TypeMismatch {
                        path: format!("{path}.attributes.{name}"),
                    })?;
                attributes.insert(name.clone(), variant);
            }

            pending.insert(
                snapshot_id,
                PendingSnapshot {
                    snapshot: ObjectSnapshot {
                        object_id,
                        snapshot_id: SnapshotId(snapshot_id),
                        type_name: type_name.clone(),
                        structure,
                        parent,
                        children: Vec::new(),
                        attributes,
                    },
                    frozen: None,
                },
            );
        }
        Ok(pending)
    }

    /// Phase 3: resolve frames and their member lists.
    fn load_frames(
        &mut self,
        raw: &RawDesign,
        context: &mut LoadingContext,
        pending: &FxHashMap<u64, PendingSnapshot>,
    ) -> Result<Vec<(FrameId, Vec<u64>)>, StoreError> {
        let mut frames: Vec<(FrameId, Vec<u64>)> = Vec::with_capacity(raw.frames.len());
        let mut seen: FxHashSet<u64> = FxHashSet::default();
        for (index, raw_frame) in raw.frames.iter().enumerate() {
            let path = format!("$.frames[{index}]");
            let id_reference =
                raw_frame
                    .id
                    .as_ref()
                    .ok_or_else(|| StoreError::MissingProperty {
                        name: "id".to_owned(),
                        path,
                    })?;
            let frame_id =
                context.resolve(self.design.identity_mut(), id_reference, IdKind::Object)?;
            if !seen.insert(frame_id) {
                return Err(StoreError::DuplicateFrame(ObjectId(frame_id)));
            }
            let mut members = Vec::with_capacity(raw_frame.snapshots.len());
            let mut member_objects: FxHashSet<ObjectId> = FxHashSet::default();
            for reference in &raw_frame.snapshots {
                let snapshot_id =
                    context.resolve(self.design.identity_mut(), reference, IdKind::Snapshot)?;
                let Some(entry) = pending.get(&snapshot_id) else {
                    return Err(StoreError::UnknownSnapshotReference(snapshot_id));
                };
                if !member_objects.insert(entry.snapshot.object_id) {
                    // One object with two snapshots in the same frame.
                    return Err(StoreError::DataCorrupted);
                }
                members.push(snapshot_id);
            }
            frames.push((ObjectId(frame_id), members));
        }
        Ok(frames)
    }

    /// Phase 5: derive children, freeze snapshots, and accept every frame
    /// through the transient-frame path (full validation).
    fn accept_frames(
        &mut self,
        frames: &[(FrameId, Vec<u64>)],
        pending: &mut FxHashMap<u64, PendingSnapshot>,
    ) -> Result<(), StoreError> {
        for (frame_id, members) in frames {
            // Children derive from the parent references of this frame's
            // members, in member order.
            let mut children: FxHashMap<ObjectId, Vec<ObjectId>> = FxHashMap::default();
            for member in members {
                let Some(entry) = pending.get(member) else {
                    return Err(StoreError::UnknownSnapshotReference(*member));
                };
                if let Some(parent) = entry.snapshot.parent {
                    children
                        .entry(parent)
                        .or_default()
                        .push(entry.snapshot.object_id);
                }
            }

            let mut shared: Vec<Arc<ObjectSnapshot>> = Vec::with_capacity(members.len());
            for member in members {
                let Some(entry) = pending.get_mut(member) else {
                    return Err(StoreError::UnknownSnapshotReference(*member));
                };
                let derived = children
                    .get(&entry.snapshot.object_id)
                    .cloned()
                    .unwrap_or_default();
                match &entry.frozen {
                    Some(arc) => {
                        // A snapshot shared between frames must imply the
                        // same children everywhere it appears.
                        if arc.children != derived {
                            return Err(StoreError::DataCorrupted);
                        }
                        shared.push(Arc::clone(arc));
                    }
                    None => {
                        entry.snapshot.children = derived;
                        let arc = Arc::new(entry.snapshot.clone());
                        entry.frozen = Some(Arc::clone(&arc));
                        shared.push(arc);
                    }
                }
            }

            let mut frame = self.design.create_frame_with_id(*frame_id);
            for arc in shared {
                frame.insert_unchecked(arc);
            }
            frame.accept_detached().map_err(|error| match error {
                AcceptError::Validation(validation) => {
                    StoreError::FrameValidationFailed(*frame_id, validation)
                }
                AcceptError::FrameClosed | AcceptError::NameInUse(_) => StoreError::DataCorrupted,
            })?;
            debug!(frame = %frame_id, "loaded frame");
        }
        Ok(())
    }

    /// Phase 4: install history and named frames.
    fn load_state(
        &mut self,
        raw: &RawDesign,
        context: &mut LoadingContext,
    ) -> Result<(), StoreError> {
        let mut undoable: Vec<FrameId> = Vec::new();
        let mut redoable: Vec<FrameId> = Vec::new();
        let mut current: Option<FrameId> = None;
        if let Some(state) = &raw.state {
            for reference in &state.undoable_frames {
                undoable.push(self.state_frame(context, reference)?);
            }
            for reference in &state.redoable_frames {
                redoable.push(self.state_frame(context, reference)?);
            }
            if let Some(reference) = &state.current_frame {
                current = Some(self.state_frame(context, reference)?);
            }
        }
        if current.is_none() && !(undoable.is_empty() && redoable.is_empty()) {
            return Err(StoreError::MissingProperty {
                name: "current_frame".to_owned(),
                path: "$.state".to_owned(),
            });
        }

        let mut history: FxHashSet<FrameId> = FxHashSet::default();
        for id in undoable.iter().chain(redoable.iter()).chain(current.iter()) {
            if !history.insert(*id) {
                return Err(StoreError::DuplicateHistoryEntry(*id));
            }
        }

        let mut named: IndexMap<String, FrameId> = IndexMap::new();
        for (name, reference) in &raw.named_frames {
            let id = self.state_frame(context, reference)?;
            if history.contains(&id) {
                return Err(StoreError::HistoryNameOverlap(id));
            }
            named.insert(name.clone(), id);
        }

        self.design.install_state(undoable, redoable, current, named);
        Ok(())
    }

    fn state_frame(
        &mut self,
        context: &mut LoadingContext,
        reference: &RawReference,
    ) -> Result<FrameId, StoreError> {
        let id = ObjectId(context.resolve(
            self.design.identity_mut(),
            reference,
            IdKind::Object,
        )?);
        if !self.design.contains_frame(id) {
            return Err(StoreError::UnknownFrameReference(id));
        }
        Ok(id)
    }
}
