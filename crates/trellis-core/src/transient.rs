// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transient frames: copy-on-write editing over a frozen frame.
//!
//! A [`TransientFrame`] is the only mutable surface of a design. It starts
//! either empty or as a shallow derivation of a frozen frame — every slot
//! referencing the parent's shared snapshot — and tracks its own identity
//! reservations. Mutating an inherited object first copies it under a fresh
//! snapshot id; the copy stays exclusively owned by the frame until accept.
//!
//! The frame borrows its [`Design`] mutably for its whole lifetime, which is
//! what enforces the single-writer edit model: while an edit is open, nothing
//! else can touch the design. The edit ends with exactly one of:
//!
//! - [`accept`](TransientFrame::accept) — validate, freeze, join history;
//! - [`accept_named`](TransientFrame::accept_named) — validate, freeze,
//!   register under a name outside history;
//! - [`discard`](TransientFrame::discard) — drop all reservations and edits.
//!
//! Dropping a frame that is still transient discards it implicitly.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::debug;

use crate::checker::{ConstraintChecker, FrameValidationError};
use crate::design::Design;
use crate::frame::{Frame, FrozenFrame};
use crate::ident::{FrameId, IdKind, ObjectId, SnapshotId};
use crate::identity::IdentityError;
use crate::metamodel::StructuralType;
use crate::object::{ObjectSnapshot, Structure};
use crate::value::Variant;

/// Lifecycle state of a transient frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransientState {
    /// Open for editing.
    Transient,
    /// Validated and frozen into the design.
    Accepted,
    /// Abandoned; all reservations released.
    Discarded,
}

/// Error raised by transient-frame editing operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransientError {
    /// The frame was already accepted or discarded.
    #[error("frame is no longer transient")]
    FrameClosed,
    /// The referenced object is not part of the frame.
    #[error("unknown object: {0}")]
    UnknownObject(ObjectId),
    /// The requested object type is not in the design's metamodel.
    #[error("unknown object type: {0:?}")]
    UnknownType(String),
    /// An edge-structured type needs explicit endpoints at creation.
    #[error("edge type {0:?} requires an edge structure with endpoints")]
    MissingEdgeEndpoints(String),
    /// An object with the given id is already part of the frame.
    #[error("duplicate object: {0}")]
    DuplicateObject(ObjectId),
    /// Identity allocation failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Error raised when accepting a transient frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcceptError {
    /// The frame was already accepted or discarded.
    #[error("frame is no longer transient")]
    FrameClosed,
    /// The requested frame name is already registered.
    #[error("frame name already in use: {0:?}")]
    NameInUse(String),
    /// Validation rejected the frame; it remains transient and editable.
    #[error(transparent)]
    Validation(#[from] FrameValidationError),
}

/// Specification of an object to create in a transient frame.
///
/// Everything except the type name is optional: missing ids are allocated,
/// the structure defaults to the type's structural role (edge types must
/// spell out their endpoints), and attributes are topped up with the trait
/// defaults declared by the type.
#[derive(Debug, Clone)]
pub struct ObjectPrototype {
    type_name: String,
    object_id: Option<ObjectId>,
    snapshot_id: Option<SnapshotId>,
    structure: Option<Structure>,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    attributes: IndexMap<String, Variant>,
}

impl ObjectPrototype {
    /// Starts a prototype for the given object type.
    #[must_use]
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_owned(),
            object_id: None,
            snapshot_id: None,
            structure: None,
            parent: None,
            children: Vec::new(),
            attributes: IndexMap::new(),
        }
    }

    /// Starts an edge prototype with explicit endpoints.
    #[must_use]
    pub fn edge(type_name: &str, origin: ObjectId, target: ObjectId) -> Self {
        Self::new(type_name).with_structure(Structure::Edge { origin, target })
    }

    /// Uses a specific object id instead of allocating one.
    #[must_use]
    pub fn with_id(mut self, object_id: ObjectId) -> Self {
        self.object_id = Some(object_id);
        self
    }

    /// Uses a specific snapshot id instead of allocating one.
    #[must_use]
    pub fn with_snapshot_id(mut self, snapshot_id: SnapshotId) -> Self {
        self.snapshot_id = Some(snapshot_id);
        self
    }

    /// Sets the structure explicitly.
    #[must_use]
    pub fn with_structure(mut self, structure: Structure) -> Self {
        self.structure = Some(structure);
        self
    }

    /// Places the new object under a parent.
    #[must_use]
    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Adopts an existing object as a child of the new object.
    #[must_use]
    pub fn with_child(mut self, child: ObjectId) -> Self {
        self.children.push(child);
        self
    }

    /// Sets an attribute value.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<Variant>) -> Self {
        self.attributes.insert(name.to_owned(), value.into());
        self
    }
}

#[derive(Debug, Clone)]
enum Slot {
    /// Shared snapshot inherited from the deriving frame.
    Inherited(Arc<ObjectSnapshot>),
    /// Snapshot owned exclusively by this frame.
    Owned(ObjectSnapshot),
}

impl Slot {
    fn snapshot(&self) -> &ObjectSnapshot {
        match self {
            Self::Inherited(arc) => arc,
            Self::Owned(snapshot) => snapshot,
        }
    }
}

/// Mutable derivation of a frozen frame (or of nothing).
///
/// See the module documentation for the lifecycle. All read access goes
/// through the [`Frame`] trait, which the constraint checker and graph
/// queries consume.
#[derive(Debug)]
pub struct TransientFrame<'a> {
    design: &'a mut Design,
    id: FrameId,
    slots: IndexMap<ObjectId, Slot>,
    /// Objects present in the deriving frame at derivation time.
    inherited_objects: FxHashSet<ObjectId>,
    /// Inherited objects removed by this frame.
    removed_objects: FxHashSet<ObjectId>,
    /// Raw ids reserved by this frame, promoted or released at the end.
    reservations: Vec<u64>,
    state: TransientState,
    has_changes: bool,
}

impl<'a> TransientFrame<'a> {
    pub(crate) fn new(design: &'a mut Design, id: FrameId, parent: Option<&FrozenFrame>) -> Self {
        let mut slots = IndexMap::new();
        let mut inherited_objects = FxHashSet::default();
        if let Some(parent) = parent {
            for snapshot in parent.shared_snapshots() {
                slots.insert(snapshot.object_id, Slot::Inherited(Arc::clone(snapshot)));
                inherited_objects.insert(snapshot.object_id);
            }
        }
        Self {
            design,
            id,
            slots,
            inherited_objects,
            removed_objects: FxHashSet::default(),
            reservations: vec![id.value()],
            state: TransientState::Transient,
            has_changes: false,
        }
    }

    /// Frame identifier (already reserved in the design's identity manager).
    #[must_use]
    pub fn frame_id(&self) -> FrameId {
        self.id
    }

    /// Lifecycle state of the frame.
    #[must_use]
    pub fn state(&self) -> TransientState {
        self.state
    }

    /// Returns `true` once any edit has been made.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.has_changes
    }

    /// Inherited objects removed by this frame.
    pub fn removed_objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.removed_objects.iter().copied()
    }

    fn ensure_open(&self) -> Result<(), TransientError> {
        if self.state == TransientState::Transient {
            Ok(())
        } else {
            Err(TransientError::FrameClosed)
        }
    }

    /// Creates an object from `prototype` and returns its id.
    ///
    /// Missing ids are allocated and reserved; the structure defaults to the
    /// type's structural role; trait defaults fill in absent attributes.
    /// Parent and child references are wired up on both sides.
    ///
    /// # Errors
    /// [`TransientError::UnknownType`] for types absent from the metamodel,
    /// [`TransientError::MissingEdgeEndpoints`] for edge types without an
    /// explicit structure, [`TransientError::DuplicateObject`] when the
    /// explicit object id is already present, and identity errors for id
    /// conflicts.
    pub fn create(&mut self, prototype: ObjectPrototype) -> Result<ObjectId, TransientError> {
        self.ensure_open()?;
        let Some(object_type) = self.design.metamodel().object_type(&prototype.type_name) else {
            return Err(TransientError::UnknownType(prototype.type_name));
        };
        let structural_type = object_type.structural_type;

        // Validate references before reserving any id, so a failed create
        // leaves the frame untouched.
        if let Some(parent_id) = prototype.parent {
            if !self.slots.contains_key(&parent_id) {
                return Err(TransientError::UnknownObject(parent_id));
            }
        }
        for child_id in &prototype.children {
            if !self.slots.contains_key(child_id) {
                return Err(TransientError::UnknownObject(*child_id));
            }
        }

        let structure = match prototype.structure {
            Some(structure) => structure,
            None => match structural_type {
                StructuralType::Unstructured => Structure::Unstructured,
                StructuralType::Node => Structure::Node,
                StructuralType::Edge => {
                    return Err(TransientError::MissingEdgeEndpoints(prototype.type_name))
                }
            },
        };

        let mut attributes = prototype.attributes;
        for object_trait in &object_type.traits {
            for attribute in &object_trait.attributes {
                if let Some(default) = &attribute.default {
                    if !attributes.contains_key(&attribute.name) {
                        attributes.insert(attribute.name.clone(), default.clone());
                    }
                }
            }
        }
        let type_name = object_type.name.clone();

        let object_id = match prototype.object_id {
            Some(id) => {
                if self.slots.contains_key(&id) {
                    return Err(TransientError::DuplicateObject(id));
                }
                if self
                    .design
                    .identity_mut()
                    .reserve_if_needed(id.value(), IdKind::Object)?
                {
                    self.reservations.push(id.value());
                }
                id
            }
            None => {
                let id = self.design.identity_mut().reserve_new_object();
                self.reservations.push(id.value());
                id
            }
        };
        let snapshot_id = match prototype.snapshot_id {
            Some(id) => {
                self.design
                    .identity_mut()
                    .reserve_unique(id.value(), IdKind::Snapshot)?;
                self.reservations.push(id.value());
                id
            }
            None => {
                let id = self.design.identity_mut().reserve_new_snapshot();
                self.reservations.push(id.value());
                id
            }
        };

        let snapshot = ObjectSnapshot {
            object_id,
            snapshot_id,
            type_name,
            structure,
            parent: prototype.parent,
            children: Vec::new(),
            attributes,
        };
        self.slots.insert(object_id, Slot::Owned(snapshot));
        self.has_changes = true;

        if let Some(parent_id) = prototype.parent {
            let parent = self.mutate(parent_id)?;
            if !parent.children.contains(&object_id) {
                parent.children.push(object_id);
            }
        }
        for child_id in prototype.children {
            self.adopt_child(object_id, child_id)?;
        }
        Ok(object_id)
    }

    /// Returns a mutable snapshot of the object, copying it under a fresh
    /// snapshot id on first mutation. Idempotent: subsequent calls return the
    /// same owned snapshot.
    ///
    /// # Errors
    /// [`TransientError::UnknownObject`] when the object is not in the frame.
    pub fn mutate(&mut self, object_id: ObjectId) -> Result<&mut ObjectSnapshot, TransientError> {
        self.ensure_open()?;
        if !self.slots.contains_key(&object_id) {
            return Err(TransientError::UnknownObject(object_id));
        }
        let needs_copy = matches!(self.slots.get(&object_id), Some(Slot::Inherited(_)));
        if needs_copy {
            let snapshot_id = self.design.identity_mut().reserve_new_snapshot();
            self.reservations.push(snapshot_id.value());
            let Some(Slot::Inherited(arc)) = self.slots.get(&object_id) else {
                return Err(TransientError::UnknownObject(object_id));
            };
            let mut copy = (**arc).clone();
            copy.snapshot_id = snapshot_id;
            self.slots.insert(object_id, Slot::Owned(copy));
            self.has_changes = true;
        }
        match self.slots.get_mut(&object_id) {
            Some(Slot::Owned(snapshot)) => {
                self.has_changes = true;
                Ok(snapshot)
            }
            _ => Err(TransientError::UnknownObject(object_id)),
        }
    }

    /// Sets one attribute, copying the snapshot first when it is still
    /// shared with the deriving frame.
    ///
    /// # Errors
    /// [`TransientError::UnknownObject`] when the object is not in the frame.
    pub fn set_attribute(
        &mut self,
        object_id: ObjectId,
        name: &str,
        value: impl Into<Variant>,
    ) -> Result<(), TransientError> {
        let snapshot = self.mutate(object_id)?;
        snapshot.attributes.insert(name.to_owned(), value.into());
        Ok(())
    }

    /// Removes one attribute and returns its previous value.
    ///
    /// # Errors
    /// [`TransientError::UnknownObject`] when the object is not in the frame.
    pub fn remove_attribute(
        &mut self,
        object_id: ObjectId,
        name: &str,
    ) -> Result<Option<Variant>, TransientError> {
        let snapshot = self.mutate(object_id)?;
        Ok(snapshot.attributes.shift_remove(name))
    }

    /// Inserts an already-built shared snapshot (loader path).
    ///
    /// The snapshot's ids must already be tracked by the identity manager.
    ///
    /// # Errors
    /// [`TransientError::DuplicateObject`] when the object id is present,
    /// [`IdentityError::UnknownId`] when an id is untracked.
    pub fn insert(&mut self, snapshot: Arc<ObjectSnapshot>) -> Result<(), TransientError> {
        self.ensure_open()?;
        if self.slots.contains_key(&snapshot.object_id) {
            return Err(TransientError::DuplicateObject(snapshot.object_id));
        }
        let identity = self.design.identity();
        for raw in [snapshot.object_id.value(), snapshot.snapshot_id.value()] {
            if !identity.contains(raw) {
                return Err(TransientError::Identity(IdentityError::UnknownId(raw)));
            }
        }
        self.insert_unchecked(snapshot);
        Ok(())
    }

    /// Inserts a shared snapshot without identity checks.
    ///
    /// Only for loader code that has already funnelled every id through the
    /// identity manager.
    pub fn insert_unchecked(&mut self, snapshot: Arc<ObjectSnapshot>) {
        self.slots
            .insert(snapshot.object_id, Slot::Inherited(snapshot));
        self.has_changes = true;
    }

    /// Removes the object, every transitive child, and every edge incident
    /// to anything removed. Returns the removed ids in frame order.
    ///
    /// Surviving parents of removed objects lose the corresponding child
    /// entries. Objects inherited from the deriving frame are recorded in
    /// [`removed_objects`](Self::removed_objects).
    ///
    /// # Errors
    /// [`TransientError::UnknownObject`] when the object is not in the frame.
    pub fn remove_cascading(
        &mut self,
        object_id: ObjectId,
    ) -> Result<Vec<ObjectId>, TransientError> {
        self.ensure_open()?;
        if !self.slots.contains_key(&object_id) {
            return Err(TransientError::UnknownObject(object_id));
        }
        let mut removed: FxHashSet<ObjectId> = FxHashSet::default();
        removed.insert(object_id);
        // Fixpoint: children of removed objects follow their parents, edges
        // follow their endpoints, and removed edges drag their own children.
        loop {
            let mut grew = false;
            for (id, slot) in &self.slots {
                if removed.contains(id) {
                    continue;
                }
                let snapshot = slot.snapshot();
                let follows_parent = snapshot.parent.is_some_and(|p| removed.contains(&p));
                let follows_endpoint = match snapshot.structure {
                    Structure::Edge { origin, target } => {
                        removed.contains(&origin) || removed.contains(&target)
                    }
                    _ => false,
                };
                if follows_parent || follows_endpoint {
                    removed.insert(*id);
                    grew = true;
                }
            }
            if !grew {
                break;
            }
        }

        // Detach removed objects from surviving parents, in frame order so
        // snapshot allocation stays deterministic.
        let mut detachments: Vec<(ObjectId, ObjectId)> = Vec::new();
        for (id, slot) in &self.slots {
            if !removed.contains(id) {
                continue;
            }
            if let Some(parent) = slot.snapshot().parent {
                if !removed.contains(&parent) {
                    detachments.push((parent, *id));
                }
            }
        }
        for (parent, child) in detachments {
            let parent_snapshot = self.mutate(parent)?;
            parent_snapshot.children.retain(|c| *c != child);
        }

        let order: Vec<ObjectId> = self
            .slots
            .keys()
            .filter(|id| removed.contains(*id))
            .copied()
            .collect();
        for id in &order {
            self.slots.shift_remove(id);
            if self.inherited_objects.contains(id) {
                self.removed_objects.insert(*id);
            }
        }
        self.has_changes = true;
        Ok(order)
    }

    /// Appends `child` to `parent`'s children and sets the child's parent,
    /// detaching the child from any previous parent first.
    ///
    /// # Errors
    /// [`TransientError::UnknownObject`] when either object is missing.
    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<(), TransientError> {
        self.adopt_child(parent, child)
    }

    /// Removes `child` from `parent`'s children and clears the child's
    /// parent reference. No-op when the two are not related.
    ///
    /// # Errors
    /// [`TransientError::UnknownObject`] when either object is missing.
    pub fn remove_child(
        &mut self,
        parent: ObjectId,
        child: ObjectId,
    ) -> Result<(), TransientError> {
        self.ensure_open()?;
        if !self.slots.contains_key(&parent) {
            return Err(TransientError::UnknownObject(parent));
        }
        if !self.slots.contains_key(&child) {
            return Err(TransientError::UnknownObject(child));
        }
        let parent_snapshot = self.mutate(parent)?;
        parent_snapshot.children.retain(|c| *c != child);
        let child_snapshot = self.mutate(child)?;
        if child_snapshot.parent == Some(parent) {
            child_snapshot.parent = None;
        }
        Ok(())
    }

    /// Moves `child` under `parent` (or to the top level with `None`),
    /// maintaining both sides of the relation.
    ///
    /// # Errors
    /// [`TransientError::UnknownObject`] when either object is missing.
    pub fn set_parent(
        &mut self,
        child: ObjectId,
        parent: Option<ObjectId>,
    ) -> Result<(), TransientError> {
        match parent {
            Some(parent) => self.adopt_child(parent, child),
            None => {
                self.ensure_open()?;
                let Some(slot) = self.slots.get(&child) else {
                    return Err(TransientError::UnknownObject(child));
                };
                if let Some(old_parent) = slot.snapshot().parent {
                    let old = self.mutate(old_parent)?;
                    old.children.retain(|c| *c != child);
                }
                let child_snapshot = self.mutate(child)?;
                child_snapshot.parent = None;
                Ok(())
            }
        }
    }

    /// Detaches `child` from its parent, if it has one.
    ///
    /// # Errors
    /// [`TransientError::UnknownObject`] when the object is missing.
    pub fn remove_from_parent(&mut self, child: ObjectId) -> Result<(), TransientError> {
        self.set_parent(child, None)
    }

    fn adopt_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<(), TransientError> {
        self.ensure_open()?;
        if !self.slots.contains_key(&parent) {
            return Err(TransientError::UnknownObject(parent));
        }
        let Some(child_slot) = self.slots.get(&child) else {
            return Err(TransientError::UnknownObject(child));
        };
        let old_parent = child_slot.snapshot().parent;
        if old_parent == Some(parent) {
            return Ok(());
        }
        if let Some(old_parent) = old_parent {
            let old = self.mutate(old_parent)?;
            old.children.retain(|c| *c != child);
        }
        let parent_snapshot = self.mutate(parent)?;
        if !parent_snapshot.children.contains(&child) {
            parent_snapshot.children.push(child);
        }
        let child_snapshot = self.mutate(child)?;
        child_snapshot.parent = Some(parent);
        Ok(())
    }

    /// Fail-fast validation of the frame's current content.
    ///
    /// # Errors
    /// The first validation failure, as on accept.
    pub fn validate(&self) -> Result<(), FrameValidationError> {
        ConstraintChecker::new(self.design.metamodel()).validate(self)
    }

    /// Full diagnosis of the frame's current content.
    ///
    /// # Errors
    /// Structural integrity failures only; see
    /// [`ConstraintChecker::diagnose`].
    pub fn diagnose(
        &self,
    ) -> Result<crate::checker::FrameValidationResult, crate::checker::StructuralIntegrityError>
    {
        ConstraintChecker::new(self.design.metamodel()).diagnose(self)
    }

    /// Returns `true` when a hypothetical edge of `edge_type` from `origin`
    /// to `target` would be allowed given the frame's current content.
    #[must_use]
    pub fn can_connect(&self, edge_type: &str, origin: ObjectId, target: ObjectId) -> bool {
        ConstraintChecker::new(self.design.metamodel()).can_connect(self, edge_type, origin, target)
    }

    /// Validates the frame, freezes it, and appends it to the design's
    /// history (clearing the redo list). On failure the frame remains
    /// transient and editable.
    ///
    /// # Errors
    /// [`AcceptError::Validation`] with the first validation failure.
    pub fn accept(&mut self) -> Result<FrameId, AcceptError> {
        self.accept_internal(HistoryDisposition::Append)
    }

    /// Validates the frame, freezes it, and registers it under `name`
    /// instead of joining history.
    ///
    /// # Errors
    /// [`AcceptError::NameInUse`] when the name is taken, otherwise as
    /// [`TransientFrame::accept`].
    pub fn accept_named(&mut self, name: &str) -> Result<FrameId, AcceptError> {
        if self.design.named_frame_id(name).is_some() {
            return Err(AcceptError::NameInUse(name.to_owned()));
        }
        self.accept_internal(HistoryDisposition::Named(name.to_owned()))
    }

    pub(crate) fn accept_detached(&mut self) -> Result<FrameId, AcceptError> {
        self.accept_internal(HistoryDisposition::Detached)
    }

    fn accept_internal(&mut self, disposition: HistoryDisposition) -> Result<FrameId, AcceptError> {
        if self.state != TransientState::Transient {
            return Err(AcceptError::FrameClosed);
        }
        {
            let checker = ConstraintChecker::new(self.design.metamodel());
            checker.validate(self)?;
        }

        let slots = core::mem::take(&mut self.slots);
        let mut shared: Vec<Arc<ObjectSnapshot>> = Vec::with_capacity(slots.len());
        let mut content_ids: FxHashSet<u64> = FxHashSet::default();
        content_ids.insert(self.id.value());
        for (_, slot) in slots {
            let arc = match slot {
                Slot::Inherited(arc) => arc,
                Slot::Owned(snapshot) => Arc::new(snapshot),
            };
            content_ids.insert(arc.object_id.value());
            content_ids.insert(arc.snapshot_id.value());
            shared.push(arc);
        }

        // Promote reservations that made it into the frame; release the rest
        // (ids of removed objects and abandoned snapshots).
        for raw in self.reservations.drain(..) {
            let identity = self.design.identity_mut();
            let result = if content_ids.contains(&raw) {
                identity.use_if_reserved(raw)
            } else if identity.is_reserved(raw) {
                identity.release(raw)
            } else {
                Ok(())
            };
            debug_assert!(result.is_ok(), "inconsistent reservation: {raw}");
        }
        for arc in &shared {
            // Inherited ids are already used; fresh ones were promoted above.
            debug_assert!(self.design.identity().contains(arc.object_id.value()));
            debug_assert!(self.design.identity().contains(arc.snapshot_id.value()));
        }

        let frozen = FrozenFrame::from_snapshots(self.id, shared);
        self.design.install_frame(frozen, disposition);
        self.state = TransientState::Accepted;
        debug!(frame = %self.id, "accepted frame");
        Ok(self.id)
    }

    /// Abandons the frame: releases every reservation this frame made and
    /// drops all edits. The design is left exactly as before the edit.
    pub fn discard(&mut self) {
        if self.state != TransientState::Transient {
            return;
        }
        for raw in self.reservations.drain(..) {
            if self.design.identity().is_reserved(raw) {
                let result = self.design.identity_mut().release(raw);
                debug_assert!(result.is_ok(), "inconsistent reservation: {raw}");
            }
        }
        self.slots.clear();
        self.removed_objects.clear();
        self.state = TransientState::Discarded;
        debug!(frame = %self.id, "discarded frame");
    }
}

impl Drop for TransientFrame<'_> {
    fn drop(&mut self) {
        // An open frame that goes out of scope is discarded implicitly.
        self.discard();
    }
}

pub(crate) enum HistoryDisposition {
    /// Append to history as the new current frame, clearing redo.
    Append,
    /// Register under a name, outside history.
    Named(String),
    /// Install the frame only (store loader path).
    Detached,
}

impl Frame for TransientFrame<'_> {
    fn id(&self) -> FrameId {
        self.id
    }

    fn contains(&self, object_id: ObjectId) -> bool {
        self.slots.contains_key(&object_id)
    }

    fn object(&self, object_id: ObjectId) -> Option<&ObjectSnapshot> {
        self.slots.get(&object_id).map(Slot::snapshot)
    }

    fn snapshots(&self) -> Box<dyn Iterator<Item = &ObjectSnapshot> + '_> {
        Box::new(self.slots.values().map(Slot::snapshot))
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}
