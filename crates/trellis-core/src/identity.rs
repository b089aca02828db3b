// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identity manager: allocation and tracking of object and snapshot ids.
//!
//! Every id a design hands out passes through the [`IdentityManager`]. An id
//! is either *reserved* (claimed but not yet part of an accepted frame) or
//! *used* (owned by accepted state). Reservations are held by transient
//! frames and by the store loader; they are promoted to used on accept and
//! dropped entirely on discard, so a discarded edit leaves no trace.
//!
//! Ids are never reused within one design: releasing a reservation frees the
//! id record, but the allocation counter only moves forward.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::ident::{IdKind, ObjectId, SnapshotId};

/// Lifecycle state of a tracked id.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IdState {
    /// Claimed by a transient frame or loader, not yet part of accepted state.
    Reserved,
    /// Owned by accepted state (a frozen frame, snapshot, or the design).
    Used,
}

/// Error raised by identity operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The caller asserted uniqueness, but the id is already tracked.
    #[error("duplicate id: {0}")]
    DuplicateId(u64),
    /// The id is not tracked (or not in the state the operation requires).
    #[error("unknown id: {0}")]
    UnknownId(u64),
    /// The id is tracked under the other namespace tag.
    #[error("id {id} is a {actual} id, expected {expected}")]
    KindMismatch {
        /// Offending id.
        id: u64,
        /// Namespace the caller asked for.
        expected: IdKind,
        /// Namespace the id is tracked under.
        actual: IdKind,
    },
}

/// Allocates and tracks used/reserved ids with a namespace tag.
///
/// The manager is shared by all frames of a design. It does not distinguish
/// *which* frame holds a reservation; transient frames remember their own
/// reservations and promote or release them on accept/discard.
#[derive(Debug, Clone, Default)]
pub struct IdentityManager {
    entries: FxHashMap<u64, (IdKind, IdState)>,
    next_id: u64,
}

impl IdentityManager {
    /// Creates an empty manager. The first allocated id is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// Picks an unused id, marks it reserved under `kind`, and returns it.
    pub fn reserve_new(&mut self, kind: IdKind) -> u64 {
        while self.entries.contains_key(&self.next_id) {
            self.next_id += 1;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(id, (kind, IdState::Reserved));
        id
    }

    /// Reserves a fresh object id and returns it typed.
    pub fn reserve_new_object(&mut self) -> ObjectId {
        ObjectId(self.reserve_new(IdKind::Object))
    }

    /// Reserves a fresh snapshot id and returns it typed.
    pub fn reserve_new_snapshot(&mut self) -> SnapshotId {
        SnapshotId(self.reserve_new(IdKind::Snapshot))
    }

    /// Reserves a specific id under `kind`.
    ///
    /// Idempotent when the id is already tracked under the same kind
    /// (reserved or used).
    ///
    /// # Errors
    /// Returns [`IdentityError::KindMismatch`] when the id is tracked under
    /// the other namespace.
    pub fn reserve(&mut self, id: u64, kind: IdKind) -> Result<(), IdentityError> {
        match self.entries.get(&id) {
            None => {
                self.entries.insert(id, (kind, IdState::Reserved));
                self.bump_counter(id);
                Ok(())
            }
            Some((actual, _)) if *actual == kind => Ok(()),
            Some((actual, _)) => Err(IdentityError::KindMismatch {
                id,
                expected: kind,
                actual: *actual,
            }),
        }
    }

    /// Reserves `id` when it is free.
    ///
    /// Returns `true` when a new reservation was made, `false` when the id
    /// was already tracked under the same kind.
    ///
    /// # Errors
    /// Returns [`IdentityError::KindMismatch`] when the id is tracked under
    /// the other namespace.
    pub fn reserve_if_needed(&mut self, id: u64, kind: IdKind) -> Result<bool, IdentityError> {
        match self.entries.get(&id) {
            None => {
                self.entries.insert(id, (kind, IdState::Reserved));
                self.bump_counter(id);
                Ok(true)
            }
            Some((actual, _)) if *actual == kind => Ok(false),
            Some((actual, _)) => Err(IdentityError::KindMismatch {
                id,
                expected: kind,
                actual: *actual,
            }),
        }
    }

    /// Reserves `id` asserting it was never seen before.
    ///
    /// # Errors
    /// Returns [`IdentityError::DuplicateId`] when the id is already tracked
    /// under either namespace.
    pub fn reserve_unique(&mut self, id: u64, kind: IdKind) -> Result<(), IdentityError> {
        if self.entries.contains_key(&id) {
            return Err(IdentityError::DuplicateId(id));
        }
        self.entries.insert(id, (kind, IdState::Reserved));
        self.bump_counter(id);
        Ok(())
    }

    /// Marks a previously unseen id as used.
    ///
    /// # Errors
    /// Returns [`IdentityError::DuplicateId`] when the id is already tracked.
    pub fn use_new(&mut self, id: u64, kind: IdKind) -> Result<(), IdentityError> {
        if self.entries.contains_key(&id) {
            return Err(IdentityError::DuplicateId(id));
        }
        self.entries.insert(id, (kind, IdState::Used));
        self.bump_counter(id);
        Ok(())
    }

    /// Promotes a reserved id to used.
    ///
    /// # Errors
    /// Returns [`IdentityError::UnknownId`] when the id is not reserved.
    pub fn use_reserved(&mut self, id: u64) -> Result<(), IdentityError> {
        match self.entries.get_mut(&id) {
            Some((_, state @ IdState::Reserved)) => {
                *state = IdState::Used;
                Ok(())
            }
            _ => Err(IdentityError::UnknownId(id)),
        }
    }

    /// Promotes a reserved id to used; no-op when the id is already used.
    ///
    /// # Errors
    /// Returns [`IdentityError::UnknownId`] when the id is not tracked.
    pub fn use_if_reserved(&mut self, id: u64) -> Result<(), IdentityError> {
        match self.entries.get_mut(&id) {
            Some((_, state)) => {
                *state = IdState::Used;
                Ok(())
            }
            None => Err(IdentityError::UnknownId(id)),
        }
    }

    /// Clears a reservation. Only legal from the reserved state.
    ///
    /// # Errors
    /// Returns [`IdentityError::UnknownId`] when the id is not reserved.
    pub fn release(&mut self, id: u64) -> Result<(), IdentityError> {
        match self.entries.get(&id) {
            Some((_, IdState::Reserved)) => {
                self.entries.remove(&id);
                Ok(())
            }
            _ => Err(IdentityError::UnknownId(id)),
        }
    }

    /// Returns `true` when the id is tracked (reserved or used).
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    /// Returns `true` when the id is tracked and reserved.
    #[must_use]
    pub fn is_reserved(&self, id: u64) -> bool {
        matches!(self.entries.get(&id), Some((_, IdState::Reserved)))
    }

    /// Returns `true` when the id is tracked and used.
    #[must_use]
    pub fn is_used(&self, id: u64) -> bool {
        matches!(self.entries.get(&id), Some((_, IdState::Used)))
    }

    /// Returns the namespace tag of a tracked id.
    #[must_use]
    pub fn kind(&self, id: u64) -> Option<IdKind> {
        self.entries.get(&id).map(|(kind, _)| *kind)
    }

    fn bump_counter(&mut self, id: u64) {
        if id >= self.next_id {
            self.next_id = id.saturating_add(1);
        }
    }
}
