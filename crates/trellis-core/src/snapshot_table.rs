// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reference-counted snapshot storage shared by all frames of a design.
//!
//! The table is the single owner of frozen snapshot instances; frames hold
//! [`Arc`] references into it. The explicit per-entry reference count tracks
//! *frame* ownership — for every stored snapshot it equals the number of
//! frames containing that snapshot, independent of how many `Arc` clones
//! exist transiently.
//!
//! Storage is a generational-index array: entries keep their slot for the
//! lifetime of the table and removals leave gaps, so iteration order is
//! insertion order and positions stay stable while other iterators are in
//! flight. A hash index maps snapshot ids to slots.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ident::SnapshotId;
use crate::identity::IdentityError;
use crate::object::ObjectSnapshot;

#[derive(Debug, Clone)]
struct Entry {
    snapshot: Arc<ObjectSnapshot>,
    ref_count: u32,
}

/// Insertion-ordered snapshot store with per-snapshot frame reference counts.
#[derive(Debug, Clone, Default)]
pub struct SnapshotTable {
    slots: Vec<Option<Entry>>,
    index: FxHashMap<SnapshotId, usize>,
}

impl SnapshotTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a snapshot with a reference count of 1.
    ///
    /// # Errors
    /// [`IdentityError::DuplicateId`] when a snapshot with the same id is
    /// already stored.
    pub fn insert(&mut self, snapshot: Arc<ObjectSnapshot>) -> Result<(), IdentityError> {
        let id = snapshot.snapshot_id;
        if self.index.contains_key(&id) {
            return Err(IdentityError::DuplicateId(id.value()));
        }
        self.index.insert(id, self.slots.len());
        self.slots.push(Some(Entry {
            snapshot,
            ref_count: 1,
        }));
        Ok(())
    }

    /// Inserts the snapshot, or increments the reference count when a
    /// snapshot with the same id is already stored.
    pub fn insert_or_retain(&mut self, snapshot: Arc<ObjectSnapshot>) {
        if let Some(slot) = self.index.get(&snapshot.snapshot_id) {
            if let Some(entry) = self.slots[*slot].as_mut() {
                entry.ref_count += 1;
                return;
            }
        }
        self.index.insert(snapshot.snapshot_id, self.slots.len());
        self.slots.push(Some(Entry {
            snapshot,
            ref_count: 1,
        }));
    }

    /// Increments the reference count of a stored snapshot.
    ///
    /// # Errors
    /// [`IdentityError::UnknownId`] when the id is not stored.
    pub fn retain(&mut self, id: SnapshotId) -> Result<(), IdentityError> {
        self.entry_mut(id)
            .map(|entry| entry.ref_count += 1)
            .ok_or(IdentityError::UnknownId(id.value()))
    }

    /// Decrements the reference count; removes the entry when it reaches
    /// zero. Returns `true` when the entry was removed.
    ///
    /// # Errors
    /// [`IdentityError::UnknownId`] when the id is not stored.
    pub fn release(&mut self, id: SnapshotId) -> Result<bool, IdentityError> {
        let slot = *self
            .index
            .get(&id)
            .ok_or(IdentityError::UnknownId(id.value()))?;
        let Some(entry) = self.slots[slot].as_mut() else {
            return Err(IdentityError::UnknownId(id.value()));
        };
        entry.ref_count -= 1;
        if entry.ref_count == 0 {
            self.slots[slot] = None;
            self.index.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Removes a stored snapshot regardless of its reference count.
    ///
    /// # Errors
    /// [`IdentityError::UnknownId`] when the id is not stored.
    pub fn remove(&mut self, id: SnapshotId) -> Result<(), IdentityError> {
        let slot = self
            .index
            .remove(&id)
            .ok_or(IdentityError::UnknownId(id.value()))?;
        self.slots[slot] = None;
        Ok(())
    }

    /// Replaces a stored snapshot (or inserts a new one), resetting the
    /// reference count to 1. The entry keeps its original position when it
    /// already existed.
    pub fn replace(&mut self, snapshot: Arc<ObjectSnapshot>) {
        match self.index.get(&snapshot.snapshot_id) {
            Some(slot) => {
                self.slots[*slot] = Some(Entry {
                    snapshot,
                    ref_count: 1,
                });
            }
            None => {
                self.index.insert(snapshot.snapshot_id, self.slots.len());
                self.slots.push(Some(Entry {
                    snapshot,
                    ref_count: 1,
                }));
            }
        }
    }

    /// Returns `true` when a snapshot with `id` is stored.
    #[must_use]
    pub fn contains(&self, id: SnapshotId) -> bool {
        self.index.contains_key(&id)
    }

    /// Returns the stored snapshot for `id`, if any.
    #[must_use]
    pub fn get(&self, id: SnapshotId) -> Option<&Arc<ObjectSnapshot>> {
        self.entry(id).map(|entry| &entry.snapshot)
    }

    /// Returns the reference count of a stored snapshot, if any.
    #[must_use]
    pub fn ref_count(&self, id: SnapshotId) -> Option<u32> {
        self.entry(id).map(|entry| entry.ref_count)
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` when no snapshot is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterates stored snapshots in insertion order, skipping gaps left by
    /// removals.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ObjectSnapshot>> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|entry| &entry.snapshot))
    }

    fn entry(&self, id: SnapshotId) -> Option<&Entry> {
        self.index
            .get(&id)
            .and_then(|slot| self.slots[*slot].as_ref())
    }

    fn entry_mut(&mut self, id: SnapshotId) -> Option<&mut Entry> {
        let slot = *self.index.get(&id)?;
        self.slots[slot].as_mut()
    }
}
