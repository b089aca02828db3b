// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Frames: coherent graph states, frozen or in-edit.
//!
//! A frame is a set of object snapshots, one per object id, iterated in
//! insertion order. [`FrozenFrame`] is the immutable, validated form that
//! lives in a design's history; the mutable form is
//! [`TransientFrame`](crate::transient::TransientFrame). Both expose the same
//! read surface through the [`Frame`] trait, which is what the constraint
//! checker and external collaborators (expression evaluators, simulators)
//! consume.
//!
//! All graph references are object ids resolved through the frame; no
//! snapshot ever points at another snapshot directly.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::ident::{FrameId, ObjectId};
use crate::metamodel::{Metamodel, Predicate};
use crate::object::{ObjectSnapshot, Structure};

/// Direction of incident edges relative to an object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EdgeDirection {
    /// Edges whose target is the object.
    Incoming,
    /// Edges whose origin is the object.
    Outgoing,
}

impl core::fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Incoming => write!(f, "incoming"),
            Self::Outgoing => write!(f, "outgoing"),
        }
    }
}

/// Edges incident to one object in one direction, paired with the nodes on
/// the far side.
///
/// `edges[i]` connects the neighbourhood's object with `nodes[i]`. Produced
/// by [`Frame::hood`].
#[derive(Debug)]
pub struct Neighbourhood<'a> {
    /// The object the neighbourhood is centred on.
    pub object_id: ObjectId,
    /// Direction the edges were collected in.
    pub direction: EdgeDirection,
    /// Matching edge snapshots, in frame iteration order.
    pub edges: Vec<&'a ObjectSnapshot>,
    /// Node snapshots on the far side of each edge.
    pub nodes: Vec<&'a ObjectSnapshot>,
}

impl Neighbourhood<'_> {
    /// Number of edges in the neighbourhood.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` when no edge matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// An edge snapshot with both endpoint snapshots resolved.
///
/// Produced by [`Frame::edge`]; exists only when both endpoints are present
/// in the frame, which every accepted frame guarantees.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    /// The edge snapshot itself.
    pub edge: &'a ObjectSnapshot,
    /// Snapshot of the node the edge originates from.
    pub origin: &'a ObjectSnapshot,
    /// Snapshot of the node the edge points to.
    pub target: &'a ObjectSnapshot,
}

/// Read surface shared by frozen and transient frames.
pub trait Frame {
    /// Frame identifier.
    fn id(&self) -> FrameId;

    /// Returns `true` when the frame contains an object with `object_id`.
    fn contains(&self, object_id: ObjectId) -> bool;

    /// Returns the snapshot of the object with `object_id`, if present.
    fn object(&self, object_id: ObjectId) -> Option<&ObjectSnapshot>;

    /// Iterates all snapshots in insertion order.
    fn snapshots(&self) -> Box<dyn Iterator<Item = &ObjectSnapshot> + '_>;

    /// Number of objects in the frame.
    fn len(&self) -> usize;

    /// Returns `true` when the frame holds no objects.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the snapshot of `object_id` when it is node-structured.
    fn node(&self, object_id: ObjectId) -> Option<&ObjectSnapshot> {
        self.object(object_id)
            .filter(|s| s.structure == Structure::Node)
    }

    /// Returns an [`EdgeView`] of `object_id` when it is edge-structured and
    /// both endpoints resolve within the frame.
    fn edge(&self, object_id: ObjectId) -> Option<EdgeView<'_>> {
        let edge = self.object(object_id)?;
        let (origin_id, target_id) = edge.structure.endpoints()?;
        Some(EdgeView {
            edge,
            origin: self.object(origin_id)?,
            target: self.object(target_id)?,
        })
    }

    /// Iterates the node-structured snapshots in frame order.
    fn nodes(&self) -> Vec<&ObjectSnapshot> {
        self.snapshots()
            .filter(|s| s.structure == Structure::Node)
            .collect()
    }

    /// Iterates the edge-structured snapshots in frame order.
    fn edges(&self) -> Vec<&ObjectSnapshot> {
        self.snapshots()
            .filter(|s| matches!(s.structure, Structure::Edge { .. }))
            .collect()
    }

    /// Returns the snapshots without a parent, in frame order.
    fn top_level(&self) -> Vec<&ObjectSnapshot> {
        self.snapshots().filter(|s| s.parent.is_none()).collect()
    }

    /// Returns the resolved child snapshots of `object_id`, in child order.
    ///
    /// Missing children are skipped; the structural validator reports those
    /// separately.
    fn children_of(&self, object_id: ObjectId) -> Vec<&ObjectSnapshot> {
        self.object(object_id)
            .map(|snapshot| {
                snapshot
                    .children
                    .iter()
                    .filter_map(|child| self.object(*child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the edge snapshots originating from `origin`, in frame
    /// iteration order.
    fn outgoing(&self, origin: ObjectId) -> Vec<&ObjectSnapshot> {
        self.snapshots()
            .filter(|s| matches!(s.structure, Structure::Edge { origin: o, .. } if o == origin))
            .collect()
    }

    /// Returns the edge snapshots targeting `target`, in frame iteration
    /// order.
    fn incoming(&self, target: ObjectId) -> Vec<&ObjectSnapshot> {
        self.snapshots()
            .filter(|s| matches!(s.structure, Structure::Edge { target: t, .. } if t == target))
            .collect()
    }

    /// Returns the edges incident to `object_id` in `direction`.
    fn incident_edges(&self, object_id: ObjectId, direction: EdgeDirection) -> Vec<&ObjectSnapshot> {
        match direction {
            EdgeDirection::Incoming => self.incoming(object_id),
            EdgeDirection::Outgoing => self.outgoing(object_id),
        }
    }

    /// Collects the neighbourhood of `object_id`: incident edges in
    /// `direction` matching `predicate`, paired with the nodes on the far
    /// side.
    ///
    /// Edges whose far endpoint is missing from the frame are skipped; the
    /// structural validator reports those separately.
    fn hood(
        &self,
        object_id: ObjectId,
        direction: EdgeDirection,
        predicate: &Predicate,
        metamodel: &Metamodel,
    ) -> Neighbourhood<'_>
    where
        Self: Sized,
    {
        let mut edges = Vec::new();
        let mut nodes = Vec::new();
        for edge in self.incident_edges(object_id, direction) {
            if !predicate.matches(edge, self, metamodel) {
                continue;
            }
            let Structure::Edge { origin, target } = edge.structure else {
                continue;
            };
            let far_id = match direction {
                EdgeDirection::Incoming => origin,
                EdgeDirection::Outgoing => target,
            };
            if let Some(far) = self.object(far_id) {
                edges.push(edge);
                nodes.push(far);
            }
        }
        Neighbourhood {
            object_id,
            direction,
            edges,
            nodes,
        }
    }
}

/// Immutable, validated frame.
///
/// Snapshot instances are shared with the design's snapshot table; the table
/// tracks how many frames reference each snapshot.
#[derive(Debug, Clone)]
pub struct FrozenFrame {
    id: FrameId,
    snapshots: IndexMap<ObjectId, Arc<ObjectSnapshot>>,
}

impl FrozenFrame {
    /// Builds a frame from snapshots, keyed by object id in iteration order.
    ///
    /// Callers guarantee one snapshot per object id; a later duplicate
    /// replaces the earlier entry.
    pub(crate) fn from_snapshots(
        id: FrameId,
        snapshots: impl IntoIterator<Item = Arc<ObjectSnapshot>>,
    ) -> Self {
        let snapshots = snapshots
            .into_iter()
            .map(|snapshot| (snapshot.object_id, snapshot))
            .collect();
        Self { id, snapshots }
    }

    /// Iterates the shared snapshot instances in insertion order.
    pub fn shared_snapshots(&self) -> impl Iterator<Item = &Arc<ObjectSnapshot>> {
        self.snapshots.values()
    }

    /// Iterates the object ids in insertion order.
    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.snapshots.keys().copied()
    }

    /// Returns the shared snapshot instance for `object_id`, if present.
    #[must_use]
    pub fn shared_snapshot(&self, object_id: ObjectId) -> Option<&Arc<ObjectSnapshot>> {
        self.snapshots.get(&object_id)
    }
}

impl Frame for FrozenFrame {
    fn id(&self) -> FrameId {
        self.id
    }

    fn contains(&self, object_id: ObjectId) -> bool {
        self.snapshots.contains_key(&object_id)
    }

    fn object(&self, object_id: ObjectId) -> Option<&ObjectSnapshot> {
        self.snapshots.get(&object_id).map(Arc::as_ref)
    }

    fn snapshots(&self) -> Box<dyn Iterator<Item = &ObjectSnapshot> + '_> {
        Box::new(self.snapshots.values().map(Arc::as_ref))
    }

    fn len(&self) -> usize {
        self.snapshots.len()
    }
}
