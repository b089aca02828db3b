// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Object snapshots: immutable typed versions of design objects.

use indexmap::IndexMap;

use crate::ident::{ObjectId, SnapshotId};
use crate::metamodel::StructuralType;
use crate::value::Variant;

/// Structural role of an object within the graph.
///
/// Edge endpoints and parents are **id references only** — graph queries
/// resolve them through the containing frame, never through pointers. This
/// keeps the ownership graph acyclic even though the object graph is not.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Structure {
    /// The object participates in no graph structure.
    Unstructured,
    /// The object is a node.
    Node,
    /// The object is a directed edge between two nodes of the same frame.
    Edge {
        /// Object id of the node the edge originates from.
        origin: ObjectId,
        /// Object id of the node the edge points to.
        target: ObjectId,
    },
}

impl Structure {
    /// Returns the metamodel structural type this structure satisfies.
    #[must_use]
    pub const fn structural_type(&self) -> StructuralType {
        match self {
            Self::Unstructured => StructuralType::Unstructured,
            Self::Node => StructuralType::Node,
            Self::Edge { .. } => StructuralType::Edge,
        }
    }

    /// Returns the edge endpoints when this is an edge structure.
    #[must_use]
    pub const fn endpoints(&self) -> Option<(ObjectId, ObjectId)> {
        match self {
            Self::Edge { origin, target } => Some((*origin, *target)),
            _ => None,
        }
    }
}

/// One immutable version of one design object.
///
/// A snapshot carries the full state of its object: type, structural role,
/// position in the parent/child forest, and the attribute map. Snapshots are
/// mutable only while owned exclusively by a transient frame; once a frame is
/// accepted they are frozen and shared between frames by reference count.
///
/// Equality and hashing are by [`snapshot_id`](Self::snapshot_id) alone — two
/// snapshots with the same id are the same version by definition.
#[derive(Clone, Debug)]
pub struct ObjectSnapshot {
    /// Stable identity of the object this snapshot is a version of.
    pub object_id: ObjectId,
    /// Identity of this version, unique across the design.
    pub snapshot_id: SnapshotId,
    /// Name of the object type in the design's metamodel.
    pub type_name: String,
    /// Structural role within the graph.
    pub structure: Structure,
    /// Object id of the parent in the ownership forest, if any.
    pub parent: Option<ObjectId>,
    /// Object ids of the children, in insertion order.
    pub children: Vec<ObjectId>,
    /// Attribute values keyed by attribute name, in insertion order.
    pub attributes: IndexMap<String, Variant>,
}

impl ObjectSnapshot {
    /// Returns the attribute value for `name`, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Variant> {
        self.attributes.get(name)
    }

    /// Returns the `"name"` attribute rendered as a string, if present and
    /// representable.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.attribute("name").and_then(|v| v.try_string().ok())
    }

    /// Returns `true` when the snapshot has children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

impl PartialEq for ObjectSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.snapshot_id == other.snapshot_id
    }
}

impl Eq for ObjectSnapshot {}

impl core::hash::Hash for ObjectSnapshot {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.snapshot_id.hash(state);
    }
}
