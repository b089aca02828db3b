// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Object predicates used by edge rules and constraints.

use crate::frame::Frame;
use crate::metamodel::Metamodel;
use crate::object::{ObjectSnapshot, Structure};

/// Pure, total predicate over object snapshots within a frame.
///
/// Predicates are a closed data enum rather than open trait objects so that
/// they stay structurally comparable; [`EdgeRule`](crate::metamodel::EdgeRule)
/// and [`Constraint`](crate::metamodel::Constraint) equality includes the
/// predicates they carry. A predicate never mutates anything and never fails:
/// unresolvable references simply do not match.
#[derive(Clone, PartialEq, Debug)]
pub enum Predicate {
    /// Matches every object.
    Any,
    /// Matches objects whose type has the given name.
    IsType(String),
    /// Matches objects whose type carries the named trait.
    HasTrait(String),
    /// Matches objects that have a value for the named attribute.
    HasAttribute(String),
    /// Matches when all sub-predicates match. Empty list matches everything.
    And(Vec<Predicate>),
    /// Matches when any sub-predicate matches. Empty list matches nothing.
    Or(Vec<Predicate>),
    /// Matches when the sub-predicate does not.
    Not(Box<Predicate>),
    /// Matches edge objects, optionally constraining the edge itself and the
    /// snapshots at its endpoints.
    IsEdge {
        /// Predicate on the edge snapshot itself.
        edge: Option<Box<Predicate>>,
        /// Predicate on the origin node's snapshot.
        origin: Option<Box<Predicate>>,
        /// Predicate on the target node's snapshot.
        target: Option<Box<Predicate>>,
    },
}

impl Predicate {
    /// Convenience constructor for a type predicate.
    #[must_use]
    pub fn is_type(name: &str) -> Self {
        Self::IsType(name.to_owned())
    }

    /// Convenience constructor for a trait predicate.
    #[must_use]
    pub fn has_trait(name: &str) -> Self {
        Self::HasTrait(name.to_owned())
    }

    /// Evaluates the predicate for `snapshot` within `frame`.
    ///
    /// Type and trait predicates resolve through `metamodel`; a type name
    /// absent from the metamodel matches nothing.
    #[must_use]
    pub fn matches(
        &self,
        snapshot: &ObjectSnapshot,
        frame: &dyn Frame,
        metamodel: &Metamodel,
    ) -> bool {
        match self {
            Self::Any => true,
            Self::IsType(name) => snapshot.type_name == *name,
            Self::HasTrait(name) => metamodel
                .object_type(&snapshot.type_name)
                .is_some_and(|ty| ty.has_trait(name)),
            Self::HasAttribute(name) => snapshot.attribute(name).is_some(),
            Self::And(parts) => parts.iter().all(|p| p.matches(snapshot, frame, metamodel)),
            Self::Or(parts) => parts.iter().any(|p| p.matches(snapshot, frame, metamodel)),
            Self::Not(inner) => !inner.matches(snapshot, frame, metamodel),
            Self::IsEdge {
                edge,
                origin,
                target,
            } => {
                let Structure::Edge {
                    origin: origin_id,
                    target: target_id,
                } = snapshot.structure
                else {
                    return false;
                };
                if let Some(edge_predicate) = edge {
                    if !edge_predicate.matches(snapshot, frame, metamodel) {
                        return false;
                    }
                }
                let endpoint_matches = |predicate: &Option<Box<Self>>, id| match predicate {
                    None => true,
                    Some(p) => frame
                        .object(id)
                        .is_some_and(|endpoint| p.matches(endpoint, frame, metamodel)),
                };
                endpoint_matches(origin, origin_id) && endpoint_matches(target, target_id)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::frame::FrozenFrame;
    use crate::ident::{ObjectId, SnapshotId};
    use crate::metamodel::{Attribute, ObjectTrait, ObjectType, StructuralType};
    use crate::value::{ValueType, Variant};
    use indexmap::IndexMap;
    use std::sync::Arc;

    fn metamodel() -> Metamodel {
        Metamodel::builder("test")
            .with_trait(ObjectTrait::new(
                "Named",
                vec![Attribute::required("name", ValueType::STRING)],
            ))
            .unwrap()
            .with_type(ObjectType::new(
                "Stock",
                StructuralType::Node,
                vec![ObjectTrait::new(
                    "Named",
                    vec![Attribute::required("name", ValueType::STRING)],
                )],
            ))
            .unwrap()
            .with_type(ObjectType::new("Flow", StructuralType::Edge, vec![]))
            .unwrap()
            .build()
    }

    fn node(object_id: u64, snapshot_id: u64, type_name: &str) -> ObjectSnapshot {
        ObjectSnapshot {
            object_id: ObjectId(object_id),
            snapshot_id: SnapshotId(snapshot_id),
            type_name: type_name.to_owned(),
            structure: Structure::Node,
            parent: None,
            children: Vec::new(),
            attributes: IndexMap::new(),
        }
    }

    fn edge(object_id: u64, snapshot_id: u64, origin: u64, target: u64) -> ObjectSnapshot {
        ObjectSnapshot {
            object_id: ObjectId(object_id),
            snapshot_id: SnapshotId(snapshot_id),
            type_name: "Flow".to_owned(),
            structure: Structure::Edge {
                origin: ObjectId(origin),
                target: ObjectId(target),
            },
            parent: None,
            children: Vec::new(),
            attributes: IndexMap::new(),
        }
    }

    fn frame(snapshots: Vec<ObjectSnapshot>) -> FrozenFrame {
        FrozenFrame::from_snapshots(ObjectId(100), snapshots.into_iter().map(Arc::new))
    }

    #[test]
    fn compound_predicates_evaluate_logically() {
        let mm = metamodel();
        let s = node(1, 1, "Stock");
        let f = frame(vec![s.clone()]);
        assert!(Predicate::Any.matches(&s, &f, &mm));
        assert!(Predicate::is_type("Stock").matches(&s, &f, &mm));
        assert!(!Predicate::is_type("Flow").matches(&s, &f, &mm));
        assert!(Predicate::has_trait("Named").matches(&s, &f, &mm));
        assert!(
            Predicate::And(vec![Predicate::Any, Predicate::is_type("Stock")]).matches(&s, &f, &mm)
        );
        assert!(
            Predicate::Or(vec![Predicate::is_type("Flow"), Predicate::Any]).matches(&s, &f, &mm)
        );
        assert!(!Predicate::Not(Box::new(Predicate::Any)).matches(&s, &f, &mm));
        // Vacuous truth for And, vacuous falsity for Or.
        assert!(Predicate::And(vec![]).matches(&s, &f, &mm));
        assert!(!Predicate::Or(vec![]).matches(&s, &f, &mm));
    }

    #[test]
    fn has_attribute_inspects_the_snapshot() {
        let mm = metamodel();
        let mut s = node(1, 1, "Stock");
        s.attributes
            .insert("name".to_owned(), Variant::from("water"));
        let f = frame(vec![s.clone()]);
        assert!(Predicate::HasAttribute("name".to_owned()).matches(&s, &f, &mm));
        assert!(!Predicate::HasAttribute("formula".to_owned()).matches(&s, &f, &mm));
    }

    #[test]
    fn edge_predicate_resolves_endpoints_through_the_frame() {
        let mm = metamodel();
        let origin = node(1, 1, "Stock");
        let target = node(2, 2, "Stock");
        let e = edge(3, 3, 1, 2);
        let f = frame(vec![origin, target, e.clone()]);

        let p = Predicate::IsEdge {
            edge: None,
            origin: Some(Box::new(Predicate::is_type("Stock"))),
            target: Some(Box::new(Predicate::is_type("Stock"))),
        };
        assert!(p.matches(&e, &f, &mm));

        let q = Predicate::IsEdge {
            edge: None,
            origin: Some(Box::new(Predicate::is_type("Flow"))),
            target: None,
        };
        assert!(!q.matches(&e, &f, &mm));

        // Non-edge snapshots never match an edge predicate.
        let s = node(4, 4, "Stock");
        assert!(!p.matches(&s, &f, &mm));
    }

    #[test]
    fn predicates_are_structurally_comparable() {
        let a = Predicate::And(vec![Predicate::is_type("Stock"), Predicate::Any]);
        let b = Predicate::And(vec![Predicate::is_type("Stock"), Predicate::Any]);
        assert_eq!(a, b);
        assert_ne!(a, Predicate::Or(vec![]));
    }
}
