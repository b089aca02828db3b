// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Metamodel constraints: frame-wide rules with violator reporting.

use crate::frame::{EdgeDirection, Frame};
use crate::ident::ObjectId;
use crate::metamodel::{Metamodel, Predicate};
use crate::object::Structure;

/// Requirement applied to every object matched by a constraint's selector.
#[derive(Clone, PartialEq, Debug)]
pub enum ConstraintRequirement {
    /// Every matched object is a violation. Used to ban object shapes
    /// entirely (the selector describes the forbidden shape).
    RejectAll,
    /// No matched object is a violation. Used as the explicit no-op.
    AcceptAll,
    /// Each matched object must have at most one — or, when `required`,
    /// exactly one — edge in `direction` matching `predicate`.
    UniqueNeighbourhood {
        /// Predicate on the candidate edges.
        predicate: Predicate,
        /// Which incident edges to count.
        direction: EdgeDirection,
        /// When `true`, zero matching edges is also a violation.
        required: bool,
    },
    /// Each matched object must be an edge whose parts satisfy the given
    /// predicates (absent predicates accept anything).
    EdgeEndpoint {
        /// Predicate on the origin node snapshot.
        origin: Option<Predicate>,
        /// Predicate on the target node snapshot.
        target: Option<Predicate>,
        /// Predicate on the edge snapshot itself.
        edge: Option<Predicate>,
    },
}

/// Named frame-wide rule.
///
/// A constraint selects objects with [`selector`](Self::selector) and applies
/// its [`requirement`](Self::requirement) to each of them. Checking a frame
/// yields the ids of the violating objects; an accepted frame always yields
/// an empty list for every constraint of its design's metamodel.
#[derive(Clone, PartialEq, Debug)]
pub struct Constraint {
    /// Constraint name, unique within a metamodel.
    pub name: String,
    /// Human-readable description used in diagnostics.
    pub summary: Option<String>,
    /// Selects the objects the requirement applies to.
    pub selector: Predicate,
    /// Requirement applied to each selected object.
    pub requirement: ConstraintRequirement,
}

impl Constraint {
    /// Creates a constraint.
    #[must_use]
    pub fn new(name: &str, selector: Predicate, requirement: ConstraintRequirement) -> Self {
        Self {
            name: name.to_owned(),
            summary: None,
            selector,
            requirement,
        }
    }

    /// Attaches a description, returning the modified constraint.
    #[must_use]
    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_owned());
        self
    }

    /// Checks the constraint over `frame` and returns the ids of the
    /// violating objects, in frame iteration order.
    #[must_use]
    pub fn check(&self, frame: &dyn Frame, metamodel: &Metamodel) -> Vec<ObjectId> {
        let mut violators = Vec::new();
        for snapshot in frame.snapshots() {
            if !self.selector.matches(snapshot, frame, metamodel) {
                continue;
            }
            let satisfied = match &self.requirement {
                ConstraintRequirement::RejectAll => false,
                ConstraintRequirement::AcceptAll => true,
                ConstraintRequirement::UniqueNeighbourhood {
                    predicate,
                    direction,
                    required,
                } => {
                    let count = frame
                        .incident_edges(snapshot.object_id, *direction)
                        .into_iter()
                        .filter(|edge| predicate.matches(edge, frame, metamodel))
                        .count();
                    count <= 1 && (!required || count == 1)
                }
                ConstraintRequirement::EdgeEndpoint {
                    origin,
                    target,
                    edge,
                } => match snapshot.structure {
                    Structure::Edge {
                        origin: origin_id,
                        target: target_id,
                    } => {
                        let endpoint_ok = |predicate: &Option<Predicate>, id| match predicate {
                            None => true,
                            Some(p) => frame
                                .object(id)
                                .is_some_and(|s| p.matches(s, frame, metamodel)),
                        };
                        edge.as_ref()
                            .is_none_or(|p| p.matches(snapshot, frame, metamodel))
                            && endpoint_ok(origin, origin_id)
                            && endpoint_ok(target, target_id)
                    }
                    _ => false,
                },
            };
            if !satisfied {
                violators.push(snapshot.object_id);
            }
        }
        violators
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::frame::FrozenFrame;
    use crate::ident::SnapshotId;
    use crate::metamodel::{ObjectType, StructuralType};
    use crate::object::ObjectSnapshot;
    use indexmap::IndexMap;
    use std::sync::Arc;

    fn metamodel() -> Metamodel {
        Metamodel::builder("test")
            .with_type(ObjectType::new("Stock", StructuralType::Node, vec![]))
            .unwrap()
            .with_type(ObjectType::new("Drain", StructuralType::Edge, vec![]))
            .unwrap()
            .build()
    }

    fn node(id: u64, type_name: &str) -> ObjectSnapshot {
        ObjectSnapshot {
            object_id: ObjectId(id),
            snapshot_id: SnapshotId(id),
            type_name: type_name.to_owned(),
            structure: Structure::Node,
            parent: None,
            children: Vec::new(),
            attributes: IndexMap::new(),
        }
    }

    fn edge(id: u64, origin: u64, target: u64) -> ObjectSnapshot {
        ObjectSnapshot {
            object_id: ObjectId(id),
            snapshot_id: SnapshotId(id),
            type_name: "Drain".to_owned(),
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
    fn reject_all_reports_every_match() {
        let mm = metamodel();
        let f = frame(vec![node(1, "Stock"), node(2, "Stock"), node(3, "Cloud")]);
        let c = Constraint::new(
            "no_stocks",
            Predicate::is_type("Stock"),
            ConstraintRequirement::RejectAll,
        );
        assert_eq!(c.check(&f, &mm), vec![ObjectId(1), ObjectId(2)]);
    }

    #[test]
    fn accept_all_reports_nothing() {
        let mm = metamodel();
        let f = frame(vec![node(1, "Stock")]);
        let c = Constraint::new("anything", Predicate::Any, ConstraintRequirement::AcceptAll);
        assert!(c.check(&f, &mm).is_empty());
    }

    #[test]
    fn unique_neighbourhood_counts_matching_edges() {
        let mm = metamodel();
        let f = frame(vec![
            node(1, "Stock"),
            node(2, "Stock"),
            node(3, "Stock"),
            edge(10, 1, 2),
            edge(11, 1, 3),
        ]);
        let at_most_one_drain = Constraint::new(
            "single_drain",
            Predicate::is_type("Stock"),
            ConstraintRequirement::UniqueNeighbourhood {
                predicate: Predicate::is_type("Drain"),
                direction: EdgeDirection::Outgoing,
                required: false,
            },
        );
        // Object 1 has two outgoing drains; 2 and 3 have none.
        assert_eq!(at_most_one_drain.check(&f, &mm), vec![ObjectId(1)]);

        let exactly_one_drain = Constraint::new(
            "mandatory_drain",
            Predicate::is_type("Stock"),
            ConstraintRequirement::UniqueNeighbourhood {
                predicate: Predicate::is_type("Drain"),
                direction: EdgeDirection::Outgoing,
                required: true,
            },
        );
        assert_eq!(
            exactly_one_drain.check(&f, &mm),
            vec![ObjectId(1), ObjectId(2), ObjectId(3)]
        );
    }

    #[test]
    fn edge_endpoint_checks_both_sides() {
        let mm = metamodel();
        let f = frame(vec![node(1, "Stock"), node(2, "Cloud"), edge(10, 1, 2)]);
        let ok = Constraint::new(
            "drain_from_stock",
            Predicate::is_type("Drain"),
            ConstraintRequirement::EdgeEndpoint {
                origin: Some(Predicate::is_type("Stock")),
                target: None,
                edge: None,
            },
        );
        assert!(ok.check(&f, &mm).is_empty());

        let bad = Constraint::new(
            "drain_into_stock",
            Predicate::is_type("Drain"),
            ConstraintRequirement::EdgeEndpoint {
                origin: None,
                target: Some(Predicate::is_type("Stock")),
                edge: None,
            },
        );
        assert_eq!(bad.check(&f, &mm), vec![ObjectId(10)]);
    }
}
