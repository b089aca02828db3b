// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Edge rules: which endpoints an edge type may connect, and how many.

use crate::frame::Frame;
use crate::metamodel::{Metamodel, Predicate};
use crate::object::{ObjectSnapshot, Structure};

/// Cardinality of an edge endpoint.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Cardinality {
    /// Exactly one such edge per endpoint.
    One,
    /// Unbounded.
    #[default]
    Many,
}

impl core::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::One => write!(f, "one"),
            Self::Many => write!(f, "many"),
        }
    }
}

/// Permission for an edge type to connect matching endpoints.
///
/// A rule *applies* to an edge when the edge has the rule's type and the
/// origin/target predicates match the endpoint snapshots (an absent predicate
/// matches anything). Cardinalities constrain how many edges of the rule's
/// type an endpoint may carry: `outgoing` counts edges originating from the
/// origin node, `incoming` counts edges targeting the target node.
#[derive(Clone, PartialEq, Debug)]
pub struct EdgeRule {
    /// Name of the edge object type the rule is for.
    pub edge_type: String,
    /// Predicate on the origin node snapshot; `None` matches anything.
    pub origin: Option<Predicate>,
    /// Cardinality on edges originating from the origin node.
    pub outgoing: Cardinality,
    /// Predicate on the target node snapshot; `None` matches anything.
    pub target: Option<Predicate>,
    /// Cardinality on edges targeting the target node.
    pub incoming: Cardinality,
}

impl EdgeRule {
    /// Creates a rule with `many` cardinality on both endpoints.
    #[must_use]
    pub fn new(edge_type: &str, origin: Option<Predicate>, target: Option<Predicate>) -> Self {
        Self {
            edge_type: edge_type.to_owned(),
            origin,
            outgoing: Cardinality::Many,
            target,
            incoming: Cardinality::Many,
        }
    }

    /// Sets the outgoing cardinality, returning the modified rule.
    #[must_use]
    pub fn with_outgoing(mut self, cardinality: Cardinality) -> Self {
        self.outgoing = cardinality;
        self
    }

    /// Sets the incoming cardinality, returning the modified rule.
    #[must_use]
    pub fn with_incoming(mut self, cardinality: Cardinality) -> Self {
        self.incoming = cardinality;
        self
    }

    /// Returns `true` when this rule applies to `edge` within `frame`:
    /// the types match and both endpoint predicates accept the endpoint
    /// snapshots.
    #[must_use]
    pub fn applies_to(
        &self,
        edge: &ObjectSnapshot,
        frame: &dyn Frame,
        metamodel: &Metamodel,
    ) -> bool {
        if edge.type_name != self.edge_type {
            return false;
        }
        let Structure::Edge { origin, target } = edge.structure else {
            return false;
        };
        self.endpoints_match(origin, target, frame, metamodel)
    }

    /// Returns `true` when the endpoint predicates accept the snapshots of
    /// `origin` and `target` within `frame`.
    ///
    /// This is the hypothetical-edge half of [`EdgeRule::applies_to`], used
    /// by connection queries before any edge exists.
    #[must_use]
    pub fn endpoints_match(
        &self,
        origin: crate::ident::ObjectId,
        target: crate::ident::ObjectId,
        frame: &dyn Frame,
        metamodel: &Metamodel,
    ) -> bool {
        let matches = |predicate: &Option<Predicate>, id| match predicate {
            None => true,
            Some(p) => frame
                .object(id)
                .is_some_and(|snapshot| p.matches(snapshot, frame, metamodel)),
        };
        matches(&self.origin, origin) && matches(&self.target, target)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::frame::FrozenFrame;
    use crate::ident::{ObjectId, SnapshotId};
    use crate::metamodel::{ObjectType, StructuralType};
    use indexmap::IndexMap;
    use std::sync::Arc;

    fn metamodel() -> Metamodel {
        Metamodel::builder("test")
            .with_type(ObjectType::new("Stock", StructuralType::Node, vec![]))
            .unwrap()
            .with_type(ObjectType::new("Cloud", StructuralType::Node, vec![]))
            .unwrap()
            .with_type(ObjectType::new("Flow", StructuralType::Edge, vec![]))
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

    #[test]
    fn rule_applies_when_type_and_endpoints_match() {
        let mm = metamodel();
        let frame = FrozenFrame::from_snapshots(
            ObjectId(100),
            [node(1, "Stock"), node(2, "Cloud"), edge(3, 1, 2)]
                .into_iter()
                .map(Arc::new),
        );
        let e = frame.object(ObjectId(3)).unwrap().clone();

        let open = EdgeRule::new("Flow", None, None);
        assert!(open.applies_to(&e, &frame, &mm));

        let stock_to_cloud = EdgeRule::new(
            "Flow",
            Some(Predicate::is_type("Stock")),
            Some(Predicate::is_type("Cloud")),
        );
        assert!(stock_to_cloud.applies_to(&e, &frame, &mm));

        let cloud_to_stock = EdgeRule::new("Flow", Some(Predicate::is_type("Cloud")), None);
        assert!(!cloud_to_stock.applies_to(&e, &frame, &mm));

        let other_type = EdgeRule::new("Link", None, None);
        assert!(!other_type.applies_to(&e, &frame, &mm));
    }

    #[test]
    fn rule_equality_includes_predicates() {
        let a = EdgeRule::new("Flow", Some(Predicate::is_type("Stock")), None);
        let b = EdgeRule::new("Flow", Some(Predicate::is_type("Stock")), None);
        let c = EdgeRule::new("Flow", Some(Predicate::is_type("Cloud")), None);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a.clone().with_incoming(Cardinality::One), a);
    }
}
