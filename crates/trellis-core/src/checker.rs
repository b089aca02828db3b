// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Frame validation: structural integrity, type conformance, edge rules, and
//! constraints.
//!
//! Validation runs in three phases:
//!
//! - **Phase A — structural integrity.** Every reference (edge endpoints,
//!   parent, children) must point into the frame, endpoints must be nodes,
//!   the parent/child relation must agree in both directions and form a
//!   forest. A failure here means the frame is not a graph at all; nothing
//!   past this point can be diagnosed, so phase A short-circuits.
//! - **Phase B — type conformance.** Every snapshot's type must exist in the
//!   metamodel, match the snapshot's structural role, and satisfy its traits'
//!   attribute declarations.
//! - **Phase C — edges and constraints.** Every edge must be permitted by at
//!   least one edge rule with its cardinalities satisfied, and every
//!   metamodel constraint must yield an empty violator set.
//!
//! [`ConstraintChecker::validate`] fails fast on the first error;
//! [`ConstraintChecker::diagnose`] collects everything (after phase A). Both
//! share the same semantics.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::frame::{EdgeDirection, Frame};
use crate::ident::ObjectId;
use crate::metamodel::{Cardinality, Metamodel, StructuralType};
use crate::object::{ObjectSnapshot, Structure};
use crate::value::ValueType;

/// Phase A failure: the frame is not a well-formed graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralIntegrityError {
    /// An edge references an object id absent from the frame.
    #[error("edge {object} references missing object {reference}")]
    BrokenStructureReference {
        /// The edge object.
        object: ObjectId,
        /// The missing endpoint id.
        reference: ObjectId,
    },
    /// A snapshot's parent is absent from the frame.
    #[error("object {object} references missing parent {parent}")]
    BrokenParent {
        /// The child object.
        object: ObjectId,
        /// The missing parent id.
        parent: ObjectId,
    },
    /// A snapshot's child is absent from the frame.
    #[error("object {object} references missing child {child}")]
    BrokenChild {
        /// The parent object.
        object: ObjectId,
        /// The missing child id.
        child: ObjectId,
    },
    /// Parent and child snapshots disagree about their relation.
    #[error("parent/child mismatch between {object} and {other}")]
    ParentChildMismatch {
        /// One side of the relation.
        object: ObjectId,
        /// The other side.
        other: ObjectId,
    },
    /// The parent relation contains a cycle.
    #[error("parent/child cycle through object {object}")]
    ParentChildCycle {
        /// An object on the cycle.
        object: ObjectId,
    },
    /// An edge endpoint exists but is not node-structured.
    #[error("endpoint {endpoint} of edge {edge} is not a node")]
    EdgeEndpointNotANode {
        /// The edge object.
        edge: ObjectId,
        /// The offending endpoint.
        endpoint: ObjectId,
    },
}

/// Phase B failure for one object.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObjectTypeError {
    /// The snapshot's type is not in the metamodel.
    #[error("unknown object type: {0:?}")]
    UnknownType(String),
    /// The snapshot's structure does not match its type's structural role.
    #[error("structural type mismatch: expected {expected}, found {actual}")]
    StructureMismatch {
        /// Role declared by the object type.
        expected: StructuralType,
        /// Role of the snapshot's structure.
        actual: StructuralType,
    },
    /// A required trait attribute is absent.
    #[error("missing attribute {attribute:?} required by trait {trait_name:?}")]
    MissingTraitAttribute {
        /// The absent attribute.
        attribute: String,
        /// Trait declaring it.
        trait_name: String,
    },
    /// An attribute value cannot represent the declared type.
    #[error("attribute {attribute:?} of type {actual} does not fit the declared type")]
    TypeMismatch {
        /// The offending attribute.
        attribute: String,
        /// Actual value type stored.
        actual: ValueType,
    },
}

/// Phase C failure for one edge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdgeRuleViolation {
    /// No edge rule exists for the edge's type at all.
    #[error("edge type is not allowed: no rule declared")]
    EdgeNotAllowed,
    /// Rules exist, but none accepts the edge's endpoints.
    #[error("no edge rule satisfied for type {edge_type:?}")]
    NoRuleSatisfied {
        /// The edge's type name.
        edge_type: String,
    },
    /// A matching rule's cardinality is violated at one endpoint.
    #[error("cardinality violation for {edge_type:?} ({direction})")]
    CardinalityViolation {
        /// The edge's type name.
        edge_type: String,
        /// Violated endpoint direction.
        direction: EdgeDirection,
    },
}

/// One constraint with a non-empty violator set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Name of the violated constraint.
    pub name: String,
    /// Ids of the offending objects, in frame iteration order.
    pub objects: Vec<ObjectId>,
}

/// First error found by fail-fast validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameValidationError {
    /// Phase A failure.
    #[error("structural integrity: {0}")]
    StructuralIntegrity(#[from] StructuralIntegrityError),
    /// Phase B failure on one object.
    #[error("object {object}: {error}")]
    ObjectError {
        /// The offending object.
        object: ObjectId,
        /// The specific failure.
        error: ObjectTypeError,
    },
    /// Phase C edge-rule failure on one edge.
    #[error("edge {edge}: {violation}")]
    EdgeRule {
        /// The offending edge.
        edge: ObjectId,
        /// The specific violation.
        violation: EdgeRuleViolation,
    },
    /// Phase C constraint failure.
    #[error("constraint {} violated", .0.name)]
    Constraint(ConstraintViolation),
}

/// Full diagnosis of one frame.
///
/// Produced by [`ConstraintChecker::diagnose`]; never signals failure itself
/// — inspect [`FrameValidationResult::is_ok`].
#[derive(Debug, Clone, Default)]
pub struct FrameValidationResult {
    /// Violated constraints with their offender lists.
    pub violations: Vec<ConstraintViolation>,
    /// Type-conformance errors keyed by object id.
    pub object_errors: IndexMap<ObjectId, Vec<ObjectTypeError>>,
    /// Edge-rule violations keyed by edge object id.
    pub edge_rule_violations: IndexMap<ObjectId, Vec<EdgeRuleViolation>>,
}

impl FrameValidationResult {
    /// Returns `true` when the diagnosis found nothing.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
            && self.object_errors.is_empty()
            && self.edge_rule_violations.is_empty()
    }
}

/// Stateless validator over a metamodel.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintChecker<'a> {
    metamodel: &'a Metamodel,
}

impl<'a> ConstraintChecker<'a> {
    /// Creates a checker for `metamodel`.
    #[must_use]
    pub fn new(metamodel: &'a Metamodel) -> Self {
        Self { metamodel }
    }

    /// Phase A: verifies that the frame is a well-formed graph.
    ///
    /// # Errors
    /// The first [`StructuralIntegrityError`] found.
    pub fn check_structural_integrity(
        &self,
        frame: &dyn Frame,
    ) -> Result<(), StructuralIntegrityError> {
        for snapshot in frame.snapshots() {
            if let Structure::Edge { origin, target } = snapshot.structure {
                for endpoint in [origin, target] {
                    match frame.object(endpoint) {
                        None => {
                            return Err(StructuralIntegrityError::BrokenStructureReference {
                                object: snapshot.object_id,
                                reference: endpoint,
                            })
                        }
                        Some(node) if node.structure != Structure::Node => {
                            return Err(StructuralIntegrityError::EdgeEndpointNotANode {
                                edge: snapshot.object_id,
                                endpoint,
                            })
                        }
                        Some(_) => {}
                    }
                }
            }
            if let Some(parent_id) = snapshot.parent {
                let Some(parent) = frame.object(parent_id) else {
                    return Err(StructuralIntegrityError::BrokenParent {
                        object: snapshot.object_id,
                        parent: parent_id,
                    });
                };
                if !parent.children.contains(&snapshot.object_id) {
                    return Err(StructuralIntegrityError::ParentChildMismatch {
                        object: snapshot.object_id,
                        other: parent_id,
                    });
                }
            }
            for child_id in &snapshot.children {
                let Some(child) = frame.object(*child_id) else {
                    return Err(StructuralIntegrityError::BrokenChild {
                        object: snapshot.object_id,
                        child: *child_id,
                    });
                };
                if child.parent != Some(snapshot.object_id) {
                    return Err(StructuralIntegrityError::ParentChildMismatch {
                        object: snapshot.object_id,
                        other: *child_id,
                    });
                }
            }
        }
        self.check_parent_forest(frame)
    }

    fn check_parent_forest(&self, frame: &dyn Frame) -> Result<(), StructuralIntegrityError> {
        let mut verified: FxHashSet<ObjectId> = FxHashSet::default();
        for snapshot in frame.snapshots() {
            let mut walked: Vec<ObjectId> = Vec::new();
            let mut on_path: FxHashSet<ObjectId> = FxHashSet::default();
            let mut current = snapshot.object_id;
            loop {
                if verified.contains(&current) {
                    break;
                }
                if !on_path.insert(current) {
                    return Err(StructuralIntegrityError::ParentChildCycle { object: current });
                }
                walked.push(current);
                match frame.object(current).and_then(|s| s.parent) {
                    Some(parent) => current = parent,
                    None => break,
                }
            }
            verified.extend(walked);
        }
        Ok(())
    }

    /// Phase B for one snapshot: type existence, structural role, and trait
    /// attribute conformance.
    #[must_use]
    pub fn check_object(&self, snapshot: &ObjectSnapshot) -> Vec<ObjectTypeError> {
        let Some(object_type) = self.metamodel.object_type(&snapshot.type_name) else {
            return vec![ObjectTypeError::UnknownType(snapshot.type_name.clone())];
        };
        let mut errors = Vec::new();
        let actual = snapshot.structure.structural_type();
        if actual != object_type.structural_type {
            errors.push(ObjectTypeError::StructureMismatch {
                expected: object_type.structural_type,
                actual,
            });
        }
        for object_trait in &object_type.traits {
            for attribute in &object_trait.attributes {
                match snapshot.attribute(&attribute.name) {
                    Some(value) => {
                        if !value.is_convertible(attribute.value_type) {
                            errors.push(ObjectTypeError::TypeMismatch {
                                attribute: attribute.name.clone(),
                                actual: value.value_type(),
                            });
                        }
                    }
                    None if attribute.optional => {}
                    None => errors.push(ObjectTypeError::MissingTraitAttribute {
                        attribute: attribute.name.clone(),
                        trait_name: object_trait.name.clone(),
                    }),
                }
            }
        }
        errors
    }

    /// Phase C for one edge: rule existence, rule satisfaction, and
    /// cardinalities of every matching rule.
    #[must_use]
    pub fn check_edge(&self, edge: &ObjectSnapshot, frame: &dyn Frame) -> Vec<EdgeRuleViolation> {
        let Structure::Edge { origin, target } = edge.structure else {
            return Vec::new();
        };
        let rules: Vec<_> = self.metamodel.edge_rules_for(&edge.type_name).collect();
        if rules.is_empty() {
            return vec![EdgeRuleViolation::EdgeNotAllowed];
        }
        let matching: Vec<_> = rules
            .into_iter()
            .filter(|rule| rule.endpoints_match(origin, target, frame, self.metamodel))
            .collect();
        if matching.is_empty() {
            return vec![EdgeRuleViolation::NoRuleSatisfied {
                edge_type: edge.type_name.clone(),
            }];
        }
        let mut violations = Vec::new();
        let outgoing_count = count_edges_of_type(frame, origin, &edge.type_name, EdgeDirection::Outgoing);
        let incoming_count = count_edges_of_type(frame, target, &edge.type_name, EdgeDirection::Incoming);
        for rule in matching {
            if rule.outgoing == Cardinality::One && outgoing_count != 1 {
                violations.push(EdgeRuleViolation::CardinalityViolation {
                    edge_type: edge.type_name.clone(),
                    direction: EdgeDirection::Outgoing,
                });
            }
            if rule.incoming == Cardinality::One && incoming_count != 1 {
                violations.push(EdgeRuleViolation::CardinalityViolation {
                    edge_type: edge.type_name.clone(),
                    direction: EdgeDirection::Incoming,
                });
            }
        }
        violations
    }

    /// Fail-fast validation of the whole frame.
    ///
    /// # Errors
    /// The first error of the first failing phase.
    pub fn validate(&self, frame: &dyn Frame) -> Result<(), FrameValidationError> {
        self.check_structural_integrity(frame)?;
        for snapshot in frame.snapshots() {
            if let Some(error) = self.check_object(snapshot).into_iter().next() {
                return Err(FrameValidationError::ObjectError {
                    object: snapshot.object_id,
                    error,
                });
            }
        }
        for snapshot in frame.snapshots() {
            if let Some(violation) = self.check_edge(snapshot, frame).into_iter().next() {
                return Err(FrameValidationError::EdgeRule {
                    edge: snapshot.object_id,
                    violation,
                });
            }
        }
        for constraint in self.metamodel.constraints() {
            let objects = constraint.check(frame, self.metamodel);
            if !objects.is_empty() {
                return Err(FrameValidationError::Constraint(ConstraintViolation {
                    name: constraint.name.clone(),
                    objects,
                }));
            }
        }
        Ok(())
    }

    /// Full diagnosis of the whole frame.
    ///
    /// # Errors
    /// Phase A failures only — a structurally broken frame cannot be
    /// diagnosed further.
    pub fn diagnose(
        &self,
        frame: &dyn Frame,
    ) -> Result<FrameValidationResult, StructuralIntegrityError> {
        self.check_structural_integrity(frame)?;
        let mut result = FrameValidationResult::default();
        for snapshot in frame.snapshots() {
            let errors = self.check_object(snapshot);
            if !errors.is_empty() {
                result.object_errors.insert(snapshot.object_id, errors);
            }
            let violations = self.check_edge(snapshot, frame);
            if !violations.is_empty() {
                result
                    .edge_rule_violations
                    .insert(snapshot.object_id, violations);
            }
        }
        for constraint in self.metamodel.constraints() {
            let objects = constraint.check(frame, self.metamodel);
            if !objects.is_empty() {
                result.violations.push(ConstraintViolation {
                    name: constraint.name.clone(),
                    objects,
                });
            }
        }
        Ok(result)
    }

    /// Returns `true` when a hypothetical edge of `edge_type` from `origin`
    /// to `target` would be allowed in `frame`.
    ///
    /// Cardinalities are evaluated *without* the hypothetical edge: an
    /// endpoint constrained to `one` must currently carry zero edges of that
    /// type in the constrained direction. Used by interactive layers for
    /// connection affordances.
    #[must_use]
    pub fn can_connect(
        &self,
        frame: &dyn Frame,
        edge_type: &str,
        origin: ObjectId,
        target: ObjectId,
    ) -> bool {
        let Some(object_type) = self.metamodel.object_type(edge_type) else {
            return false;
        };
        if object_type.structural_type != StructuralType::Edge {
            return false;
        }
        let origin_is_node = frame
            .object(origin)
            .is_some_and(|s| s.structure == Structure::Node);
        let target_is_node = frame
            .object(target)
            .is_some_and(|s| s.structure == Structure::Node);
        if !origin_is_node || !target_is_node {
            return false;
        }
        let outgoing_count = count_edges_of_type(frame, origin, edge_type, EdgeDirection::Outgoing);
        let incoming_count = count_edges_of_type(frame, target, edge_type, EdgeDirection::Incoming);
        self.metamodel.edge_rules_for(edge_type).any(|rule| {
            rule.endpoints_match(origin, target, frame, self.metamodel)
                && (rule.outgoing == Cardinality::Many || outgoing_count == 0)
                && (rule.incoming == Cardinality::Many || incoming_count == 0)
        })
    }
}

fn count_edges_of_type(
    frame: &dyn Frame,
    endpoint: ObjectId,
    edge_type: &str,
    direction: EdgeDirection,
) -> usize {
    frame
        .incident_edges(endpoint, direction)
        .into_iter()
        .filter(|edge| edge.type_name == edge_type)
        .count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::frame::FrozenFrame;
    use crate::ident::SnapshotId;
    use crate::metamodel::{
        Attribute, Constraint, ConstraintRequirement, EdgeRule, ObjectTrait, ObjectType, Predicate,
    };
    use crate::value::Variant;
    use indexmap::IndexMap as AttrMap;
    use std::sync::Arc;

    fn metamodel() -> Metamodel {
        Metamodel::builder("flows")
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
            .with_type(ObjectType::new("FlowRate", StructuralType::Node, vec![]))
            .unwrap()
            .with_type(ObjectType::new("Flow", StructuralType::Edge, vec![]))
            .unwrap()
            .with_edge_rule(
                EdgeRule::new(
                    "Flow",
                    Some(Predicate::is_type("Stock")),
                    Some(Predicate::is_type("FlowRate")),
                )
                .with_incoming(crate::metamodel::Cardinality::One),
            )
            .unwrap()
            .build()
    }

    fn named_node(id: u64, type_name: &str, name: &str) -> ObjectSnapshot {
        let mut attributes = AttrMap::new();
        attributes.insert("name".to_owned(), Variant::from(name));
        ObjectSnapshot {
            object_id: ObjectId(id),
            snapshot_id: SnapshotId(id),
            type_name: type_name.to_owned(),
            structure: Structure::Node,
            parent: None,
            children: Vec::new(),
            attributes,
        }
    }

    fn edge(id: u64, type_name: &str, origin: u64, target: u64) -> ObjectSnapshot {
        ObjectSnapshot {
            object_id: ObjectId(id),
            snapshot_id: SnapshotId(id),
            type_name: type_name.to_owned(),
            structure: Structure::Edge {
                origin: ObjectId(origin),
                target: ObjectId(target),
            },
            parent: None,
            children: Vec::new(),
            attributes: AttrMap::new(),
        }
    }

    fn frame(snapshots: Vec<ObjectSnapshot>) -> FrozenFrame {
        FrozenFrame::from_snapshots(ObjectId(900), snapshots.into_iter().map(Arc::new))
    }

    #[test]
    fn valid_frame_passes_all_phases() {
        let mm = metamodel();
        let checker = ConstraintChecker::new(&mm);
        let f = frame(vec![
            named_node(1, "Stock", "water"),
            named_node(2, "FlowRate", "drain"),
            edge(3, "Flow", 1, 2),
        ]);
        checker.validate(&f).unwrap();
        assert!(checker.diagnose(&f).unwrap().is_ok());
    }

    #[test]
    fn broken_edge_reference_fails_phase_a() {
        let mm = metamodel();
        let checker = ConstraintChecker::new(&mm);
        let f = frame(vec![named_node(1, "Stock", "water"), edge(3, "Flow", 1, 9)]);
        let err = checker.check_structural_integrity(&f).unwrap_err();
        assert_eq!(
            err,
            StructuralIntegrityError::BrokenStructureReference {
                object: ObjectId(3),
                reference: ObjectId(9),
            }
        );
        // Diagnosis short-circuits on phase A failures.
        assert!(checker.diagnose(&f).is_err());
    }

    #[test]
    fn edge_endpoint_must_be_a_node() {
        let mm = metamodel();
        let checker = ConstraintChecker::new(&mm);
        let f = frame(vec![
            named_node(1, "Stock", "water"),
            named_node(2, "FlowRate", "drain"),
            edge(3, "Flow", 1, 2),
            edge(4, "Flow", 1, 3),
        ]);
        assert_eq!(
            checker.check_structural_integrity(&f).unwrap_err(),
            StructuralIntegrityError::EdgeEndpointNotANode {
                edge: ObjectId(4),
                endpoint: ObjectId(3),
            }
        );
    }

    #[test]
    fn parent_cycles_are_detected() {
        let mm = metamodel();
        let checker = ConstraintChecker::new(&mm);
        let mut a = named_node(1, "Stock", "a");
        let mut b = named_node(2, "Stock", "b");
        a.parent = Some(ObjectId(2));
        a.children = vec![ObjectId(2)];
        b.parent = Some(ObjectId(1));
        b.children = vec![ObjectId(1)];
        let f = frame(vec![a, b]);
        assert!(matches!(
            checker.check_structural_integrity(&f).unwrap_err(),
            StructuralIntegrityError::ParentChildCycle { .. }
        ));
    }

    #[test]
    fn missing_required_attribute_is_reported() {
        let mm = metamodel();
        let checker = ConstraintChecker::new(&mm);
        let mut nameless = named_node(1, "Stock", "x");
        nameless.attributes.clear();
        let errors = checker.check_object(&nameless);
        assert_eq!(
            errors,
            vec![ObjectTypeError::MissingTraitAttribute {
                attribute: "name".to_owned(),
                trait_name: "Named".to_owned(),
            }]
        );
    }

    #[test]
    fn unknown_type_is_reported() {
        let mm = metamodel();
        let checker = ConstraintChecker::new(&mm);
        let s = named_node(1, "Cloud", "x");
        assert_eq!(
            checker.check_object(&s),
            vec![ObjectTypeError::UnknownType("Cloud".to_owned())]
        );
    }

    #[test]
    fn cardinality_violations_reported_on_both_edges() {
        let mm = metamodel();
        let checker = ConstraintChecker::new(&mm);
        // Two flows into the same rate; incoming cardinality is one.
        let f = frame(vec![
            named_node(1, "Stock", "s1"),
            named_node(2, "Stock", "s2"),
            named_node(3, "FlowRate", "r1"),
            edge(10, "Flow", 1, 3),
            edge(11, "Flow", 2, 3),
        ]);
        let diagnosis = checker.diagnose(&f).unwrap();
        assert_eq!(diagnosis.edge_rule_violations.len(), 2);
        for edge_id in [ObjectId(10), ObjectId(11)] {
            assert_eq!(
                diagnosis.edge_rule_violations.get(&edge_id),
                Some(&vec![EdgeRuleViolation::CardinalityViolation {
                    edge_type: "Flow".to_owned(),
                    direction: EdgeDirection::Incoming,
                }])
            );
        }
        assert!(matches!(
            checker.validate(&f).unwrap_err(),
            FrameValidationError::EdgeRule { .. }
        ));
    }

    #[test]
    fn edges_without_any_rule_are_not_allowed() {
        let mm = Metamodel::builder("bare")
            .with_type(ObjectType::new("Node", StructuralType::Node, vec![]))
            .unwrap()
            .with_type(ObjectType::new("Link", StructuralType::Edge, vec![]))
            .unwrap()
            .build();
        let checker = ConstraintChecker::new(&mm);
        let f = frame(vec![
            named_node(1, "Node", "a"),
            named_node(2, "Node", "b"),
            edge(3, "Link", 1, 2),
        ]);
        let diagnosis = checker.diagnose(&f).unwrap();
        assert_eq!(
            diagnosis.edge_rule_violations.get(&ObjectId(3)),
            Some(&vec![EdgeRuleViolation::EdgeNotAllowed])
        );
    }

    #[test]
    fn unsatisfied_rules_are_distinguished_from_missing_rules() {
        let mm = metamodel();
        let checker = ConstraintChecker::new(&mm);
        // Flow must go Stock -> FlowRate; this one goes FlowRate -> Stock.
        let f = frame(vec![
            named_node(1, "Stock", "s"),
            named_node(2, "FlowRate", "r"),
            edge(3, "Flow", 2, 1),
        ]);
        let diagnosis = checker.diagnose(&f).unwrap();
        assert_eq!(
            diagnosis.edge_rule_violations.get(&ObjectId(3)),
            Some(&vec![EdgeRuleViolation::NoRuleSatisfied {
                edge_type: "Flow".to_owned(),
            }])
        );
    }

    #[test]
    fn constraint_violations_carry_offenders() {
        let mm = Metamodel::builder("strict")
            .with_type(ObjectType::new("Node", StructuralType::Node, vec![]))
            .unwrap()
            .with_constraint(Constraint::new(
                "no_nodes",
                Predicate::is_type("Node"),
                ConstraintRequirement::RejectAll,
            ))
            .unwrap()
            .build();
        let checker = ConstraintChecker::new(&mm);
        let f = frame(vec![named_node(1, "Node", "a")]);
        let diagnosis = checker.diagnose(&f).unwrap();
        assert_eq!(diagnosis.violations.len(), 1);
        assert_eq!(diagnosis.violations[0].objects, vec![ObjectId(1)]);
    }

    #[test]
    fn can_connect_considers_cardinality_headroom() {
        let mm = metamodel();
        let checker = ConstraintChecker::new(&mm);
        let f = frame(vec![
            named_node(1, "Stock", "s"),
            named_node(2, "FlowRate", "r"),
            named_node(3, "Stock", "s2"),
            edge(10, "Flow", 1, 2),
        ]);
        // Rate r already has an incoming flow; cardinality one leaves no room.
        assert!(!checker.can_connect(&f, "Flow", ObjectId(3), ObjectId(2)));
        // A fresh rate would accept one.
        let g = frame(vec![
            named_node(1, "Stock", "s"),
            named_node(2, "FlowRate", "r"),
        ]);
        assert!(checker.can_connect(&g, "Flow", ObjectId(1), ObjectId(2)));
        // Wrong direction, unknown type, missing endpoint.
        assert!(!checker.can_connect(&g, "Flow", ObjectId(2), ObjectId(1)));
        assert!(!checker.can_connect(&g, "Pipe", ObjectId(1), ObjectId(2)));
        assert!(!checker.can_connect(&g, "Flow", ObjectId(1), ObjectId(9)));
    }
}
