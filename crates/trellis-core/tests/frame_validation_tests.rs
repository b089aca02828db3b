// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]

mod common;

use common::{flow, flows_design, rate, stock};
use trellis_core::{
    AcceptError, EdgeDirection, EdgeRuleViolation, FrameValidationError, ObjectPrototype,
    ObjectTypeError, StructuralIntegrityError,
};

#[test]
fn two_flows_into_one_rate_violate_incoming_cardinality() {
    let mut design = flows_design();
    let mut frame = design.create_frame();
    let s1 = frame.create(stock("s1")).unwrap();
    let r1 = frame.create(rate("r1")).unwrap();
    let f1 = frame.create(flow(s1, r1)).unwrap();
    let f2 = frame.create(flow(s1, r1)).unwrap();

    let err = frame.accept().unwrap_err();
    assert!(matches!(
        err,
        AcceptError::Validation(FrameValidationError::EdgeRule {
            violation: EdgeRuleViolation::CardinalityViolation {
                direction: EdgeDirection::Incoming,
                ..
            },
            ..
        })
    ));

    // The frame stays editable; the diagnosis reports both edges.
    let diagnosis = frame.diagnose().unwrap();
    for edge in [f1, f2] {
        let violations = diagnosis.edge_rule_violations.get(&edge).unwrap();
        assert!(violations.iter().any(|v| matches!(
            v,
            EdgeRuleViolation::CardinalityViolation {
                direction: EdgeDirection::Incoming,
                ..
            }
        )));
    }

    // Removing one of the flows repairs the frame.
    frame.remove_cascading(f2).unwrap();
    frame.accept().unwrap();
}

#[test]
fn missing_required_attribute_fails_type_conformance() {
    let mut design = flows_design();
    let mut frame = design.create_frame();
    frame.create(ObjectPrototype::new("Stock")).unwrap();
    let err = frame.accept().unwrap_err();
    assert!(matches!(
        err,
        AcceptError::Validation(FrameValidationError::ObjectError {
            error: ObjectTypeError::MissingTraitAttribute { .. },
            ..
        })
    ));
}

#[test]
fn unrepresentable_attribute_fails_type_conformance() {
    let mut design = flows_design();
    let mut frame = design.create_frame();
    let s = frame.create(stock("ok")).unwrap();
    // A point cannot render as the declared string type.
    frame
        .set_attribute(s, "name", trellis_core::Point::new(1.0, 2.0))
        .unwrap();
    // Points do convert to strings, so that is fine...
    frame.validate().unwrap();
    // ...but an array cannot.
    frame
        .set_attribute(s, "name", trellis_core::Variant::from(vec![1_i64, 2]))
        .unwrap();
    let err = frame.validate().unwrap_err();
    assert!(matches!(
        err,
        FrameValidationError::ObjectError {
            error: ObjectTypeError::TypeMismatch { .. },
            ..
        }
    ));
}

#[test]
fn edges_between_wrong_types_satisfy_no_rule() {
    let mut design = flows_design();
    let mut frame = design.create_frame();
    let s = frame.create(stock("s")).unwrap();
    let r = frame.create(rate("r")).unwrap();
    // Flow must go Stock -> FlowRate.
    frame
        .create(ObjectPrototype::edge("Flow", r, s))
        .unwrap();
    let err = frame.accept().unwrap_err();
    assert!(matches!(
        err,
        AcceptError::Validation(FrameValidationError::EdgeRule {
            violation: EdgeRuleViolation::NoRuleSatisfied { .. },
            ..
        })
    ));
}

#[test]
fn edge_endpoints_must_be_nodes() {
    let mut design = flows_design();
    let mut frame = design.create_frame();
    let s = frame.create(stock("s")).unwrap();
    let r = frame.create(rate("r")).unwrap();
    let f = frame.create(flow(s, r)).unwrap();
    frame
        .create(ObjectPrototype::edge("Link", s, f))
        .unwrap();
    let err = frame.accept().unwrap_err();
    assert!(matches!(
        err,
        AcceptError::Validation(FrameValidationError::StructuralIntegrity(
            StructuralIntegrityError::EdgeEndpointNotANode { .. }
        ))
    ));
    // A structurally broken frame has no full diagnosis.
    assert!(frame.diagnose().is_err());
}

#[test]
fn dangling_edge_endpoint_is_a_broken_reference() {
    let mut design = flows_design();
    let mut frame = design.create_frame();
    let s = frame.create(stock("s")).unwrap();
    frame
        .create(ObjectPrototype::edge("Link", s, trellis_core::ObjectId(404)))
        .unwrap();
    let err = frame.validate().unwrap_err();
    assert!(matches!(
        err,
        FrameValidationError::StructuralIntegrity(
            StructuralIntegrityError::BrokenStructureReference { .. }
        )
    ));
}

#[test]
fn constraints_reject_offending_frames() {
    // A Flow into a Stock violates the `flow_into_rate` constraint (and,
    // independently, the edge rule); the diagnosis reports the constraint
    // with its offender list.
    let mut design = flows_design();
    let mut frame = design.create_frame();
    let s1 = frame.create(stock("s1")).unwrap();
    let s2 = frame.create(stock("s2")).unwrap();
    frame
        .create(ObjectPrototype::edge("Flow", s1, s2))
        .unwrap();
    let diagnosis = frame.diagnose().unwrap();
    assert!(!diagnosis.is_ok());
    assert_eq!(diagnosis.violations.len(), 1);
    assert_eq!(diagnosis.violations[0].name, "flow_into_rate");
}

#[test]
fn can_connect_reflects_rules_and_cardinalities() {
    let mut design = flows_design();
    let mut frame = design.create_frame();
    let s1 = frame.create(stock("s1")).unwrap();
    let s2 = frame.create(stock("s2")).unwrap();
    let r1 = frame.create(rate("r1")).unwrap();

    assert!(frame.can_connect("Flow", s1, r1));
    assert!(!frame.can_connect("Flow", r1, s1), "wrong direction");
    assert!(!frame.can_connect("Flow", s1, s2), "wrong target type");
    assert!(frame.can_connect("Link", s1, s2));
    assert!(!frame.can_connect("Stock", s1, s2), "not an edge type");

    // Once a flow lands on the rate, the `one` cardinality is exhausted.
    frame.create(flow(s1, r1)).unwrap();
    assert!(!frame.can_connect("Flow", s2, r1));
    let accepted = frame.accept().unwrap();
    drop(frame);

    // The same query works on the frozen frame through the design checker.
    let frozen = design.frame(accepted).unwrap();
    assert!(!design.checker().can_connect(frozen, "Flow", s2, r1));
    assert!(design.checker().can_connect(frozen, "Link", s1, s2));
}
