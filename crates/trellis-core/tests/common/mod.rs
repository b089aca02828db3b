// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use trellis_core::metamodel::{
    Attribute, Cardinality, Constraint, ConstraintRequirement, EdgeRule, Metamodel, ObjectTrait,
    ObjectType, Predicate, StructuralType,
};
use trellis_core::{Design, ObjectId, ObjectPrototype, ValueType};

/// Stock-and-flow flavoured metamodel used across the integration tests.
///
/// - `Stock`, `FlowRate`: named nodes (`Named` trait, required `name`).
/// - `Note`: unstructured, optional `text`, defaulted `pinned`.
/// - `Flow`: edge Stock → FlowRate, incoming cardinality `one`.
/// - `Link`: unconstrained edge between any nodes.
/// - Constraint `flow_into_rate`: every Flow edge must target a FlowRate.
#[allow(clippy::unwrap_used)]
pub fn flows_metamodel() -> Metamodel {
    let named = ObjectTrait::new("Named", vec![Attribute::required("name", ValueType::STRING)]);
    Metamodel::builder("flows")
        .with_trait(named.clone())
        .unwrap()
        .with_type(ObjectType::new(
            "Stock",
            StructuralType::Node,
            vec![named.clone()],
        ))
        .unwrap()
        .with_type(ObjectType::new(
            "FlowRate",
            StructuralType::Node,
            vec![named],
        ))
        .unwrap()
        .with_type(ObjectType::new(
            "Note",
            StructuralType::Unstructured,
            vec![ObjectTrait::new(
                "Annotation",
                vec![
                    Attribute::optional("text", ValueType::STRING),
                    Attribute::optional("pinned", ValueType::BOOL)
                        .with_default(false.into()),
                ],
            )],
        ))
        .unwrap()
        .with_type(ObjectType::new("Flow", StructuralType::Edge, vec![]))
        .unwrap()
        .with_type(ObjectType::new("Link", StructuralType::Edge, vec![]))
        .unwrap()
        .with_edge_rule(
            EdgeRule::new(
                "Flow",
                Some(Predicate::is_type("Stock")),
                Some(Predicate::is_type("FlowRate")),
            )
            .with_incoming(Cardinality::One),
        )
        .unwrap()
        .with_edge_rule(EdgeRule::new("Link", None, None))
        .unwrap()
        .with_constraint(Constraint::new(
            "flow_into_rate",
            Predicate::is_type("Flow"),
            ConstraintRequirement::EdgeEndpoint {
                origin: None,
                target: Some(Predicate::is_type("FlowRate")),
                edge: None,
            },
        ))
        .unwrap()
        .build()
}

/// Fresh design over [`flows_metamodel`].
pub fn flows_design() -> Design {
    Design::new(flows_metamodel())
}

/// Prototype for a named stock.
pub fn stock(name: &str) -> ObjectPrototype {
    ObjectPrototype::new("Stock").with_attribute("name", name)
}

/// Prototype for a named flow rate.
pub fn rate(name: &str) -> ObjectPrototype {
    ObjectPrototype::new("FlowRate").with_attribute("name", name)
}

/// Prototype for a flow edge.
pub fn flow(origin: ObjectId, target: ObjectId) -> ObjectPrototype {
    ObjectPrototype::edge("Flow", origin, target)
}
