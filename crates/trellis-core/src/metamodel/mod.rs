// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Metamodel: the schema a design is validated against.
//!
//! A [`Metamodel`] bundles object types, traits, edge rules, and constraints.
//! It is immutable once built; designs hold it by reference for the whole
//! lifetime of the database. Domain layers (stock-and-flow, causal maps)
//! provide their own metamodels; the core only interprets them.

mod constraint;
mod edge_rule;
mod predicate;

pub use constraint::{Constraint, ConstraintRequirement};
pub use edge_rule::{Cardinality, EdgeRule};
pub use predicate::Predicate;

use std::str::FromStr;

use thiserror::Error;

use crate::value::{ValueType, Variant};

/// Structural role an object type prescribes for its objects.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StructuralType {
    /// No graph structure.
    Unstructured,
    /// Graph node.
    Node,
    /// Directed graph edge.
    Edge,
}

impl StructuralType {
    /// Canonical lowercase name used in serialized forms.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unstructured => "unstructured",
            Self::Node => "node",
            Self::Edge => "edge",
        }
    }
}

impl core::fmt::Display for StructuralType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StructuralType {
    type Err = UnknownStructuralType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unstructured" => Ok(Self::Unstructured),
            "node" => Ok(Self::Node),
            "edge" => Ok(Self::Edge),
            other => Err(UnknownStructuralType(other.to_owned())),
        }
    }
}

/// Error for unrecognized structural type spellings.
///
/// The store format reserves additional spellings (for example an ordered
/// set); they are rejected here until the core implements them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown structural type: {0:?}")]
pub struct UnknownStructuralType(pub String);

/// Declaration of a single attribute within a trait.
#[derive(Clone, PartialEq, Debug)]
pub struct Attribute {
    /// Attribute name, unique within its trait.
    pub name: String,
    /// Declared value type; stored values must be convertible to it.
    pub value_type: ValueType,
    /// When `true`, absence of the attribute is not a violation.
    pub optional: bool,
    /// Default value filled in at object creation time.
    pub default: Option<Variant>,
}

impl Attribute {
    /// Creates a required attribute without a default.
    #[must_use]
    pub fn required(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_owned(),
            value_type,
            optional: false,
            default: None,
        }
    }

    /// Creates an optional attribute.
    #[must_use]
    pub fn optional(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_owned(),
            value_type,
            optional: true,
            default: None,
        }
    }

    /// Attaches a default value, returning the modified attribute.
    #[must_use]
    pub fn with_default(mut self, default: Variant) -> Self {
        self.default = Some(default);
        self
    }
}

/// Named bundle of attributes shared by one or more object types.
#[derive(Clone, PartialEq, Debug)]
pub struct ObjectTrait {
    /// Trait name, unique within a metamodel.
    pub name: String,
    /// Attribute declarations, in declaration order.
    pub attributes: Vec<Attribute>,
}

impl ObjectTrait {
    /// Creates a trait from its attribute list.
    #[must_use]
    pub fn new(name: &str, attributes: Vec<Attribute>) -> Self {
        Self {
            name: name.to_owned(),
            attributes,
        }
    }

    /// Returns the declaration of attribute `name`, if any.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Type of a design object: structural role plus a list of traits.
#[derive(Clone, PartialEq, Debug)]
pub struct ObjectType {
    /// Type name, unique within a metamodel.
    pub name: String,
    /// Structural role objects of this type must have.
    pub structural_type: StructuralType,
    /// Traits whose attributes apply to objects of this type.
    pub traits: Vec<ObjectTrait>,
}

impl ObjectType {
    /// Creates an object type.
    #[must_use]
    pub fn new(name: &str, structural_type: StructuralType, traits: Vec<ObjectTrait>) -> Self {
        Self {
            name: name.to_owned(),
            structural_type,
            traits,
        }
    }

    /// Returns `true` when the type carries a trait named `name`.
    #[must_use]
    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| t.name == name)
    }

    /// Returns the first declaration of attribute `name`, walking the traits
    /// in declaration order.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.traits.iter().find_map(|t| t.attribute(name))
    }
}

/// Error raised while assembling a metamodel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetamodelError {
    /// Two object types share a name.
    #[error("duplicate object type: {0:?}")]
    DuplicateType(String),
    /// Two traits share a name.
    #[error("duplicate trait: {0:?}")]
    DuplicateTrait(String),
    /// Two constraints share a name.
    #[error("duplicate constraint: {0:?}")]
    DuplicateConstraint(String),
    /// An edge rule names a type that is not edge-structured.
    #[error("edge rule for non-edge type: {0:?}")]
    EdgeRuleForNonEdge(String),
}

/// Immutable schema: types, traits, edge rules, and constraints.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Metamodel {
    /// Metamodel name, recorded in stored designs.
    pub name: String,
    traits: Vec<ObjectTrait>,
    types: Vec<ObjectType>,
    edge_rules: Vec<EdgeRule>,
    constraints: Vec<Constraint>,
}

impl Metamodel {
    /// Starts building a metamodel with the given name.
    #[must_use]
    pub fn builder(name: &str) -> MetamodelBuilder {
        MetamodelBuilder::new(name)
    }

    /// Returns the object type named `name`, if any.
    #[must_use]
    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Returns `true` when a type named `name` exists.
    #[must_use]
    pub fn has_type(&self, name: &str) -> bool {
        self.object_type(name).is_some()
    }

    /// Returns the trait named `name`, if any.
    #[must_use]
    pub fn object_trait(&self, name: &str) -> Option<&ObjectTrait> {
        self.traits.iter().find(|t| t.name == name)
    }

    /// Returns all object types, in declaration order.
    #[must_use]
    pub fn types(&self) -> &[ObjectType] {
        &self.types
    }

    /// Returns all edge rules, in declaration order.
    #[must_use]
    pub fn edge_rules(&self) -> &[EdgeRule] {
        &self.edge_rules
    }

    /// Returns the edge rules declared for edge type `type_name`.
    pub fn edge_rules_for<'a>(
        &'a self,
        type_name: &'a str,
    ) -> impl Iterator<Item = &'a EdgeRule> + 'a {
        self.edge_rules
            .iter()
            .filter(move |rule| rule.edge_type == type_name)
    }

    /// Returns all constraints, in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

/// Builder assembling a [`Metamodel`], rejecting duplicate names.
#[derive(Debug, Default)]
pub struct MetamodelBuilder {
    name: String,
    traits: Vec<ObjectTrait>,
    types: Vec<ObjectType>,
    edge_rules: Vec<EdgeRule>,
    constraints: Vec<Constraint>,
}

impl MetamodelBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    /// Adds a trait.
    ///
    /// # Errors
    /// [`MetamodelError::DuplicateTrait`] when the name is already taken.
    pub fn with_trait(mut self, object_trait: ObjectTrait) -> Result<Self, MetamodelError> {
        if self.traits.iter().any(|t| t.name == object_trait.name) {
            return Err(MetamodelError::DuplicateTrait(object_trait.name));
        }
        self.traits.push(object_trait);
        Ok(self)
    }

    /// Adds an object type.
    ///
    /// # Errors
    /// [`MetamodelError::DuplicateType`] when the name is already taken.
    pub fn with_type(mut self, object_type: ObjectType) -> Result<Self, MetamodelError> {
        if self.types.iter().any(|t| t.name == object_type.name) {
            return Err(MetamodelError::DuplicateType(object_type.name));
        }
        self.types.push(object_type);
        Ok(self)
    }

    /// Adds an edge rule.
    ///
    /// # Errors
    /// [`MetamodelError::EdgeRuleForNonEdge`] when the named type exists but
    /// is not edge-structured.
    pub fn with_edge_rule(mut self, rule: EdgeRule) -> Result<Self, MetamodelError> {
        if let Some(ty) = self.types.iter().find(|t| t.name == rule.edge_type) {
            if ty.structural_type != StructuralType::Edge {
                return Err(MetamodelError::EdgeRuleForNonEdge(rule.edge_type));
            }
        }
        self.edge_rules.push(rule);
        Ok(self)
    }

    /// Adds a constraint.
    ///
    /// # Errors
    /// [`MetamodelError::DuplicateConstraint`] when the name is already taken.
    pub fn with_constraint(mut self, constraint: Constraint) -> Result<Self, MetamodelError> {
        if self.constraints.iter().any(|c| c.name == constraint.name) {
            return Err(MetamodelError::DuplicateConstraint(constraint.name));
        }
        self.constraints.push(constraint);
        Ok(self)
    }

    /// Finishes the build.
    #[must_use]
    pub fn build(self) -> Metamodel {
        Metamodel {
            name: self.name,
            traits: self.traits,
            types: self.types,
            edge_rules: self.edge_rules,
            constraints: self.constraints,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn structural_type_names_round_trip() {
        for st in [
            StructuralType::Unstructured,
            StructuralType::Node,
            StructuralType::Edge,
        ] {
            assert_eq!(st.name().parse::<StructuralType>().unwrap(), st);
        }
        assert!("ordered_set".parse::<StructuralType>().is_err());
    }

    #[test]
    fn type_attribute_lookup_walks_traits_in_order() {
        let named = ObjectTrait::new(
            "Named",
            vec![Attribute::required("name", ValueType::STRING)],
        );
        let positioned = ObjectTrait::new(
            "Positioned",
            vec![Attribute::optional("position", ValueType::POINT)],
        );
        let ty = ObjectType::new("Stock", StructuralType::Node, vec![named, positioned]);
        assert!(ty.has_trait("Named"));
        assert!(!ty.has_trait("Formula"));
        assert_eq!(
            ty.attribute("position").map(|a| a.value_type),
            Some(ValueType::POINT)
        );
        assert!(ty.attribute("flow").is_none());
    }

    #[test]
    fn builder_rejects_duplicate_names() {
        let builder = Metamodel::builder("test")
            .with_type(ObjectType::new("Stock", StructuralType::Node, vec![]))
            .unwrap();
        let err = builder
            .with_type(ObjectType::new("Stock", StructuralType::Node, vec![]))
            .unwrap_err();
        assert_eq!(err, MetamodelError::DuplicateType("Stock".to_owned()));
    }

    #[test]
    fn builder_rejects_edge_rules_for_node_types() {
        let builder = Metamodel::builder("test")
            .with_type(ObjectType::new("Stock", StructuralType::Node, vec![]))
            .unwrap();
        let err = builder
            .with_edge_rule(EdgeRule::new("Stock", None, None))
            .unwrap_err();
        assert_eq!(err, MetamodelError::EdgeRuleForNonEdge("Stock".to_owned()));
    }

    #[test]
    fn lookups_resolve_declared_items() {
        let metamodel = Metamodel::builder("flows")
            .with_trait(ObjectTrait::new(
                "Named",
                vec![Attribute::required("name", ValueType::STRING)],
            ))
            .unwrap()
            .with_type(ObjectType::new("Stock", StructuralType::Node, vec![]))
            .unwrap()
            .with_type(ObjectType::new("Flow", StructuralType::Edge, vec![]))
            .unwrap()
            .with_edge_rule(EdgeRule::new("Flow", None, None))
            .unwrap()
            .build();
        assert!(metamodel.has_type("Stock"));
        assert!(!metamodel.has_type("Cloud"));
        assert!(metamodel.object_trait("Named").is_some());
        assert_eq!(metamodel.edge_rules_for("Flow").count(), 1);
        assert_eq!(metamodel.edge_rules_for("Stock").count(), 0);
    }
}
