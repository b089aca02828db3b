// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tagged attribute values and their conversion rules.
//!
//! All dynamic typing in the core is isolated here. Object attributes hold a
//! [`Variant`]: either a single [`VariantAtom`] or a homogeneous
//! [`VariantArray`] of atoms. Every variant knows its [`ValueType`] and can
//! be converted to other value types under a fixed matrix:
//!
//! | from \ to | int | double | bool | string | point |
//! |-----------|-----|--------|------|--------|-------|
//! | int       | ✓   | ✓      | 0/1  | ✓      | ✗     |
//! | double    | exact | ✓    | ✗    | ✓      | ✗     |
//! | bool      | ✓   | ✗      | ✓    | ✓      | ✗     |
//! | string    | parse | parse | parse | ✓     | parse |
//! | point     | ✗   | ✗      | ✗    | ✓      | ✓     |
//!
//! Arrays convert element-wise between array types whose atom types convert;
//! atoms never convert to arrays and vice versa. A matrix ✗ is reported as
//! [`ValueError::NotConvertible`]; a value-level failure (overflow, parse
//! error) as [`ValueError::ConversionFailed`] or a more specific variant.
//!
//! # JSON encodings
//!
//! Variants round-trip through JSON in two spellings, selected by
//! [`VariantEncoding`]:
//! - tuple: `["int", 5]`
//! - dictionary: `{"type": "int", "value": 5}`
//!
//! Readers accept both plus bare scalars (`5`, `5.5`, `true`, `"text"`) and
//! bare homogeneous arrays. Points are rendered as the textual form `"[x,y]"`
//! with decimal coordinates; readers also accept a two-number JSON array in
//! tagged positions.

use std::str::FromStr;

use serde_json::{json, Number, Value as JsonValue};
use thiserror::Error;

/// A 2D point value.
///
/// The canonical textual form is `"[x,y]"`; the parser accepts optional
/// whitespace around the coordinates.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Point {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Point {
    /// Creates a point from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl core::fmt::Display for Point {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

impl FromStr for Point {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| ValueError::InvalidPointValue(s.to_owned()))?;
        let mut parts = inner.splitn(2, ',');
        let x = parts
            .next()
            .map(str::trim)
            .and_then(|p| p.parse::<f64>().ok());
        let y = parts
            .next()
            .map(str::trim)
            .and_then(|p| p.parse::<f64>().ok());
        match (x, y) {
            (Some(x), Some(y)) => Ok(Self { x, y }),
            _ => Err(ValueError::InvalidPointValue(s.to_owned())),
        }
    }
}

/// Scalar type of a [`VariantAtom`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AtomType {
    /// 64-bit signed integer.
    Int,
    /// 64-bit float.
    Double,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    String,
    /// 2D point.
    Point,
}

impl AtomType {
    /// Canonical lowercase name used in serialized forms.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Point => "point",
        }
    }
}

/// Type of a [`Variant`]: a scalar atom or a homogeneous array of atoms.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ValueType {
    /// Single atom.
    Atom(AtomType),
    /// Homogeneous array of atoms.
    Array(AtomType),
}

impl ValueType {
    /// Shorthand for `ValueType::Atom(AtomType::Int)`.
    pub const INT: Self = Self::Atom(AtomType::Int);
    /// Shorthand for `ValueType::Atom(AtomType::Double)`.
    pub const DOUBLE: Self = Self::Atom(AtomType::Double);
    /// Shorthand for `ValueType::Atom(AtomType::Bool)`.
    pub const BOOL: Self = Self::Atom(AtomType::Bool);
    /// Shorthand for `ValueType::Atom(AtomType::String)`.
    pub const STRING: Self = Self::Atom(AtomType::String);
    /// Shorthand for `ValueType::Atom(AtomType::Point)`.
    pub const POINT: Self = Self::Atom(AtomType::Point);

    /// Returns `true` for atom types.
    #[must_use]
    pub const fn is_atom(self) -> bool {
        matches!(self, Self::Atom(_))
    }

    /// Returns `true` for array types.
    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Canonical name used in serialized forms (`"int"`, `"int_array"`, …).
    #[must_use]
    pub fn name(self) -> String {
        match self {
            Self::Atom(atom) => atom.name().to_owned(),
            Self::Array(atom) => format!("{}_array", atom.name()),
        }
    }
}

impl core::fmt::Display for ValueType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ValueType {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, is_array) = match s.strip_suffix("_array") {
            Some(base) => (base, true),
            None => (s, false),
        };
        let atom = match base {
            "int" => AtomType::Int,
            "double" => AtomType::Double,
            "bool" => AtomType::Bool,
            "string" => AtomType::String,
            "point" => AtomType::Point,
            _ => return Err(ValueError::UnknownValueType(s.to_owned())),
        };
        Ok(if is_array {
            Self::Array(atom)
        } else {
            Self::Atom(atom)
        })
    }
}

/// Error raised by value conversion and decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    /// The conversion matrix has no entry from the source to the target type.
    #[error("value of type {0} is not convertible to {1}")]
    NotConvertible(ValueType, ValueType),
    /// The matrix allows the conversion but this value cannot be represented.
    #[error("conversion of value from {0} to {1} failed")]
    ConversionFailed(ValueType, ValueType),
    /// The value cannot be interpreted as an id reference.
    #[error("conversion of value of type {0} to an id failed")]
    ConversionToIdFailed(ValueType),
    /// The string is not a valid boolean spelling (`"true"`/`"false"`).
    #[error("invalid boolean value: {0:?}")]
    InvalidBooleanValue(String),
    /// The string is not a valid point spelling (`"[x,y]"`).
    #[error("invalid point value: {0:?}")]
    InvalidPointValue(String),
    /// Unknown value-type name in a serialized form.
    #[error("unknown value type: {0:?}")]
    UnknownValueType(String),
    /// JSON value does not represent a variant in any accepted encoding.
    #[error("unsupported variant JSON value")]
    InvalidVariantJson,
}

/// JSON spelling for serialized variants.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum VariantEncoding {
    /// Two-element array: `["int", 5]`.
    Tuple,
    /// Object with explicit keys: `{"type": "int", "value": 5}`.
    #[default]
    Dictionary,
}

/// Scalar variant value.
#[derive(Clone, PartialEq, Debug)]
pub enum VariantAtom {
    /// Integer value.
    Int(i64),
    /// Float value.
    Double(f64),
    /// Boolean value.
    Bool(bool),
    /// String value.
    String(String),
    /// Point value.
    Point(Point),
}

impl VariantAtom {
    /// Returns the atom type of this value.
    #[must_use]
    pub const fn atom_type(&self) -> AtomType {
        match self {
            Self::Int(_) => AtomType::Int,
            Self::Double(_) => AtomType::Double,
            Self::Bool(_) => AtomType::Bool,
            Self::String(_) => AtomType::String,
            Self::Point(_) => AtomType::Point,
        }
    }

    /// Converts this atom to `target` under the conversion matrix.
    ///
    /// # Errors
    /// [`ValueError::NotConvertible`] for matrix ✗ cells,
    /// [`ValueError::ConversionFailed`] (or a more specific variant) when the
    /// cell allows conversion but this particular value cannot be converted.
    pub fn convert(&self, target: AtomType) -> Result<Self, ValueError> {
        let from = ValueType::Atom(self.atom_type());
        let to = ValueType::Atom(target);
        match (self, target) {
            // Identity.
            (atom, t) if atom.atom_type() == t => Ok(atom.clone()),

            (Self::Int(i), AtomType::Double) => {
                #[allow(clippy::cast_precision_loss)]
                let widened = *i as f64;
                Ok(Self::Double(widened))
            }
            (Self::Int(0), AtomType::Bool) => Ok(Self::Bool(false)),
            (Self::Int(1), AtomType::Bool) => Ok(Self::Bool(true)),
            (Self::Int(_), AtomType::Bool) => Err(ValueError::ConversionFailed(from, to)),
            (Self::Int(i), AtomType::String) => Ok(Self::String(i.to_string())),

            (Self::Double(d), AtomType::Int) => {
                #[allow(clippy::cast_possible_truncation)]
                let truncated = *d as i64;
                #[allow(clippy::cast_precision_loss)]
                let exact = d.fract() == 0.0 && (truncated as f64 - *d).abs() == 0.0;
                if exact {
                    Ok(Self::Int(truncated))
                } else {
                    Err(ValueError::ConversionFailed(from, to))
                }
            }
            (Self::Double(d), AtomType::String) => Ok(Self::String(d.to_string())),

            (Self::Bool(b), AtomType::Int) => Ok(Self::Int(i64::from(*b))),
            (Self::Bool(b), AtomType::String) => Ok(Self::String(b.to_string())),

            (Self::String(s), AtomType::Int) => s
                .trim()
                .parse::<i64>()
                .map(Self::Int)
                .map_err(|_| ValueError::ConversionFailed(from, to)),
            (Self::String(s), AtomType::Double) => s
                .trim()
                .parse::<f64>()
                .map(Self::Double)
                .map_err(|_| ValueError::ConversionFailed(from, to)),
            (Self::String(s), AtomType::Bool) => match s.trim() {
                "true" => Ok(Self::Bool(true)),
                "false" => Ok(Self::Bool(false)),
                other => Err(ValueError::InvalidBooleanValue(other.to_owned())),
            },
            (Self::String(s), AtomType::Point) => s.parse::<Point>().map(Self::Point),

            (Self::Point(p), AtomType::String) => Ok(Self::String(p.to_string())),

            _ => Err(ValueError::NotConvertible(from, to)),
        }
    }
}

/// Homogeneous array of atoms.
#[derive(Clone, PartialEq, Debug)]
pub enum VariantArray {
    /// Array of integers.
    Int(Vec<i64>),
    /// Array of floats.
    Double(Vec<f64>),
    /// Array of booleans.
    Bool(Vec<bool>),
    /// Array of strings.
    String(Vec<String>),
    /// Array of points.
    Point(Vec<Point>),
}

impl VariantArray {
    /// Returns the atom type of the array items.
    #[must_use]
    pub const fn item_type(&self) -> AtomType {
        match self {
            Self::Int(_) => AtomType::Int,
            Self::Double(_) => AtomType::Double,
            Self::Bool(_) => AtomType::Bool,
            Self::String(_) => AtomType::String,
            Self::Point(_) => AtomType::Point,
        }
    }

    /// Number of items in the array.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Point(v) => v.len(),
        }
    }

    /// Returns `true` when the array has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the items as owned atoms.
    #[must_use]
    pub fn items(&self) -> Vec<VariantAtom> {
        match self {
            Self::Int(v) => v.iter().map(|i| VariantAtom::Int(*i)).collect(),
            Self::Double(v) => v.iter().map(|d| VariantAtom::Double(*d)).collect(),
            Self::Bool(v) => v.iter().map(|b| VariantAtom::Bool(*b)).collect(),
            Self::String(v) => v.iter().map(|s| VariantAtom::String(s.clone())).collect(),
            Self::Point(v) => v.iter().map(|p| VariantAtom::Point(*p)).collect(),
        }
    }

    /// Builds an array of `item_type` from atoms that already have that type.
    ///
    /// # Errors
    /// [`ValueError::ConversionFailed`] when any atom has a different type.
    pub fn from_atoms(item_type: AtomType, atoms: Vec<VariantAtom>) -> Result<Self, ValueError> {
        let mut result = match item_type {
            AtomType::Int => Self::Int(Vec::with_capacity(atoms.len())),
            AtomType::Double => Self::Double(Vec::with_capacity(atoms.len())),
            AtomType::Bool => Self::Bool(Vec::with_capacity(atoms.len())),
            AtomType::String => Self::String(Vec::with_capacity(atoms.len())),
            AtomType::Point => Self::Point(Vec::with_capacity(atoms.len())),
        };
        for atom in atoms {
            match (&mut result, atom) {
                (Self::Int(v), VariantAtom::Int(i)) => v.push(i),
                (Self::Double(v), VariantAtom::Double(d)) => v.push(d),
                (Self::Bool(v), VariantAtom::Bool(b)) => v.push(b),
                (Self::String(v), VariantAtom::String(s)) => v.push(s),
                (Self::Point(v), VariantAtom::Point(p)) => v.push(p),
                (_, atom) => {
                    return Err(ValueError::ConversionFailed(
                        ValueType::Atom(atom.atom_type()),
                        ValueType::Array(item_type),
                    ))
                }
            }
        }
        Ok(result)
    }
}

/// Tagged attribute value: an atom or a homogeneous array of atoms.
#[derive(Clone, PartialEq, Debug)]
pub enum Variant {
    /// Scalar value.
    Atom(VariantAtom),
    /// Homogeneous array value.
    Array(VariantArray),
}

impl Variant {
    /// Returns the value type of this variant.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Atom(atom) => ValueType::Atom(atom.atom_type()),
            Self::Array(array) => ValueType::Array(array.item_type()),
        }
    }

    /// Returns `true` when [`Variant::convert`] to `target` would succeed.
    #[must_use]
    pub fn is_convertible(&self, target: ValueType) -> bool {
        self.convert(target).is_ok()
    }

    /// Converts this variant to `target` under the conversion matrix.
    ///
    /// # Errors
    /// See [`VariantAtom::convert`]; additionally, atom ↔ array conversions
    /// are always [`ValueError::NotConvertible`].
    pub fn convert(&self, target: ValueType) -> Result<Self, ValueError> {
        match (self, target) {
            (Self::Atom(atom), ValueType::Atom(t)) => atom.convert(t).map(Self::Atom),
            (Self::Array(array), ValueType::Array(t)) => {
                let mut converted = Vec::with_capacity(array.len());
                for item in array.items() {
                    converted.push(item.convert(t)?);
                }
                VariantArray::from_atoms(t, converted).map(Self::Array)
            }
            _ => Err(ValueError::NotConvertible(self.value_type(), target)),
        }
    }

    /// Returns the value as `i64`, converting when possible.
    ///
    /// # Errors
    /// Propagates the conversion error for inconvertible values.
    pub fn try_int(&self) -> Result<i64, ValueError> {
        match self.convert(ValueType::INT)? {
            Self::Atom(VariantAtom::Int(i)) => Ok(i),
            _ => Err(ValueError::ConversionFailed(
                self.value_type(),
                ValueType::INT,
            )),
        }
    }

    /// Returns the value as `f64`, converting when possible.
    ///
    /// # Errors
    /// Propagates the conversion error for inconvertible values.
    pub fn try_double(&self) -> Result<f64, ValueError> {
        match self.convert(ValueType::DOUBLE)? {
            Self::Atom(VariantAtom::Double(d)) => Ok(d),
            _ => Err(ValueError::ConversionFailed(
                self.value_type(),
                ValueType::DOUBLE,
            )),
        }
    }

    /// Returns the value as `bool`, converting when possible.
    ///
    /// # Errors
    /// Propagates the conversion error for inconvertible values.
    pub fn try_bool(&self) -> Result<bool, ValueError> {
        match self.convert(ValueType::BOOL)? {
            Self::Atom(VariantAtom::Bool(b)) => Ok(b),
            _ => Err(ValueError::ConversionFailed(
                self.value_type(),
                ValueType::BOOL,
            )),
        }
    }

    /// Returns the value rendered as a string.
    ///
    /// # Errors
    /// Fails only for array variants, which have no scalar rendering.
    pub fn try_string(&self) -> Result<String, ValueError> {
        match self.convert(ValueType::STRING)? {
            Self::Atom(VariantAtom::String(s)) => Ok(s),
            _ => Err(ValueError::ConversionFailed(
                self.value_type(),
                ValueType::STRING,
            )),
        }
    }

    /// Returns the value as a [`Point`], converting when possible.
    ///
    /// # Errors
    /// Propagates the conversion error for inconvertible values.
    pub fn try_point(&self) -> Result<Point, ValueError> {
        match self.convert(ValueType::POINT)? {
            Self::Atom(VariantAtom::Point(p)) => Ok(p),
            _ => Err(ValueError::ConversionFailed(
                self.value_type(),
                ValueType::POINT,
            )),
        }
    }

    /// Interprets the value as a raw id (non-negative integer or a numeric
    /// string).
    ///
    /// # Errors
    /// [`ValueError::ConversionToIdFailed`] for everything else.
    pub fn try_id_value(&self) -> Result<u64, ValueError> {
        match self {
            Self::Atom(VariantAtom::Int(i)) if *i >= 0 => {
                #[allow(clippy::cast_sign_loss)]
                let raw = *i as u64;
                Ok(raw)
            }
            Self::Atom(VariantAtom::String(s)) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| ValueError::ConversionToIdFailed(self.value_type())),
            _ => Err(ValueError::ConversionToIdFailed(self.value_type())),
        }
    }

    /// Decodes a variant from JSON, accepting the tuple encoding, the
    /// dictionary encoding, bare scalars, and bare homogeneous arrays.
    ///
    /// # Errors
    /// [`ValueError::InvalidVariantJson`] (or a more specific variant) when
    /// the JSON value is not a variant in any accepted spelling.
    pub fn from_json(value: &JsonValue) -> Result<Self, ValueError> {
        match value {
            JsonValue::Object(map) => {
                let type_name = map
                    .get("type")
                    .and_then(JsonValue::as_str)
                    .ok_or(ValueError::InvalidVariantJson)?;
                let payload = map.get("value").ok_or(ValueError::InvalidVariantJson)?;
                let value_type: ValueType = type_name.parse()?;
                Self::decode_payload(value_type, payload)
            }
            JsonValue::Array(items) => {
                // Tuple encoding is a two-element array whose head names a
                // value type. Anything else is a bare array.
                if items.len() == 2 {
                    if let Some(type_name) = items[0].as_str() {
                        if let Ok(value_type) = type_name.parse::<ValueType>() {
                            return Self::decode_payload(value_type, &items[1]);
                        }
                    }
                }
                Self::infer_bare_array(items)
            }
            _ => Self::infer_bare_scalar(value),
        }
    }

    /// Encodes the variant as JSON in the requested spelling.
    #[must_use]
    pub fn to_json(&self, encoding: VariantEncoding) -> JsonValue {
        let type_name = self.value_type().name();
        let payload = self.payload_json();
        match encoding {
            VariantEncoding::Tuple => json!([type_name, payload]),
            VariantEncoding::Dictionary => json!({"type": type_name, "value": payload}),
        }
    }

    fn payload_json(&self) -> JsonValue {
        match self {
            Self::Atom(atom) => Self::atom_payload_json(atom),
            Self::Array(array) => {
                JsonValue::Array(array.items().iter().map(Self::atom_payload_json).collect())
            }
        }
    }

    fn atom_payload_json(atom: &VariantAtom) -> JsonValue {
        match atom {
            VariantAtom::Int(i) => json!(i),
            VariantAtom::Double(d) => {
                Number::from_f64(*d).map_or(JsonValue::Null, JsonValue::Number)
            }
            VariantAtom::Bool(b) => json!(b),
            VariantAtom::String(s) => json!(s),
            VariantAtom::Point(p) => json!(p.to_string()),
        }
    }

    fn decode_payload(value_type: ValueType, payload: &JsonValue) -> Result<Self, ValueError> {
        match value_type {
            ValueType::Atom(atom_type) => {
                Self::decode_atom_payload(atom_type, payload).map(Self::Atom)
            }
            ValueType::Array(item_type) => {
                let items = payload
                    .as_array()
                    .ok_or(ValueError::InvalidVariantJson)?
                    .iter()
                    .map(|item| Self::decode_atom_payload(item_type, item))
                    .collect::<Result<Vec<_>, _>>()?;
                VariantArray::from_atoms(item_type, items).map(Self::Array)
            }
        }
    }

    fn decode_atom_payload(
        atom_type: AtomType,
        payload: &JsonValue,
    ) -> Result<VariantAtom, ValueError> {
        match atom_type {
            AtomType::Int => payload
                .as_i64()
                .map(VariantAtom::Int)
                .ok_or(ValueError::InvalidVariantJson),
            AtomType::Double => payload
                .as_f64()
                .map(VariantAtom::Double)
                .ok_or(ValueError::InvalidVariantJson),
            AtomType::Bool => payload
                .as_bool()
                .map(VariantAtom::Bool)
                .ok_or(ValueError::InvalidVariantJson),
            AtomType::String => payload
                .as_str()
                .map(|s| VariantAtom::String(s.to_owned()))
                .ok_or(ValueError::InvalidVariantJson),
            AtomType::Point => Self::decode_point_payload(payload),
        }
    }

    fn decode_point_payload(payload: &JsonValue) -> Result<VariantAtom, ValueError> {
        if let Some(text) = payload.as_str() {
            return text.parse::<Point>().map(VariantAtom::Point);
        }
        if let Some(items) = payload.as_array() {
            if let [x, y] = items.as_slice() {
                if let (Some(x), Some(y)) = (x.as_f64(), y.as_f64()) {
                    return Ok(VariantAtom::Point(Point::new(x, y)));
                }
            }
        }
        Err(ValueError::InvalidVariantJson)
    }

    fn infer_bare_scalar(value: &JsonValue) -> Result<Self, ValueError> {
        match value {
            JsonValue::Bool(b) => Ok(Self::Atom(VariantAtom::Bool(*b))),
            JsonValue::Number(n) => n.as_i64().map_or_else(
                || {
                    n.as_f64()
                        .map(|d| Self::Atom(VariantAtom::Double(d)))
                        .ok_or(ValueError::InvalidVariantJson)
                },
                |i| Ok(Self::Atom(VariantAtom::Int(i))),
            ),
            JsonValue::String(s) => Ok(Self::Atom(VariantAtom::String(s.clone()))),
            _ => Err(ValueError::InvalidVariantJson),
        }
    }

    fn infer_bare_array(items: &[JsonValue]) -> Result<Self, ValueError> {
        // An untyped empty array defaults to an empty integer array.
        if items.is_empty() {
            return Ok(Self::Array(VariantArray::Int(Vec::new())));
        }
        if items.iter().all(|v| v.as_i64().is_some()) {
            let ints = items.iter().filter_map(JsonValue::as_i64).collect();
            return Ok(Self::Array(VariantArray::Int(ints)));
        }
        if items.iter().all(|v| v.as_f64().is_some()) {
            let doubles = items.iter().filter_map(JsonValue::as_f64).collect();
            return Ok(Self::Array(VariantArray::Double(doubles)));
        }
        if items.iter().all(JsonValue::is_boolean) {
            let bools = items.iter().filter_map(JsonValue::as_bool).collect();
            return Ok(Self::Array(VariantArray::Bool(bools)));
        }
        if items.iter().all(JsonValue::is_string) {
            let strings = items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect();
            return Ok(Self::Array(VariantArray::String(strings)));
        }
        Err(ValueError::InvalidVariantJson)
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Self::Atom(VariantAtom::Int(value))
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Self::Atom(VariantAtom::Double(value))
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Self::Atom(VariantAtom::Bool(value))
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::Atom(VariantAtom::String(value.to_owned()))
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Self::Atom(VariantAtom::String(value))
    }
}

impl From<Point> for Variant {
    fn from(value: Point) -> Self {
        Self::Atom(VariantAtom::Point(value))
    }
}

impl From<Vec<i64>> for Variant {
    fn from(value: Vec<i64>) -> Self {
        Self::Array(VariantArray::Int(value))
    }
}

impl From<Vec<f64>> for Variant {
    fn from(value: Vec<f64>) -> Self {
        Self::Array(VariantArray::Double(value))
    }
}

impl From<Vec<bool>> for Variant {
    fn from(value: Vec<bool>) -> Self {
        Self::Array(VariantArray::Bool(value))
    }
}

impl From<Vec<String>> for Variant {
    fn from(value: Vec<String>) -> Self {
        Self::Array(VariantArray::String(value))
    }
}

impl From<Vec<Point>> for Variant {
    fn from(value: Vec<Point>) -> Self {
        Self::Array(VariantArray::Point(value))
    }
}
