// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Property tests for variant conversion and JSON encoding laws.

use proptest::prelude::*;

use trellis_core::{Point, ValueType, Variant, VariantEncoding};

fn finite_f64() -> impl Strategy<Value = f64> {
    prop::num::f64::NORMAL | prop::num::f64::ZERO
}

fn atom_variant() -> impl Strategy<Value = Variant> {
    prop_oneof![
        any::<i64>().prop_map(Variant::from),
        finite_f64().prop_map(Variant::from),
        any::<bool>().prop_map(Variant::from),
        ".*".prop_map(|s: String| Variant::from(s)),
        (finite_f64(), finite_f64()).prop_map(|(x, y)| Variant::from(Point::new(x, y))),
    ]
}

fn array_variant() -> impl Strategy<Value = Variant> {
    prop_oneof![
        prop::collection::vec(any::<i64>(), 0..8).prop_map(Variant::from),
        prop::collection::vec(finite_f64(), 0..8).prop_map(Variant::from),
        prop::collection::vec(".*", 0..4).prop_map(|v: Vec<String>| Variant::from(v)),
        prop::collection::vec((finite_f64(), finite_f64()), 0..4)
            .prop_map(|v| Variant::from(v.into_iter().map(|(x, y)| Point::new(x, y)).collect::<Vec<_>>())),
    ]
}

proptest! {
    #[test]
    fn tuple_encoding_round_trips(v in atom_variant()) {
        let encoded = v.to_json(VariantEncoding::Tuple);
        prop_assert_eq!(Variant::from_json(&encoded).unwrap(), v);
    }

    #[test]
    fn dictionary_encoding_round_trips(v in atom_variant()) {
        let encoded = v.to_json(VariantEncoding::Dictionary);
        prop_assert_eq!(Variant::from_json(&encoded).unwrap(), v);
    }

    #[test]
    fn array_encodings_round_trip(v in array_variant()) {
        for encoding in [VariantEncoding::Tuple, VariantEncoding::Dictionary] {
            let encoded = v.to_json(encoding);
            prop_assert_eq!(Variant::from_json(&encoded).unwrap(), v.clone());
        }
    }

    #[test]
    fn point_textual_form_recovers_the_point(x in finite_f64(), y in finite_f64()) {
        let v = Variant::from(Point::new(x, y));
        let text = v.try_string().unwrap();
        prop_assert_eq!(Variant::from(text).try_point().unwrap(), Point::new(x, y));
    }

    #[test]
    fn int_string_round_trip(i in any::<i64>()) {
        let v = Variant::from(i);
        let text = v.try_string().unwrap();
        prop_assert_eq!(Variant::from(text).try_int().unwrap(), i);
    }

    #[test]
    fn double_string_round_trip(d in finite_f64()) {
        let v = Variant::from(d);
        let text = v.try_string().unwrap();
        prop_assert_eq!(Variant::from(text).try_double().unwrap(), d);
    }

    #[test]
    fn convert_agrees_with_is_convertible(v in atom_variant()) {
        for target in [
            ValueType::INT,
            ValueType::DOUBLE,
            ValueType::BOOL,
            ValueType::STRING,
            ValueType::POINT,
        ] {
            prop_assert_eq!(v.is_convertible(target), v.convert(target).is_ok());
        }
    }
}
