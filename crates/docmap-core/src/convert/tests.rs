use crate::{
    convert::{ConvertError, ConverterRegistry, ValueConverter},
    value::Value,
    wire::WireValue,
};
use chrono::DateTime;
use docmap_primitives::{ALL_SCALAR_KINDS, ScalarKind};
use std::collections::BTreeMap;
use ulid::Ulid;

#[test]
fn null_passes_through_every_kind() {
    let registry = ConverterRegistry::new();

    for kind in ALL_SCALAR_KINDS {
        assert_eq!(registry.to_wire(kind, &Value::Null), Ok(WireValue::Null));
        assert_eq!(registry.to_value(kind, &WireValue::Null), Ok(Value::Null));
    }
}

#[test]
fn null_passes_through_even_without_converters() {
    let registry = ConverterRegistry::empty();

    assert_eq!(
        registry.to_wire(ScalarKind::Int, &Value::Null),
        Ok(WireValue::Null)
    );
    assert_eq!(
        registry.to_wire(ScalarKind::Int, &Value::Int(1)),
        Err(ConvertError::NoConverter {
            kind: ScalarKind::Int
        })
    );
}

#[test]
fn int_accepts_floats_and_text() {
    let registry = ConverterRegistry::new();

    assert_eq!(
        registry.to_wire(ScalarKind::Int, &Value::Float(-3.9)),
        Ok(WireValue::Int(-3))
    );
    assert_eq!(
        registry.to_wire(ScalarKind::Int, &Value::from(" 42 ")),
        Ok(WireValue::Int(42))
    );
    assert!(matches!(
        registry.to_wire(ScalarKind::Int, &Value::Float(f64::NAN)),
        Err(ConvertError::OutOfRange { .. })
    ));
    assert!(matches!(
        registry.to_wire(ScalarKind::Int, &Value::from("four")),
        Err(ConvertError::Parse { .. })
    ));
}

#[test]
fn dates_store_milliseconds() {
    let registry = ConverterRegistry::new();
    let dt = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");

    assert_eq!(
        registry.to_wire(ScalarKind::Date, &Value::Date(dt)),
        Ok(WireValue::Date(1_700_000_000_000))
    );
    assert_eq!(
        registry.to_wire(ScalarKind::Date, &Value::Int(1_700_000_000)),
        Ok(WireValue::Date(1_700_000_000_000))
    );
    assert_eq!(
        registry.to_wire(ScalarKind::Date, &Value::from("2023-11-14T22:13:20Z")),
        Ok(WireValue::Date(1_700_000_000_000))
    );
    assert_eq!(
        registry.to_value(ScalarKind::Date, &WireValue::Date(1_700_000_000_000)),
        Ok(Value::Date(dt))
    );
}

#[test]
fn ids_parse_from_text() {
    let registry = ConverterRegistry::new();
    let id = Ulid::from_parts(1, 2);

    assert_eq!(
        registry.to_wire(ScalarKind::Id, &Value::Text(id.to_string())),
        Ok(WireValue::ObjectId(id))
    );
    assert!(registry
        .to_wire(ScalarKind::Id, &Value::from("not-a-ulid"))
        .is_err());
    assert_eq!(
        registry.to_wire(ScalarKind::Id, &Value::Int(3)),
        Err(ConvertError::TypeMismatch {
            kind: ScalarKind::Id,
            found: "int"
        })
    );
}

#[test]
fn hash_and_collection_recurse_through_plain_values() {
    let registry = ConverterRegistry::new();
    let mut map = BTreeMap::new();
    map.insert("tags".to_string(), Value::list(["a", "b"]));
    map.insert("n".to_string(), Value::Int(1));

    let wire = registry
        .to_wire(ScalarKind::Hash, &Value::Hash(map.clone()))
        .expect("hash converts");
    assert_eq!(
        registry.to_value(ScalarKind::Hash, &wire),
        Ok(Value::Hash(map))
    );

    assert!(matches!(
        registry.to_wire(ScalarKind::Collection, &Value::Int(1)),
        Err(ConvertError::ExpectedList { found: "int" })
    ));
}

#[test]
fn custom_converter_replaces_default() {
    struct Upper;

    impl ValueConverter for Upper {
        fn to_wire(&self, value: &Value) -> Result<WireValue, ConvertError> {
            match value {
                Value::Text(s) => Ok(WireValue::Text(s.to_uppercase())),
                other => Err(ConvertError::TypeMismatch {
                    kind: ScalarKind::Text,
                    found: other.kind_name(),
                }),
            }
        }

        fn to_value(&self, wire: &WireValue) -> Result<Value, ConvertError> {
            match wire {
                WireValue::Text(s) => Ok(Value::Text(s.to_lowercase())),
                other => Err(ConvertError::TypeMismatch {
                    kind: ScalarKind::Text,
                    found: other.kind_name(),
                }),
            }
        }
    }

    let registry = ConverterRegistry::new().with(ScalarKind::Text, Upper);

    assert_eq!(
        registry.to_wire(ScalarKind::Text, &Value::from("ab")),
        Ok(WireValue::Text("AB".to_string()))
    );
    assert!(registry.contains(ScalarKind::Text));
}
