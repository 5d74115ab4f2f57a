use crate::value::{Document, Value};
use std::collections::BTreeMap;

#[test]
fn documents_compare_by_identity() {
    let a = Document::new("Address").with("city", "Oslo");
    let b = Document::new("Address").with("city", "Oslo");

    assert_ne!(a, b);
    assert_eq!(a.clone(), a);
    assert_eq!(Value::from(a.clone()), Value::from(a));
    assert_ne!(Value::from(b.clone()), Value::from(Document::new("Address")));
}

#[test]
fn unset_fields_read_as_null() {
    let doc = Document::new("User").with("name", "ada");

    assert_eq!(doc.field("name"), &Value::Text("ada".to_string()));
    assert!(doc.field("email").is_null());
}

#[test]
fn scalar_equality_is_strict() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
    assert_ne!(Value::Text("1".to_string()), Value::Int(1));
    assert_eq!(Value::list([1_i64, 2]), Value::List(vec![Value::Int(1), Value::Int(2)]));
}

#[test]
fn option_conversion_maps_none_to_null() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
}

#[test]
fn handles_are_unique_and_displayed_with_hash() {
    let a = Document::new("A");
    let b = Document::new("A");

    assert_ne!(a.handle(), b.handle());
    assert!(a.handle().to_string().starts_with('#'));
}

#[test]
fn kind_names_cover_containers() {
    assert_eq!(Value::Hash(BTreeMap::new()).kind_name(), "hash");
    assert_eq!(Value::List(Vec::new()).kind_name(), "list");
    assert_eq!(Document::new("A").into_value().kind_name(), "document");
}
