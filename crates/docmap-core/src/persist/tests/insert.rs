use super::{doc_of, keys, text};
use crate::{
    error::{ErrorClass, ErrorOrigin},
    model::{ClassMetadata, FieldMapping, MappingError, MetadataRegistry},
    obs::{TranslateEvent, TranslateSink, with_translate_sink},
    test_support::{BOOK, CAT, GEO, Harness, PROFILE, address, id, profile},
    value::{Document, Value},
    wire::WireValue,
};
use docmap_primitives::ScalarKind;
use std::cell::RefCell;

#[test]
fn insert_writes_identifier_and_declared_fields() {
    let h = Harness::new();
    let doc = profile(1, "ada").with("score", 5).with("cache", "hot");

    let outcome = h.persister().compile_insert(&doc).unwrap();
    let out = &outcome.document;

    assert_eq!(out.get("_id"), Some(&WireValue::ObjectId(id(1))));
    assert_eq!(out.get("name"), Some(&text("ada")));
    assert_eq!(out.get("score"), Some(&WireValue::Int(5)));
    assert!(!out.contains_key("cache"), "transient fields are never written");
    assert!(outcome.deferred.is_empty());
}

#[test]
fn non_nullable_absent_fields_are_omitted_and_nullable_ones_written_as_null() {
    let h = Harness::new();
    let doc = Document::new(PROFILE).with("id", id(1));

    let out = h.persister().compile_insert(&doc).unwrap().document;

    assert_eq!(keys(&out), vec!["_id", "email", "nick", "owner", "backup", "pet"]);
    assert_eq!(out.get("email"), Some(&WireValue::Null));
    assert!(!out.contains_key("name"));
    assert!(!out.contains_key("address"));
}

#[test]
fn identifier_falls_back_to_ledger_and_is_never_defaulted() {
    let mut h = Harness::new();
    let assigned = Document::new(PROFILE).with("name", "a");
    let fresh = Document::new(PROFILE).with("name", "b");
    h.ledger.assign_identifier(&assigned, id(7));

    let out = h.persister().compile_insert(&assigned).unwrap().document;
    assert_eq!(out.get("_id"), Some(&WireValue::ObjectId(id(7))));

    let out = h.persister().compile_insert(&fresh).unwrap().document;
    assert!(!out.contains_key("_id"));
}

#[test]
fn wire_names_replace_field_names() {
    let h = Harness::new();
    let doc = profile(1, "ada").with("nickname", "a");

    let out = h.persister().compile_insert(&doc).unwrap().document;

    assert_eq!(out.get("nick"), Some(&text("a")));
    assert!(!out.contains_key("nickname"));
}

#[test]
fn embedded_documents_are_materialized_recursively() {
    let h = Harness::new();
    let geo = Document::new(GEO).with("lat", 1.5).with("lng", 2.5);
    let home = address("Main St", "Oslo").with("geo", geo);
    let doc = profile(1, "ada").with("address", home);

    let out = h.persister().compile_insert(&doc).unwrap().document;
    let home = doc_of(out.get("address").unwrap());

    assert_eq!(keys(home), vec!["street", "city", "geo"]);
    assert_eq!(
        doc_of(home.get("geo").unwrap()).get("lat"),
        Some(&WireValue::Float(1.5))
    );
    assert!(
        !home.contains_key("_class"),
        "pinned associations carry no discriminator"
    );
}

#[test]
fn polymorphic_embedded_values_carry_discriminators() {
    let h = Harness::new();
    let book = Document::new(BOOK).with("title", "Dune");
    let doc = profile(1, "ada")
        .with("media", Value::list([book.clone()]))
        .with("shelf", Value::list([book]));

    let out = h.persister().compile_insert(&doc).unwrap().document;

    let WireValue::Array(media) = out.get("media").unwrap() else {
        panic!("media should be an array");
    };
    assert_eq!(doc_of(&media[0]).get("kind"), Some(&text("book")));

    let WireValue::Array(shelf) = out.get("shelf").unwrap() else {
        panic!("shelf should be an array");
    };
    assert_eq!(doc_of(&shelf[0]).get("_class"), Some(&text(BOOK)));
}

#[test]
fn unmapped_polymorphic_class_is_a_configuration_error() {
    let h = Harness::new();
    let geo = Document::new(GEO).with("lat", 0.0).with("lng", 0.0);
    let doc = profile(1, "ada").with("media", Value::list([geo]));

    let err = h.persister().compile_insert(&doc).unwrap_err();

    assert_eq!(err.class, ErrorClass::Configuration);
    assert_eq!(err.path.as_deref(), Some("media.0"));
    assert_eq!(
        err.mapping_error(),
        Some(&MappingError::UnmappedDiscriminatorClass {
            class: GEO.to_string()
        })
    );
}

#[test]
fn empty_mapped_collections_are_written_as_null_and_plain_ones_as_arrays() {
    let h = Harness::new();
    let doc = profile(1, "ada")
        .with("friends", Value::List(Vec::new()))
        .with("tags", Value::List(Vec::new()));

    let out = h.persister().compile_insert(&doc).unwrap().document;

    assert!(!out.contains_key("friends"), "non-nullable null is omitted");
    assert_eq!(out.get("tags"), Some(&WireValue::Array(Vec::new())));
}

#[test]
fn class_discriminator_is_always_written() {
    let h = Harness::new();
    let cat = Document::new(CAT).with("id", id(3)).with("name", "tom");

    let out = h.persister().compile_insert(&cat).unwrap().document;

    assert_eq!(out.get("type"), Some(&text("cat")));
}

#[test]
fn forward_reference_defers_the_whole_field() {
    let h = Harness::new();
    let target = Document::new(PROFILE).with("name", "later");
    let doc = profile(1, "ada").with("owner", target.clone());

    let outcome = h.persister().compile_insert(&doc).unwrap();

    assert!(!outcome.document.contains_key("owner"));
    assert_eq!(outcome.deferred.len(), 1);
    let deferred = &outcome.deferred[0];
    assert_eq!(deferred.document, doc.handle());
    assert_eq!(deferred.field_name, "owner");
    assert_eq!(deferred.value, Value::from(target));
}

#[test]
fn one_unresolved_element_defers_a_reference_collection() {
    let h = Harness::new();
    let known = profile(2, "bo");
    let unknown = Document::new(PROFILE).with("name", "later");
    let doc = profile(1, "ada").with("friends", Value::list([known, unknown]));

    let outcome = h.persister().compile_insert(&doc).unwrap();

    assert!(!outcome.document.contains_key("friends"));
    assert_eq!(outcome.deferred.len(), 1);
    assert_eq!(outcome.deferred[0].field_name, "friends");
}

#[test]
fn reference_inside_embedded_value_defers_the_top_level_field() {
    let h = Harness::new();
    let unknown = Document::new(PROFILE).with("name", "later");
    let home = address("Main St", "Oslo").with("resident", unknown);
    let doc = profile(1, "ada").with("address", home);

    let outcome = h.persister().compile_insert(&doc).unwrap();

    assert!(!outcome.document.contains_key("address"));
    assert_eq!(outcome.deferred[0].field_name, "address");
    assert_eq!(outcome.deferred[0].change_entry().old, Value::Null);
}

#[test]
fn colliding_stored_key_fails_instead_of_overwriting() {
    let mut h = Harness::new();
    h.registry = MetadataRegistry::from_classes([ClassMetadata::document("app::Legacy")
        .fields([
            FieldMapping::identifier("id", ScalarKind::Id),
            FieldMapping::scalar("legacy", ScalarKind::Text).stored_as("_id"),
        ])
        .build()
        .unwrap()])
    .unwrap();
    let doc = Document::new("app::Legacy")
        .with("id", id(1))
        .with("legacy", "old");

    let err = h.persister().compile_insert(&doc).unwrap_err();

    assert!(err.is_configuration());
    assert_eq!(
        err.mapping_error(),
        Some(&MappingError::ReservedWireName {
            class: "app::Legacy".to_string(),
            name: "_id".to_string(),
        })
    );
}

#[test]
fn unknown_class_is_a_configuration_error() {
    let h = Harness::new();

    let err = h
        .persister()
        .compile_insert(&Document::new("app::Missing"))
        .unwrap_err();

    assert!(err.is_configuration());
    assert_eq!(err.origin, ErrorOrigin::Mapping);
}

#[test]
fn insert_events_reach_the_installed_sink() {
    struct Recorder(RefCell<Vec<String>>);

    impl TranslateSink for Recorder {
        fn record(&self, event: TranslateEvent<'_>) {
            let line = match event {
                TranslateEvent::InsertCompiled { deferred, .. } => format!("insert:{deferred}"),
                TranslateEvent::ReferenceDeferred { field, .. } => format!("deferred:{field}"),
                TranslateEvent::UpdateCompiled { .. } => "update".to_string(),
                TranslateEvent::TranslateFailed { .. } => "failed".to_string(),
            };
            self.0.borrow_mut().push(line);
        }
    }

    let h = Harness::new();
    let doc = profile(1, "ada").with("owner", Document::new(PROFILE));
    let recorder = Recorder(RefCell::new(Vec::new()));

    with_translate_sink(&recorder, || {
        h.persister().compile_insert(&doc).unwrap();
    });

    assert_eq!(
        recorder.0.into_inner(),
        vec!["deferred:owner".to_string(), "insert:1".to_string()]
    );
}
